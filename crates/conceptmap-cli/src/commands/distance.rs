//! Distance command

use std::path::PathBuf;

use clap::Args;
use conceptmap_core::Distance;
use serde::Serialize;

use super::{load_map, require_node, DirectionArgs};
use crate::output::{to_json, OutputFormat};
use crate::AppContext;

#[derive(Args)]
pub struct DistanceArgs {
    /// DSL file to load
    pub file: PathBuf,

    /// Concept to measure from
    #[arg(long)]
    pub from: String,

    /// Concept to measure to
    pub to: String,

    #[command(flatten)]
    pub direction: DirectionArgs,
}

#[derive(Serialize)]
struct DistanceReport<'a> {
    from: &'a str,
    to: &'a str,
    bidirectional: bool,
    distance: Distance,
}

pub fn run(args: &DistanceArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let (mut map, _) = load_map(&args.file)?;
    require_node(&map, &args.from)?;
    require_node(&map, &args.to)?;

    map.set_bidirectional(args.direction.bidirectional(&ctx.config));
    map.set_active_node(Some(args.from.as_str()));

    let distance = map.get_distance_from_active(&args.to);
    tracing::debug!("Distance {} -> {}: {}", args.from, args.to, distance);

    match ctx.format {
        OutputFormat::Json => {
            let report = DistanceReport {
                from: &args.from,
                to: &args.to,
                bidirectional: map.is_bidirectional(),
                distance,
            };
            println!("{}", to_json(&report)?);
        }
        OutputFormat::Table => match distance {
            Distance::Finite(d) => println!("{} -> {}: {}", args.from, args.to, d),
            Distance::Infinite => println!("{} -> {}: unreachable", args.from, args.to),
        },
    }

    Ok(())
}
