//! View command: apply a filter and show what is visible

use std::path::PathBuf;

use clap::Args;
use conceptmap_core::{ConceptMap, Distance, VisibleGraph};

use super::{load_map, require_node, DirectionArgs};
use crate::output::{to_json, OutputFormat};
use crate::AppContext;

#[derive(Args)]
pub struct ViewArgs {
    /// DSL file to load
    pub file: PathBuf,

    /// Active (focal) concept
    #[arg(short, long)]
    pub active: Option<String>,

    /// Concepts to force visible together with their neighbours
    #[arg(short, long)]
    pub select: Vec<String>,

    /// Maximum distance from the active concept (default from config)
    #[arg(short = 'd', long, allow_negative_numbers = true)]
    pub max_distance: Option<i64>,

    #[command(flatten)]
    pub direction: DirectionArgs,

    /// Only show edges carrying this relationship
    #[arg(short, long)]
    pub relationship: Option<String>,
}

/// Apply the command-line filter (falling back to config defaults)
fn apply_filter(map: &mut ConceptMap, args: &ViewArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let max_distance = args
        .max_distance
        .unwrap_or_else(|| i64::try_from(ctx.config.max_distance).unwrap_or(i64::MAX));
    map.set_max_distance(max_distance);
    map.set_bidirectional(args.direction.bidirectional(&ctx.config));

    if let Some(relationship) = args.relationship.as_deref() {
        if !map.relationships().contains(&relationship) {
            tracing::warn!("No edge carries relationship '{}'", relationship);
        }
    }
    map.set_active_relationship(args.relationship.as_deref());

    if let Some(active) = &args.active {
        require_node(map, active)?;
        map.set_active_node(Some(active.as_str()));
    }
    for id in &args.select {
        require_node(map, id)?;
        map.add_selected_node(id);
    }
    Ok(())
}

fn print_table(map: &ConceptMap, view: &VisibleGraph) {
    println!(
        "Concept map '{}': {} of {} nodes, {} of {} edges visible",
        view.name,
        view.nodes.len(),
        map.get_all_nodes().len(),
        view.edges.len(),
        map.get_all_edges().len()
    );

    if view.is_empty() {
        println!("  (nothing visible; set --active or --select)");
        return;
    }

    println!("  Nodes:");
    for node in &view.nodes {
        let mut tags = Vec::new();
        if node.active {
            tags.push("active".to_string());
        }
        if node.selected {
            tags.push("selected".to_string());
        }
        if let Distance::Finite(d) = node.distance {
            tags.push(format!("distance {}", d));
        }
        if tags.is_empty() {
            println!("    {}", node.id);
        } else {
            println!("    {} ({})", node.id, tags.join(", "));
        }
    }

    if !view.edges.is_empty() {
        println!("  Edges:");
        for edge in &view.edges {
            println!("    {} -[{}]-> {}", edge.source, edge.relationship, edge.target);
        }
    }
}

pub fn run(args: &ViewArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let (mut map, _) = load_map(&args.file)?;
    apply_filter(&mut map, args, ctx)?;

    tracing::debug!("Filter state: {:?}", map.filter_state());

    let view = map.visible_graph();
    tracing::info!(
        "{} nodes and {} edges visible",
        view.nodes.len(),
        view.edges.len()
    );

    match ctx.format {
        OutputFormat::Json => println!("{}", to_json(&view)?),
        OutputFormat::Table => print_table(&map, &view),
    }

    Ok(())
}
