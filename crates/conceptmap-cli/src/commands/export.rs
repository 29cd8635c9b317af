//! Export command: print the normalized DSL

use std::path::PathBuf;

use clap::Args;

use super::load_map;

#[derive(Args)]
pub struct ExportArgs {
    /// DSL file to normalize
    pub file: PathBuf,
}

pub fn run(args: &ExportArgs) -> anyhow::Result<()> {
    tracing::info!("Exporting {:?}", args.file);

    let (map, _) = load_map(&args.file)?;
    println!("{}", map.to_dsl());

    Ok(())
}
