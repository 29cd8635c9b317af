//! CLI command implementations

use std::path::Path;

use anyhow::Context;
use clap::Args;
use conceptmap_core::{ConceptMap, ParseWarning};

use crate::config::Config;

pub mod check;
pub mod completions;
pub mod config;
pub mod distance;
pub mod export;
pub mod view;

/// Read a DSL file and build a map named after its file stem
pub fn load_map(path: &Path) -> anyhow::Result<(ConceptMap, Vec<ParseWarning>)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "concept map".to_string());

    let (map, warnings) = ConceptMap::from_dsl(name, &text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!(
        "Loaded {} ({} nodes, {} edges, {} warnings)",
        path.display(),
        map.get_all_nodes().len(),
        map.get_all_edges().len(),
        warnings.len()
    );

    Ok((map, warnings))
}

/// Fail unless `id` names a node of `map`
pub fn require_node(map: &ConceptMap, id: &str) -> anyhow::Result<()> {
    map.require_node(id)
        .map(|_| ())
        .with_context(|| format!("Concept map '{}' has no concept '{}'", map.name(), id))
}

/// Edge-direction flags shared by commands that traverse the graph
#[derive(Args)]
pub struct DirectionArgs {
    /// Only follow edges from source to target
    #[arg(long, conflicts_with = "both")]
    pub one_way: bool,

    /// Follow edges in both directions, overriding the config
    #[arg(long)]
    pub both: bool,
}

impl DirectionArgs {
    /// Whether traversal ignores edge direction; flags win over `config`
    pub fn bidirectional(&self, config: &Config) -> bool {
        if self.both {
            true
        } else if self.one_way {
            false
        } else {
            config.bidirectional
        }
    }
}
