//! Navigation and filter state carried by each concept map

use crate::traversal::Direction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default neighbourhood radius around the active node
pub const DEFAULT_MAX_DISTANCE: usize = 2;

/// View filter over a [`ConceptMap`](crate::ConceptMap)
///
/// Nodes are referenced by id. The state never appears in DSL output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Focal node; distances are measured from here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_node: Option<String>,

    /// Radius around the active node, in edges
    #[serde(default = "default_max_distance")]
    pub max_distance: usize,

    /// Nodes forced visible together with their immediate neighbours
    #[serde(default)]
    pub selected_nodes: BTreeSet<String>,

    /// Ignore edge direction while traversing
    #[serde(default = "default_true")]
    pub bidirectional: bool,

    /// Restrict the view to edges carrying this relationship
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_relationship: Option<String>,
}

fn default_max_distance() -> usize {
    DEFAULT_MAX_DISTANCE
}

fn default_true() -> bool {
    true
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            active_node: None,
            max_distance: default_max_distance(),
            selected_nodes: BTreeSet::new(),
            bidirectional: default_true(),
            active_relationship: None,
        }
    }
}

impl FilterState {
    pub fn direction(&self) -> Direction {
        Direction::from_bidirectional(self.bidirectional)
    }

    /// Set the radius, clamping negative values to zero
    pub fn set_max_distance(&mut self, distance: i64) {
        self.max_distance = usize::try_from(distance.max(0)).unwrap_or(usize::MAX);
    }

    /// Whether nothing anchors the view
    pub fn is_unanchored(&self) -> bool {
        self.active_node.is_none() && self.selected_nodes.is_empty()
    }
}
