//! Serializable snapshot of a filtered view

use crate::edge::Edge;
use crate::traversal::Distance;
use serde::{Deserialize, Serialize};

/// A node as shown in the filtered view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleNode {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,

    /// Distance from the active node
    pub distance: Distance,

    pub active: bool,

    pub selected: bool,
}

/// An edge as shown in the filtered view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub relationship: String,
}

impl From<&Edge> for VisibleEdge {
    fn from(edge: &Edge) -> Self {
        Self {
            id: edge.id(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            relationship: edge.relationship.clone(),
        }
    }
}

/// Visible nodes and edges of a concept map
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisibleGraph {
    pub name: String,
    pub nodes: Vec<VisibleNode>,
    pub edges: Vec<VisibleEdge>,
}

impl VisibleGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_nodes(mut self, nodes: Vec<VisibleNode>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_edges(mut self, edges: Vec<VisibleEdge>) -> Self {
        self.edges = edges;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
