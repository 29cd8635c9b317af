//! Edge (predicate) type

use serde::{Deserialize, Serialize};

/// A directed, labelled edge between two concepts
///
/// Endpoints are stored by node id; the owning
/// [`ConceptMap`](crate::ConceptMap) resolves them to nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id
    pub source: String,

    /// Target node id
    pub target: String,

    /// Relationship label (e.g., "implements", "is a")
    pub relationship: String,
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relationship: relationship.into(),
        }
    }

    /// Derived key, `source--relationship-->target`
    pub fn id(&self) -> String {
        edge_id(&self.source, &self.relationship, &self.target)
    }

    /// The edge as a DSL predicate line
    pub fn to_dsl(&self) -> String {
        format!("{} -- {} -> {}", self.source, self.relationship, self.target)
    }
}

/// Build the key an edge with these parts is stored under
pub fn edge_id(source: &str, relationship: &str, target: &str) -> String {
    format!("{}--{}-->{}", source, relationship, target)
}
