//! Node (concept) type

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A concept in the map
///
/// Identity is the `id` alone: two nodes with the same id compare equal
/// whatever their definitions say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Concept name (unique within a map)
    pub id: String,

    /// Free-text explanation attached to the concept
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            definition: None,
        }
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    /// Whether the node carries a definition with any text in it
    pub fn has_definition(&self) -> bool {
        self.definition.as_deref().is_some_and(|d| !d.is_empty())
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}
