//! Conceptmap Core - DSL parser and filtered graph model
//!
//! This crate parses the concept map DSL into declarations and builds a
//! directed, labelled graph from them. The graph carries a filter state
//! (active node, radius, selection, direction mode, relationship) and
//! answers which nodes and edges a view should show.

pub mod concept_map;
pub mod declarations;
pub mod edge;
pub mod error;
pub mod filter;
pub mod node;
pub mod parser;
pub mod traversal;
pub mod view;

pub use concept_map::ConceptMap;
pub use declarations::{
    ParseError, ParseErrorKind, ParseWarning, ParseWarningKind, ParsedDeclarations, Predicate,
};
pub use edge::{edge_id, Edge};
pub use error::{Error, Result};
pub use filter::{FilterState, DEFAULT_MAX_DISTANCE};
pub use node::Node;
pub use parser::parse_dsl;
pub use traversal::{Direction, Distance};
pub use view::{VisibleEdge, VisibleGraph, VisibleNode};
