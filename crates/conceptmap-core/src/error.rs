//! Error types for Conceptmap Core

use crate::declarations::ParseError;
use thiserror::Error;

/// Result type alias using Conceptmap's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Conceptmap error types
///
/// `parse_dsl` itself never fails; it reports problems inside
/// [`ParsedDeclarations`](crate::ParsedDeclarations). This enum is used by
/// the entry points that need a hard failure instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error at line {}, column {}: {}", .0.line, .0.column, .0.message)]
    Parse(ParseError),

    #[error("Node not found: {0}")]
    NodeNotFound(String),
}
