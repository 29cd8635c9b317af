//! Parser output: predicates, definitions and diagnostics

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A directed, labelled statement `source -- relationship -> target`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    pub source: String,
    pub relationship: String,
    pub target: String,
}

impl Predicate {
    pub fn new(
        source: impl Into<String>,
        relationship: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            relationship: relationship.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {} -> {}", self.source, self.relationship, self.target)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    Syntax,
    /// Reserved; definition problems are currently reported as `Syntax`.
    Semantic,
}

/// A fatal problem found while scanning DSL text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    /// 1-based line where the failing statement started
    pub line: usize,

    /// Always 1; columns are not tracked
    pub column: usize,

    pub message: String,

    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column: 1,
            message: message.into(),
            kind: ParseErrorKind::Syntax,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Warning classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseWarningKind {
    /// A definition exists but no predicate references the concept
    OrphanedDefinition,
    /// A predicate references a concept that has no definition
    MissingDefinition,
}

/// A non-fatal finding, only produced for successful parses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub kind: ParseWarningKind,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Everything `parse_dsl` learned from one input
///
/// When `errors` is non-empty the other collections are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDeclarations {
    pub predicates: Vec<Predicate>,

    pub definitions: BTreeMap<String, String>,

    #[serde(default)]
    pub errors: Vec<ParseError>,

    #[serde(default)]
    pub warnings: Vec<ParseWarning>,
}

impl ParsedDeclarations {
    /// A result carrying a single error and nothing else
    pub fn failed(error: ParseError) -> Self {
        Self {
            errors: vec![error],
            ..Default::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first error, if parsing failed
    pub fn error(&self) -> Option<&ParseError> {
        self.errors.first()
    }
}
