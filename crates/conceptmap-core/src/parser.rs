//! Line-oriented parser for the concept map DSL
//!
//! Two statement forms are recognized:
//!
//! ```text
//! Rust -- is a -> Language
//!
//! Rust:
//! A systems programming language.
//! ---
//! ```
//!
//! Scanning is split in two layers. [`Statements`] turns lines into
//! located statements and knows nothing about policy; [`parse_dsl`] drives
//! it, stops at the first error and runs the post-processing passes.

use crate::declarations::{ParseError, ParseWarning, ParseWarningKind, ParsedDeclarations, Predicate};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::iter::Enumerate;
use std::str::Lines;

const RELATIONSHIP_SEPARATOR: &str = "--";
const TARGET_SEPARATOR: &str = "->";
const DEFINITION_TERMINATOR: &str = "---";

/// A statement together with the 1-based line it started on
#[derive(Debug, Clone, PartialEq)]
struct Located<T> {
    line: usize,
    value: T,
}

#[derive(Debug, Clone, PartialEq)]
enum Statement {
    Predicate(Predicate),
    Definition { concept: String, body: String },
}

/// Iterator over the statements of a DSL source
struct Statements<'a> {
    lines: Enumerate<Lines<'a>>,
}

impl<'a> Statements<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
        }
    }

    fn definition(&mut self, line: usize, concept: &str) -> Result<Statement, ParseError> {
        if concept.is_empty() {
            return Err(ParseError::syntax(
                line,
                "Definition header is missing a concept name",
            ));
        }

        let mut body = Vec::new();
        for (_, raw) in self.lines.by_ref() {
            if raw.trim() == DEFINITION_TERMINATOR {
                return Ok(Statement::Definition {
                    concept: concept.to_string(),
                    body: body.join("\n").trim().to_string(),
                });
            }
            body.push(raw);
        }

        Err(ParseError::syntax(
            line,
            format!(
                "Definition for '{}' is not terminated by '{}'",
                concept, DEFINITION_TERMINATOR
            ),
        ))
    }
}

impl Iterator for Statements<'_> {
    type Item = Result<Located<Statement>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, raw) = self.lines.next()?;
            let line = index + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                continue;
            }

            let statement = match trimmed.strip_suffix(':') {
                Some(header) => self.definition(line, header.trim()),
                None => parse_predicate(trimmed)
                    .map(Statement::Predicate)
                    .map_err(|message| ParseError::syntax(line, message)),
            };

            return Some(statement.map(|value| Located { line, value }));
        }
    }
}

/// Split `source -- relationship -> target` on the first `--`, then on the
/// first `->` after it.
fn parse_predicate(text: &str) -> Result<Predicate, String> {
    let malformed = || {
        format!(
            "Invalid predicate '{}': expected '<source> {} <relationship> {} <target>'",
            text, RELATIONSHIP_SEPARATOR, TARGET_SEPARATOR
        )
    };

    let (source, rest) = text.split_once(RELATIONSHIP_SEPARATOR).ok_or_else(malformed)?;
    let (relationship, target) = rest.split_once(TARGET_SEPARATOR).ok_or_else(malformed)?;

    Ok(Predicate::new(
        predicate_field("source", source)?,
        predicate_field("relationship", relationship)?,
        predicate_field("target", target)?,
    ))
}

fn predicate_field<'a>(name: &str, raw: &'a str) -> Result<&'a str, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(format!("Predicate {} is empty", name));
    }
    if value.contains('\n') {
        return Err(format!("Predicate {} spans multiple lines", name));
    }
    if value.contains(RELATIONSHIP_SEPARATOR) || value.contains(TARGET_SEPARATOR) {
        return Err(format!(
            "Predicate {} '{}' contains a reserved separator ('{}' or '{}')",
            name, value, RELATIONSHIP_SEPARATOR, TARGET_SEPARATOR
        ));
    }
    Ok(value)
}

/// Declarations accumulated by a successful scan, with source lines kept
/// for warning locations
#[derive(Default)]
struct Collected {
    predicates: Vec<Located<Predicate>>,
    definitions: BTreeMap<String, String>,
    definition_lines: Vec<(String, usize)>,
}

fn collect(text: &str) -> Result<Collected, ParseError> {
    let mut collected = Collected::default();
    let mut seen: HashSet<Predicate> = HashSet::new();

    for statement in Statements::new(text) {
        let Located { line, value } = statement?;
        match value {
            Statement::Predicate(predicate) => {
                if seen.insert(predicate.clone()) {
                    collected.predicates.push(Located { line, value: predicate });
                } else {
                    tracing::trace!("Dropping duplicate predicate on line {}: {}", line, predicate);
                }
            }
            Statement::Definition { concept, body } => {
                if collected.definitions.contains_key(&concept) {
                    return Err(ParseError::syntax(
                        line,
                        format!("Duplicate definition for concept '{}'", concept),
                    ));
                }
                collected.definition_lines.push((concept.clone(), line));
                collected.definitions.insert(concept, body);
            }
        }
    }

    Ok(collected)
}

fn warnings(collected: &Collected) -> Vec<ParseWarning> {
    let referenced: HashSet<&str> = collected
        .predicates
        .iter()
        .flat_map(|p| [p.value.source.as_str(), p.value.target.as_str()])
        .collect();

    let mut warnings: Vec<ParseWarning> = collected
        .definition_lines
        .iter()
        .filter(|(concept, _)| !referenced.contains(concept.as_str()))
        .map(|(concept, line)| ParseWarning {
            line: *line,
            column: 1,
            message: format!("Definition for '{}' is not used by any predicate", concept),
            kind: ParseWarningKind::OrphanedDefinition,
        })
        .collect();

    let mut first_use: HashMap<&str, usize> = HashMap::new();
    let mut missing: Vec<&str> = Vec::new();
    for predicate in &collected.predicates {
        for concept in [&predicate.value.source, &predicate.value.target] {
            if collected.definitions.contains_key(concept) {
                continue;
            }
            if !first_use.contains_key(concept.as_str()) {
                first_use.insert(concept, predicate.line);
                missing.push(concept);
            }
        }
    }

    warnings.extend(missing.into_iter().map(|concept| ParseWarning {
        line: first_use[concept],
        column: 1,
        message: format!("Concept '{}' has no definition", concept),
        kind: ParseWarningKind::MissingDefinition,
    }));

    warnings
}

/// Parse DSL text into declarations
///
/// Never fails outright: problems are reported in
/// [`ParsedDeclarations::errors`]. Parsing stops at the first error, in
/// which case nothing else is returned.
pub fn parse_dsl(text: &str) -> ParsedDeclarations {
    let collected = match collect(text) {
        Ok(collected) => collected,
        Err(error) => {
            tracing::debug!("DSL parse failed: {}", error);
            return ParsedDeclarations::failed(error);
        }
    };

    let warnings = warnings(&collected);

    tracing::debug!(
        "Parsed {} predicates and {} definitions ({} warnings)",
        collected.predicates.len(),
        collected.definitions.len(),
        warnings.len()
    );

    ParsedDeclarations {
        predicates: collected.predicates.into_iter().map(|p| p.value).collect(),
        definitions: collected.definitions,
        errors: Vec::new(),
        warnings,
    }
}
