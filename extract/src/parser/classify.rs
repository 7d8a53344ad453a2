//! Entity shape classification and field-row parsing.
//!
//! Decides whether a normalized block describes a union of named variants, a
//! record with a field table, or an explicit no-input shape. Field type
//! phrases are kept raw here; the resolver turns them into type expressions.

use tracing::warn;

use super::normalize::NormalizedBlock;
use super::util::is_identifier;
use crate::error::{ExtractError, Result};

/// Sentence that marks an operation without parameters.
pub const NO_PARAMETERS_MARKER: &str = "Requires no parameters.";

/// A field row before type resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    pub name: String,
    pub type_phrase: String,
    pub optional: bool,
    pub description: String,
}

/// Classified shape of one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedShape {
    Union(Vec<String>),
    Record(Vec<RawField>),
    NoInput,
}

/// Classification result plus rows that matched no known line shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub shape: ClassifiedShape,
    pub skipped_rows: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineShape {
    Bare,
    Row,
}

enum ParsedLine {
    Bare(String),
    Row(RawField),
    Header,
    Unrecognized,
}

/// Classifies a normalized block.
///
/// Operations only consider their table rows; their list items are prose.
/// Mixing bare-name lines and field rows is a fatal
/// [`ExtractError::InconsistentEntityShape`].
pub fn classify_entity(block: &NormalizedBlock, is_operation: bool) -> Result<Classification> {
    if block.description_text().contains(NO_PARAMETERS_MARKER) {
        return Ok(Classification {
            shape: ClassifiedShape::NoInput,
            skipped_rows: Vec::new(),
        });
    }

    let lines: Vec<&String> = if is_operation {
        block.table.iter().collect()
    } else {
        block.table.iter().chain(block.list.iter()).collect()
    };

    let mut seen_shape: Option<LineShape> = None;
    let mut members = Vec::new();
    let mut fields = Vec::new();
    let mut skipped_rows = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let shape = match parse_line(line) {
            ParsedLine::Bare(name) => {
                members.push(name);
                LineShape::Bare
            }
            ParsedLine::Row(field) => {
                fields.push(field);
                LineShape::Row
            }
            ParsedLine::Header => continue,
            ParsedLine::Unrecognized => {
                warn!(entity = %block.name, line, "Skipping unrecognized content line");
                skipped_rows.push(line.to_string());
                continue;
            }
        };

        match seen_shape {
            None => seen_shape = Some(shape),
            Some(previous) if previous != shape => {
                return Err(ExtractError::InconsistentEntityShape {
                    entity: block.name.clone(),
                    line: line.to_string(),
                });
            }
            Some(_) => {}
        }
    }

    let shape = match seen_shape {
        Some(LineShape::Bare) => ClassifiedShape::Union(members),
        Some(LineShape::Row) | None => ClassifiedShape::Record(fields),
    };
    Ok(Classification {
        shape,
        skipped_rows,
    })
}

fn parse_line(line: &str) -> ParsedLine {
    if !line.contains('\t') {
        return if is_identifier(line) {
            ParsedLine::Bare(line.to_string())
        } else {
            ParsedLine::Unrecognized
        };
    }

    let columns: Vec<&str> = line.split('\t').map(str::trim).collect();
    let (name, type_phrase, marker, description) = match columns.as_slice() {
        [name, type_phrase, description] => (*name, *type_phrase, None, *description),
        [name, type_phrase, marker, description] => {
            (*name, *type_phrase, Some(*marker), *description)
        }
        _ => return ParsedLine::Unrecognized,
    };

    if matches!(name, "Field" | "Parameter") && type_phrase == "Type" {
        return ParsedLine::Header;
    }
    if !is_identifier(name) || type_phrase.is_empty() {
        return ParsedLine::Unrecognized;
    }

    let optional = marker.is_some_and(|m| m.eq_ignore_ascii_case("optional"))
        || description.starts_with("Optional.");

    ParsedLine::Row(RawField {
        name: name.to_string(),
        type_phrase: type_phrase.to_string(),
        optional,
        description: description.to_string(),
    })
}
