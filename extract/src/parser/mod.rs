//! Documentation parser for bot API HTML pages.
//!
//! The parser is a single linear pass over the document:
//!
//! 1. **Segment** — split the page into per-entity blocks at `<h4>` headings
//!    ([`segment`]).
//! 2. **Normalize** — strip markup and turn tables into tab-separated rows
//!    ([`normalize`]).
//! 3. **Classify** — decide union / record / no-input and parse field rows
//!    ([`classify`]).
//! 4. **Resolve** — turn field type phrases into [`TypeExpr`]s
//!    ([`resolve`]) and find each operation's return type ([`returns`]).
//!
//! Entities are processed strictly in document order because return types
//! carry over from one operation to the next. An inconsistently shaped entity
//! aborts the whole parse.
//!
//! [`TypeExpr`]: bot_api_typegen_core::TypeExpr

pub mod classify;
pub mod normalize;
pub mod resolve;
pub mod returns;
pub mod segment;
pub mod util;

use tracing::{debug, warn};

use bot_api_typegen_core::{Entity, EntityKind, Field, Shape, is_operation_name, validate_entities};

use crate::error::{ExtractError, Result};
use classify::{ClassifiedShape, RawField, classify_entity};
use normalize::{NormalizedBlock, normalize_block};
use resolve::resolve_type;
use returns::{ReturnResolution, ReturnTypeTracker};
use segment::segment_document;

/// Diagnostics for a single parse run.
#[derive(Debug, Clone, Default)]
pub struct ParseDiagnostics {
    /// Number of entity blocks found by the segmenter.
    pub blocks: usize,
    /// `(entity, row)` pairs for content lines that matched no shape.
    pub skipped_rows: Vec<(String, String)>,
    /// Operations whose return type was carried over from the previous one.
    pub carried_over: Vec<String>,
    /// Operations with no return type and nothing to carry over.
    pub missing_returns: Vec<String>,
    pub warnings: Vec<String>,
}

/// Parser for one documentation page.
pub struct DocParser {
    document: String,
    diagnostics: ParseDiagnostics,
}

impl DocParser {
    pub fn new(document: &str) -> Self {
        Self {
            document: document.to_string(),
            diagnostics: ParseDiagnostics::default(),
        }
    }

    /// Parses the document into entities in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InconsistentEntityShape`] when an entity mixes
    /// bare-name lines and field rows. No entities are returned in that case.
    pub fn parse(&mut self) -> Result<Vec<Entity>> {
        self.diagnostics = ParseDiagnostics::default();

        let blocks = segment_document(&self.document);
        self.diagnostics.blocks = blocks.len();

        let mut tracker = ReturnTypeTracker::new();
        let mut entities = Vec::with_capacity(blocks.len());

        for block in &blocks {
            let normalized = normalize_block(block);
            let entity = self.build_entity(&normalized, &mut tracker)?;
            debug!(entity = %entity.name, kind = entity.kind.label(), "Parsed entity");
            entities.push(entity);
        }

        for error in validate_entities(&entities) {
            warn!(%error, "IR validation");
            self.diagnostics.warnings.push(error.to_string());
        }

        Ok(entities)
    }

    pub fn diagnostics(&self) -> &ParseDiagnostics {
        &self.diagnostics
    }

    fn build_entity(
        &mut self,
        block: &NormalizedBlock,
        tracker: &mut ReturnTypeTracker,
    ) -> Result<Entity> {
        let is_operation = is_operation_name(&block.name);
        let classification = classify_entity(block, is_operation)?;
        self.diagnostics.skipped_rows.extend(
            classification
                .skipped_rows
                .into_iter()
                .map(|row| (block.name.clone(), row)),
        );

        let mut description = block.description.clone();

        let kind = if is_operation {
            let request = match classification.shape {
                ClassifiedShape::NoInput => Shape::NoInput,
                ClassifiedShape::Record(raw) => Shape::Record {
                    fields: resolve_fields(&raw),
                },
                ClassifiedShape::Union(members) => {
                    return Err(ExtractError::InconsistentEntityShape {
                        entity: block.name.clone(),
                        line: members.into_iter().next().unwrap_or_default(),
                    });
                }
            };

            if !block.list.is_empty() {
                if !description.is_empty() {
                    description.push(String::new());
                }
                description.extend(block.list.iter().cloned());
            }

            let returns = match tracker.resolve(&block.description_text()) {
                ReturnResolution::CarriedOver(previous) => {
                    debug!(entity = %block.name, returns = %previous, "Carrying over previous return type");
                    self.diagnostics.carried_over.push(block.name.clone());
                    previous
                }
                ReturnResolution::Missing => {
                    warn!(entity = %block.name, "No return type found");
                    self.diagnostics.missing_returns.push(block.name.clone());
                    self.diagnostics
                        .warnings
                        .push(format!("no return type found for {}", block.name));
                    ReturnResolution::Missing.into_type()
                }
                ReturnResolution::Found(found) => found,
            };

            EntityKind::Operation { request, returns }
        } else {
            match classification.shape {
                ClassifiedShape::NoInput => EntityKind::NoInput,
                ClassifiedShape::Record(raw) => EntityKind::Record {
                    fields: resolve_fields(&raw),
                },
                ClassifiedShape::Union(members) => EntityKind::Union { members },
            }
        };

        Ok(Entity::new(&block.name, kind).with_description(description))
    }
}

fn resolve_fields(raw: &[RawField]) -> Vec<Field> {
    raw.iter()
        .map(|field| Field {
            name: field.name.clone(),
            optional: field.optional,
            type_expr: resolve_type(&field.type_phrase, &field.description),
            description: field.description.clone(),
        })
        .collect()
}
