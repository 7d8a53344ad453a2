//! Structured reporting for one generation run.

use serde::{Deserialize, Serialize};

use bot_api_typegen_core::{Entity, EntityKind};

use crate::parser::ParseDiagnostics;
use crate::source::SourceOrigin;

/// Where the documentation came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReport {
    pub path: String,
    pub origin: SourceOrigin,
    pub bytes: usize,
}

/// A content line that matched no known shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRow {
    pub entity: String,
    pub row: String,
}

/// Summary of one generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub source: Option<SourceReport>,
    pub blocks: usize,
    pub unions: usize,
    pub records: usize,
    pub no_input: usize,
    pub operations: usize,
    pub registry_entries: usize,
    pub carried_over_returns: Vec<String>,
    pub missing_returns: Vec<String>,
    pub skipped_rows: Vec<SkippedRow>,
    pub warnings: Vec<String>,
}

impl RunReport {
    /// Builds a report from parsed entities and parser diagnostics.
    pub fn from_parse(entities: &[Entity], diagnostics: &ParseDiagnostics) -> Self {
        let mut report = Self {
            blocks: diagnostics.blocks,
            carried_over_returns: diagnostics.carried_over.clone(),
            missing_returns: diagnostics.missing_returns.clone(),
            skipped_rows: diagnostics
                .skipped_rows
                .iter()
                .map(|(entity, row)| SkippedRow {
                    entity: entity.clone(),
                    row: row.clone(),
                })
                .collect(),
            warnings: diagnostics.warnings.clone(),
            ..Self::default()
        };

        for entity in entities {
            match entity.kind {
                EntityKind::Union { .. } => report.unions += 1,
                EntityKind::Record { .. } => report.records += 1,
                EntityKind::NoInput => report.no_input += 1,
                EntityKind::Operation { .. } => report.operations += 1,
            }
        }
        report
    }
}
