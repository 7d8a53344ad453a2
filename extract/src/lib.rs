//! Bot API documentation compiler.
//!
//! This crate turns the HTML reference page of a bot API into TypeScript
//! declarations plus a registry mapping every operation to its request shape
//! and return type.
//!
//! # Main entry points
//!
//! - [`compile_document`] — parse an HTML page, render declarations and build
//!   the registry in one call.
//! - [`parser::DocParser`] — parse a page into the [`Entity`] IR only.
//! - [`source::SourceLoader`] — read the page from a cache file, fetching it
//!   once when the cache is missing.
//!
//! # Example
//!
//! ```
//! use bot_api_typegen_extract::{compile_document, emit::EmitOptions};
//!
//! let page = "\
//! <h4>ChatType</h4>
//! <p>Kinds of chat.</p>
//! <ul><li>PrivateChat</li><li>GroupChat</li></ul>
//! <h4>getMe</h4>
//! <p>Requires no parameters. Returns basic information about the bot in form of a User object.</p>
//! ";
//!
//! let compiled = compile_document(page, &EmitOptions::default()).unwrap();
//! assert!(compiled.emitted.text.contains("export type ChatType = PrivateChat | GroupChat;"));
//! assert!(compiled.emitted.text.contains("getMe: [GetMeData, User];"));
//! assert_eq!(compiled.report.operations, 1);
//! ```
//!
//! [`Entity`]: bot_api_typegen_core::Entity

pub mod emit;
pub mod error;
pub mod parser;
pub mod report;
pub mod source;

use tracing::{info, warn};

use bot_api_typegen_core::{Entity, validate_registry};
use emit::{EmitOptions, Emitted, emit_typescript};
use error::Result;
use parser::DocParser;
use report::RunReport;

/// Output of one compilation.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub entities: Vec<Entity>,
    pub emitted: Emitted,
    pub report: RunReport,
}

/// Parses `document` and renders it as declarations with a registry.
///
/// # Errors
///
/// Fails only when the parser rejects an inconsistently shaped entity; no
/// output is produced in that case.
pub fn compile_document(document: &str, options: &EmitOptions) -> Result<Compilation> {
    let mut parser = DocParser::new(document);
    let entities = parser.parse()?;
    let emitted = emit_typescript(&entities, options);

    let mut report = RunReport::from_parse(&entities, parser.diagnostics());
    report.registry_entries = emitted.registry.len();
    for error in validate_registry(&entities, &emitted.registry) {
        warn!(%error, "Registry validation");
        report.warnings.push(error.to_string());
    }

    info!(
        entities = entities.len(),
        operations = report.operations,
        warnings = report.warnings.len(),
        "Compiled documentation"
    );

    Ok(Compilation {
        entities,
        emitted,
        report,
    })
}
