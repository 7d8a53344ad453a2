//! Declaration rendering.
//!
//! Renders an entity list as TypeScript in three sections separated by
//! [`SECTION_DELIMITER`]: data shapes, operation request shapes, and the
//! operation registry. The registry is accumulated while operations are
//! rendered and returned alongside the text. JSON and YAML dumps of the IR
//! are available through [`format_output`].

use serde::Serialize;

use bot_api_typegen_core::{
    Entity, EntityKind, Field, NO_INPUT_ALIAS, Registry, RegistryBuilder, Shape,
};

use crate::error::{ExtractError, Result};

/// Fixed comment line separating the three output sections.
pub const SECTION_DELIMITER: &str =
    "// ---------------------------------------------------------------------------";

/// Default column width for wrapped description comments.
pub const DEFAULT_WRAP_WIDTH: usize = 80;

/// Default name of the emitted registry type.
pub const DEFAULT_REGISTRY_NAME: &str = "Methods";

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// TypeScript declarations.
    #[default]
    Typescript,
    /// The IR and registry as JSON.
    Json,
    /// The IR and registry as YAML.
    Yaml,
}

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    pub wrap_width: usize,
    pub registry_name: String,
    /// Documentation URL named in the header comment.
    pub source: Option<String>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            wrap_width: DEFAULT_WRAP_WIDTH,
            registry_name: DEFAULT_REGISTRY_NAME.to_string(),
            source: None,
        }
    }
}

/// Rendered declarations plus the registry built while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    pub text: String,
    pub registry: Registry,
}

/// Renders `entities` as TypeScript declarations.
///
/// Rendering is pure: the same entity list always produces the same text.
pub fn emit_typescript(entities: &[Entity], options: &EmitOptions) -> Emitted {
    let mut registry = RegistryBuilder::new();
    let mut shapes = Vec::new();
    let mut requests = Vec::new();

    for entity in entities {
        match &entity.kind {
            EntityKind::Operation { request, returns } => {
                let shape_name = entity.request_shape_name();
                requests.push(render_request(entity, &shape_name, request, options));
                registry.register(&entity.name, &shape_name, returns.clone());
            }
            _ => shapes.push(render_shape(entity, options)),
        }
    }

    let registry = registry.finish();

    let mut out = String::new();
    match &options.source {
        Some(source) => out.push_str(&format!("// Generated from {source}. Do not edit.\n\n")),
        None => out.push_str("// Generated from bot API documentation. Do not edit.\n\n"),
    }
    out.push_str(&format!("export type {NO_INPUT_ALIAS} = Record<string, never>;\n"));
    for declaration in &shapes {
        out.push('\n');
        out.push_str(declaration);
    }

    out.push('\n');
    out.push_str(SECTION_DELIMITER);
    out.push('\n');
    for declaration in &requests {
        out.push('\n');
        out.push_str(declaration);
    }

    out.push('\n');
    out.push_str(SECTION_DELIMITER);
    out.push_str("\n\n");
    out.push_str(&render_registry(&registry, &options.registry_name));

    Emitted {
        text: out,
        registry,
    }
}

fn render_shape(entity: &Entity, options: &EmitOptions) -> String {
    let mut out = render_description(&entity.description, options.wrap_width);
    match &entity.kind {
        EntityKind::Union { members } => {
            out.push_str(&format!(
                "export type {} = {};\n",
                entity.name,
                members.join(" | ")
            ));
        }
        EntityKind::NoInput => out.push_str(&render_no_input(&entity.name)),
        EntityKind::Record { fields } => out.push_str(&render_interface(&entity.name, fields)),
        EntityKind::Operation { .. } => {}
    }
    out
}

fn render_request(entity: &Entity, shape_name: &str, request: &Shape, options: &EmitOptions) -> String {
    let mut out = render_description(&entity.description, options.wrap_width);
    match request {
        Shape::NoInput => out.push_str(&render_no_input(shape_name)),
        Shape::Record { fields } => out.push_str(&render_interface(shape_name, fields)),
    }
    out
}

fn render_no_input(name: &str) -> String {
    format!("export type {name} = {NO_INPUT_ALIAS};\n")
}

fn render_interface(name: &str, fields: &[Field]) -> String {
    if fields.is_empty() {
        return format!("export interface {name} {{}}\n");
    }

    let mut out = format!("export interface {name} {{\n");
    for field in fields {
        let marker = if field.optional { "?" } else { "" };
        out.push_str(&format!("  {}{marker}: {};", field.name, field.type_expr));
        if !field.description.is_empty() {
            out.push_str(" // ");
            out.push_str(&field.description);
        }
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

fn render_registry(registry: &Registry, name: &str) -> String {
    if registry.is_empty() {
        return format!("export type {name} = {{}};\n");
    }

    let mut out = format!("export type {name} = {{\n");
    for entry in registry.iter() {
        out.push_str(&format!(
            "  {}: [{}, {}];\n",
            entry.operation, entry.request_shape, entry.returns
        ));
    }
    out.push_str("};\n");
    out
}

/// Leading ` * ` of every comment body line.
const COMMENT_PREFIX: &str = " * ";

fn render_description(paragraphs: &[String], width: usize) -> String {
    if paragraphs.iter().all(|line| line.trim().is_empty()) {
        return String::new();
    }
    let text_width = width.saturating_sub(COMMENT_PREFIX.len()).max(1);

    let mut out = String::from("/**\n");
    for paragraph in paragraphs {
        if paragraph.trim().is_empty() {
            out.push_str(" *\n");
            continue;
        }
        for line in wrap_text(&paragraph.replace("*/", "*\\/"), text_width) {
            out.push_str(COMMENT_PREFIX);
            out.push_str(&line);
            out.push('\n');
        }
    }
    out.push_str(" */\n");
    out
}

/// Greedy word wrap.
///
/// Repeatedly takes the longest prefix of at most `width` characters that
/// ends at a space or hyphen. A space break is dropped; a hyphen stays on
/// the line. With no such boundary the text is cut at `width` exactly.
///
/// # Examples
///
/// ```
/// use bot_api_typegen_extract::emit::wrap_text;
///
/// assert_eq!(wrap_text("alpha beta gamma", 10), vec!["alpha beta", "gamma"]);
/// assert_eq!(wrap_text("self-contained", 8), vec!["self-", "containe", "d"]);
/// ```
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.trim().chars().collect();
    if width == 0 || chars.is_empty() {
        return vec![chars.into_iter().collect()];
    }

    let mut lines = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        if chars.len() - start <= width {
            lines.push(chars[start..].iter().collect::<String>());
            break;
        }

        let limit = start + width;
        let (end, next) = (start + 1..=limit)
            .rev()
            .find_map(|idx| match chars[idx] {
                ' ' => Some((idx, idx + 1)),
                '-' if idx < limit => Some((idx + 1, idx + 1)),
                _ => None,
            })
            .unwrap_or((limit, limit));

        lines.push(chars[start..end].iter().collect::<String>().trim_end().to_string());
        start = next;
        while chars.get(start) == Some(&' ') {
            start += 1;
        }
    }
    lines
}

#[derive(Serialize)]
struct IrDump<'a> {
    entities: &'a [Entity],
    registry: &'a Registry,
}

/// Formats a compiled run in the requested output format.
pub fn format_output(
    entities: &[Entity],
    emitted: &Emitted,
    format: OutputFormat,
) -> Result<String> {
    let dump = IrDump {
        entities,
        registry: &emitted.registry,
    };
    match format {
        OutputFormat::Typescript => Ok(emitted.text.clone()),
        OutputFormat::Json => serde_json::to_string_pretty(&dump)
            .map_err(|e| ExtractError::Serialize(format!("JSON serialization failed: {e}"))),
        OutputFormat::Yaml => serde_yaml::to_string(&dump)
            .map_err(|e| ExtractError::Serialize(format!("YAML serialization failed: {e}"))),
    }
}
