//! Intermediate representation for documented bot API entities.
//!
//! Every documented name becomes one [`Entity`]. Data shapes are either a
//! [`EntityKind::Union`] of named variants, a [`EntityKind::Record`] of
//! fields, or the [`EntityKind::NoInput`] marker; remote methods are an
//! [`EntityKind::Operation`] wrapping a request [`Shape`] plus a resolved
//! return type. The types serialize with [`serde`] so a run can be dumped
//! as JSON or YAML.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the marker alias emitted for shapes that take no input.
pub const NO_INPUT_ALIAS: &str = "NoInput";

/// Suffix appended to an operation name to form its request shape name.
pub const REQUEST_SHAPE_SUFFIX: &str = "Data";

/// Documented primitive types.
///
/// # Examples
///
/// ```
/// use bot_api_typegen_core::Primitive;
///
/// assert_eq!(Primitive::from_doc_name("Int"), Some(Primitive::Integer));
/// assert_eq!(Primitive::from_doc_name("Float number"), Some(Primitive::Float));
/// assert_eq!(Primitive::from_doc_name("User"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Integer,
    Float,
    String,
    Boolean,
    /// The literal `true`, used for flags that can only be set.
    True,
}

impl Primitive {
    /// Maps a documented primitive name to its canonical primitive.
    pub fn from_doc_name(name: &str) -> Option<Self> {
        match name.trim() {
            "Integer" | "Int" => Some(Self::Integer),
            "Float" | "Float number" => Some(Self::Float),
            "String" => Some(Self::String),
            "Boolean" => Some(Self::Boolean),
            "True" => Some(Self::True),
            _ => None,
        }
    }

    /// TypeScript spelling of the primitive.
    pub fn ts_name(self) -> &'static str {
        match self {
            Self::Integer | Self::Float => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::True => "true",
        }
    }

    /// Whether descriptive prose may narrow this primitive to a literal set.
    pub fn admits_enumeration(self) -> bool {
        matches!(self, Self::String | Self::Integer)
    }
}

/// Canonical type expression.
///
/// Built once by the resolver and never mutated afterwards. [`Display`]
/// renders TypeScript syntax.
///
/// # Examples
///
/// ```
/// use bot_api_typegen_core::{Primitive, TypeExpr};
///
/// let nested = TypeExpr::array(TypeExpr::array(TypeExpr::Primitive(Primitive::Integer)));
/// assert_eq!(nested.to_string(), "number[][]");
///
/// let either = TypeExpr::Union(vec![
///     TypeExpr::Primitive(Primitive::Integer),
///     TypeExpr::Primitive(Primitive::String),
/// ]);
/// assert_eq!(TypeExpr::array(either).to_string(), "(number | string)[]");
/// ```
///
/// [`Display`]: std::fmt::Display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "of")]
pub enum TypeExpr {
    Primitive(Primitive),
    Array(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    /// Closed set of literal values mined from prose. Integer-looking values
    /// render unquoted.
    LiteralSet(Vec<String>),
    /// Reference to another documented entity, or an unrecognized phrase.
    Named(String),
}

impl TypeExpr {
    pub fn array(inner: TypeExpr) -> Self {
        Self::Array(Box::new(inner))
    }

    pub fn named(name: &str) -> Self {
        Self::Named(name.to_string())
    }

    /// Placeholder for operations whose return type could not be found.
    pub fn unknown() -> Self {
        Self::Named("unknown".to_string())
    }

    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            Self::Primitive(primitive) => Some(*primitive),
            _ => None,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(primitive) => f.write_str(primitive.ts_name()),
            Self::Array(inner) => match inner.as_ref() {
                Self::Union(_) | Self::LiteralSet(_) => write!(f, "({inner})[]"),
                _ => write!(f, "{inner}[]"),
            },
            Self::Union(members) => {
                for (idx, member) in members.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            Self::LiteralSet(values) => {
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" | ")?;
                    }
                    if value.parse::<i64>().is_ok() {
                        f.write_str(value)?;
                    } else {
                        write!(f, "{}", quote_literal(value))?;
                    }
                }
                Ok(())
            }
            Self::Named(name) => f.write_str(name),
        }
    }
}

fn quote_literal(value: &str) -> String {
    // serde_json string escaping matches TypeScript string literal rules for
    // everything that appears in documentation prose.
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

/// A field of a record shape.
///
/// # Examples
///
/// ```
/// use bot_api_typegen_core::{Field, Primitive, TypeExpr};
///
/// let field = Field::new("chat_id", TypeExpr::Primitive(Primitive::Integer))
///     .with_description("Unique identifier for the target chat");
/// assert!(!field.optional);
/// assert!(field.clone().optional().optional);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub optional: bool,
    pub type_expr: TypeExpr,
    /// Raw per-field documentation, emitted as a trailing comment.
    pub description: String,
}

impl Field {
    pub fn new(name: &str, type_expr: TypeExpr) -> Self {
        Self {
            name: name.to_string(),
            optional: false,
            type_expr,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Marks the field as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Request shape of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "shape")]
pub enum Shape {
    Record { fields: Vec<Field> },
    NoInput,
}

/// Classified form of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum EntityKind {
    /// Tagged union of named variants.
    Union { members: Vec<String> },
    /// Fixed-shape record.
    Record { fields: Vec<Field> },
    /// Explicit zero-parameter shape.
    NoInput,
    /// Remote method: request shape plus resolved return type.
    Operation { request: Shape, returns: TypeExpr },
}

impl EntityKind {
    /// Short label used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Union { .. } => "union",
            Self::Record { .. } => "record",
            Self::NoInput => "no_input",
            Self::Operation { .. } => "operation",
        }
    }
}

/// One documented name and its classified shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    /// Normalized prose paragraphs. Blank entries mark paragraph breaks.
    pub description: Vec<String>,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(name: &str, kind: EntityKind) -> Self {
        Self {
            name: name.to_string(),
            description: Vec::new(),
            kind,
        }
    }

    pub fn with_description(mut self, description: Vec<String>) -> Self {
        self.description = description;
        self
    }

    pub fn is_operation(&self) -> bool {
        matches!(self.kind, EntityKind::Operation { .. })
    }

    /// Name of the request shape emitted for an operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use bot_api_typegen_core::request_shape_name;
    ///
    /// assert_eq!(request_shape_name("sendMessage"), "SendMessageData");
    /// ```
    pub fn request_shape_name(&self) -> String {
        request_shape_name(&self.name)
    }
}

/// Returns `true` when a documented name denotes a remote operation.
///
/// Operations are documented in lower camel case, data shapes in upper camel
/// case.
pub fn is_operation_name(name: &str) -> bool {
    name.chars().next().is_some_and(|ch| ch.is_ascii_lowercase())
}

/// See [`Entity::request_shape_name`].
pub fn request_shape_name(operation: &str) -> String {
    let mut chars = operation.chars();
    let mut out = String::with_capacity(operation.len() + REQUEST_SHAPE_SUFFIX.len());
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
    }
    out.push_str(chars.as_str());
    out.push_str(REQUEST_SHAPE_SUFFIX);
    out
}
