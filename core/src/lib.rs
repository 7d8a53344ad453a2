//! Core IR types for bot API type generation.
//!
//! This crate defines the intermediate representation produced by the
//! documentation extractor and consumed by the emitter:
//!
//! - [`Entity`] — one documented name with its classified [`EntityKind`].
//! - [`Field`] — a record member with optionality, type, and description.
//! - [`TypeExpr`] — canonical type algebra (primitive, array, union, literal
//!   set, named reference).
//! - [`Registry`] — operation name to request shape and return type.
//!
//! Validation ([`validate_entities`], [`validate_registry`]) catches
//! structural problems such as duplicate names and unions without members.
//!
//! # Example
//!
//! ```
//! use bot_api_typegen_core::*;
//!
//! let user = Entity::new("User", EntityKind::Record {
//!     fields: vec![
//!         Field::new("id", TypeExpr::Primitive(Primitive::Integer)),
//!         Field::new("username", TypeExpr::Primitive(Primitive::String)).optional(),
//!     ],
//! });
//! let get_me = Entity::new("getMe", EntityKind::Operation {
//!     request: Shape::NoInput,
//!     returns: TypeExpr::named("User"),
//! });
//!
//! let mut registry = RegistryBuilder::new();
//! registry.register(&get_me.name, &get_me.request_shape_name(), TypeExpr::named("User"));
//! let registry = registry.finish();
//!
//! let entities = [user, get_me];
//! assert!(validate_entities(&entities).is_empty());
//! assert!(validate_registry(&entities, &registry).is_empty());
//! ```

mod registry;
mod types;
mod validate;

pub use registry::{Registry, RegistryBuilder, RegistryEntry};
pub use types::*;
pub use validate::{ValidationError, validate_entities, validate_registry};
