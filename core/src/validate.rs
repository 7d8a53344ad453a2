//! IR validation.
//!
//! Checks structural invariants of an extracted entity list and registry:
//! names are non-empty and unique, record fields are unique within their
//! entity, unions have members, and every operation is registered once.
//!
//! # Examples
//!
//! ```
//! use bot_api_typegen_core::*;
//!
//! let user = Entity::new("User", EntityKind::Record {
//!     fields: vec![Field::new("id", TypeExpr::Primitive(Primitive::Integer))],
//! });
//! assert!(validate_entities(&[user.clone()]).is_empty());
//!
//! // Two entities with the same name
//! let errors = validate_entities(&[user.clone(), user]);
//! assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateEntity(_))));
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{Entity, EntityKind, Field, Registry, Shape};

/// IR validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Entity name is empty or whitespace-only.
    #[error("entity name cannot be empty")]
    EmptyEntityName,
    /// Two entities share a name.
    #[error("duplicate entity: {0}")]
    DuplicateEntity(String),
    /// Two fields of one record share a name.
    #[error("duplicate field '{field}' in {entity}")]
    DuplicateField { entity: String, field: String },
    /// A union has no members.
    #[error("union {0} has no members")]
    EmptyUnion(String),
    /// An operation appears twice in the registry.
    #[error("duplicate registry entry: {0}")]
    DuplicateOperation(String),
    /// An operation entity has no registry entry.
    #[error("operation {0} is missing from the registry")]
    UnregisteredOperation(String),
}

/// Validates an entity list. All problems are reported, in document order.
pub fn validate_entities(entities: &[Entity]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for entity in entities {
        let name = entity.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::EmptyEntityName);
            continue;
        }
        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateEntity(name.to_string()));
        }

        match &entity.kind {
            EntityKind::Union { members } if members.is_empty() => {
                errors.push(ValidationError::EmptyUnion(name.to_string()));
            }
            EntityKind::Record { fields }
            | EntityKind::Operation {
                request: Shape::Record { fields },
                ..
            } => errors.extend(validate_fields(name, fields)),
            _ => {}
        }
    }

    errors
}

/// Validates that the registry covers each operation exactly once.
pub fn validate_registry(entities: &[Entity], registry: &Registry) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for entry in registry.iter() {
        if !seen.insert(entry.operation.as_str()) {
            errors.push(ValidationError::DuplicateOperation(entry.operation.clone()));
        }
    }

    for entity in entities.iter().filter(|entity| entity.is_operation()) {
        if !seen.contains(entity.name.as_str()) {
            errors.push(ValidationError::UnregisteredOperation(entity.name.clone()));
        }
    }

    errors
}

fn validate_fields(entity: &str, fields: &[Field]) -> Vec<ValidationError> {
    let mut seen: HashSet<&str> = HashSet::new();
    fields
        .iter()
        .filter(|field| !seen.insert(field.name.as_str()))
        .map(|field| ValidationError::DuplicateField {
            entity: entity.to_string(),
            field: field.name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Primitive, RegistryBuilder, TypeExpr};

    fn int_field(name: &str) -> Field {
        Field::new(name, TypeExpr::Primitive(Primitive::Integer))
    }

    #[test]
    fn test_duplicate_field_in_operation_request() {
        let op = Entity::new(
            "sendDice",
            EntityKind::Operation {
                request: Shape::Record {
                    fields: vec![int_field("chat_id"), int_field("chat_id")],
                },
                returns: TypeExpr::named("Message"),
            },
        );
        let errors = validate_entities(&[op]);
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateField {
                entity: "sendDice".into(),
                field: "chat_id".into(),
            }]
        );
    }

    #[test]
    fn test_empty_union_and_empty_name() {
        let union = Entity::new("Origin", EntityKind::Union { members: vec![] });
        let blank = Entity::new("  ", EntityKind::NoInput);
        let errors = validate_entities(&[union, blank]);
        assert!(errors.contains(&ValidationError::EmptyUnion("Origin".into())));
        assert!(errors.contains(&ValidationError::EmptyEntityName));
    }

    #[test]
    fn test_registry_coverage() {
        let op = Entity::new(
            "getMe",
            EntityKind::Operation {
                request: Shape::NoInput,
                returns: TypeExpr::named("User"),
            },
        );
        let empty = RegistryBuilder::new().finish();
        assert_eq!(
            validate_registry(std::slice::from_ref(&op), &empty),
            vec![ValidationError::UnregisteredOperation("getMe".into())]
        );

        let mut builder = RegistryBuilder::new();
        builder.register("getMe", "GetMeData", TypeExpr::named("User"));
        builder.register("getMe", "GetMeData", TypeExpr::named("User"));
        let errors = validate_registry(&[op], &builder.finish());
        assert_eq!(errors, vec![ValidationError::DuplicateOperation("getMe".into())]);
    }
}
