//! Operation registry.
//!
//! Maps every remote operation to its request shape and return type. The
//! registry is append-only: a [`RegistryBuilder`] is threaded through the
//! emit pass and [`finish`](RegistryBuilder::finish)ed once at the end.

use serde::{Deserialize, Serialize};

use crate::TypeExpr;

/// One `operation -> [request shape, return type]` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub operation: String,
    pub request_shape: String,
    pub returns: TypeExpr,
}

/// Finalized registry, in the order operations were documented.
///
/// # Examples
///
/// ```
/// use bot_api_typegen_core::{RegistryBuilder, TypeExpr};
///
/// let mut builder = RegistryBuilder::new();
/// builder.register("getMe", "GetMeData", TypeExpr::named("User"));
/// let registry = builder.finish();
///
/// assert_eq!(registry.len(), 1);
/// assert_eq!(registry.get("getMe").unwrap().request_shape, "GetMeData");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    pub fn get(&self, operation: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| entry.operation == operation)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }
}

/// Append-only builder for a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<RegistryEntry>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, operation: &str, request_shape: &str, returns: TypeExpr) {
        self.entries.push(RegistryEntry {
            operation: operation.to_string(),
            request_shape: request_shape.to_string(),
            returns,
        });
    }

    pub fn finish(self) -> Registry {
        Registry {
            entries: self.entries,
        }
    }
}
