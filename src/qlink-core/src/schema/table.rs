//! Tables: ordered fields plus key sets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Field, Key};
use crate::registry::TypeDescriptor;

/// A table declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Table<T = TypeDescriptor> {
    /// Table name, unique within the schema.
    pub name: String,
    /// Columns in declaration order.
    #[serde(default)]
    pub fields: Vec<Field<T>>,
    /// Keys of the history index.
    #[serde(default)]
    pub history_keys: Vec<Key>,
    /// Keys of the primary index.
    #[serde(default)]
    pub keys: Vec<Key>,
    #[serde(skip)]
    pub(crate) resolved_types: Vec<T>,
    #[serde(skip)]
    pub(crate) field_by_name: HashMap<String, usize>,
}

impl<T> Table<T> {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            history_keys: Vec::new(),
            keys: Vec::new(),
            resolved_types: Vec::new(),
            field_by_name: HashMap::new(),
        }
    }

    /// Append a field.
    #[must_use]
    pub fn with_field(mut self, field: Field<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a history key.
    #[must_use]
    pub fn with_history_key(mut self, key: Key) -> Self {
        self.history_keys.push(key);
        self
    }

    /// Append a key.
    #[must_use]
    pub fn with_key(mut self, key: Key) -> Self {
        self.keys.push(key);
        self
    }

    /// Look up a field by name. Only available once the schema is prepared.
    pub fn field(&self, name: &str) -> Option<&Field<T>> {
        self.field_by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Field types in declaration order.
    pub fn resolved_types(&self) -> &[T] {
        &self.resolved_types
    }

    pub(crate) fn clear_resolution(&mut self) {
        self.resolved_types.clear();
        self.field_by_name.clear();
        for field in &mut self.fields {
            field.resolved_type = None;
        }
        for key in self.history_keys.iter_mut().chain(self.keys.iter_mut()) {
            key.resolved_field = None;
        }
    }
}
