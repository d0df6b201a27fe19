//! Table columns.

use serde::{Deserialize, Serialize};

use crate::registry::TypeDescriptor;

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Field<T = TypeDescriptor> {
    /// Column name, unique within its table.
    pub name: String,
    /// Abbreviated name used by generated accessors.
    #[serde(default)]
    pub short_name: String,
    /// Declared type name, looked up in the type registry.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip)]
    pub(crate) resolved_type: Option<T>,
}

impl<T> Field<T> {
    /// Create a field with the given name and type name.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_name: String::new(),
            type_name: type_name.into(),
            resolved_type: None,
        }
    }

    /// Set the short name.
    #[must_use]
    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = short_name.into();
        self
    }

    /// The registry type bound to this field, once the schema is prepared.
    pub fn resolved_type(&self) -> Option<&T> {
        self.resolved_type.as_ref()
    }
}
