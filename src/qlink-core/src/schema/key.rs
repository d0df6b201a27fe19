//! Named references to table fields.

use serde::{Deserialize, Serialize};

use super::FieldId;

/// A reference to a field by name.
///
/// Keys appear as table keys, query arguments, sort keys, join key values,
/// and fields pulled from a joined table. `expression` and `arg_expression`
/// are carried through untouched for the code generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    /// Name of the referenced field.
    pub name: String,
    /// Output name; the field name is used when empty.
    #[serde(default)]
    pub new_name: String,
    /// Explicit type override. Empty means "use the referenced field's type".
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub expression: String,
    #[serde(default)]
    pub arg_expression: String,
    /// Sort descending.
    #[serde(default)]
    pub desc: bool,
    #[serde(skip)]
    pub(crate) resolved_field: Option<FieldId>,
}

impl Key {
    /// Create a key referencing the named field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Rename the key in output.
    #[must_use]
    pub fn renamed(mut self, new_name: impl Into<String>) -> Self {
        self.new_name = new_name.into();
        self
    }

    /// Override the key's type.
    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    /// Attach an expression.
    #[must_use]
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = expression.into();
        self
    }

    /// Attach an argument expression.
    #[must_use]
    pub fn with_arg_expression(mut self, arg_expression: impl Into<String>) -> Self {
        self.arg_expression = arg_expression.into();
        self
    }

    /// Mark the key as descending.
    #[must_use]
    pub const fn descending(mut self) -> Self {
        self.desc = true;
        self
    }

    /// Name the key is exposed under.
    pub fn output_name(&self) -> &str {
        if self.new_name.is_empty() {
            &self.name
        } else {
            &self.new_name
        }
    }

    /// Whether the key carries an explicit type override.
    pub fn has_type_override(&self) -> bool {
        !self.type_name.is_empty()
    }

    /// The field this key refers to, once the schema is prepared.
    pub const fn resolved_field(&self) -> Option<FieldId> {
        self.resolved_field
    }
}
