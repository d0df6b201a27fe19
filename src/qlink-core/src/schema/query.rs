//! Parameterized queries over a table.

use serde::{Deserialize, Serialize};

use super::{Key, QueryId, TableId};
use crate::name::Name;
use crate::registry::TypeDescriptor;

/// A named accessor over one table, optionally joined to a second table and
/// chained to another query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Query<T = TypeDescriptor> {
    /// Identifier callers look the query up by.
    #[serde(rename = "wasm_name")]
    pub identifier: Name,
    #[serde(default)]
    pub index: String,
    #[serde(default)]
    pub function: String,
    /// Name of the queried table.
    #[serde(rename = "table")]
    pub table_name: String,
    #[serde(default)]
    pub is_state: bool,
    #[serde(default)]
    pub limit_block_index: bool,
    #[serde(default)]
    pub max_results: u32,
    /// Name of the joined table.
    #[serde(rename = "join", default, skip_serializing_if = "Option::is_none")]
    pub join_table_name: Option<String>,
    /// Identifier of the query that serves the join.
    #[serde(
        rename = "join_query_wasm_name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub join_query_identifier: Option<Name>,
    #[serde(default)]
    pub args: Vec<Key>,
    #[serde(default)]
    pub sort_keys: Vec<Key>,
    #[serde(default)]
    pub join_key_values: Vec<Key>,
    /// Fields of the joined table appended to each result row.
    #[serde(default)]
    pub fields_from_join: Vec<Key>,
    /// Opaque condition expressions.
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(skip)]
    pub(crate) resolved_arg_types: Vec<T>,
    #[serde(skip)]
    pub(crate) resolved_range_types: Vec<T>,
    #[serde(skip)]
    pub(crate) resolved_result_types: Vec<T>,
    #[serde(skip)]
    pub(crate) resolved_table: Option<TableId>,
    #[serde(skip)]
    pub(crate) resolved_join_table: Option<TableId>,
    #[serde(skip)]
    pub(crate) resolved_join_query: Option<QueryId>,
}

impl<T> Query<T> {
    /// Create a query over the named table.
    pub fn new(identifier: Name, table_name: impl Into<String>) -> Self {
        Self {
            identifier,
            index: String::new(),
            function: String::new(),
            table_name: table_name.into(),
            is_state: false,
            limit_block_index: false,
            max_results: 0,
            join_table_name: None,
            join_query_identifier: None,
            args: Vec::new(),
            sort_keys: Vec::new(),
            join_key_values: Vec::new(),
            fields_from_join: Vec::new(),
            conditions: Vec::new(),
            resolved_arg_types: Vec::new(),
            resolved_range_types: Vec::new(),
            resolved_result_types: Vec::new(),
            resolved_table: None,
            resolved_join_table: None,
            resolved_join_query: None,
        }
    }

    #[must_use]
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    #[must_use]
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = function.into();
        self
    }

    #[must_use]
    pub const fn with_is_state(mut self, is_state: bool) -> Self {
        self.is_state = is_state;
        self
    }

    #[must_use]
    pub const fn with_limit_block_index(mut self, limit_block_index: bool) -> Self {
        self.limit_block_index = limit_block_index;
        self
    }

    #[must_use]
    pub const fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub fn with_arg(mut self, key: Key) -> Self {
        self.args.push(key);
        self
    }

    #[must_use]
    pub fn with_sort_key(mut self, key: Key) -> Self {
        self.sort_keys.push(key);
        self
    }

    #[must_use]
    pub fn with_join_key_value(mut self, key: Key) -> Self {
        self.join_key_values.push(key);
        self
    }

    /// Join `table`, served by the query `join_query`.
    #[must_use]
    pub fn with_join(mut self, table: impl Into<String>, join_query: Name) -> Self {
        self.join_table_name = Some(table.into());
        self.join_query_identifier = Some(join_query);
        self
    }

    #[must_use]
    pub fn with_field_from_join(mut self, key: Key) -> Self {
        self.fields_from_join.push(key);
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// The joined table's name. An empty name means no join.
    pub fn join_table(&self) -> Option<&str> {
        self.join_table_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Whether this query joins a second table.
    pub fn is_join(&self) -> bool {
        self.join_table().is_some()
    }

    /// Types of `args`, in order.
    pub fn resolved_arg_types(&self) -> &[T] {
        &self.resolved_arg_types
    }

    /// Types of `sort_keys`, in order.
    pub fn resolved_range_types(&self) -> &[T] {
        &self.resolved_range_types
    }

    /// Row shape: the table's field types, then the `fields_from_join` types.
    pub fn resolved_result_types(&self) -> &[T] {
        &self.resolved_result_types
    }

    /// The queried table, once the schema is prepared.
    pub const fn resolved_table(&self) -> Option<TableId> {
        self.resolved_table
    }

    /// The joined table, once the schema is prepared.
    pub const fn resolved_join_table(&self) -> Option<TableId> {
        self.resolved_join_table
    }

    /// The query serving the join, once the schema is prepared.
    pub const fn resolved_join_query(&self) -> Option<QueryId> {
        self.resolved_join_query
    }

    pub(crate) fn clear_resolution(&mut self) {
        self.resolved_arg_types.clear();
        self.resolved_range_types.clear();
        self.resolved_result_types.clear();
        self.resolved_table = None;
        self.resolved_join_table = None;
        self.resolved_join_query = None;
        for key in self
            .args
            .iter_mut()
            .chain(self.sort_keys.iter_mut())
            .chain(self.join_key_values.iter_mut())
            .chain(self.fields_from_join.iter_mut())
        {
            key.resolved_field = None;
        }
    }
}
