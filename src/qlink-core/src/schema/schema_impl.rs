//! The schema: owner of every table and query.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Field, FieldId, Query, QueryId, Table, TableId};
use crate::name::Name;
use crate::registry::TypeDescriptor;

/// All tables and queries of a configuration.
///
/// A schema starts unresolved, as built by a loader. [`Schema::prepare`]
/// links every name reference in place; afterwards the schema is read-only
/// and can be shared between threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Schema<T = TypeDescriptor> {
    #[serde(default)]
    pub(crate) tables: Vec<Table<T>>,
    #[serde(default)]
    pub(crate) queries: Vec<Query<T>>,
    #[serde(skip)]
    pub(crate) table_by_name: HashMap<String, TableId>,
    #[serde(skip)]
    pub(crate) query_by_name: HashMap<Name, QueryId>,
    #[serde(skip)]
    pub(crate) prepared: bool,
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Self {
            tables: Vec::new(),
            queries: Vec::new(),
            table_by_name: HashMap::new(),
            query_by_name: HashMap::new(),
            prepared: false,
        }
    }
}

impl<T> Schema<T> {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unresolved schema from its parts.
    ///
    /// Entities cloned out of a prepared schema lose their resolved state.
    pub fn from_parts(mut tables: Vec<Table<T>>, mut queries: Vec<Query<T>>) -> Self {
        tables.iter_mut().for_each(Table::clear_resolution);
        queries.iter_mut().for_each(Query::clear_resolution);
        Self {
            tables,
            queries,
            ..Self::default()
        }
    }

    /// Append a table.
    ///
    /// Appending to a prepared schema discards its resolution; `prepare` must
    /// run again before the schema is used.
    #[must_use]
    pub fn with_table(mut self, mut table: Table<T>) -> Self {
        self.clear_resolution();
        table.clear_resolution();
        self.tables.push(table);
        self
    }

    /// Append a query. Discards any resolution, as [`Schema::with_table`].
    #[must_use]
    pub fn with_query(mut self, mut query: Query<T>) -> Self {
        self.clear_resolution();
        query.clear_resolution();
        self.queries.push(query);
        self
    }

    /// Whether `prepare` has completed successfully.
    pub const fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Tables in declaration order.
    pub fn tables(&self) -> &[Table<T>] {
        &self.tables
    }

    /// Queries in declaration order.
    pub fn queries(&self) -> &[Query<T>] {
        &self.queries
    }

    /// Look up a table by name. Only available once prepared.
    pub fn table(&self, name: &str) -> Option<&Table<T>> {
        self.table_id(name).and_then(|id| self.table_by_id(id))
    }

    /// Handle of the named table. Only available once prepared.
    pub fn table_id(&self, name: &str) -> Option<TableId> {
        self.table_by_name.get(name).copied()
    }

    /// Look up a query by identifier. Only available once prepared.
    pub fn query(&self, identifier: Name) -> Option<&Query<T>> {
        self.query_id(identifier).and_then(|id| self.query_by_id(id))
    }

    /// Handle of the identified query. Only available once prepared.
    pub fn query_id(&self, identifier: Name) -> Option<QueryId> {
        self.query_by_name.get(&identifier).copied()
    }

    /// Follow a table handle.
    pub fn table_by_id(&self, id: TableId) -> Option<&Table<T>> {
        self.tables.get(id.0)
    }

    /// Follow a query handle.
    pub fn query_by_id(&self, id: QueryId) -> Option<&Query<T>> {
        self.queries.get(id.0)
    }

    /// Follow a field handle.
    pub fn field(&self, id: FieldId) -> Option<&Field<T>> {
        self.table_by_id(id.table())
            .and_then(|table| table.fields.get(id.index()))
    }

    /// The table a query reads from.
    pub fn query_table(&self, query: &Query<T>) -> Option<&Table<T>> {
        query.resolved_table().and_then(|id| self.table_by_id(id))
    }

    /// The table a query joins, if any.
    pub fn query_join_table(&self, query: &Query<T>) -> Option<&Table<T>> {
        query
            .resolved_join_table()
            .and_then(|id| self.table_by_id(id))
    }

    /// The query serving a join, if any.
    pub fn query_join_query(&self, query: &Query<T>) -> Option<&Query<T>> {
        query
            .resolved_join_query()
            .and_then(|id| self.query_by_id(id))
    }

    /// Forget all resolved state, returning the schema to its loaded form.
    pub(crate) fn clear_resolution(&mut self) {
        if !self.prepared {
            return;
        }
        for table in &mut self.tables {
            table.clear_resolution();
        }
        for query in &mut self.queries {
            query.clear_resolution();
        }
        self.table_by_name.clear();
        self.query_by_name.clear();
        self.prepared = false;
    }
}
