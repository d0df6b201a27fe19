//! Schema resolution.
//!
//! `prepare` links a loaded schema in two stages: every table first, then
//! every query, since query resolution reads the tables' resolved state.
//!
//! ```text
//! loader → Schema (unresolved) → prepare(registry) → Schema (resolved)
//!                                   ^^^^^^^
//!                                 this module
//! ```
//!
//! All derived state is staged in side structures while the schema is only
//! read. The schema is written once both stages have succeeded, so a failed
//! `prepare` leaves it exactly as it was.
//!
//! Join targets must be declared before the joining query (or be the query
//! itself); a later declaration is reported as an unknown join query.

use std::collections::HashMap;

use log::{debug, info};

use common_error::{QlinkError, QlinkResult};

use crate::name::Name;
use crate::registry::TypeRegistry;
use crate::schema::{FieldId, Key, Query, QueryId, Schema, Table, TableId};

impl<T: Clone> Schema<T> {
    /// Resolve every name reference against `registry`.
    ///
    /// Fails on the first unknown type, field, table, or join query, on a
    /// duplicate table, query, or field name, and on a schema that is already
    /// prepared. On failure the schema is left unresolved and must not be
    /// served.
    pub fn prepare<R>(&mut self, registry: &R) -> QlinkResult<()>
    where
        R: TypeRegistry<Type = T> + ?Sized,
    {
        if self.prepared {
            return Err(QlinkError::AlreadyPrepared);
        }

        let linked = Linker::new(self, registry).link()?;
        linked.commit(self);

        info!(
            "schema prepared: {} tables, {} queries",
            self.tables.len(),
            self.queries.len()
        );
        Ok(())
    }
}

/// Resolve `keys` against a table's field lookup.
///
/// Order-preserving; the first key naming no field fails with `UnknownField`.
pub(crate) fn resolve_keys(
    owner: &str,
    table: TableId,
    field_by_name: &HashMap<String, usize>,
    keys: &[Key],
) -> QlinkResult<Vec<FieldId>> {
    keys.iter()
        .map(|key| {
            field_by_name
                .get(key.name.as_str())
                .map(|&index| FieldId::new(table, index))
                .ok_or_else(|| QlinkError::unknown_field(owner, &key.name))
        })
        .collect()
}

struct LinkedTable<T> {
    field_by_name: HashMap<String, usize>,
    types: Vec<T>,
    history_keys: Vec<FieldId>,
    keys: Vec<FieldId>,
}

struct LinkedJoin {
    table: TableId,
    fields_from_join: Vec<FieldId>,
    query: QueryId,
}

struct LinkedQuery<T> {
    table: TableId,
    args: Vec<FieldId>,
    sort_keys: Vec<FieldId>,
    join_key_values: Vec<FieldId>,
    arg_types: Vec<T>,
    range_types: Vec<T>,
    result_types: Vec<T>,
    join: Option<LinkedJoin>,
}

/// Fully resolved state, ready to be written into the schema.
struct Linked<T> {
    tables: Vec<LinkedTable<T>>,
    queries: Vec<LinkedQuery<T>>,
    table_by_name: HashMap<String, TableId>,
    query_by_name: HashMap<Name, QueryId>,
}

struct Linker<'a, T, R: ?Sized> {
    schema: &'a Schema<T>,
    registry: &'a R,
    tables: Vec<LinkedTable<T>>,
    table_by_name: HashMap<String, TableId>,
    query_by_name: HashMap<Name, QueryId>,
}

impl<'a, T, R> Linker<'a, T, R>
where
    T: Clone,
    R: TypeRegistry<Type = T> + ?Sized,
{
    fn new(schema: &'a Schema<T>, registry: &'a R) -> Self {
        Self {
            schema,
            registry,
            tables: Vec::with_capacity(schema.tables.len()),
            table_by_name: HashMap::with_capacity(schema.tables.len()),
            query_by_name: HashMap::with_capacity(schema.queries.len()),
        }
    }

    fn link(mut self) -> QlinkResult<Linked<T>> {
        let schema = self.schema;
        for (index, table) in schema.tables.iter().enumerate() {
            self.link_table(TableId(index), table)?;
        }

        let mut queries = Vec::with_capacity(schema.queries.len());
        for (index, query) in schema.queries.iter().enumerate() {
            if self
                .query_by_name
                .insert(query.identifier, QueryId(index))
                .is_some()
            {
                return Err(QlinkError::duplicate(
                    "query",
                    query.identifier.to_string(),
                ));
            }
            queries.push(self.link_query(query)?);
        }

        Ok(Linked {
            tables: self.tables,
            queries,
            table_by_name: self.table_by_name,
            query_by_name: self.query_by_name,
        })
    }

    fn link_table(&mut self, id: TableId, table: &Table<T>) -> QlinkResult<()> {
        if self.table_by_name.insert(table.name.clone(), id).is_some() {
            return Err(QlinkError::duplicate("table", &table.name));
        }

        let mut field_by_name = HashMap::with_capacity(table.fields.len());
        let mut types = Vec::with_capacity(table.fields.len());
        for (index, field) in table.fields.iter().enumerate() {
            if field_by_name.insert(field.name.clone(), index).is_some() {
                return Err(QlinkError::duplicate(
                    format!("field in table {}", table.name),
                    &field.name,
                ));
            }
            let ty = self.lookup_type(&field.type_name, || {
                format!("table {} field {}", table.name, field.name)
            })?;
            types.push(ty);
        }

        let owner = format!("table {}", table.name);
        let history_keys = resolve_keys(&owner, id, &field_by_name, &table.history_keys)?;
        let keys = resolve_keys(&owner, id, &field_by_name, &table.keys)?;

        debug!(
            "resolved table {} ({} fields, {} history keys, {} keys)",
            table.name,
            types.len(),
            history_keys.len(),
            keys.len()
        );
        self.tables.push(LinkedTable {
            field_by_name,
            types,
            history_keys,
            keys,
        });
        Ok(())
    }

    fn link_query(&self, query: &Query<T>) -> QlinkResult<LinkedQuery<T>> {
        let owner = format!("query {}", query.identifier);

        let table_id = self.lookup_table(&owner, &query.table_name)?;
        let table = &self.tables[table_id.0];
        let key_owner = format!("{owner} table {}", query.table_name);
        let args = resolve_keys(&key_owner, table_id, &table.field_by_name, &query.args)?;
        let sort_keys =
            resolve_keys(&key_owner, table_id, &table.field_by_name, &query.sort_keys)?;
        let join_key_values = resolve_keys(
            &key_owner,
            table_id,
            &table.field_by_name,
            &query.join_key_values,
        )?;

        let arg_types = query
            .args
            .iter()
            .map(|arg| self.lookup_type(&arg.type_name, || format!("{owner} arg {}", arg.name)))
            .collect::<QlinkResult<Vec<_>>>()?;

        let range_types = self.key_types(&owner, table_id, &query.sort_keys)?;

        let mut result_types = table.types.clone();
        let join = match query.join_table() {
            Some(join_table_name) => {
                let join_id = self.lookup_table(&owner, join_table_name)?;
                result_types.extend(self.key_types(&owner, join_id, &query.fields_from_join)?);
                let fields_from_join = resolve_keys(
                    &format!("{owner} table {join_table_name}"),
                    join_id,
                    &self.tables[join_id.0].field_by_name,
                    &query.fields_from_join,
                )?;
                let join_query =
                    self.lookup_query(&owner, query.join_query_identifier.unwrap_or_default())?;
                Some(LinkedJoin {
                    table: join_id,
                    fields_from_join,
                    query: join_query,
                })
            }
            None => None,
        };

        debug!(
            "resolved query {} over {} ({} range types, {} result types)",
            query.identifier,
            query.table_name,
            range_types.len(),
            result_types.len()
        );
        Ok(LinkedQuery {
            table: table_id,
            args,
            sort_keys,
            join_key_values,
            arg_types,
            range_types,
            result_types,
            join,
        })
    }

    /// Types of `keys` against a table: a key's own type when given,
    /// otherwise the type of the field it names.
    fn key_types(&self, owner: &str, table: TableId, keys: &[Key]) -> QlinkResult<Vec<T>> {
        let fields = &self.schema.tables[table.0].fields;
        let field_by_name = &self.tables[table.0].field_by_name;

        keys.iter()
            .map(|key| {
                let type_name = if key.has_type_override() {
                    key.type_name.as_str()
                } else {
                    let index = field_by_name
                        .get(key.name.as_str())
                        .ok_or_else(|| QlinkError::unknown_field(owner, &key.name))?;
                    fields[*index].type_name.as_str()
                };
                self.lookup_type(type_name, || format!("{owner} key {}", key.name))
            })
            .collect()
    }

    fn lookup_type(&self, type_name: &str, owner: impl FnOnce() -> String) -> QlinkResult<T> {
        self.registry
            .lookup(type_name)
            .cloned()
            .ok_or_else(|| QlinkError::unknown_type(owner(), type_name))
    }

    fn lookup_table(&self, owner: &str, name: &str) -> QlinkResult<TableId> {
        self.table_by_name
            .get(name)
            .copied()
            .ok_or_else(|| QlinkError::unknown_table(owner, name))
    }

    fn lookup_query(&self, owner: &str, identifier: Name) -> QlinkResult<QueryId> {
        if let Some(&id) = self.query_by_name.get(&identifier) {
            return Ok(id);
        }
        let declared_later = self
            .schema
            .queries
            .iter()
            .any(|query| query.identifier == identifier);
        Err(QlinkError::unknown_query(
            owner,
            identifier.to_string(),
            declared_later,
        ))
    }
}

impl<T: Clone> Linked<T> {
    fn commit(self, schema: &mut Schema<T>) {
        for (table, linked) in schema.tables.iter_mut().zip(self.tables) {
            for (field, ty) in table.fields.iter_mut().zip(&linked.types) {
                field.resolved_type = Some(ty.clone());
            }
            bind_keys(&mut table.history_keys, linked.history_keys);
            bind_keys(&mut table.keys, linked.keys);
            table.resolved_types = linked.types;
            table.field_by_name = linked.field_by_name;
        }

        for (query, linked) in schema.queries.iter_mut().zip(self.queries) {
            bind_keys(&mut query.args, linked.args);
            bind_keys(&mut query.sort_keys, linked.sort_keys);
            bind_keys(&mut query.join_key_values, linked.join_key_values);
            query.resolved_table = Some(linked.table);
            query.resolved_arg_types = linked.arg_types;
            query.resolved_range_types = linked.range_types;
            query.resolved_result_types = linked.result_types;
            query.resolved_join_table = linked.join.as_ref().map(|join| join.table);
            query.resolved_join_query = linked.join.as_ref().map(|join| join.query);
            match linked.join {
                Some(join) => bind_keys(&mut query.fields_from_join, join.fields_from_join),
                None => {
                    for key in &mut query.fields_from_join {
                        key.resolved_field = None;
                    }
                }
            }
        }

        schema.table_by_name = self.table_by_name;
        schema.query_by_name = self.query_by_name;
        schema.prepared = true;
    }
}

fn bind_keys(keys: &mut [Key], fields: Vec<FieldId>) {
    for (key, field) in keys.iter_mut().zip(fields) {
        key.resolved_field = Some(field);
    }
}
