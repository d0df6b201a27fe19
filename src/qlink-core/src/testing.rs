//! Testing utilities and fixtures for qlink-core.
//!
//! The fixtures model a small token ledger: an `accounts` table, a `tokens`
//! table, and queries over both, including one join.

use std::collections::HashMap;

use crate::name::Name;
use crate::registry::TypeDescriptor;
use crate::schema::{Field, Key, Query, Schema, Table};

/// Parse a fixture name.
///
/// # Panics
///
/// Panics if `text` is not a valid name.
pub fn name(text: &str) -> Name {
    text.parse()
        .unwrap_or_else(|e| panic!("invalid fixture name {text:?}: {e}"))
}

/// A registry with the type names used by the fixtures.
pub fn registry() -> HashMap<String, TypeDescriptor> {
    ["uint64", "asset", "symbol", "name", "string"]
        .into_iter()
        .map(|t| (t.to_string(), TypeDescriptor::new(t)))
        .collect()
}

/// `accounts`: `id: uint64`, `balance: asset`, keyed by `id`.
pub fn accounts_table() -> Table {
    Table::new("accounts")
        .with_field(Field::new("id", "uint64"))
        .with_field(Field::new("balance", "asset").with_short_name("bal"))
        .with_history_key(Key::new("id"))
        .with_key(Key::new("id"))
}

/// `tokens`: `symbol: symbol`, `issuer: name`, keyed by `symbol`.
pub fn tokens_table() -> Table {
    Table::new("tokens")
        .with_field(Field::new("symbol", "symbol"))
        .with_field(Field::new("issuer", "name"))
        .with_key(Key::new("symbol"))
}

/// `getaccount`: accounts by id.
pub fn get_account_query() -> Query {
    Query::new(name("getaccount"), "accounts")
        .with_index("primary")
        .with_function("get_account")
        .with_max_results(100)
        .with_arg(Key::new("id").with_type("uint64"))
        .with_sort_key(Key::new("id"))
}

/// `gettoken`: tokens by symbol.
pub fn get_token_query() -> Query {
    Query::new(name("gettoken"), "tokens")
        .with_function("get_token")
        .with_arg(Key::new("symbol").with_type("symbol"))
        .with_sort_key(Key::new("symbol"))
}

/// `getbalance`: accounts joined with the token of their balance.
pub fn get_balance_query() -> Query {
    Query::new(name("getbalance"), "accounts")
        .with_function("get_balance")
        .with_is_state(true)
        .with_arg(Key::new("id").with_type("uint64"))
        .with_sort_key(Key::new("id").descending())
        .with_join("tokens", name("gettoken"))
        .with_join_key_value(Key::new("balance").with_expression("balance.symbol"))
        .with_field_from_join(Key::new("symbol").renamed("token_symbol"))
        .with_condition("balance > 0")
}

/// Both tables and all three queries, in dependency order.
pub fn sample_schema() -> Schema {
    Schema::new()
        .with_table(accounts_table())
        .with_table(tokens_table())
        .with_query(get_account_query())
        .with_query(get_token_query())
        .with_query(get_balance_query())
}
