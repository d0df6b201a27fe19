//! Schema data model.
//!
//! This module provides:
//! - `Field`, `Key`, `Table`, `Query` as loaded from configuration
//! - `Schema`, the owner of all tables and queries
//! - `TableId`, `QueryId`, `FieldId` handles used for resolved references

mod field;
mod ids;
mod key;
mod query;
mod schema_impl;
mod table;

pub use field::Field;
pub use ids::{FieldId, QueryId, TableId};
pub use key::Key;
pub use query::Query;
pub use schema_impl::Schema;
pub use table::Table;
