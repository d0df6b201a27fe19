//! Schema linking for table and query configurations.
//!
//! This crate provides:
//! - `Field`, `Key`, `Table`, `Query`, `Schema` as loaded from configuration
//! - `TypeRegistry`, the read-only type lookup consulted during resolution
//! - `Schema::prepare`, which resolves every name reference into a typed
//!   cross-reference
//! - `Describe`, the ordered attribute traversal used by generic encoders
//!
//! # Example
//!
//! ```rust
//! use qlink_core::testing::{registry, sample_schema};
//!
//! let mut schema = sample_schema();
//! schema.prepare(&registry()).unwrap();
//!
//! let query = &schema.queries()[0];
//! let result: Vec<&str> = query
//!     .resolved_result_types()
//!     .iter()
//!     .map(|t| t.name.as_str())
//!     .collect();
//! assert_eq!(result, ["uint64", "asset"]);
//! ```

mod display;
pub mod name;
pub mod reflect;
pub mod registry;
mod resolve;
pub mod schema;
pub mod testing;

pub use display::SchemaTree;
pub use name::Name;
pub use reflect::{AttrValue, Attribute, AttributeVisitor, Describe};
pub use registry::{NamedTypeRegistry, TypeDescriptor, TypeRegistry};
pub use schema::{Field, FieldId, Key, Query, QueryId, Schema, Table, TableId};
