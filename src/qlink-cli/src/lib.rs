//! qlink CLI - load, resolve, and inspect schema files
//!
//! This crate backs the `qlink-check` binary and exposes its steps as a
//! library so they can be tested without spawning a process.
//!
//! # Available Binaries
//!
//! - **`qlink-check`**: Resolve a schema file against a type registry and
//!   report its queries, or the first resolution error
//!
//! # Usage
//!
//! ```bash
//! cargo run --package qlink-cli --bin qlink-check -- schema.json --tree
//! ```

pub mod load;
pub mod report;

pub use load::{build_registry, check_file, load_schema_file, load_schema_str};
pub use report::{format_summary, render};
