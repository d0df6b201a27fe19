//! qlink - schema linking for table and query configurations
//!
//! qlink loads declarative table and query definitions and resolves every
//! name they use (types, fields, tables, join queries) into typed
//! cross-references, failing loudly on the first unresolved name.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Re-export workspace crates
pub use common_config as config;
pub use common_display as display;
pub use common_error as error;
pub use qlink_core as core;

pub use common_error::{QlinkError, QlinkResult};
pub use qlink_core::{Name, Schema, TypeDescriptor, TypeRegistry};

/// qlink version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
