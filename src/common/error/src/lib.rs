//! Error types and result aliases for qlink.
//!
//! Every crate in the workspace reports failures through [`QlinkError`].
//! Resolution failures are construction-time errors: a caller that receives
//! one must refuse to start rather than run with a half-linked schema.

mod error;

pub use error::{QlinkError, QlinkResult};
