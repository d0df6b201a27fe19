//! Core error types for qlink.

use thiserror::Error;

/// Result type alias using `QlinkError`.
pub type QlinkResult<T> = std::result::Result<T, QlinkError>;

/// Core error type for qlink operations.
///
/// The resolution variants carry an `owner` context (for example
/// `table accounts field balance`) so the message can be shown to an operator
/// as-is.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QlinkError {
    /// A type name is not present in the type registry.
    #[error("{owner}: unknown type: {type_name}")]
    UnknownType { owner: String, type_name: String },

    /// A key or field name does not match any field of the target table.
    #[error("{owner}: unknown field: {field}")]
    UnknownField { owner: String, field: String },

    /// A table name is not declared in the schema.
    #[error("{owner}: unknown table: {table}")]
    UnknownTable { owner: String, table: String },

    /// A join query identifier is not registered when it is referenced.
    #[error("{owner}: unknown join query: {query}{}", declared_later_hint(.declared_later))]
    UnknownQuery {
        owner: String,
        query: String,
        /// The target exists but is declared after the referencing query.
        declared_later: bool,
    },

    /// Two tables, two queries, or two fields of one table share a name.
    #[error("duplicate {kind} name: {name}")]
    DuplicateName { kind: String, name: String },

    /// `prepare` was called on a schema that is already resolved.
    #[error("schema is already prepared")]
    AlreadyPrepared,

    /// Text that cannot be encoded as a `Name`.
    #[error("InvalidName: {0}")]
    InvalidName(String),

    /// Invalid parameter provided.
    #[error("InvalidParameter: {0}")]
    InvalidParameter(String),

    /// IO error.
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON decoding error.
    #[error("SerdeJsonError: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// TOML decoding error.
    #[error("TomlError: {0}")]
    TomlError(#[from] toml::de::Error),

    /// YAML decoding error.
    #[error("YamlError: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

fn declared_later_hint(declared_later: &bool) -> &'static str {
    if *declared_later {
        " (declared after the referencing query)"
    } else {
        ""
    }
}

impl QlinkError {
    /// Create a new `UnknownType` error.
    pub fn unknown_type<O: Into<String>, S: Into<String>>(owner: O, type_name: S) -> Self {
        Self::UnknownType {
            owner: owner.into(),
            type_name: type_name.into(),
        }
    }

    /// Create a new `UnknownField` error.
    pub fn unknown_field<O: Into<String>, S: Into<String>>(owner: O, field: S) -> Self {
        Self::UnknownField {
            owner: owner.into(),
            field: field.into(),
        }
    }

    /// Create a new `UnknownTable` error.
    pub fn unknown_table<O: Into<String>, S: Into<String>>(owner: O, table: S) -> Self {
        Self::UnknownTable {
            owner: owner.into(),
            table: table.into(),
        }
    }

    /// Create a new `UnknownQuery` error.
    pub fn unknown_query<O: Into<String>, S: Into<String>>(
        owner: O,
        query: S,
        declared_later: bool,
    ) -> Self {
        Self::UnknownQuery {
            owner: owner.into(),
            query: query.into(),
            declared_later,
        }
    }

    /// Create a new `DuplicateName` error.
    pub fn duplicate<K: Into<String>, S: Into<String>>(kind: K, name: S) -> Self {
        Self::DuplicateName {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create a new `InvalidName` error.
    pub fn invalid_name<S: Into<String>>(msg: S) -> Self {
        Self::InvalidName(msg.into())
    }

    /// Create a new `InvalidParameter` error.
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Whether this error came out of schema resolution.
    pub const fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownType { .. }
                | Self::UnknownField { .. }
                | Self::UnknownTable { .. }
                | Self::UnknownQuery { .. }
                | Self::DuplicateName { .. }
                | Self::AlreadyPrepared
        )
    }
}

/// Ensure a condition holds, returning an `InvalidParameter` error if not.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:expr) => {
        if !$cond {
            return Err($crate::QlinkError::InvalidParameter($msg.to_string()));
        }
    };
}

/// Return early with an `InvalidName` error.
#[macro_export]
macro_rules! name_err {
    ($($arg:tt)*) => {
        return Err($crate::QlinkError::InvalidName(format!($($arg)*)))
    };
}
