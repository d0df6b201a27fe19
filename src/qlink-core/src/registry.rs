//! Type registry seam.
//!
//! The registry maps a type name to an opaque descriptor. Resolution only
//! ever reads it, with exact-match lookups.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Read-only name to type-descriptor mapping consulted by `Schema::prepare`.
pub trait TypeRegistry {
    /// The descriptor type bound into the resolved schema.
    type Type;

    /// Look up a type by exact name.
    fn lookup(&self, type_name: &str) -> Option<&Self::Type>;
}

impl<T> TypeRegistry for HashMap<String, T> {
    type Type = T;

    fn lookup(&self, type_name: &str) -> Option<&T> {
        self.get(type_name)
    }
}

impl<T> TypeRegistry for BTreeMap<String, T> {
    type Type = T;

    fn lookup(&self, type_name: &str) -> Option<&T> {
        self.get(type_name)
    }
}

impl<R: TypeRegistry + ?Sized> TypeRegistry for &R {
    type Type = R::Type;

    fn lookup(&self, type_name: &str) -> Option<&Self::Type> {
        (**self).lookup(type_name)
    }
}

/// A descriptor that only records the type's name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type name as written in the configuration.
    pub name: String,
}

impl TypeDescriptor {
    /// Create a descriptor for the named type.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Scalar type names registered by [`NamedTypeRegistry::builtin`].
pub const BUILTIN_TYPE_NAMES: &[&str] = &[
    "bool",
    "int8",
    "uint8",
    "int16",
    "uint16",
    "int32",
    "uint32",
    "int64",
    "uint64",
    "int128",
    "uint128",
    "varint32",
    "varuint32",
    "float32",
    "float64",
    "float128",
    "time_point",
    "time_point_sec",
    "block_timestamp_type",
    "name",
    "bytes",
    "string",
    "checksum160",
    "checksum256",
    "checksum512",
    "public_key",
    "signature",
    "symbol",
    "symbol_code",
    "asset",
    "extended_asset",
];

/// A registry of name-only descriptors, for tools that have no richer type
/// information than the names a schema may use.
#[derive(Debug, Clone, Default)]
pub struct NamedTypeRegistry {
    types: HashMap<String, TypeDescriptor>,
}

impl NamedTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding [`BUILTIN_TYPE_NAMES`].
    pub fn builtin() -> Self {
        Self::from_names(BUILTIN_TYPE_NAMES.iter().copied())
    }

    /// A registry holding the given names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        registry.extend(names);
        registry
    }

    /// Register a type name. Re-registering a name keeps a single entry.
    pub fn register(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.types
            .entry(name.clone())
            .or_insert_with(|| TypeDescriptor::new(name));
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<S: Into<String>> Extend<S> for NamedTypeRegistry {
    fn extend<I: IntoIterator<Item = S>>(&mut self, names: I) {
        for name in names {
            self.register(name);
        }
    }
}

impl TypeRegistry for NamedTypeRegistry {
    type Type = TypeDescriptor;

    fn lookup(&self, type_name: &str) -> Option<&TypeDescriptor> {
        self.types.get(type_name)
    }
}
