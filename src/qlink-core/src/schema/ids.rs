//! Stable handles into schema-owned storage.
//!
//! A resolved cross-reference is an index into one of the schema's vectors,
//! never a pointer, so it stays valid however those vectors grow.

use std::fmt;

/// Position of a table in `Schema::tables()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableId(pub(crate) usize);

impl TableId {
    /// The table's index in declaration order.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Position of a query in `Schema::queries()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryId(pub(crate) usize);

impl QueryId {
    /// The query's index in declaration order.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A field of a specific table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId {
    table: TableId,
    index: usize,
}

impl FieldId {
    pub(crate) const fn new(table: TableId, index: usize) -> Self {
        Self { table, index }
    }

    /// The table owning the field.
    pub const fn table(self) -> TableId {
        self.table
    }

    /// The field's position within its table.
    pub const fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.index)
    }
}
