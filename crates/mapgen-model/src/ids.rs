#![deny(unsafe_code)]

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub fn as_u32(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

define_id!(
    /// Handle of a source table inside a [`Project`](crate::Project).
    SourceTableId,
    "st"
);
define_id!(
    /// Handle of a target table inside a [`Project`](crate::Project).
    TargetTableId,
    "tt"
);
define_id!(
    /// Handle of a source column inside a [`Project`](crate::Project).
    SourceColumnId,
    "sc"
);
define_id!(
    /// Handle of a target column inside a [`Project`](crate::Project).
    TargetColumnId,
    "tc"
);

/// Name-based reference to a column, as typed by a user or stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Parse a `table.column` reference. The last dot separates the parts so
    /// schema-qualified table names survive.
    pub fn parse(value: &str) -> Option<Self> {
        let (table, column) = value.rsplit_once('.')?;
        let table = table.trim();
        let column = column.trim();
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some(Self::new(table, column))
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_table_dot_column() {
        let parsed = ColumnRef::parse("customer.name").unwrap();
        assert_eq!(parsed, ColumnRef::new("customer", "name"));
        assert_eq!(parsed.to_string(), "customer.name");
    }

    #[test]
    fn keeps_schema_qualified_tables() {
        let parsed = ColumnRef::parse("crm.customer.id").unwrap();
        assert_eq!(parsed.table, "crm.customer");
        assert_eq!(parsed.column, "id");
    }

    #[test]
    fn rejects_incomplete_references() {
        assert!(ColumnRef::parse("customer").is_none());
        assert!(ColumnRef::parse(".name").is_none());
        assert!(ColumnRef::parse("customer. ").is_none());
    }
}
