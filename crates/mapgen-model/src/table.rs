#![deny(unsafe_code)]

use indexmap::IndexMap;

use crate::{SourceColumnId, SourceTableId, TargetColumnId, TargetTableId};

/// A named table with an ordered, duplicate-free set of columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<C> {
    name: String,
    columns: IndexMap<String, C>,
}

impl<C: Copy> Table<C> {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            columns: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.keys().map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, C)> + '_ {
        self.columns.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn column(&self, name: &str) -> Option<C> {
        self.columns.get(name).copied()
    }

    /// Case-insensitive column lookup used by name matching.
    pub fn column_ignore_case(&self, name: &str) -> Option<C> {
        self.column(name).or_else(|| {
            self.columns
                .iter()
                .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
                .map(|(_, id)| *id)
        })
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns `false` and leaves the table untouched when the name exists.
    pub(crate) fn insert_column(&mut self, name: String, id: C) -> bool {
        if self.columns.contains_key(&name) {
            return false;
        }
        self.columns.insert(name, id);
        true
    }

    pub(crate) fn remove_column(&mut self, name: &str) -> Option<C> {
        self.columns.shift_remove(name)
    }

    pub(crate) fn drain_columns(&mut self) -> Vec<C> {
        self.columns.drain(..).map(|(_, id)| id).collect()
    }
}

/// A table of the originating schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTable {
    pub(crate) table: Table<SourceColumnId>,
    pub(crate) data_source: String,
}

impl SourceTable {
    pub fn name(&self) -> &str {
        self.table.name()
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    pub fn table(&self) -> &Table<SourceColumnId> {
        &self.table
    }
}

/// A table of the destination schema, derived from exactly one source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTable {
    pub(crate) table: Table<TargetColumnId>,
    pub(crate) source: SourceTableId,
    pub(crate) data_source: String,
}

impl TargetTable {
    pub fn name(&self) -> &str {
        self.table.name()
    }

    pub fn source(&self) -> SourceTableId {
        self.source
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    pub fn table(&self) -> &Table<TargetColumnId> {
        &self.table
    }
}

/// A column together with the handle of the table that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column<T> {
    pub(crate) table: T,
    pub(crate) name: String,
}

impl<T: Copy> Column<T> {
    pub fn table(&self) -> T {
        self.table
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

pub type SourceColumn = Column<SourceTableId>;
pub type TargetColumn = Column<TargetTableId>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_column_names_are_rejected() {
        let mut table: Table<u32> = Table::new("customer".to_string());
        assert!(table.insert_column("id".to_string(), 1));
        assert!(!table.insert_column("id".to_string(), 2));
        assert_eq!(table.len(), 1);
        assert_eq!(table.column("id"), Some(1));
    }

    #[test]
    fn removal_keeps_remaining_order() {
        let mut table: Table<u32> = Table::new("customer".to_string());
        for (idx, name) in ["id", "name", "email"].into_iter().enumerate() {
            table.insert_column(name.to_string(), idx as u32);
        }
        assert_eq!(table.remove_column("name"), Some(1));
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["id", "email"]);
    }

    #[test]
    fn case_insensitive_lookup_prefers_exact_match() {
        let mut table: Table<u32> = Table::new("customer".to_string());
        table.insert_column("Name".to_string(), 1);
        table.insert_column("name".to_string(), 2);
        assert_eq!(table.column_ignore_case("name"), Some(2));
        assert_eq!(table.column_ignore_case("NAME"), Some(1));
    }
}
