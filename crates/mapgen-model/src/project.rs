//! The in-memory registry of tables, columns and mappings.
//!
//! [`Project`] is an arena: tables and columns live in insertion-ordered
//! maps keyed by typed handles, and mappings refer to columns by handle.
//! Names are only used at the edges to look handles up.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::validate_name;
use crate::{
    Column, ColumnRef, LeftJoin, Mapping, MappingKind, MappingType, Result, SourceColumn,
    SourceColumnId, SourceTable, SourceTableId, Table, TargetColumn, TargetColumnId,
    TargetTable, TargetTableId,
};

/// Outcome of [`Project::remove_mapping`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveMapping {
    Removed(Mapping),
    OutOfRange {
        len: usize,
    },
    /// The caller expected another kind; nothing was removed.
    TypeMismatch {
        expected: MappingType,
        actual: MappingType,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Project {
    next_id: u32,
    source_tables: IndexMap<SourceTableId, SourceTable>,
    target_tables: IndexMap<TargetTableId, TargetTable>,
    source_columns: IndexMap<SourceColumnId, SourceColumn>,
    target_columns: IndexMap<TargetColumnId, TargetColumn>,
    source_names: HashMap<String, SourceTableId>,
    target_names: HashMap<String, TargetTableId>,
    mappings: Vec<Mapping>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every table, column and mapping. Handles are not reused.
    pub fn clear(&mut self) {
        let next_id = self.next_id;
        *self = Self {
            next_id,
            ..Self::default()
        };
    }

    pub fn is_empty(&self) -> bool {
        self.source_tables.is_empty() && self.target_tables.is_empty()
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ---------------------------------------------------------------------
    // Tables
    // ---------------------------------------------------------------------

    /// Register a source table. An existing table of the same name is kept
    /// as is and its handle returned.
    pub fn add_source_table(&mut self, name: &str, data_source: &str) -> Result<SourceTableId> {
        let name = validate_name("source table name", name)?;
        if let Some(id) = self.source_names.get(&name) {
            return Ok(*id);
        }
        let id = SourceTableId::new(self.allocate());
        self.source_tables.insert(
            id,
            SourceTable {
                table: Table::new(name.clone()),
                data_source: data_source.trim().to_string(),
            },
        );
        self.source_names.insert(name, id);
        Ok(id)
    }

    /// Register a target table derived from `source_table`.
    ///
    /// Returns `Ok(None)` when the source table does not exist.
    pub fn add_target_table(
        &mut self,
        name: &str,
        source_table: &str,
        data_source: &str,
    ) -> Result<Option<TargetTableId>> {
        let name = validate_name("target table name", name)?;
        let Some(source) = self.source_table_id(source_table) else {
            return Ok(None);
        };
        if let Some(id) = self.target_names.get(&name) {
            return Ok(Some(*id));
        }
        let id = TargetTableId::new(self.allocate());
        self.target_tables.insert(
            id,
            TargetTable {
                table: Table::new(name.clone()),
                source,
                data_source: data_source.trim().to_string(),
            },
        );
        self.target_names.insert(name, id);
        Ok(Some(id))
    }

    /// Remove a source table, the target tables derived from it, all of
    /// their columns, and every mapping touching any of those columns.
    pub fn remove_source_table(&mut self, name: &str) -> bool {
        let Some(id) = self.source_table_id(name) else {
            return false;
        };
        let derived: Vec<TargetTableId> = self
            .target_tables
            .iter()
            .filter(|(_, table)| table.source == id)
            .map(|(target_id, _)| *target_id)
            .collect();
        for target_id in derived {
            self.remove_target_table_by_id(target_id);
        }

        if let Some(mut table) = self.source_tables.shift_remove(&id) {
            let columns = table.table.drain_columns();
            for column in &columns {
                self.source_columns.shift_remove(column);
            }
            self.mappings
                .retain(|mapping| !columns.iter().any(|c| mapping.references_source(*c)));
            self.source_names.remove(table.name());
        }
        true
    }

    /// Remove a target table, its columns and their mappings.
    pub fn remove_target_table(&mut self, name: &str) -> bool {
        match self.target_table_id(name) {
            Some(id) => {
                self.remove_target_table_by_id(id);
                true
            }
            None => false,
        }
    }

    fn remove_target_table_by_id(&mut self, id: TargetTableId) {
        if let Some(mut table) = self.target_tables.shift_remove(&id) {
            let columns = table.table.drain_columns();
            for column in &columns {
                self.target_columns.shift_remove(column);
            }
            self.mappings
                .retain(|mapping| !columns.contains(&mapping.target));
            self.target_names.remove(table.name());
        }
    }

    // ---------------------------------------------------------------------
    // Columns
    // ---------------------------------------------------------------------

    /// Add a column to a source table. Adding an existing name returns the
    /// existing handle; a missing table yields `Ok(None)`.
    pub fn add_source_column(
        &mut self,
        table: &str,
        column: &str,
    ) -> Result<Option<SourceColumnId>> {
        let column = validate_name("source column name", column)?;
        let Some(table_id) = self.source_table_id(table) else {
            return Ok(None);
        };
        if let Some(existing) = self.source_tables[&table_id].table.column(&column) {
            return Ok(Some(existing));
        }
        let id = SourceColumnId::new(self.allocate());
        if let Some(owner) = self.source_tables.get_mut(&table_id) {
            owner.table.insert_column(column.clone(), id);
        }
        self.source_columns.insert(
            id,
            Column {
                table: table_id,
                name: column,
            },
        );
        Ok(Some(id))
    }

    pub fn add_target_column(
        &mut self,
        table: &str,
        column: &str,
    ) -> Result<Option<TargetColumnId>> {
        let column = validate_name("target column name", column)?;
        let Some(table_id) = self.target_table_id(table) else {
            return Ok(None);
        };
        if let Some(existing) = self.target_tables[&table_id].table.column(&column) {
            return Ok(Some(existing));
        }
        let id = TargetColumnId::new(self.allocate());
        if let Some(owner) = self.target_tables.get_mut(&table_id) {
            owner.table.insert_column(column.clone(), id);
        }
        self.target_columns.insert(
            id,
            Column {
                table: table_id,
                name: column,
            },
        );
        Ok(Some(id))
    }

    /// Remove a source column and every mapping that reads it.
    pub fn remove_source_column(&mut self, table: &str, column: &str) -> bool {
        let Some(table_id) = self.source_table_id(table) else {
            return false;
        };
        let removed = self
            .source_tables
            .get_mut(&table_id)
            .and_then(|owner| owner.table.remove_column(column.trim()));
        let Some(id) = removed else {
            return false;
        };
        self.source_columns.shift_remove(&id);
        self.mappings.retain(|mapping| !mapping.references_source(id));
        true
    }

    /// Remove a target column and the mapping that writes it.
    pub fn remove_target_column(&mut self, table: &str, column: &str) -> bool {
        let Some(table_id) = self.target_table_id(table) else {
            return false;
        };
        let removed = self
            .target_tables
            .get_mut(&table_id)
            .and_then(|owner| owner.table.remove_column(column.trim()));
        let Some(id) = removed else {
            return false;
        };
        self.target_columns.shift_remove(&id);
        self.mappings.retain(|mapping| mapping.target != id);
        true
    }

    // ---------------------------------------------------------------------
    // Mappings
    // ---------------------------------------------------------------------

    /// Append a mapping, replacing any mapping already writing the same
    /// target column. Returns `false` if a referenced column is unknown.
    pub fn add_mapping(&mut self, mapping: Mapping) -> bool {
        if !self.target_columns.contains_key(&mapping.target) {
            return false;
        }
        if !mapping
            .source_columns()
            .iter()
            .all(|column| self.source_columns.contains_key(column))
        {
            return false;
        }
        self.mappings.retain(|existing| existing.target != mapping.target);
        self.mappings.push(mapping);
        true
    }

    /// Attach a left join to the external-connection mapping at `index`.
    pub fn add_left_join(&mut self, index: usize, join: LeftJoin) -> bool {
        if !self.source_columns.contains_key(&join.left)
            || !self.source_columns.contains_key(&join.right)
        {
            return false;
        }
        match self.mappings.get_mut(index).map(|mapping| &mut mapping.kind) {
            Some(MappingKind::ExternalConnection(connection)) => {
                connection.left_joins.push(join);
                true
            }
            _ => false,
        }
    }

    /// Remove the mapping at `index` if its kind is `expected`.
    pub fn remove_mapping(&mut self, index: usize, expected: MappingType) -> RemoveMapping {
        let Some(mapping) = self.mappings.get(index) else {
            return RemoveMapping::OutOfRange {
                len: self.mappings.len(),
            };
        };
        let actual = mapping.mapping_type();
        if actual != expected {
            return RemoveMapping::TypeMismatch { expected, actual };
        }
        RemoveMapping::Removed(self.mappings.remove(index))
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    pub fn mapping(&self, index: usize) -> Option<&Mapping> {
        self.mappings.get(index)
    }

    pub fn mapping_for(&self, target: TargetColumnId) -> Option<&Mapping> {
        self.mappings.iter().find(|mapping| mapping.target == target)
    }

    pub fn is_mapped(&self, target: TargetColumnId) -> bool {
        self.mapping_for(target).is_some()
    }

    // ---------------------------------------------------------------------
    // Lookups
    // ---------------------------------------------------------------------

    pub fn source_table_id(&self, name: &str) -> Option<SourceTableId> {
        self.source_names.get(name.trim()).copied()
    }

    pub fn target_table_id(&self, name: &str) -> Option<TargetTableId> {
        self.target_names.get(name.trim()).copied()
    }

    pub fn source_table(&self, id: SourceTableId) -> Option<&SourceTable> {
        self.source_tables.get(&id)
    }

    pub fn target_table(&self, id: TargetTableId) -> Option<&TargetTable> {
        self.target_tables.get(&id)
    }

    pub fn source_column(&self, id: SourceColumnId) -> Option<&SourceColumn> {
        self.source_columns.get(&id)
    }

    pub fn target_column(&self, id: TargetColumnId) -> Option<&TargetColumn> {
        self.target_columns.get(&id)
    }

    pub fn source_tables(&self) -> impl Iterator<Item = (SourceTableId, &SourceTable)> + '_ {
        self.source_tables.iter().map(|(id, table)| (*id, table))
    }

    pub fn target_tables(&self) -> impl Iterator<Item = (TargetTableId, &TargetTable)> + '_ {
        self.target_tables.iter().map(|(id, table)| (*id, table))
    }

    pub fn source_columns(&self) -> impl Iterator<Item = (SourceColumnId, &SourceColumn)> + '_ {
        self.source_columns.iter().map(|(id, column)| (*id, column))
    }

    pub fn target_columns(&self) -> impl Iterator<Item = (TargetColumnId, &TargetColumn)> + '_ {
        self.target_columns.iter().map(|(id, column)| (*id, column))
    }

    pub fn resolve_source(&self, column: &ColumnRef) -> Option<SourceColumnId> {
        let table = self.source_tables.get(&self.source_table_id(&column.table)?)?;
        table.table.column(column.column.trim())
    }

    pub fn resolve_target(&self, column: &ColumnRef) -> Option<TargetColumnId> {
        let table = self.target_tables.get(&self.target_table_id(&column.table)?)?;
        table.table.column(column.column.trim())
    }

    pub fn source_ref(&self, id: SourceColumnId) -> Option<ColumnRef> {
        let column = self.source_columns.get(&id)?;
        let table = self.source_tables.get(&column.table)?;
        Some(ColumnRef::new(table.name(), column.name()))
    }

    pub fn target_ref(&self, id: TargetColumnId) -> Option<ColumnRef> {
        let column = self.target_columns.get(&id)?;
        let table = self.target_tables.get(&column.table)?;
        Some(ColumnRef::new(table.name(), column.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelError;

    #[test]
    fn blank_names_are_rejected_without_partial_state() {
        let mut project = Project::new();
        assert_eq!(
            project.add_source_table("  ", "crm"),
            Err(ModelError::EmptyName {
                what: "source table name"
            })
        );
        assert!(project.is_empty());
    }

    #[test]
    fn handles_are_not_reused_after_clear() {
        let mut project = Project::new();
        let first = project.add_source_table("customer", "crm").unwrap();
        project.clear();
        let second = project.add_source_table("customer", "crm").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn left_join_requires_external_connection() {
        let mut project = Project::new();
        project.add_source_table("customer", "crm").unwrap();
        let id = project.add_source_column("customer", "id").unwrap().unwrap();
        project.add_target_table("customer_out", "customer", "dwh").unwrap();
        let target = project
            .add_target_column("customer_out", "status")
            .unwrap()
            .unwrap();
        assert!(project.add_mapping(Mapping::constant(target, "ACTIVE")));
        assert!(!project.add_left_join(0, LeftJoin { left: id, right: id }));
        assert!(!project.add_left_join(5, LeftJoin { left: id, right: id }));
    }
}
