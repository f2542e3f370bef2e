//! The wizard controller.
//!
//! [`Wizard`] owns the authoritative [`Project`] and exposes the name-based
//! editing operations the individual steps need. Operations that name
//! something that does not exist are ignored (they return `false` or `None`
//! and log at debug level); blank required inputs are rejected with
//! [`WizardError::MissingField`] before anything changes.

use std::fmt;
use std::path::Path;

use mapgen_codegen::{GeneratorOptions, generate_java, write_java};
use mapgen_model::{
    ColumnRef, ExternalConnection, LeftJoin, Mapping, MappingType, Project, RemoveMapping,
    SourceColumnId, SourceTableId, TargetColumnId, TargetTableId,
};
use mapgen_persistence::{DataSource, ReplayReport};
use tracing::{debug, info, warn};

use crate::error::{Result, WizardError};
use crate::observer::{StateChange, WizardObserver};
use crate::step::WizardStep;

/// Key columns and session shared by external-connection lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalKeys {
    pub lookup_key: ColumnRef,
    pub source_key: ColumnRef,
    pub correlation_id: ColumnRef,
    pub session: String,
    pub left_joins: Vec<(ColumnRef, ColumnRef)>,
}

#[derive(Default)]
pub struct Wizard {
    project: Project,
    step: WizardStep,
    data_sources: Vec<DataSource>,
    observers: Vec<Box<dyn WizardObserver>>,
}

impl fmt::Debug for Wizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wizard")
            .field("project", &self.project)
            .field("step", &self.step)
            .field("data_sources", &self.data_sources)
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn required(what: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WizardError::MissingField(what));
    }
    Ok(())
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Register a view that mirrors wizard state.
    pub fn subscribe(&mut self, observer: Box<dyn WizardObserver>) {
        self.observers.push(observer);
    }

    fn notify(&mut self, change: StateChange) {
        for observer in &mut self.observers {
            observer.state_changed(change, &self.project);
        }
    }

    fn enter(&mut self, step: WizardStep) {
        for observer in &mut self.observers {
            observer.step_entered(step, &self.project);
        }
        self.step = step;
        debug!(step = %step, "entered wizard step");
    }

    // ---------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------

    /// Advance one step. Returns `false` on the last step.
    pub fn next(&mut self) -> bool {
        match self.step.next() {
            Some(step) => {
                self.enter(step);
                true
            }
            None => false,
        }
    }

    /// Go back one step. Returns `false` on the first step.
    pub fn previous(&mut self) -> bool {
        match self.step.previous() {
            Some(step) => {
                self.enter(step);
                true
            }
            None => false,
        }
    }

    // ---------------------------------------------------------------------
    // Data sources
    // ---------------------------------------------------------------------

    pub fn data_sources(&self) -> &[DataSource] {
        &self.data_sources
    }

    pub fn data_source(&self, name: &str) -> Option<&DataSource> {
        self.data_sources.iter().find(|source| source.name == name.trim())
    }

    /// Add a data source, replacing one with the same name.
    pub fn add_data_source(&mut self, mut source: DataSource) -> Result<()> {
        required("data source name", &source.name)?;
        source.name = source.name.trim().to_string();
        match self
            .data_sources
            .iter_mut()
            .find(|existing| existing.name == source.name)
        {
            Some(existing) => *existing = source,
            None => self.data_sources.push(source),
        }
        self.notify(StateChange::DataSourcesChanged);
        Ok(())
    }

    pub fn remove_data_source(&mut self, name: &str) -> bool {
        let before = self.data_sources.len();
        self.data_sources.retain(|source| source.name != name.trim());
        let removed = self.data_sources.len() != before;
        if removed {
            self.notify(StateChange::DataSourcesChanged);
        }
        removed
    }

    pub fn load_data_sources(&mut self, path: &Path) -> Result<usize> {
        self.data_sources = mapgen_persistence::load_data_sources(path)?;
        self.notify(StateChange::DataSourcesChanged);
        Ok(self.data_sources.len())
    }

    pub fn save_data_sources(&self, path: &Path) -> Result<()> {
        mapgen_persistence::save_data_sources(&self.data_sources, path)?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Tables and columns
    // ---------------------------------------------------------------------

    pub fn add_source_table(&mut self, name: &str, data_source: &str) -> Result<SourceTableId> {
        let id = self.project.add_source_table(name, data_source)?;
        self.notify(StateChange::TablesChanged);
        Ok(id)
    }

    pub fn add_target_table(
        &mut self,
        name: &str,
        source_table: &str,
        data_source: &str,
    ) -> Result<Option<TargetTableId>> {
        let id = self
            .project
            .add_target_table(name, source_table, data_source)?;
        match id {
            Some(_) => self.notify(StateChange::TablesChanged),
            None => debug!(table = name, source_table, "ignored target table for unknown source"),
        }
        Ok(id)
    }

    pub fn remove_source_table(&mut self, name: &str) -> bool {
        let removed = self.project.remove_source_table(name);
        self.after_removal(removed, StateChange::TablesChanged, "source table", name);
        removed
    }

    pub fn remove_target_table(&mut self, name: &str) -> bool {
        let removed = self.project.remove_target_table(name);
        self.after_removal(removed, StateChange::TablesChanged, "target table", name);
        removed
    }

    pub fn add_source_column(
        &mut self,
        table: &str,
        column: &str,
    ) -> Result<Option<SourceColumnId>> {
        let id = self.project.add_source_column(table, column)?;
        match id {
            Some(_) => self.notify(StateChange::ColumnsChanged),
            None => debug!(table, column, "ignored column for unknown source table"),
        }
        Ok(id)
    }

    pub fn add_target_column(
        &mut self,
        table: &str,
        column: &str,
    ) -> Result<Option<TargetColumnId>> {
        let id = self.project.add_target_column(table, column)?;
        match id {
            Some(_) => self.notify(StateChange::ColumnsChanged),
            None => debug!(table, column, "ignored column for unknown target table"),
        }
        Ok(id)
    }

    pub fn remove_source_column(&mut self, table: &str, column: &str) -> bool {
        let removed = self.project.remove_source_column(table, column);
        let name = format!("{table}.{column}");
        self.after_removal(removed, StateChange::ColumnsChanged, "source column", &name);
        removed
    }

    pub fn remove_target_column(&mut self, table: &str, column: &str) -> bool {
        let removed = self.project.remove_target_column(table, column);
        let name = format!("{table}.{column}");
        self.after_removal(removed, StateChange::ColumnsChanged, "target column", &name);
        removed
    }

    fn after_removal(&mut self, removed: bool, change: StateChange, kind: &str, name: &str) {
        if removed {
            self.notify(change);
        } else {
            debug!(kind, name, "nothing to remove");
        }
    }

    // ---------------------------------------------------------------------
    // Mappings
    // ---------------------------------------------------------------------

    fn resolve_target(&self, target: &ColumnRef) -> Option<TargetColumnId> {
        let id = self.project.resolve_target(target);
        if id.is_none() {
            debug!(target = %target, "unknown target column");
        }
        id
    }

    fn resolve_source(&self, source: &ColumnRef) -> Option<SourceColumnId> {
        let id = self.project.resolve_source(source);
        if id.is_none() {
            debug!(source = %source, "unknown source column");
        }
        id
    }

    fn push_mapping(&mut self, mapping: Mapping) -> bool {
        let added = self.project.add_mapping(mapping);
        if added {
            self.notify(StateChange::MappingsChanged);
        }
        added
    }

    /// Direct copy of `source` into `target`.
    pub fn add_none_mapping(&mut self, target: &ColumnRef, source: &ColumnRef) -> bool {
        let (Some(target), Some(source)) = (self.resolve_target(target), self.resolve_source(source))
        else {
            return false;
        };
        self.push_mapping(Mapping::none(target, source))
    }

    pub fn add_dict_mapping(
        &mut self,
        target: &ColumnRef,
        dict_type: &str,
        source: &ColumnRef,
        session: &str,
    ) -> Result<bool> {
        required("dictionary type", dict_type)?;
        required("session", session)?;
        let (Some(target), Some(source)) = (self.resolve_target(target), self.resolve_source(source))
        else {
            return Ok(false);
        };
        Ok(self.push_mapping(Mapping::dict(
            target,
            dict_type.trim(),
            source,
            session.trim(),
        )))
    }

    pub fn add_constant_mapping(&mut self, target: &ColumnRef, value: &str) -> bool {
        let Some(target) = self.resolve_target(target) else {
            return false;
        };
        self.push_mapping(Mapping::constant(target, value))
    }

    fn build_external(
        &self,
        target: TargetColumnId,
        select: SourceColumnId,
        keys: &ExternalKeys,
    ) -> Option<Mapping> {
        let mut left_joins = Vec::with_capacity(keys.left_joins.len());
        for (left, right) in &keys.left_joins {
            left_joins.push(LeftJoin {
                left: self.resolve_source(left)?,
                right: self.resolve_source(right)?,
            });
        }
        Some(Mapping::external(
            target,
            ExternalConnection {
                select,
                lookup_key: self.resolve_source(&keys.lookup_key)?,
                source_key: self.resolve_source(&keys.source_key)?,
                correlation_id: self.resolve_source(&keys.correlation_id)?,
                session: keys.session.trim().to_string(),
                left_joins,
            },
        ))
    }

    /// Look `target` up by selecting `select` through the given keys.
    pub fn add_external_mapping(
        &mut self,
        target: &ColumnRef,
        select: &ColumnRef,
        keys: &ExternalKeys,
    ) -> Result<bool> {
        required("session", &keys.session)?;
        let (Some(target), Some(select)) = (self.resolve_target(target), self.resolve_source(select))
        else {
            return Ok(false);
        };
        match self.build_external(target, select, keys) {
            Some(mapping) => Ok(self.push_mapping(mapping)),
            None => Ok(false),
        }
    }

    /// Attach `left = right` to the external-connection mapping at `index`.
    pub fn add_left_join(&mut self, index: usize, left: &ColumnRef, right: &ColumnRef) -> bool {
        let (Some(left), Some(right)) = (self.resolve_source(left), self.resolve_source(right))
        else {
            return false;
        };
        let added = self.project.add_left_join(index, LeftJoin { left, right });
        if added {
            self.notify(StateChange::MappingsChanged);
        } else {
            debug!(index, "no external connection mapping at index");
        }
        added
    }

    /// Remove the mapping at `index` if it is of the `expected` kind.
    ///
    /// A mismatch is logged and leaves the mapping list unchanged.
    pub fn remove_mapping(&mut self, index: usize, expected: MappingType) -> bool {
        match self.project.remove_mapping(index, expected) {
            RemoveMapping::Removed(_) => {
                self.notify(StateChange::MappingsChanged);
                true
            }
            RemoveMapping::OutOfRange { len } => {
                debug!(index, len, "mapping index out of range");
                false
            }
            RemoveMapping::TypeMismatch { expected, actual } => {
                warn!(
                    index,
                    expected = %expected,
                    actual = %actual,
                    "mapping type mismatch, nothing removed"
                );
                false
            }
        }
    }

    /// Unmapped columns of a target table, in column order.
    fn unmapped_columns(&self, target_table: TargetTableId) -> Vec<(String, TargetColumnId)> {
        self.project
            .target_table(target_table)
            .map(|table| {
                table
                    .table()
                    .columns()
                    .filter(|(_, id)| !self.project.is_mapped(*id))
                    .map(|(name, id)| (name.to_string(), id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Map every unmapped column of `target_table` to the same-named column
    /// (ASCII case-insensitive) of the table it was derived from.
    ///
    /// Returns the number of mappings added.
    pub fn auto_map_none(&mut self, target_table: &str) -> usize {
        let Some(table_id) = self.project.target_table_id(target_table) else {
            debug!(table = target_table, "unknown target table");
            return 0;
        };
        let Some(source_table) = self
            .project
            .target_table(table_id)
            .and_then(|table| self.project.source_table(table.source()))
        else {
            return 0;
        };

        let mappings: Vec<Mapping> = self
            .unmapped_columns(table_id)
            .into_iter()
            .filter_map(|(name, target)| {
                source_table
                    .table()
                    .column_ignore_case(&name)
                    .map(|source| Mapping::none(target, source))
            })
            .collect();
        self.add_all(mappings, target_table)
    }

    /// Map every unmapped column of `target_table` through an external
    /// connection selecting the same-named column of `select_table`.
    ///
    /// Returns the number of mappings added.
    pub fn auto_map_external(
        &mut self,
        target_table: &str,
        select_table: &str,
        keys: &ExternalKeys,
    ) -> Result<usize> {
        required("session", &keys.session)?;
        let Some(table_id) = self.project.target_table_id(target_table) else {
            debug!(table = target_table, "unknown target table");
            return Ok(0);
        };
        let Some(select) = self
            .project
            .source_table_id(select_table)
            .and_then(|id| self.project.source_table(id))
        else {
            debug!(table = select_table, "unknown select table");
            return Ok(0);
        };

        let mappings: Vec<Mapping> = self
            .unmapped_columns(table_id)
            .into_iter()
            .filter_map(|(name, target)| {
                let column = select.table().column_ignore_case(&name)?;
                self.build_external(target, column, keys)
            })
            .collect();
        Ok(self.add_all(mappings, target_table))
    }

    fn add_all(&mut self, mappings: Vec<Mapping>, table: &str) -> usize {
        let mut added = 0;
        for mapping in mappings {
            if self.project.add_mapping(mapping) {
                added += 1;
            }
        }
        if added > 0 {
            self.notify(StateChange::MappingsChanged);
        }
        info!(table, added, "auto-mapped columns by name");
        added
    }

    // ---------------------------------------------------------------------
    // Persistence and generation
    // ---------------------------------------------------------------------

    /// Drop all tables, columns and mappings.
    pub fn reset(&mut self) {
        self.project.clear();
        self.notify(StateChange::Reset);
    }

    pub fn save_config(&self, path: &Path) -> Result<()> {
        mapgen_persistence::save_project(&self.project, path)?;
        Ok(())
    }

    /// Replace the project with the contents of a configuration file.
    ///
    /// On a read or parse error the current project is left untouched.
    pub fn load_config(&mut self, path: &Path) -> Result<ReplayReport> {
        let document = mapgen_persistence::load_config(path)?;
        let mut project = self.project.clone();
        let report = document.apply_to(&mut project)?;
        self.project = project;
        if !report.is_clean() {
            warn!(
                path = %path.display(),
                skipped_tables = report.skipped_tables.len(),
                skipped_mappings = report.skipped_mappings.len(),
                "configuration loaded with unresolved entries"
            );
        }
        info!(path = %path.display(), "loaded mapping configuration");
        self.notify(StateChange::Reset);
        Ok(report)
    }

    pub fn generate_code(&self, options: &GeneratorOptions) -> Result<String> {
        Ok(generate_java(&self.project, options)?)
    }

    pub fn write_code(&self, options: &GeneratorOptions, path: &Path) -> Result<()> {
        write_java(&self.project, options, path)?;
        Ok(())
    }
}
