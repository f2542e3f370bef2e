//! Serializable form of a [`Project`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use mapgen_model::{
    ColumnRef, ExternalConnection, LeftJoin, Mapping, MappingKind, Project, SourceColumnId,
};

use crate::error::Result;

/// Format version written to new files.
pub const CONFIG_VERSION: &str = "1.0";

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub source_tables: Vec<SourceTableRecord>,
    #[serde(default)]
    pub target_tables: Vec<TargetTableRecord>,
    #[serde(default)]
    pub mappings: Vec<MappingRecord>,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            version: default_version(),
            source_tables: Vec::new(),
            target_tables: Vec::new(),
            mappings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceTableRecord {
    pub name: String,
    #[serde(default)]
    pub data_source_name: String,
    #[serde(default)]
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetTableRecord {
    pub name: String,
    pub source_table_name: String,
    #[serde(default)]
    pub data_source_name: String,
    #[serde(default)]
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeftJoinRecord {
    pub left_table: String,
    pub left_column: String,
    pub right_table: String,
    pub right_column: String,
}

/// One mapping, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum MappingRecord {
    None {
        target_table: String,
        target_column: String,
        source_table: String,
        source_column: String,
    },
    Dict {
        target_table: String,
        target_column: String,
        dict_type: String,
        source_table: String,
        source_column: String,
        session: String,
    },
    Constant {
        target_table: String,
        target_column: String,
        value: String,
    },
    ExternalConnection {
        target_table: String,
        target_column: String,
        select_table: String,
        select_column: String,
        lookup_key_table: String,
        lookup_key_column: String,
        source_key_table: String,
        source_key_column: String,
        correlation_id_table: String,
        correlation_id_column: String,
        session: String,
        #[serde(default)]
        left_joins: Vec<LeftJoinRecord>,
    },
}

impl MappingRecord {
    pub fn target(&self) -> ColumnRef {
        match self {
            Self::None {
                target_table,
                target_column,
                ..
            }
            | Self::Dict {
                target_table,
                target_column,
                ..
            }
            | Self::Constant {
                target_table,
                target_column,
                ..
            }
            | Self::ExternalConnection {
                target_table,
                target_column,
                ..
            } => ColumnRef::new(target_table.as_str(), target_column.as_str()),
        }
    }

    fn from_mapping(project: &Project, mapping: &Mapping) -> Option<Self> {
        let target = project.target_ref(mapping.target)?;
        let record = match &mapping.kind {
            MappingKind::None { source } => {
                let source = project.source_ref(*source)?;
                Self::None {
                    target_table: target.table,
                    target_column: target.column,
                    source_table: source.table,
                    source_column: source.column,
                }
            }
            MappingKind::Dict {
                dict_type,
                source,
                session,
            } => {
                let source = project.source_ref(*source)?;
                Self::Dict {
                    target_table: target.table,
                    target_column: target.column,
                    dict_type: dict_type.clone(),
                    source_table: source.table,
                    source_column: source.column,
                    session: session.clone(),
                }
            }
            MappingKind::Constant { value } => Self::Constant {
                target_table: target.table,
                target_column: target.column,
                value: value.clone(),
            },
            MappingKind::ExternalConnection(connection) => {
                let select = project.source_ref(connection.select)?;
                let lookup_key = project.source_ref(connection.lookup_key)?;
                let source_key = project.source_ref(connection.source_key)?;
                let correlation_id = project.source_ref(connection.correlation_id)?;
                let left_joins = connection
                    .left_joins
                    .iter()
                    .map(|join| {
                        let left = project.source_ref(join.left)?;
                        let right = project.source_ref(join.right)?;
                        Some(LeftJoinRecord {
                            left_table: left.table,
                            left_column: left.column,
                            right_table: right.table,
                            right_column: right.column,
                        })
                    })
                    .collect::<Option<Vec<_>>>()?;
                Self::ExternalConnection {
                    target_table: target.table,
                    target_column: target.column,
                    select_table: select.table,
                    select_column: select.column,
                    lookup_key_table: lookup_key.table,
                    lookup_key_column: lookup_key.column,
                    source_key_table: source_key.table,
                    source_key_column: source_key.column,
                    correlation_id_table: correlation_id.table,
                    correlation_id_column: correlation_id.column,
                    session: connection.session.clone(),
                    left_joins,
                }
            }
        };
        Some(record)
    }

    /// Resolve the record's names against `project`; `None` if any is unknown.
    fn to_mapping(&self, project: &Project) -> Option<Mapping> {
        let target = project.resolve_target(&self.target())?;
        let mapping = match self {
            Self::None {
                source_table,
                source_column,
                ..
            } => Mapping::none(target, resolve_source(project, source_table, source_column)?),
            Self::Dict {
                dict_type,
                source_table,
                source_column,
                session,
                ..
            } => Mapping::dict(
                target,
                dict_type.as_str(),
                resolve_source(project, source_table, source_column)?,
                session.as_str(),
            ),
            Self::Constant { value, .. } => Mapping::constant(target, value.as_str()),
            Self::ExternalConnection {
                select_table,
                select_column,
                lookup_key_table,
                lookup_key_column,
                source_key_table,
                source_key_column,
                correlation_id_table,
                correlation_id_column,
                session,
                left_joins,
                ..
            } => {
                let left_joins = left_joins
                    .iter()
                    .map(|join| {
                        Some(LeftJoin {
                            left: resolve_source(project, &join.left_table, &join.left_column)?,
                            right: resolve_source(project, &join.right_table, &join.right_column)?,
                        })
                    })
                    .collect::<Option<Vec<_>>>()?;
                Mapping::external(
                    target,
                    ExternalConnection {
                        select: resolve_source(project, select_table, select_column)?,
                        lookup_key: resolve_source(project, lookup_key_table, lookup_key_column)?,
                        source_key: resolve_source(project, source_key_table, source_key_column)?,
                        correlation_id: resolve_source(project, correlation_id_table, correlation_id_column)?,
                        session: session.clone(),
                        left_joins,
                    },
                )
            }
        };
        Some(mapping)
    }
}

fn resolve_source(project: &Project, table: &str, column: &str) -> Option<SourceColumnId> {
    project.resolve_source(&ColumnRef::new(table, column))
}

/// Entries a replay could not attach because a referenced name was missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub skipped_tables: Vec<String>,
    pub skipped_mappings: Vec<String>,
}

impl ReplayReport {
    pub fn is_clean(&self) -> bool {
        self.skipped_tables.is_empty() && self.skipped_mappings.is_empty()
    }
}

impl ConfigDocument {
    /// Capture the tables, columns and mappings of `project`.
    pub fn from_project(project: &Project) -> Self {
        let source_tables = project
            .source_tables()
            .map(|(_, table)| SourceTableRecord {
                name: table.name().to_string(),
                data_source_name: table.data_source().to_string(),
                columns: table.table().column_names().map(str::to_string).collect(),
            })
            .collect();
        let target_tables = project
            .target_tables()
            .map(|(_, table)| TargetTableRecord {
                name: table.name().to_string(),
                source_table_name: project
                    .source_table(table.source())
                    .map(|source| source.name().to_string())
                    .unwrap_or_default(),
                data_source_name: table.data_source().to_string(),
                columns: table.table().column_names().map(str::to_string).collect(),
            })
            .collect();
        let mappings = project
            .mappings()
            .iter()
            .filter_map(|mapping| MappingRecord::from_mapping(project, mapping))
            .collect();
        Self {
            version: default_version(),
            source_tables,
            target_tables,
            mappings,
        }
    }

    /// Clear `project` and rebuild it from this document.
    ///
    /// Source tables are created first, then target tables, then mappings.
    /// Entries whose references do not resolve are skipped and reported.
    pub fn apply_to(&self, project: &mut Project) -> Result<ReplayReport> {
        project.clear();
        let mut report = ReplayReport::default();

        for table in &self.source_tables {
            project.add_source_table(&table.name, &table.data_source_name)?;
            for column in &table.columns {
                project.add_source_column(&table.name, column)?;
            }
        }

        for table in &self.target_tables {
            let created = project.add_target_table(
                &table.name,
                &table.source_table_name,
                &table.data_source_name,
            )?;
            if created.is_none() {
                warn!(
                    table = %table.name,
                    source_table = %table.source_table_name,
                    "skipping target table with unknown source table"
                );
                report.skipped_tables.push(table.name.clone());
                continue;
            }
            for column in &table.columns {
                project.add_target_column(&table.name, column)?;
            }
        }

        for record in &self.mappings {
            match record.to_mapping(project) {
                Some(mapping) => {
                    project.add_mapping(mapping);
                }
                None => {
                    let target = record.target().to_string();
                    warn!(target = %target, "skipping mapping with unresolved column");
                    report.skipped_mappings.push(target);
                }
            }
        }

        debug!(
            source_tables = self.source_tables.len(),
            target_tables = self.target_tables.len(),
            mappings = project.mappings().len(),
            "replayed configuration"
        );
        Ok(report)
    }
}
