//! Mapping taxonomy.
//!
//! A [`Mapping`] states how the value of one target column is computed. The
//! four kinds form a closed set; consumers render or inspect them with an
//! exhaustive `match` on [`MappingKind`].

use std::fmt;
use std::str::FromStr;

use crate::{ModelError, SourceColumnId, TargetColumnId};

/// Discriminator of the four mapping kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingType {
    None,
    Dict,
    Constant,
    ExternalConnection,
}

impl MappingType {
    pub const ALL: [MappingType; 4] = [
        MappingType::None,
        MappingType::Dict,
        MappingType::Constant,
        MappingType::ExternalConnection,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Dict => "Dict",
            Self::Constant => "Constant",
            Self::ExternalConnection => "ExternalConnection",
        }
    }
}

impl fmt::Display for MappingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MappingType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownMappingType(s.to_string()))
    }
}

/// Equality condition between two source columns attached to an
/// external-connection lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeftJoin {
    pub left: SourceColumnId,
    pub right: SourceColumnId,
}

/// Cross-table lookup: select `select` from the row whose `lookup_key`
/// equals `source_key`, correlated by `correlation_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalConnection {
    pub select: SourceColumnId,
    pub lookup_key: SourceColumnId,
    pub source_key: SourceColumnId,
    pub correlation_id: SourceColumnId,
    pub session: String,
    pub left_joins: Vec<LeftJoin>,
}

impl ExternalConnection {
    /// The four column references of the lookup itself, excluding joins.
    pub fn key_columns(&self) -> [SourceColumnId; 4] {
        [
            self.select,
            self.lookup_key,
            self.source_key,
            self.correlation_id,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingKind {
    /// Direct copy of a source column.
    None { source: SourceColumnId },
    /// Dictionary translation of a source column.
    Dict {
        dict_type: String,
        source: SourceColumnId,
        session: String,
    },
    /// Literal value.
    Constant { value: String },
    ExternalConnection(ExternalConnection),
}

/// A rule writing exactly one target column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub target: TargetColumnId,
    pub kind: MappingKind,
}

impl Mapping {
    pub fn none(target: TargetColumnId, source: SourceColumnId) -> Self {
        Self {
            target,
            kind: MappingKind::None { source },
        }
    }

    pub fn dict(
        target: TargetColumnId,
        dict_type: impl Into<String>,
        source: SourceColumnId,
        session: impl Into<String>,
    ) -> Self {
        Self {
            target,
            kind: MappingKind::Dict {
                dict_type: dict_type.into(),
                source,
                session: session.into(),
            },
        }
    }

    pub fn constant(target: TargetColumnId, value: impl Into<String>) -> Self {
        Self {
            target,
            kind: MappingKind::Constant {
                value: value.into(),
            },
        }
    }

    pub fn external(target: TargetColumnId, connection: ExternalConnection) -> Self {
        Self {
            target,
            kind: MappingKind::ExternalConnection(connection),
        }
    }

    pub fn mapping_type(&self) -> MappingType {
        match &self.kind {
            MappingKind::None { .. } => MappingType::None,
            MappingKind::Dict { .. } => MappingType::Dict,
            MappingKind::Constant { .. } => MappingType::Constant,
            MappingKind::ExternalConnection(_) => MappingType::ExternalConnection,
        }
    }

    /// Every source column this mapping reads, left joins included.
    pub fn source_columns(&self) -> Vec<SourceColumnId> {
        match &self.kind {
            MappingKind::None { source } | MappingKind::Dict { source, .. } => vec![*source],
            MappingKind::Constant { .. } => Vec::new(),
            MappingKind::ExternalConnection(connection) => {
                let mut columns = connection.key_columns().to_vec();
                for join in &connection.left_joins {
                    columns.push(join.left);
                    columns.push(join.right);
                }
                columns
            }
        }
    }

    pub fn references_source(&self, column: SourceColumnId) -> bool {
        self.source_columns().contains(&column)
    }
}
