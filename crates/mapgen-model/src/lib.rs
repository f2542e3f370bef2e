//! Domain model for source/target table mappings.
//!
//! - [`Project`] owns every table, column and mapping.
//! - Tables and columns are addressed by typed handles ([`SourceTableId`],
//!   [`TargetColumnId`], ...); [`ColumnRef`] is the name-based form used at
//!   the edges.
//! - [`Mapping`] is one of four [`MappingKind`]s and always writes exactly
//!   one target column.

pub mod error;
pub mod ids;
pub mod mapping;
pub mod project;
pub mod table;

pub use error::{ModelError, Result};
pub use ids::{ColumnRef, SourceColumnId, SourceTableId, TargetColumnId, TargetTableId};
pub use mapping::{ExternalConnection, LeftJoin, Mapping, MappingKind, MappingType};
pub use project::{Project, RemoveMapping};
pub use table::{Column, SourceColumn, SourceTable, Table, TargetColumn, TargetTable};
