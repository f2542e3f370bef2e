//! Persistent storage for mapping projects.
//!
//! Two independent JSON files are handled here:
//!
//! - **Mapping configuration**: source tables, target tables and mappings of a
//!   [`Project`](mapgen_model::Project). Loading clears the project and replays
//!   the creation calls in a fixed order (source tables, target tables,
//!   mappings) so every name resolves.
//! - **Data sources**: the list of database connection descriptions.
//!
//! # File Format
//!
//! ```text
//! {
//!   "version": "1.0",
//!   "sourceTables": [{ "name", "dataSourceName", "columns": [..] }],
//!   "targetTables": [{ "name", "sourceTableName", "dataSourceName", "columns": [..] }],
//!   "mappings": [{ "type": "None" | "Dict" | "Constant" | "ExternalConnection", .. }]
//! }
//! ```
//!
//! All writes go through a temp file and a rename.

mod datasource;
mod document;
mod error;
mod io;

pub use datasource::DataSource;
pub use document::{
    CONFIG_VERSION, ConfigDocument, LeftJoinRecord, MappingRecord, ReplayReport,
    SourceTableRecord, TargetTableRecord,
};
pub use error::{PersistenceError, Result};
pub use io::{
    load_config, load_data_sources, load_project, save_config, save_data_sources, save_project,
};
