//! File I/O for configuration and data-source files.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use mapgen_model::Project;

use crate::datasource::DataSource;
use crate::document::{ConfigDocument, ReplayReport};
use crate::error::{PersistenceError, Result};

/// Save the tables, columns and mappings of `project`.
pub fn save_project(project: &Project, path: &Path) -> Result<()> {
    save_config(&ConfigDocument::from_project(project), path)
}

/// Load a configuration file into `project`, replacing its contents.
pub fn load_project(project: &mut Project, path: &Path) -> Result<ReplayReport> {
    let document = load_config(path)?;
    let report = document.apply_to(project)?;
    tracing::info!(
        path = %path.display(),
        source_tables = document.source_tables.len(),
        target_tables = document.target_tables.len(),
        mappings = project.mappings().len(),
        "loaded mapping configuration"
    );
    Ok(report)
}

pub fn save_config(document: &ConfigDocument, path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(document).map_err(|source| {
        PersistenceError::Serialization {
            what: "mapping configuration",
            source,
        }
    })?;
    write_atomic(path, &json)?;
    tracing::info!(path = %path.display(), "saved mapping configuration");
    Ok(())
}

pub fn load_config(path: &Path) -> Result<ConfigDocument> {
    let contents = read(path)?;
    serde_json::from_slice(&contents).map_err(|source| PersistenceError::Deserialization {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_data_sources(sources: &[DataSource], path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(sources).map_err(|source| {
        PersistenceError::Serialization {
            what: "data sources",
            source,
        }
    })?;
    write_atomic(path, &json)?;
    tracing::info!(path = %path.display(), count = sources.len(), "saved data sources");
    Ok(())
}

pub fn load_data_sources(path: &Path) -> Result<Vec<DataSource>> {
    let contents = read(path)?;
    let sources: Vec<DataSource> =
        serde_json::from_slice(&contents).map_err(|source| PersistenceError::Deserialization {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), count = sources.len(), "loaded data sources");
    Ok(sources)
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| PersistenceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source,
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write `bytes` to a temp file next to `path`, then rename it into place.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = temp_path_for(path);
    let mut file = File::create(&temp_path).map_err(|source| PersistenceError::Io {
        operation: "create",
        path: temp_path.clone(),
        source,
    })?;
    file.write_all(bytes).map_err(|source| PersistenceError::Io {
        operation: "write",
        path: temp_path.clone(),
        source,
    })?;
    file.sync_all().map_err(|source| PersistenceError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source,
    })?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|source| PersistenceError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source,
    })
}
