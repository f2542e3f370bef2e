use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    /// A mapping points at a column the project no longer holds.
    #[error("mapping #{index} references an unknown {kind} column")]
    UnknownColumn { index: usize, kind: &'static str },
    #[error("failed to write generated code to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CodegenError>;
