//! Error types for the consolidation pipeline

use std::path::PathBuf;
use thiserror::Error;

use crate::css::StylesheetError;
use crate::scanner::ScanError;

/// Errors that can stop a consolidation run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration failed validation; nothing was read or written
    #[error("Invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    /// Scan could not start
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Target stylesheet missing, already consolidated, or unwritable
    #[error(transparent)]
    Stylesheet(#[from] StylesheetError),

    /// Manifest could not be written
    #[error("Failed to write manifest {path}: {source}")]
    Manifest {
        /// Manifest path
        path: PathBuf,
        #[source]
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Manifest could not be serialized
    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}
