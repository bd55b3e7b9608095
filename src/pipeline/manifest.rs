//! The JSON record of one consolidation run

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::error::PipelineError;
use super::metrics::RunMetrics;
use crate::config::ConfigFile;
use crate::infra::FileSystem;
use crate::optimizer::ClassMapping;

/// Tool identity recorded in every manifest
pub const TOOL_NAME: &str = env!("CARGO_PKG_NAME");

/// Everything a run decided, written once after the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Tool name
    pub tool: String,
    /// Tool version
    pub version: String,
    /// Unique id of this run
    pub run_id: String,
    /// Build directory that was rewritten
    pub target_dir: PathBuf,
    /// Resolved settings
    pub config: ConfigFile,
    /// Consolidations, highest savings first
    pub mappings: Vec<ClassMapping>,
    /// Run totals
    pub metrics: RunMetrics,
}

impl Manifest {
    /// Create a manifest with a fresh run id
    pub fn new(
        target_dir: &Path,
        config: &ConfigFile,
        mappings: Vec<ClassMapping>,
        metrics: RunMetrics,
    ) -> Self {
        Self {
            tool: TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            run_id: Uuid::new_v4().to_string(),
            target_dir: target_dir.to_path_buf(),
            config: config.clone(),
            mappings,
            metrics,
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize to `path`
    pub fn write<FS: FileSystem>(&self, fs: &FS, path: &Path) -> Result<(), PipelineError> {
        let json = self.to_json()?;
        fs.write(path, json).map_err(|source| PipelineError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("manifest written to {}", path.display());
        Ok(())
    }

    /// Read a manifest from an earlier run
    pub fn load<FS: FileSystem>(fs: &FS, path: &Path) -> Result<Self, PipelineError> {
        let json = fs
            .read_to_string(path)
            .map_err(|source| PipelineError::Manifest {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(serde_json::from_str(&json)?)
    }
}
