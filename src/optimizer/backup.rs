//! Sibling `.bak` backups of build artifacts
//!
//! [`BackupManager`] copies `page.html` to `page.html.bak` before the first
//! write. An existing backup is never overwritten: it holds the pristine
//! file from the first run, which is the state worth restoring.
//!
//! # Examples
//!
//! ```no_run
//! # use class_slim::optimizer::BackupManager;
//! # use std::path::Path;
//! let manager = BackupManager::new();
//! let backup_path = manager.create_backup(Path::new("out/index.html"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::infra::{FileSystem, RealFileSystem};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension appended to backed-up files
pub const BACKUP_EXTENSION: &str = "bak";

/// Errors that can occur during backup operations
#[derive(Error, Debug)]
pub enum BackupError {
    /// Path has no file name component
    #[error("Invalid source filename: {0}")]
    InvalidSource(PathBuf),

    /// Failed to copy file
    #[error("Failed to copy file {path}: {source}")]
    CopyFile {
        /// File being backed up
        path: PathBuf,
        #[source]
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Creates `.bak` siblings before artifacts are rewritten
pub struct BackupManager<FS: FileSystem = RealFileSystem> {
    fs: FS,
}

impl BackupManager<RealFileSystem> {
    /// Create a backup manager over the real filesystem
    pub fn new() -> Self {
        Self::with_fs(RealFileSystem)
    }
}

impl Default for BackupManager<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<FS: FileSystem> BackupManager<FS> {
    /// Create a backup manager with a custom filesystem implementation
    pub fn with_fs(fs: FS) -> Self {
        Self { fs }
    }

    /// Where the backup of `source` lives
    pub fn backup_path(source: &Path) -> Result<PathBuf, BackupError> {
        let filename = source
            .file_name()
            .ok_or_else(|| BackupError::InvalidSource(source.to_path_buf()))?;
        let mut backup_name = OsString::from(filename);
        backup_name.push(".");
        backup_name.push(BACKUP_EXTENSION);
        Ok(source.with_file_name(backup_name))
    }

    /// Copy `source` to its `.bak` sibling unless one already exists
    ///
    /// # Errors
    /// Returns error if the path has no file name or the copy fails
    pub fn create_backup(&self, source: &Path) -> Result<PathBuf, BackupError> {
        let backup_path = Self::backup_path(source)?;
        if self.fs.exists(&backup_path) {
            log::debug!("keeping existing backup {}", backup_path.display());
            return Ok(backup_path);
        }

        self.fs
            .copy(source, &backup_path)
            .map_err(|source_err| BackupError::CopyFile {
                path: source.to_path_buf(),
                source: source_err,
            })?;

        Ok(backup_path)
    }
}
