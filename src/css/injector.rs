//! Injection of synthesized rules into the build's stylesheet.
//!
//! The block is appended behind [`CONSOLIDATED_MARKER`]. A stylesheet that
//! already carries the marker is never appended to again.

use std::cmp::Reverse;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::discover_stylesheets;
use crate::infra::{FileSystem, RealFileSystem};
use crate::optimizer::backup::{BackupError, BackupManager};

/// Comment that opens every injected block
pub const CONSOLIDATED_MARKER: &str = "/* class-slim:consolidated */";

/// Errors locating or writing the target stylesheet
#[derive(Error, Debug)]
pub enum StylesheetError {
    /// No `.css` file under the target directory
    #[error("No stylesheet found under {0}")]
    NotFound(PathBuf),

    /// `output.stylesheet` points at a missing file
    #[error("Configured stylesheet {0} does not exist")]
    Missing(PathBuf),

    /// Target already holds consolidated rules from an earlier run
    #[error("{0} already contains consolidated rules")]
    AlreadyConsolidated(PathBuf),

    /// Failed to read or write the stylesheet
    #[error("Failed to access {path}: {source}")]
    Io {
        /// Stylesheet path
        path: PathBuf,
        #[source]
        /// Underlying I/O error
        source: io::Error,
    },

    /// Backup before writing failed
    #[error(transparent)]
    Backup(#[from] BackupError),
}

/// What happened to the target stylesheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectionOutcome {
    /// Block appended
    Injected {
        /// Stylesheet written
        path: PathBuf,
        /// Bytes appended
        bytes: usize,
    },
    /// Marker found; nothing appended
    AlreadyPresent {
        /// Stylesheet inspected
        path: PathBuf,
    },
    /// No rules were synthesized
    NothingToInject,
    /// Block computed but not written
    DryRun {
        /// Stylesheet that would be written
        path: PathBuf,
        /// Bytes that would be appended
        bytes: usize,
    },
}

impl InjectionOutcome {
    /// Bytes the stylesheet grew (or would grow) by
    pub fn bytes(&self) -> usize {
        match self {
            Self::Injected { bytes, .. } | Self::DryRun { bytes, .. } => *bytes,
            Self::AlreadyPresent { .. } | Self::NothingToInject => 0,
        }
    }
}

/// Finds the target stylesheet and appends the consolidated block
pub struct StylesheetInjector<FS: FileSystem = RealFileSystem> {
    fs: FS,
    backup: bool,
}

impl StylesheetInjector<RealFileSystem> {
    /// Create an injector over the real filesystem
    pub fn new(backup: bool) -> Self {
        Self::with_fs(RealFileSystem, backup)
    }
}

impl<FS: FileSystem> StylesheetInjector<FS> {
    /// Create an injector with a custom filesystem implementation
    pub fn with_fs(fs: FS, backup: bool) -> Self {
        Self { fs, backup }
    }

    /// Resolve the target: the configured path, else the largest `.css` file
    pub fn locate(
        &self,
        root: &Path,
        configured: Option<&str>,
    ) -> Result<PathBuf, StylesheetError> {
        if let Some(relative) = configured {
            let path = root.join(relative);
            if !self.fs.exists(&path) {
                return Err(StylesheetError::Missing(path));
            }
            return Ok(path);
        }

        discover_stylesheets(root)
            .into_iter()
            .filter_map(|path| {
                let size = self.fs.metadata(&path).ok()?.len();
                Some((size, path))
            })
            // Largest first; equal sizes fall back to the lexically smallest path
            .min_by(|(sa, pa), (sb, pb)| (Reverse(sa), pa).cmp(&(Reverse(sb), pb)))
            .map(|(_, path)| path)
            .ok_or_else(|| StylesheetError::NotFound(root.to_path_buf()))
    }

    /// Whether the stylesheet already carries the marker
    pub fn is_consolidated(&self, path: &Path) -> Result<bool, StylesheetError> {
        Ok(self.read(path)?.contains(CONSOLIDATED_MARKER))
    }

    /// Locate the target and refuse one that was already consolidated
    pub fn prepare(
        &self,
        root: &Path,
        configured: Option<&str>,
    ) -> Result<PathBuf, StylesheetError> {
        let path = self.locate(root, configured)?;
        if self.is_consolidated(&path)? {
            return Err(StylesheetError::AlreadyConsolidated(path));
        }
        log::debug!("injection target: {}", path.display());
        Ok(path)
    }

    /// Append `css` behind the marker
    pub fn inject(
        &self,
        path: &Path,
        css: &str,
        dry_run: bool,
    ) -> Result<InjectionOutcome, StylesheetError> {
        if css.trim().is_empty() {
            return Ok(InjectionOutcome::NothingToInject);
        }

        let content = self.read(path)?;
        if content.contains(CONSOLIDATED_MARKER) {
            log::info!("{} already consolidated, leaving it alone", path.display());
            return Ok(InjectionOutcome::AlreadyPresent {
                path: path.to_path_buf(),
            });
        }

        let block = format!("\n{}\n{}\n", CONSOLIDATED_MARKER, css);
        if dry_run {
            return Ok(InjectionOutcome::DryRun {
                path: path.to_path_buf(),
                bytes: block.len(),
            });
        }

        if self.backup {
            BackupManager::with_fs(&self.fs).create_backup(path)?;
        }
        let mut updated = content;
        updated.push_str(&block);
        self.fs
            .write(path, updated)
            .map_err(|source| StylesheetError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        log::info!("appended {} bytes to {}", block.len(), path.display());
        Ok(InjectionOutcome::Injected {
            path: path.to_path_buf(),
            bytes: block.len(),
        })
    }

    fn read(&self, path: &Path) -> Result<String, StylesheetError> {
        self.fs
            .read_to_string(path)
            .map_err(|source| StylesheetError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn build_dir() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("assets")).unwrap();
        fs::write(
            temp.path().join("assets/app.css"),
            ".flex{display:flex}.gap-2{gap:.5rem}",
        )
        .unwrap();
        fs::write(temp.path().join("assets/print.css"), "@media print{}").unwrap();
        temp
    }

    mod locate {
        use super::*;

        #[test]
        fn test_largest_stylesheet_is_chosen() {
            let temp = build_dir();
            let path = StylesheetInjector::new(false)
                .locate(temp.path(), None)
                .unwrap();
            assert_eq!(path, temp.path().join("assets/app.css"));
        }

        #[test]
        fn test_equal_sizes_prefer_first_path() {
            let temp = TempDir::new().unwrap();
            fs::write(temp.path().join("b.css"), "x").unwrap();
            fs::write(temp.path().join("a.css"), "y").unwrap();
            let path = StylesheetInjector::new(false)
                .locate(temp.path(), None)
                .unwrap();
            assert_eq!(path, temp.path().join("a.css"));
        }

        #[test]
        fn test_configured_stylesheet() {
            let temp = build_dir();
            let injector = StylesheetInjector::new(false);
            let path = injector
                .locate(temp.path(), Some("assets/print.css"))
                .unwrap();
            assert_eq!(path, temp.path().join("assets/print.css"));

            let err = injector.locate(temp.path(), Some("nope.css")).unwrap_err();
            assert!(matches!(err, StylesheetError::Missing(_)));
        }

        #[test]
        fn test_no_stylesheet() {
            let temp = TempDir::new().unwrap();
            let err = StylesheetInjector::new(false)
                .locate(temp.path(), None)
                .unwrap_err();
            assert!(matches!(err, StylesheetError::NotFound(_)));
        }
    }

    mod inject {
        use super::*;

        #[test]
        fn test_block_is_appended_with_backup() {
            let temp = build_dir();
            let path = temp.path().join("assets/app.css");
            let injector = StylesheetInjector::new(true);

            let outcome = injector
                .inject(&path, ".cs-ab{display:flex}", false)
                .unwrap();
            let expected_block = format!("\n{}\n.cs-ab{{display:flex}}\n", CONSOLIDATED_MARKER);
            assert_eq!(
                outcome,
                InjectionOutcome::Injected {
                    path: path.clone(),
                    bytes: expected_block.len()
                }
            );

            let content = fs::read_to_string(&path).unwrap();
            assert!(content.ends_with(&expected_block));
            assert!(temp.path().join("assets/app.css.bak").exists());
        }

        #[test]
        fn test_second_injection_is_refused() {
            let temp = build_dir();
            let path = temp.path().join("assets/app.css");
            let injector = StylesheetInjector::new(false);
            injector
                .inject(&path, ".cs-ab{display:flex}", false)
                .unwrap();
            let once = fs::read_to_string(&path).unwrap();

            let outcome = injector
                .inject(&path, ".cs-ab{display:flex}", false)
                .unwrap();
            assert!(matches!(outcome, InjectionOutcome::AlreadyPresent { .. }));
            assert_eq!(fs::read_to_string(&path).unwrap(), once);

            let err = injector.prepare(temp.path(), None).unwrap_err();
            assert!(matches!(err, StylesheetError::AlreadyConsolidated(_)));
        }

        #[test]
        fn test_dry_run_and_empty_css_write_nothing() {
            let temp = build_dir();
            let path = temp.path().join("assets/app.css");
            let before = fs::read_to_string(&path).unwrap();
            let injector = StylesheetInjector::new(true);

            let outcome = injector
                .inject(&path, ".cs-ab{display:flex}", true)
                .unwrap();
            assert!(matches!(outcome, InjectionOutcome::DryRun { .. }));
            assert!(outcome.bytes() > 0);

            let outcome = injector.inject(&path, "", false).unwrap();
            assert_eq!(outcome, InjectionOutcome::NothingToInject);

            assert_eq!(fs::read_to_string(&path).unwrap(), before);
            assert!(!temp.path().join("assets/app.css.bak").exists());
        }
    }
}
