//! Command handlers for class-slim CLI
//!
//! This module contains all command implementations, organized by functionality.
//! Each submodule handles a specific CLI command.

pub mod completions;
pub mod init;
pub mod optimize;
pub mod scan;

// Re-export command functions for convenient access
pub use completions::cmd_completions;
pub use init::cmd_init;
pub use optimize::cmd_optimize;
pub use scan::cmd_scan;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{ConfigFile, ConfigLoader};
use crate::error::ClassSlimError;
use crate::pipeline::{ConfigOverrides, PipelineConfig};

/// Options shared by `optimize` and `scan`
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Build output directory
    pub target_dir: PathBuf,
    /// Explicit configuration file (default: `.class-slim.toml` in the working directory)
    pub config_path: Option<PathBuf>,
    /// Command-line overrides
    pub overrides: ConfigOverrides,
    /// Machine-readable output
    pub json: bool,
}

impl RunOptions {
    /// Load settings and apply overrides
    pub fn pipeline_config(&self, dry_run: bool) -> Result<PipelineConfig> {
        let settings = self.load_settings()?;
        let mut config = PipelineConfig::new(&self.target_dir, settings);
        config.apply_overrides(&self.overrides);
        config.dry_run = dry_run;
        Ok(config)
    }

    fn load_settings(&self) -> Result<ConfigFile> {
        match &self.config_path {
            Some(path) => {
                if let Err(source) = std::fs::metadata(path) {
                    if source.kind() == ErrorKind::NotFound {
                        return Err(ClassSlimError::ConfigNotFound {
                            path: path.clone(),
                            source,
                        }
                        .into());
                    }
                }
                ConfigLoader::load_path(path)
            }
            None => ConfigLoader::load(&working_dir()?),
        }
    }
}

/// Current directory, where `.class-slim.toml` lives
fn working_dir() -> Result<PathBuf> {
    env::current_dir().map_err(|source| {
        ClassSlimError::Io {
            context: "the working directory".to_string(),
            source,
        }
        .into()
    })
}

/// Spinner on stderr, hidden for JSON output
fn spinner(hidden: bool, message: &'static str) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_message(message);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_explicit_config_is_config_not_found() {
        let temp = TempDir::new().unwrap();
        let options = RunOptions {
            target_dir: temp.path().to_path_buf(),
            config_path: Some(temp.path().join("missing.toml")),
            ..Default::default()
        };

        let err = options.pipeline_config(false).unwrap_err();
        let cs_error = err.downcast_ref::<ClassSlimError>().unwrap();
        assert_eq!(cs_error.exit_code(), 66);
    }

    #[test]
    fn test_without_explicit_config_loads_from_working_directory() {
        let temp = TempDir::new().unwrap();
        let options = RunOptions {
            target_dir: temp.path().to_path_buf(),
            ..Default::default()
        };

        let config = options.pipeline_config(false).unwrap();
        let expected = ConfigLoader::load(&working_dir().unwrap()).unwrap();
        assert_eq!(config.settings.naming.prefix, expected.naming.prefix);
        assert_eq!(config.target_dir, temp.path());
    }

    #[test]
    fn test_explicit_config_then_overrides() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("slim.toml");
        std::fs::write(
            &path,
            "[naming]\nprefix = \"u-\"\n[thresholds]\nmin-tokens = 3\n",
        )
        .unwrap();

        let options = RunOptions {
            target_dir: temp.path().to_path_buf(),
            config_path: Some(path),
            overrides: ConfigOverrides {
                min_tokens: Some(4),
                ..Default::default()
            },
            json: false,
        };

        let config = options.pipeline_config(true).unwrap();
        assert!(config.dry_run);
        assert_eq!(config.settings.naming.prefix, "u-");
        assert_eq!(config.settings.thresholds.min_tokens, 4);
    }
}
