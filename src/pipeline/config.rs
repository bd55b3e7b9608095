//! Pipeline configuration types

use std::path::PathBuf;

use crate::config::ConfigFile;

/// Command-line values that take precedence over `.class-slim.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// `--min-occurrences`
    pub min_occurrences: Option<usize>,
    /// `--min-tokens`
    pub min_tokens: Option<usize>,
    /// `--min-savings`
    pub min_savings: Option<usize>,
    /// `--prefix`
    pub prefix: Option<String>,
    /// `--name-length`
    pub name_length: Option<usize>,
    /// `--layer`
    pub layer: Option<String>,
    /// `--stylesheet`
    pub stylesheet: Option<String>,
    /// `--debug-attributes`
    pub debug_attributes: bool,
    /// `--consistency-safe`
    pub consistency_safe: bool,
    /// `--force`
    pub force: bool,
    /// `--no-backup`
    pub no_backup: bool,
}

/// Configuration for one consolidation run
///
/// # Examples
///
/// ```no_run
/// use class_slim::config::ConfigFile;
/// use class_slim::pipeline::{ConfigOverrides, PipelineConfig};
///
/// let mut config = PipelineConfig::new("dist", ConfigFile::default());
/// config.apply_overrides(&ConfigOverrides {
///     layer: Some("components".to_string()),
///     ..Default::default()
/// });
/// assert_eq!(config.settings.output.layer.as_deref(), Some("components"));
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Build output directory
    pub target_dir: PathBuf,
    /// Compute everything, write nothing
    pub dry_run: bool,
    /// Resolved settings
    pub settings: ConfigFile,
}

impl PipelineConfig {
    /// Create a configuration for `target_dir`
    pub fn new(target_dir: impl Into<PathBuf>, settings: ConfigFile) -> Self {
        Self {
            target_dir: target_dir.into(),
            dry_run: false,
            settings,
        }
    }

    /// Layer command-line values over the file settings
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        let settings = &mut self.settings;

        if let Some(n) = overrides.min_occurrences {
            settings.thresholds.min_occurrences = n;
        }
        if let Some(n) = overrides.min_tokens {
            settings.thresholds.min_tokens = n;
        }
        if let Some(n) = overrides.min_savings {
            settings.thresholds.min_savings = n;
        }
        if let Some(prefix) = &overrides.prefix {
            settings.naming.prefix = prefix.clone();
        }
        if let Some(length) = overrides.name_length {
            settings.naming.length = length;
        }
        if let Some(layer) = &overrides.layer {
            settings.output.layer = Some(layer.clone());
        }
        if let Some(stylesheet) = &overrides.stylesheet {
            settings.output.stylesheet = Some(stylesheet.clone());
        }

        // Flags only ever switch a behaviour on
        settings.output.debug_attributes |= overrides.debug_attributes;
        settings.safety.consistency_safe |= overrides.consistency_safe;
        settings.thresholds.force |= overrides.force;
        if overrides.no_backup {
            settings.output.backup = false;
        }
    }
}
