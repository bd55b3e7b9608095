//! Consolidation pipeline orchestration module
//!
//! Implements the complete run over a finished build:
//! 1. validate settings
//! 2. scan artifacts for class values and dynamic bases
//! 3. select repeated groups, assign names, synthesize rules
//! 4. inject the rules, rewrite artifacts, write the manifest

pub mod config;
pub mod error;
pub mod executor;
pub mod manifest;
pub mod metrics;

pub use config::{ConfigOverrides, PipelineConfig};
pub use error::PipelineError;
pub use executor::{Analysis, ConsolidationPipeline, RunOutcome};
pub use manifest::Manifest;
pub use metrics::{RunMetrics, TopConsolidation, TOP_N};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use std::path::PathBuf;

    #[test]
    fn test_pipeline_config_with_special_characters_in_paths() {
        let config = PipelineConfig::new("/path/with spaces/and-dashes", ConfigFile::default());
        assert!(config.target_dir.to_string_lossy().contains(' '));
        assert_eq!(
            config.target_dir,
            PathBuf::from("/path/with spaces/and-dashes")
        );
    }

    #[test]
    fn test_invalid_config_error_lists_every_issue() {
        let err = PipelineError::InvalidConfig(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "Invalid configuration: a; b");
    }

    #[test]
    fn test_format_bytes_for_metrics() {
        use crate::fmt::format_bytes;
        let metrics = RunMetrics {
            bytes_saved: 2048,
            ..Default::default()
        };
        assert_eq!(format_bytes(metrics.bytes_saved as u64), "2.00 KB");
    }
}
