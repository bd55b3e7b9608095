#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! class-slim library
//!
//! This library consolidates repeated utility-class groups in a finished web
//! build. Every group that repeats often enough is replaced by one short
//! synthetic class whose rule is appended to the build's stylesheet.
//! It can be used programmatically in addition to the CLI interface.
//!
//! # Basic Example
//!
//! Rewriting a single document in memory:
//!
//! ```
//! use class_slim::optimizer::{rewrite_content, ClassMapping};
//! use class_slim::scanner::{DynamicBaseSet, Safelist, SourceKind};
//!
//! let mapping = ClassMapping {
//!     name: "cs-a".to_string(),
//!     key: "flex gap-2".to_string(),
//!     tokens: vec!["flex".to_string(), "gap-2".to_string()],
//!     preserved: Vec::new(),
//!     declarations: Vec::new(),
//!     scoped: Vec::new(),
//!     count: 2,
//!     savings: 12,
//! };
//!
//! let html = r#"<div class="gap-2 flex"></div><p class="flex gap-2"></p>"#;
//! let result = rewrite_content(
//!     html,
//!     SourceKind::Markup,
//!     &[mapping],
//!     &DynamicBaseSet::new(),
//!     &Safelist::default(),
//!     false,
//! );
//!
//! assert_eq!(result.content, r#"<div class="cs-a"></div><p class="cs-a"></p>"#);
//! assert_eq!(result.total(), 2);
//! ```
//!
//! # Advanced Example: Full Run
//!
//! Analyzing a build directory first, then applying the result:
//!
//! ```no_run
//! use class_slim::config::ConfigFile;
//! use class_slim::pipeline::{ConsolidationPipeline, PipelineConfig};
//!
//! let config = PipelineConfig::new("dist", ConfigFile::default());
//! let pipeline = ConsolidationPipeline::new(config);
//!
//! let analysis = pipeline.analyze()?;
//! println!("{} groups selected", analysis.mappings.len());
//!
//! let outcome = pipeline.apply(analysis)?;
//! println!("net savings: {} bytes", outcome.metrics.net_savings);
//! # Ok::<(), class_slim::pipeline::PipelineError>(())
//! ```

/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file and preset management
pub mod config;
/// Stylesheet indexing, rule synthesis and injection
pub mod css;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Infrastructure traits for filesystem access
pub mod infra;
/// Candidate selection, naming, rewriting and backups
pub mod optimizer;
/// Consolidation pipeline orchestration
pub mod pipeline;
/// Artifact discovery and class-value extraction
pub mod scanner;
