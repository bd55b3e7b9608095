//! Enhanced error types with contextual suggestions
//!
//! Provides structured error types that include:
//! - Actionable error messages
//! - Suggested fixes and recovery actions
//! - Documentation links
//! - Proper exit codes for CI/CD
//!
//! # Examples
//!
//! ```no_run
//! use class_slim::config::ConfigFile;
//! use class_slim::error::ClassSlimError;
//! use class_slim::pipeline::{ConsolidationPipeline, PipelineConfig};
//!
//! let pipeline = ConsolidationPipeline::new(PipelineConfig::new("dist", ConfigFile::default()));
//!
//! match pipeline.run() {
//!     Ok(outcome) => println!("saved {} bytes", outcome.metrics.bytes_saved),
//!     Err(e) => {
//!         let error = ClassSlimError::from(e);
//!         eprintln!("{}", error);
//!         std::process::exit(error.exit_code());
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::css::StylesheetError;
use crate::pipeline::PipelineError;
use crate::scanner::{LocatorError, ScanError};

/// class-slim errors with contextual suggestions
#[derive(Error, Debug)]
pub enum ClassSlimError {
    /// Explicit configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path to config file
        path: PathBuf,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Invalid template name
    #[error("Invalid template: '{name}'")]
    InvalidTemplate {
        /// Invalid template name
        name: String,
        /// List of valid template names
        available: Vec<String>,
    },

    /// Configuration file already present
    #[error("Configuration file already exists: {path}")]
    ConfigExists {
        /// Existing file
        path: PathBuf,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Consolidation run failed
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ClassSlimError {
    /// Get actionable suggestion for resolving this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use class_slim::error::ClassSlimError;
    ///
    /// let error = ClassSlimError::InvalidTemplate {
    ///     name: "tiny".to_string(),
    ///     available: vec!["conservative".to_string(), "balanced".to_string()],
    /// };
    ///
    /// assert!(error.suggestion().unwrap().contains("conservative"));
    /// ```
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ConfigNotFound { .. } => {
                Some("Run 'class-slim init' to create a configuration file".to_string())
            }
            Self::InvalidTemplate { available, .. } => Some(format!(
                "Available templates: {}\nRun 'class-slim init --list' to see all templates",
                available.join(", ")
            )),
            Self::ConfigExists { .. } => {
                Some("Pass --force to overwrite the existing file".to_string())
            }
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
            Self::Pipeline(e) => pipeline_suggestion(e),
        }
    }

    /// Get documentation URL for this error.
    pub fn docs_url(&self) -> Option<&str> {
        match self {
            Self::ConfigNotFound { .. } | Self::InvalidTemplate { .. } => {
                Some("https://github.com/vitalratel/class-slim#configuration")
            }
            Self::Pipeline(PipelineError::Stylesheet(_)) => {
                Some("https://github.com/vitalratel/class-slim#stylesheet-injection")
            }
            Self::Pipeline(PipelineError::InvalidConfig(_)) => {
                Some("https://github.com/vitalratel/class-slim#configuration")
            }
            _ => None,
        }
    }

    /// Get appropriate exit code for this error.
    ///
    /// Returns Unix-style exit codes following sysexits.h conventions.
    ///
    /// # Examples
    ///
    /// ```
    /// use class_slim::error::ClassSlimError;
    /// use class_slim::pipeline::PipelineError;
    ///
    /// let error = ClassSlimError::from(PipelineError::InvalidConfig(vec![
    ///     "naming.prefix: must not be empty".to_string(),
    /// ]));
    /// assert_eq!(error.exit_code(), 78); // EX_CONFIG
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigNotFound { .. } => 66, // EX_NOINPUT
            Self::InvalidTemplate { .. } => 64, // EX_USAGE
            Self::ConfigExists { .. } => 73, // EX_CANTCREAT
            Self::Io { .. } => 74,           // EX_IOERR
            Self::Pipeline(e) => match e {
                PipelineError::InvalidConfig(_) => 78, // EX_CONFIG
                PipelineError::Scan(ScanError::InvalidSafelist(_)) => 78,
                PipelineError::Scan(ScanError::Locator(LocatorError::Glob { .. })) => 78,
                PipelineError::Scan(ScanError::Locator(LocatorError::MissingRoot(_))) => 66,
                PipelineError::Stylesheet(StylesheetError::NotFound(_))
                | PipelineError::Stylesheet(StylesheetError::Missing(_)) => 66,
                PipelineError::Stylesheet(StylesheetError::AlreadyConsolidated(_)) => 65,
                PipelineError::Stylesheet(_) | PipelineError::Manifest { .. } => 74,
                PipelineError::Serialize(_) => 70, // EX_SOFTWARE
            },
        }
    }
}

fn pipeline_suggestion(error: &PipelineError) -> Option<String> {
    match error {
        PipelineError::InvalidConfig(_) => Some(
            "Fix the listed values in .class-slim.toml or on the command line; nothing was modified"
                .to_string(),
        ),
        PipelineError::Scan(ScanError::Locator(LocatorError::MissingRoot(path))) => Some(format!(
            "Build the site first, then point class-slim at its output directory (looked for {})",
            path.display()
        )),
        PipelineError::Scan(_) => {
            Some("Check the include globs and safelist patterns in .class-slim.toml".to_string())
        }
        PipelineError::Stylesheet(StylesheetError::NotFound(_))
        | PipelineError::Stylesheet(StylesheetError::Missing(_)) => Some(
            "Pass --stylesheet <path> or set output.stylesheet to the target CSS file".to_string(),
        ),
        PipelineError::Stylesheet(StylesheetError::AlreadyConsolidated(_)) => Some(
            "Already optimized. Rebuild the site or restore the .bak files first".to_string(),
        ),
        PipelineError::Stylesheet(_) | PipelineError::Manifest { .. } => {
            Some("Check file permissions in the target directory".to_string())
        }
        PipelineError::Serialize(_) => None,
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with suggestions and documentation links
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        // Error chain (caused by)
        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(cs_error) = Self::find(error) {
            if let Some(suggestion) = cs_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }

            if let Some(docs) = cs_error.docs_url() {
                output.push_str(&format!("{} {}\n", style("docs:").blue(), docs));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        Self::find(error)
            .map(ClassSlimError::exit_code)
            .unwrap_or(1)
    }

    /// First `ClassSlimError` in the chain, context layers included
    fn find(error: &anyhow::Error) -> Option<&ClassSlimError> {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<ClassSlimError>())
    }
}
