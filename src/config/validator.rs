//! Configuration validation system
//!
//! Provides pluggable validation for configuration files. Validation runs
//! before any build artifact is read, so a bad threshold or an uncompilable
//! safelist pattern never leaves a half-rewritten build behind.

use parking_lot::Mutex;
use regex::Regex;
use std::fmt;
use std::sync::{Arc, OnceLock};

use super::file::ConfigFile;

/// Longest supported synthetic-name suffix
pub const MAX_NAME_LENGTH: usize = 6;

/// Validation severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    /// Informational message
    Info,
    /// Warning - should be addressed but not blocking
    Warning,
    /// Error - must be fixed
    Error,
}

impl ValidationSeverity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationSeverity::Info => "INFO",
            ValidationSeverity::Warning => "WARNING",
            ValidationSeverity::Error => "ERROR",
        }
    }
}

/// A validation issue found in configuration
///
/// # Examples
///
/// ```
/// use class_slim::config::validator::{ValidationIssue, ValidationSeverity};
///
/// let issue = ValidationIssue::error("naming.prefix", "Prefix must not be empty");
/// assert_eq!(issue.severity, ValidationSeverity::Error);
///
/// let warning = ValidationIssue::warning("thresholds.min-occurrences", "Value is 1")
///     .with_suggestion("Use 2 or more");
/// assert!(warning.suggestion.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity level
    pub severity: ValidationSeverity,
    /// Field or section that has the issue
    pub field: String,
    /// Description of the issue
    pub message: String,
    /// Suggested fix (if available)
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Create a new validation issue
    pub fn new(
        severity: ValidationSeverity,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create an error issue
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Error, field, message)
    }

    /// Create a warning issue
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Warning, field, message)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.severity.as_str(),
            self.field,
            self.message
        )
    }
}

/// Result of configuration validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed (no errors)
    pub valid: bool,
    /// Issues found during validation
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn success() -> Self {
        Self {
            valid: true,
            issues: Vec::new(),
        }
    }

    /// Add an issue
    pub fn add_issue(&mut self, issue: ValidationIssue) {
        if issue.severity == ValidationSeverity::Error {
            self.valid = false;
        }
        self.issues.push(issue);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        !self.valid
    }

    /// Get only errors
    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Error)
            .collect()
    }

    /// Get only warnings
    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Warning)
            .collect()
    }
}

/// Trait for pluggable configuration validators
pub trait ConfigValidator: Send + Sync {
    /// Validator name
    fn name(&self) -> &str;

    /// Validate configuration data
    fn validate(&self, config: &ConfigFile) -> ValidationResult;

    /// Get validator priority (lower runs first)
    fn priority(&self) -> u32 {
        100
    }
}

/// Registry for managing configuration validators
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: Mutex<Vec<Arc<dyn ConfigValidator>>>,
}

impl ValidatorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in validators
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(ThresholdValidator));
        registry.register(Arc::new(NamingValidator));
        registry.register(Arc::new(SafelistValidator));
        registry.register(Arc::new(OutputValidator));
        registry
    }

    /// Register a validator
    pub fn register(&self, validator: Arc<dyn ConfigValidator>) {
        let mut validators = self.validators.lock();
        validators.push(validator);
        validators.sort_by_key(|v| v.priority());
    }

    /// Run all validators
    pub fn validate_all(&self, config: &ConfigFile) -> ValidationResult {
        let validators = self.validators.lock();

        let mut result = ValidationResult::success();
        for validator in validators.iter() {
            for issue in validator.validate(config).issues {
                result.add_issue(issue);
            }
        }
        result
    }

    /// Get validator count
    pub fn count(&self) -> usize {
        self.validators.lock().len()
    }
}

fn css_identifier_re() -> &'static Regex {
    static CSS_IDENT_RE: OnceLock<Regex> = OnceLock::new();
    CSS_IDENT_RE.get_or_init(|| {
        Regex::new(r"^-?[_a-zA-Z][_a-zA-Z0-9-]*$").expect("css identifier regex is valid")
    })
}

/// Checks repeat/token/savings thresholds
pub struct ThresholdValidator;

impl ConfigValidator for ThresholdValidator {
    fn name(&self) -> &str {
        "thresholds"
    }

    fn validate(&self, config: &ConfigFile) -> ValidationResult {
        let mut result = ValidationResult::success();
        let thresholds = &config.thresholds;

        if thresholds.min_occurrences == 0 {
            result.add_issue(
                ValidationIssue::error("thresholds.min-occurrences", "Must be at least 1")
                    .with_suggestion("Set min-occurrences = 2"),
            );
        } else if thresholds.min_occurrences == 1 {
            result.add_issue(ValidationIssue::warning(
                "thresholds.min-occurrences",
                "A value of 1 consolidates groups that never repeat",
            ));
        }

        if thresholds.min_tokens == 0 {
            result.add_issue(
                ValidationIssue::error("thresholds.min-tokens", "Must be at least 1")
                    .with_suggestion("Set min-tokens = 2"),
            );
        }

        result
    }

    fn priority(&self) -> u32 {
        10
    }
}

/// Checks the synthetic-name prefix and length
pub struct NamingValidator;

impl ConfigValidator for NamingValidator {
    fn name(&self) -> &str {
        "naming"
    }

    fn validate(&self, config: &ConfigFile) -> ValidationResult {
        let mut result = ValidationResult::success();
        let naming = &config.naming;

        if naming.prefix.is_empty() {
            result.add_issue(
                ValidationIssue::error("naming.prefix", "Prefix must not be empty")
                    .with_suggestion("Use the default prefix \"cs-\""),
            );
        } else if !css_identifier_re().is_match(&naming.prefix) {
            result.add_issue(ValidationIssue::error(
                "naming.prefix",
                format!("'{}' is not a valid CSS class prefix", naming.prefix),
            ));
        }

        if naming.length == 0 || naming.length > MAX_NAME_LENGTH {
            result.add_issue(ValidationIssue::error(
                "naming.length",
                format!(
                    "Length {} is outside 1..={}",
                    naming.length, MAX_NAME_LENGTH
                ),
            ));
        }

        result
    }

    fn priority(&self) -> u32 {
        20
    }
}

/// Checks that safelist regexes and file globs compile
pub struct SafelistValidator;

impl ConfigValidator for SafelistValidator {
    fn name(&self) -> &str {
        "safelist"
    }

    fn validate(&self, config: &ConfigFile) -> ValidationResult {
        let mut result = ValidationResult::success();

        for pattern in &config.safelist.patterns {
            if let Err(e) = Regex::new(pattern) {
                result.add_issue(ValidationIssue::error(
                    "safelist.patterns",
                    format!("Invalid regular expression '{}': {}", pattern, e),
                ));
            }
        }

        for glob in config.safelist.files.iter().chain(config.include.iter()) {
            if let Err(e) = globset::Glob::new(glob) {
                result.add_issue(ValidationIssue::error(
                    "safelist.files",
                    format!("Invalid glob '{}': {}", glob, e),
                ));
            }
        }

        result
    }
}

/// Checks output settings
pub struct OutputValidator;

impl ConfigValidator for OutputValidator {
    fn name(&self) -> &str {
        "output"
    }

    fn validate(&self, config: &ConfigFile) -> ValidationResult {
        let mut result = ValidationResult::success();

        if let Some(layer) = &config.output.layer {
            if !css_identifier_re().is_match(layer) {
                result.add_issue(ValidationIssue::error(
                    "output.layer",
                    format!("'{}' is not a valid cascade layer name", layer),
                ));
            }
        }

        if config.output.manifest.trim().is_empty() {
            result.add_issue(ValidationIssue::error(
                "output.manifest",
                "Manifest file name must not be empty",
            ));
        }

        result
    }
}
