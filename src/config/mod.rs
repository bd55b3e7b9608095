//! Configuration management for class-slim
//!
//! This module provides:
//! - .class-slim.toml config file support
//! - Presets (conservative, balanced, aggressive)
//! - Validation that runs before any build artifact is touched

pub mod file;
pub mod loader;
pub mod template;
pub mod validator;

pub use file::{
    ConfigFile, NamingSettings, OutputSettings, SafelistSettings, SafetySettings, Thresholds,
    CONFIG_FILE_NAME,
};
pub use loader::ConfigLoader;
pub use template::{Template, TemplateType};
pub use validator::{
    ConfigValidator, ValidationIssue, ValidationResult, ValidationSeverity, ValidatorRegistry,
};
