//! Candidate selection, naming and artifact rewriting
//!
//! This module provides:
//! - Savings-based selection of repeated token groups, with safety filters
//! - Deterministic, collision-free synthetic names
//! - In-place rewriting of artifacts behind a dynamic-base gate
//! - `.bak` backups before each write
//!
//! ## Key Types
//!
//! - `Candidate` - A selected token group awaiting a name
//! - `ClassMapping` - Name, tokens and declarations of one consolidation
//! - `NameAssigner` - Hands out `prefix + base-36` names
//! - `Rewriter` - Applies mappings to artifacts
//! - `BackupManager` - Creates `.bak` siblings before modifications
//!
//! ## Usage
//!
//! ```no_run
//! use class_slim::config::ConfigFile;
//! use class_slim::optimizer::{select, NameAssigner};
//! use class_slim::scanner::Scanner;
//! use std::path::Path;
//!
//! let config = ConfigFile::default();
//! let report = Scanner::new().scan_directory(Path::new("dist"), &config)?;
//! let mut candidates = select(&report.occurrences, &report.dynamic_bases, &config);
//! NameAssigner::new("cs-", 2).assign_all(&mut candidates);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backup;
pub mod mapping;
pub mod naming;
pub mod rewriter;
pub mod selector;

pub use backup::{BackupError, BackupManager};
pub use mapping::{Candidate, ClassMapping};
pub use naming::NameAssigner;
pub use rewriter::{
    rewrite_content, DynamicGate, RewriteOptions, RewriteReport, Rewriter, DEBUG_ATTRIBUTE,
};
pub use selector::{estimate_overhead, estimate_savings, evaluate, select, Rejection};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimizer_module_exports_are_accessible() {
        let _: Option<BackupManager> = None;
        let _: Option<Rewriter> = None;
        let _: Option<NameAssigner> = None;
        let _: Option<ClassMapping> = None;
    }

    #[test]
    fn test_default_rewrite_options_write_without_backup() {
        let options = RewriteOptions::default();
        assert!(!options.dry_run);
        assert!(!options.backup);
        assert!(!options.debug_attributes);
    }
}
