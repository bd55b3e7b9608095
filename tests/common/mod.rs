//! Common test utilities and helpers
//!
//! This module provides shared functionality for integration tests:
//! - Throw-away build directories shaped like real framework output
//! - Small readers for the files a run touches
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::fixtures::BuildDir;
//!
//! let build = BuildDir::new()?
//!     .with_file("index.html", r#"<div class="flex gap-2"></div>"#)?
//!     .with_stylesheet(".flex{display:flex}")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod fixtures;

/// Check if running in CI environment
#[allow(dead_code)]
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok() || std::env::var("GITHUB_ACTIONS").is_ok()
}
