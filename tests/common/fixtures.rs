//! Test fixture helpers for creating build directories
//!
//! Provides utilities for setting up realistic build output: static HTML,
//! compiled script chunks and a compiled utility stylesheet.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Re-export anyhow for convenience
pub use anyhow;

/// Stylesheet location used by [`BuildDir::with_stylesheet`]
pub const STYLESHEET: &str = "assets/site.css";

/// Compiled definitions for the utilities used across the fixtures
pub const UTILITIES_CSS: &str = ".flex{display:flex}\n\
.items-center{align-items:center}\n\
.gap-2{gap:.5rem}\n\
.px-4{padding-left:1rem;padding-right:1rem}\n\
.py-2{padding-top:.5rem;padding-bottom:.5rem}\n\
.rounded{border-radius:.25rem}\n\
.hover\\:underline:hover{text-decoration-line:underline}\n";

/// A card element repeated three times in scenario markup
pub const CARD: &str = r#"<div class="flex items-center gap-2">card</div>"#;

/// A temporary build output directory
///
/// The directory is removed when the value is dropped.
pub struct BuildDir {
    temp: TempDir,
}

impl BuildDir {
    /// Empty build directory
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            temp: TempDir::new()?,
        })
    }

    /// Root of the build
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Absolute path of a file inside the build
    pub fn join(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }

    /// Write a file, creating parent directories
    pub fn with_file(self, relative: &str, content: &str) -> anyhow::Result<Self> {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(self)
    }

    /// Write the compiled stylesheet at [`STYLESHEET`]
    pub fn with_stylesheet(self, css: &str) -> anyhow::Result<Self> {
        self.with_file(STYLESHEET, css)
    }

    /// Read a file inside the build
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.join(relative))
            .unwrap_or_else(|e| panic!("failed to read {}: {}", relative, e))
    }

    /// Whether a file exists inside the build
    pub fn exists(&self, relative: &str) -> bool {
        self.join(relative).exists()
    }
}

/// `count` copies of an element carrying `class`
pub fn repeated(tag: &str, class: &str, count: usize) -> String {
    (0..count)
        .map(|i| format!(r#"<{tag} class="{class}">item {i}</{tag}>"#))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Three cards sharing `flex items-center gap-2` plus the utility stylesheet
pub fn card_build() -> anyhow::Result<BuildDir> {
    BuildDir::new()?
        .with_file("index.html", &format!("<main>{}</main>", CARD.repeat(3)))?
        .with_stylesheet(UTILITIES_CSS)
}

/// Extract every `class="..."` value from markup
pub fn class_values(html: &str) -> Vec<String> {
    html.split("class=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(str::to_string)
        .collect()
}
