//! Stylesheet reading, utility interpretation and rule synthesis
//!
//! This module provides:
//! - An index of class rules already compiled into the build's stylesheets
//! - A table-driven interpreter for common utility names (fallback)
//! - Emission of one consolidated rule per synthetic name
//! - Marker-guarded injection into the target stylesheet

pub mod index;
pub mod injector;
pub mod synthesizer;
pub mod utilities;

pub use index::StylesheetIndex;
pub use injector::{InjectionOutcome, StylesheetError, StylesheetInjector, CONSOLIDATED_MARKER};
pub use synthesizer::{ResolvedStyle, RuleSynthesizer};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One `property:value` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Declaration {
    /// CSS property, custom properties included
    pub property: String,
    /// Value text, `!important` included when present
    pub value: String,
}

impl Declaration {
    /// Create a declaration
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }

    /// Parse `property: value`, trimming both halves
    pub fn parse(text: &str) -> Option<Self> {
        let (property, value) = text.split_once(':')?;
        let property = property.trim();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            return None;
        }
        Some(Self::new(property, value))
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.property, self.value)
    }
}

/// A class rule that only applies under a selector suffix or at-rule
///
/// `.hover\:underline:hover{...}` inside `@media (hover:hover)` becomes
/// `wrappers = ["@media (hover:hover)"]`, `suffix = ":hover"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedRule {
    /// Enclosing at-rule preludes, outermost first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wrappers: Vec<String>,
    /// Selector text following the class, verbatim
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suffix: String,
    /// Declarations in source order
    pub declarations: Vec<Declaration>,
}

impl ScopedRule {
    /// Whether the rule applies to the bare class with no wrapper
    pub fn is_base(&self) -> bool {
        self.wrappers.is_empty() && self.suffix.is_empty()
    }

    /// Whether two rules share the same scope
    pub fn same_scope(&self, other: &ScopedRule) -> bool {
        self.wrappers == other.wrappers && self.suffix == other.suffix
    }
}

/// Append declarations that are not already present
pub fn push_unique(
    target: &mut Vec<Declaration>,
    declarations: impl IntoIterator<Item = Declaration>,
) {
    for declaration in declarations {
        if !target.contains(&declaration) {
            target.push(declaration);
        }
    }
}

/// Every `.css` file under `root`, in path order
pub fn discover_stylesheets(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != "node_modules")
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("css"))
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect()
}
