//! Candidates and the class mappings derived from them

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::css::{Declaration, ScopedRule};
use crate::scanner::SourceKind;

/// A selected occurrence awaiting a synthetic name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Normalized identity
    pub key: String,
    /// Included tokens in first-seen order
    pub tokens: Vec<String>,
    /// Preserved tokens seen alongside
    pub preserved: Vec<String>,
    /// Repeat count
    pub count: usize,
    /// Estimated byte savings across all repeats
    pub savings: usize,
    /// Source kinds the group was seen in
    pub kinds: BTreeSet<SourceKind>,
    /// Assigned synthetic name
    pub name: Option<String>,
}

impl Candidate {
    /// Included tokens as a set
    pub fn token_set(&self) -> BTreeSet<String> {
        self.tokens.iter().cloned().collect()
    }
}

/// The durable record of one consolidation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMapping {
    /// Synthetic class name
    pub name: String,
    /// Normalized identity of the replaced token group
    pub key: String,
    /// Original tokens in first-seen order
    pub tokens: Vec<String>,
    /// Tokens kept verbatim next to the synthetic name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preserved: Vec<String>,
    /// Declarations of the bare synthetic class
    pub declarations: Vec<Declaration>,
    /// Pseudo-class and at-rule scoped variants
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scoped: Vec<ScopedRule>,
    /// Repeat count at scan time
    pub count: usize,
    /// Estimated byte savings
    pub savings: usize,
}

impl ClassMapping {
    /// Build an unresolved mapping from a named candidate
    pub fn from_candidate(candidate: &Candidate, name: String) -> Self {
        Self {
            name,
            key: candidate.key.clone(),
            tokens: candidate.tokens.clone(),
            preserved: candidate.preserved.clone(),
            declarations: Vec::new(),
            scoped: Vec::new(),
            count: candidate.count,
            savings: candidate.savings,
        }
    }

    /// Included tokens as a set
    pub fn token_set(&self) -> BTreeSet<String> {
        self.tokens.iter().cloned().collect()
    }

    /// Whether rule synthesis produced anything for this mapping
    pub fn has_styles(&self) -> bool {
        !self.declarations.is_empty() || !self.scoped.is_empty()
    }
}
