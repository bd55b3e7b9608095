//! Occurrence records and the per-scan aggregation structures.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use super::locator::SourceKind;
use super::tokens::{normalize_key, ClassifiedValue};

/// Where a class value was seen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Path relative to the target directory
    pub file: PathBuf,
    /// 1-based line number
    pub line: usize,
}

/// A unique normalized token set and every place it was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    /// Normalized identity (sorted, space-joined included tokens)
    pub key: String,
    /// Included tokens in the order of the first sighting
    pub original: Vec<String>,
    /// Preserved tokens seen alongside, in first-seen order
    pub preserved: Vec<String>,
    /// Number of sightings
    pub count: usize,
    /// Every sighting
    pub locations: Vec<Location>,
    /// Source kinds the group was seen in
    pub kinds: BTreeSet<SourceKind>,
}

impl Occurrence {
    /// Number of consolidatable tokens
    pub fn token_count(&self) -> usize {
        self.original.len()
    }

    /// Bytes the included tokens occupy in one sighting, separators included
    pub fn original_len(&self) -> usize {
        let tokens: usize = self.original.iter().map(String::len).sum();
        tokens + self.original.len().saturating_sub(1)
    }

    /// Included tokens as a set
    pub fn token_set(&self) -> BTreeSet<String> {
        self.original.iter().cloned().collect()
    }

    /// Seen in at least one server/static artifact and at least one script
    pub fn seen_on_both_sides(&self) -> bool {
        self.kinds.iter().any(SourceKind::is_server_side)
            && self.kinds.contains(&SourceKind::Script)
    }
}

/// Aggregates class values by normalized key during one scan pass
#[derive(Debug, Default)]
pub struct OccurrenceMap {
    entries: BTreeMap<String, Occurrence>,
}

impl OccurrenceMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sighting, merging with an existing record of the same key
    pub fn record(&mut self, value: ClassifiedValue, location: Location, kind: SourceKind) {
        let key = value.key();
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Occurrence {
                key,
                original: value.included.clone(),
                preserved: Vec::new(),
                count: 0,
                locations: Vec::new(),
                kinds: BTreeSet::new(),
            });

        entry.count += 1;
        entry.locations.push(location);
        entry.kinds.insert(kind);
        for token in value.preserved {
            if !entry.preserved.contains(&token) {
                entry.preserved.push(token);
            }
        }
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an occurrence by normalized key
    pub fn get(&self, key: &str) -> Option<&Occurrence> {
        self.entries.get(key)
    }

    /// Freeze into a key-ordered list
    pub fn into_vec(self) -> Vec<Occurrence> {
        self.entries.into_values().collect()
    }
}

/// The static token prefix of a runtime-suffixed class expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DynamicBase {
    /// Normalized identity
    pub key: String,
    /// Static tokens
    pub tokens: BTreeSet<String>,
}

/// Every dynamic base seen during one scan pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct DynamicBaseSet {
    bases: BTreeMap<String, DynamicBase>,
}

impl DynamicBaseSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a base; duplicates collapse on the normalized key
    pub fn insert(&mut self, tokens: BTreeSet<String>) {
        if tokens.is_empty() {
            return;
        }
        let key = normalize_key(tokens.iter().map(String::as_str));
        self.bases
            .entry(key.clone())
            .or_insert(DynamicBase { key, tokens });
    }

    /// Number of distinct bases
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Whether no base was seen
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Iterate bases in key order
    pub fn iter(&self) -> impl Iterator<Item = &DynamicBase> {
        self.bases.values()
    }

    /// Some base is exactly this token set
    pub fn contains_exact(&self, tokens: &BTreeSet<String>) -> bool {
        self.bases
            .contains_key(&normalize_key(tokens.iter().map(String::as_str)))
    }

    /// Some base is a strict subset of this token set
    pub fn has_strict_subset_of(&self, tokens: &BTreeSet<String>) -> bool {
        self.bases
            .values()
            .any(|b| b.tokens.len() < tokens.len() && b.tokens.is_subset(tokens))
    }

    /// Some base shares at least one token with this token set
    pub fn overlaps(&self, tokens: &BTreeSet<String>) -> bool {
        self.bases.values().any(|b| !b.tokens.is_disjoint(tokens))
    }
}
