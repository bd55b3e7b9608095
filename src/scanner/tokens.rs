//! Token splitting, dynamic-expression detection and per-token classification.

use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;

use crate::config::ConfigFile;
use crate::css::utilities;

/// How a single token participates in consolidation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// Folded into the synthetic name
    Included,
    /// Kept verbatim next to the synthetic name
    Preserved,
    /// Poisons the whole value; nothing is consolidated
    Rejected,
}

/// Outcome of classifying one class-attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueVerdict {
    /// Value contains a runtime-computed expression
    Dynamic,
    /// Value contains an icon-family or malformed token
    Rejected,
    /// Nothing left after removing preserved tokens
    Empty,
    /// Value split into consolidatable and preserved tokens
    Classified(ClassifiedValue),
}

/// Tokens of one class-attribute value, split by classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedValue {
    /// Consolidatable tokens in source order, without duplicates
    pub included: Vec<String>,
    /// Preserved tokens in source order, without duplicates
    pub preserved: Vec<String>,
}

impl ClassifiedValue {
    /// Normalized identity: sorted, deduplicated included tokens
    pub fn key(&self) -> String {
        normalize_key(self.included.iter().map(String::as_str))
    }

    /// Included tokens as a set
    pub fn token_set(&self) -> BTreeSet<String> {
        self.included.iter().cloned().collect()
    }
}

/// Compiled safelist and icon-family rules
#[derive(Debug, Clone, Default)]
pub struct Safelist {
    prefixes: Vec<String>,
    suffixes: Vec<String>,
    names: HashSet<String>,
    patterns: Vec<Regex>,
    icon_prefixes: Vec<String>,
}

impl Safelist {
    /// Compile the safelist section of a configuration
    pub fn from_config(config: &ConfigFile) -> Result<Self, regex::Error> {
        let patterns = config
            .safelist
            .patterns
            .iter()
            .map(|p| Regex::new(&format!("^(?:{})$", p)))
            .collect::<Result<Vec<_>, _>>()?;

        let icon_prefixes = if config.safety.icon_exclusion {
            config.safety.icon_prefixes.clone()
        } else {
            Vec::new()
        };

        Ok(Self {
            prefixes: config.safelist.prefixes.clone(),
            suffixes: config.safelist.suffixes.clone(),
            names: config.safelist.names.iter().cloned().collect(),
            patterns,
            icon_prefixes,
        })
    }

    /// Classify one token
    pub fn classify(&self, token: &str) -> TokenClass {
        if is_malformed(token) || self.is_icon_family(token) {
            return TokenClass::Rejected;
        }

        if self.names.contains(token)
            || self.prefixes.iter().any(|p| token.starts_with(p.as_str()))
            || self.suffixes.iter().any(|s| token.ends_with(s.as_str()))
            || self.patterns.iter().any(|re| re.is_match(token))
        {
            return TokenClass::Preserved;
        }

        TokenClass::Included
    }

    fn is_icon_family(&self, token: &str) -> bool {
        // Variant prefixes (`hover:fa-spin`) do not hide the family
        let base = token.rsplit(':').next().unwrap_or(token);
        self.icon_prefixes
            .iter()
            .any(|prefix| base.starts_with(prefix.as_str()))
    }

    /// Split and classify a whole class-attribute value
    pub fn classify_value(&self, value: &str) -> ValueVerdict {
        if has_dynamic_marker(value) {
            return ValueVerdict::Dynamic;
        }

        let mut included: Vec<String> = Vec::new();
        let mut preserved: Vec<String> = Vec::new();

        for token in split_tokens(value) {
            match self.classify(token) {
                TokenClass::Rejected => return ValueVerdict::Rejected,
                TokenClass::Preserved => {
                    if !preserved.iter().any(|t| t == token) {
                        preserved.push(token.to_string());
                    }
                }
                TokenClass::Included => {
                    if !included.iter().any(|t| t == token) {
                        included.push(token.to_string());
                    }
                }
            }
        }

        if included.is_empty() {
            return ValueVerdict::Empty;
        }

        ValueVerdict::Classified(ClassifiedValue {
            included,
            preserved,
        })
    }
}

/// Split a class value on ASCII whitespace
pub fn split_tokens(value: &str) -> impl Iterator<Item = &str> {
    value.split_ascii_whitespace()
}

/// Sorted, deduplicated, space-joined token key
pub fn normalize_key<'a>(tokens: impl IntoIterator<Item = &'a str>) -> String {
    let set: BTreeSet<&str> = tokens.into_iter().collect();
    set.into_iter().collect::<Vec<_>>().join(" ")
}

/// Whether a value contains syntax that is only resolved at runtime
///
/// Covers interpolation (`${`, `{{`, `<%`, `#{`), conditionals (`a ? b : c`,
/// `&&`, `||`), bare call forms (`cn(...)`) and a lone identifier that reads
/// like a variable rather than a utility.
pub fn has_dynamic_marker(value: &str) -> bool {
    const INTERPOLATION: &[&str] = &["${", "{{", "}}", "<%", "%>", "#{", "&&", "||"];
    if INTERPOLATION.iter().any(|m| value.contains(m)) {
        return true;
    }
    if conditional_re().is_match(value) {
        return true;
    }
    if split_tokens(value).any(|t| call_re().is_match(t)) {
        return true;
    }

    let mut tokens = split_tokens(value);
    if let (Some(only), None) = (tokens.next(), tokens.next()) {
        return is_bare_identifier(only);
    }
    false
}

/// A lone token that could just as well be a variable reference
fn is_bare_identifier(token: &str) -> bool {
    identifier_re().is_match(token) && !utilities::is_keyword(token)
}

/// Heuristic for strings in positions that are not unambiguously classes
pub fn looks_like_utility(token: &str) -> bool {
    !is_malformed(token)
        && (token.contains('-')
            || token.contains(':')
            || token.contains('[')
            || utilities::is_keyword(token))
}

fn is_malformed(token: &str) -> bool {
    token
        .chars()
        .any(|c| matches!(c, '"' | '\'' | '`' | '<' | '>' | '{' | '}' | '\\' | ';' | '='))
}

fn conditional_re() -> &'static Regex {
    static CONDITIONAL_RE: OnceLock<Regex> = OnceLock::new();
    CONDITIONAL_RE
        .get_or_init(|| Regex::new(r"\s\?\s|\s\?$|^\?\s").expect("conditional regex is valid"))
}

fn call_re() -> &'static Regex {
    static CALL_RE: OnceLock<Regex> = OnceLock::new();
    CALL_RE.get_or_init(|| Regex::new(r"^[A-Za-z_$][\w$]*\(").expect("call regex is valid"))
}

fn identifier_re() -> &'static Regex {
    static IDENTIFIER_RE: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER_RE
        .get_or_init(|| Regex::new(r"^[a-z_$][A-Za-z0-9_$]*$").expect("identifier regex is valid"))
}
