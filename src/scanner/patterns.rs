//! Class-attribute matchers.
//!
//! Each supported syntax is an independent [`ClassMatcher`]. The scanner and
//! the rewriter both run the same ordered list, so whatever is counted is
//! also what gets rewritten. Adding a syntax means appending a matcher to
//! [`default_matchers`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::OnceLock;

use super::tokens::{looks_like_utility, split_tokens};

/// Attribute syntax a value was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Syntax {
    /// `class="..."` / `className='...'`
    QuotedAttribute,
    /// `className: "..."` / `"class":"..."`
    ObjectProperty,
    /// Minified hyperscript call `h("div","...")`
    Positional,
    /// `class=&quot;...&quot;`
    EntityEncoded,
    /// `` className: `...` ``
    TemplateLiteral,
    /// `\"className\":\"...\"` inside a serialized payload
    EscapedJson,
}

impl Syntax {
    /// Whether another attribute may be appended after the match
    pub fn supports_trailing_attribute(&self) -> bool {
        matches!(self, Syntax::QuotedAttribute)
    }
}

/// One class value found in an artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMatch<'a> {
    /// Raw value between the delimiters
    pub value: &'a str,
    /// Byte span of the value
    pub value_span: Range<usize>,
    /// Byte offset just past the closing delimiter
    pub end: usize,
    /// Syntax that matched
    pub syntax: Syntax,
}

/// A syntax-specific class-value finder
pub trait ClassMatcher: Send + Sync {
    /// Syntax handled by this matcher
    fn syntax(&self) -> Syntax;

    /// Every value of this syntax in `content`
    fn find<'a>(&self, content: &'a str) -> Vec<ClassMatch<'a>>;
}

/// Matcher backed by a regex whose first participating group is the value
pub struct RegexMatcher {
    syntax: Syntax,
    regex: Regex,
    accept: Option<fn(&str) -> bool>,
}

impl RegexMatcher {
    fn new(syntax: Syntax, pattern: &str) -> Self {
        Self {
            syntax,
            regex: Regex::new(pattern).expect("class matcher regex is valid"),
            accept: None,
        }
    }

    fn with_accept(mut self, accept: fn(&str) -> bool) -> Self {
        self.accept = Some(accept);
        self
    }
}

impl ClassMatcher for RegexMatcher {
    fn syntax(&self) -> Syntax {
        self.syntax
    }

    fn find<'a>(&self, content: &'a str) -> Vec<ClassMatch<'a>> {
        let mut matches = Vec::new();
        for caps in self.regex.captures_iter(content) {
            let (Some(whole), Some(value)) = (caps.get(0), caps.iter().skip(1).flatten().next())
            else {
                continue;
            };
            if let Some(accept) = self.accept {
                if !accept(value.as_str()) {
                    continue;
                }
            }
            matches.push(ClassMatch {
                value: value.as_str(),
                value_span: value.range(),
                end: whole.end(),
                syntax: self.syntax,
            });
        }
        matches
    }
}

/// Positional call arguments are only trusted when every token reads as a utility
fn positional_accept(value: &str) -> bool {
    let mut count = 0;
    for token in split_tokens(value) {
        if !looks_like_utility(token) {
            return false;
        }
        count += 1;
    }
    count >= 2
}

/// The ordered matcher battery shared by scanning and rewriting
pub fn default_matchers() -> &'static [RegexMatcher] {
    static MATCHERS: OnceLock<Vec<RegexMatcher>> = OnceLock::new();
    MATCHERS.get_or_init(|| {
        vec![
            RegexMatcher::new(
                Syntax::QuotedAttribute,
                r#"(?:^|[^\w$.-])(?:class|className)\s*=\s*(?:"([^"\\]*)"|'([^'\\]*)')"#,
            ),
            RegexMatcher::new(
                Syntax::ObjectProperty,
                r#"(?:^|[^\w$-])["']?(?:class|className)["']?\s*:\s*(?:"([^"\\]*)"|'([^'\\]*)')"#,
            ),
            RegexMatcher::new(
                Syntax::Positional,
                r#"(?:^|[^\w$.])[A-Za-z_$][\w$]{0,2}\(\s*"[a-z][a-z0-9-]*"\s*,\s*"([^"\\]*)""#,
            )
            .with_accept(positional_accept),
            RegexMatcher::new(
                Syntax::EntityEncoded,
                r#"(?:^|[^\w-])(?:class|className)=(?:&quot;|&#34;|&#x22;)([^&<>"\n]*)(?:&quot;|&#34;|&#x22;)"#,
            ),
            RegexMatcher::new(
                Syntax::TemplateLiteral,
                r#"(?:^|[^\w$-])["']?(?:class|className)["']?\s*[:=]\s*\{?\s*`([^`]*)`"#,
            ),
            RegexMatcher::new(
                Syntax::EscapedJson,
                r#"\\"(?:class|className)\\"\s*:\s*\\"([^"\\]*)\\""#,
            ),
        ]
    })
}

/// Run every matcher and return non-overlapping matches in source order
pub fn find_class_values(content: &str) -> Vec<ClassMatch<'_>> {
    let mut all: Vec<ClassMatch<'_>> = default_matchers()
        .iter()
        .flat_map(|m| m.find(content))
        .collect();
    all.sort_by_key(|m| (m.value_span.start, m.value_span.end));

    let mut result: Vec<ClassMatch<'_>> = Vec::with_capacity(all.len());
    for m in all {
        if let Some(last) = result.last() {
            if m.value_span.start < last.end {
                continue;
            }
        }
        result.push(m);
    }
    result
}

fn template_prefix_re() -> &'static Regex {
    static TEMPLATE_PREFIX_RE: OnceLock<Regex> = OnceLock::new();
    TEMPLATE_PREFIX_RE.get_or_init(|| {
        Regex::new(r"`([^`$]*)\$\{").expect("template prefix regex is valid")
    })
}

fn concat_re() -> &'static Regex {
    static CONCAT_RE: OnceLock<Regex> = OnceLock::new();
    CONCAT_RE.get_or_init(|| {
        Regex::new(r#""([^"\\]+)"\.concat\(|\.concat\(\s*"([^"\\]*)"\s*,"#)
            .expect("concat regex is valid")
    })
}

/// Static token prefixes of runtime-suffixed class expressions
///
/// Covers template literals with an interpolation (`` `p-4 ${x}` ``) and
/// compiled concatenation (`"p-4 ".concat(x)` / `"".concat("p-4 ", x)`).
/// A prefix that does not end in whitespace ends in a partial token
/// (`bg-${color}`); that partial token is dropped.
pub fn find_dynamic_bases(content: &str) -> Vec<BTreeSet<String>> {
    let mut bases = Vec::new();

    let literals = template_prefix_re()
        .captures_iter(content)
        .filter_map(|c| c.get(1))
        .chain(
            concat_re()
                .captures_iter(content)
                .filter_map(|c| c.iter().skip(1).flatten().next()),
        );

    for literal in literals {
        if let Some(base) = static_prefix_tokens(literal.as_str()) {
            bases.push(base);
        }
    }
    bases
}

fn static_prefix_tokens(literal: &str) -> Option<BTreeSet<String>> {
    let mut tokens: Vec<&str> = split_tokens(literal).collect();
    let ends_cleanly = literal.ends_with(|c: char| c.is_ascii_whitespace());
    if !ends_cleanly {
        tokens.pop();
    }
    if tokens.is_empty() || !tokens.iter().all(|t| looks_like_utility(t)) {
        return None;
    }
    Some(tokens.into_iter().map(str::to_string).collect())
}
