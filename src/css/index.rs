//! Index of class rules found in compiled stylesheets.
//!
//! Stylesheets are parsed with `lightningcss`. Style rules are read inside
//! `@media`, `@supports` and `@container` wrappers and transparent `@layer`
//! blocks; other at-rules (`@keyframes`, `@font-face`, `@property`) are
//! skipped. Only selectors whose first compound starts with a class are
//! indexed. Classes that appear anywhere else in a selector are recorded as
//! structural: removing them from markup would break a rule that depends on them.

use std::collections::{HashMap, HashSet};

use lightningcss::declaration::DeclarationBlock;
use lightningcss::printer::PrinterOptions;
use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::selector::{Component, Selector};
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::traits::ToCss;

use super::{push_unique, Declaration, ScopedRule};

/// Class name to the rules that style it
#[derive(Debug, Clone, Default)]
pub struct StylesheetIndex {
    rules: HashMap<String, Vec<ScopedRule>>,
    order: HashMap<String, usize>,
    structural: HashSet<String>,
}

impl StylesheetIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from one stylesheet's text
    pub fn parse(css: &str) -> Self {
        let mut index = Self::new();
        index.add_stylesheet(css);
        index
    }

    /// Add every class rule in `css`
    ///
    /// Invalid rules and declarations are dropped; the rest of the sheet is
    /// still indexed.
    pub fn add_stylesheet(&mut self, css: &str) {
        let options = ParserOptions {
            error_recovery: true,
            ..ParserOptions::default()
        };
        match StyleSheet::parse(css, options) {
            Ok(sheet) => self.walk(&sheet.rules, &[]),
            Err(err) => log::warn!("stylesheet could not be parsed: {}", err),
        }
    }

    /// Rules for a class, in source order
    pub fn lookup(&self, class: &str) -> Option<&[ScopedRule]> {
        self.rules.get(class).map(Vec::as_slice)
    }

    /// Ordinal of a class's first rule across everything added so far
    pub fn position(&self, class: &str) -> Option<usize> {
        self.order.get(class).copied()
    }

    /// Whether a class participates in a selector beyond its own leading compound
    pub fn is_structural(&self, class: &str) -> bool {
        self.structural.contains(class)
    }

    /// Every indexed class name
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.rules
            .keys()
            .chain(self.structural.iter())
            .map(String::as_str)
    }

    /// Number of classes with at least one rule
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no class rule was found
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn walk(&mut self, rules: &CssRuleList<'_>, wrappers: &[String]) {
        for rule in &rules.0 {
            match rule {
                CssRule::Style(style) => {
                    let declarations = read_declarations(&style.declarations);
                    for selector in style.selectors.0.iter() {
                        self.add_selector(selector, &declarations, wrappers);
                    }
                }
                CssRule::LayerBlock(layer) => self.walk(&layer.rules, wrappers),
                CssRule::Media(media) => self.walk_wrapped(rule, &media.rules, wrappers),
                CssRule::Supports(supports) => self.walk_wrapped(rule, &supports.rules, wrappers),
                CssRule::Container(container) => {
                    self.walk_wrapped(rule, &container.rules, wrappers)
                }
                _ => {}
            }
        }
    }

    fn walk_wrapped(&mut self, rule: &CssRule<'_>, body: &CssRuleList<'_>, wrappers: &[String]) {
        match at_rule_prelude(rule) {
            Some(prelude) => {
                let mut nested = wrappers.to_vec();
                nested.push(prelude);
                self.walk(body, &nested);
            }
            // `@media all` and friends print without a wrapper
            None => self.walk(body, wrappers),
        }
    }

    fn add_selector(
        &mut self,
        selector: &Selector<'_>,
        declarations: &[Declaration],
        wrappers: &[String],
    ) {
        let mut classes = Vec::new();
        collect_classes(selector, &mut classes);

        let text = match selector.to_css_string(minified()) {
            Ok(text) => text,
            Err(err) => {
                log::debug!("selector could not be printed: {}", err);
                self.structural.extend(classes);
                return;
            }
        };

        let mut leading = None;
        if let Some((class, consumed)) = leading_class(selector, &text) {
            let suffix = &text[consumed..];
            if is_indexable_suffix(suffix) {
                if !declarations.is_empty() {
                    self.insert(class.clone(), wrappers, suffix, declarations);
                }
                leading = Some(class);
            }
        }

        for class in classes {
            if leading.as_deref() != Some(class.as_str()) {
                self.structural.insert(class);
            }
        }
    }

    fn insert(
        &mut self,
        class: String,
        wrappers: &[String],
        suffix: &str,
        declarations: &[Declaration],
    ) {
        let rule = ScopedRule {
            wrappers: wrappers.to_vec(),
            suffix: suffix.to_string(),
            declarations: Vec::new(),
        };
        let next = self.order.len();
        self.order.entry(class.clone()).or_insert(next);
        let rules = self.rules.entry(class).or_default();
        let existing = match rules.iter().position(|r| r.same_scope(&rule)) {
            Some(i) => &mut rules[i],
            None => {
                rules.push(rule);
                let last = rules.len() - 1;
                &mut rules[last]
            }
        };
        push_unique(&mut existing.declarations, declarations.iter().cloned());
    }
}

fn minified() -> PrinterOptions<'static> {
    PrinterOptions {
        minify: true,
        ..PrinterOptions::default()
    }
}

/// Print a wrapping at-rule and keep only its prelude
fn at_rule_prelude(rule: &CssRule<'_>) -> Option<String> {
    let printed = rule
        .to_css_string(minified())
        .map_err(|err| log::debug!("at-rule could not be printed: {}", err))
        .ok()?;
    let prelude = printed.split('{').next()?.trim();
    prelude.starts_with('@').then(|| prelude.to_string())
}

/// Declarations of a style rule in compact form, `!important` last
fn read_declarations(block: &DeclarationBlock<'_>) -> Vec<Declaration> {
    let normal = block.declarations.iter().map(|property| (property, false));
    let important = block
        .important_declarations
        .iter()
        .map(|property| (property, true));

    let mut declarations = Vec::new();
    for (property, important) in normal.chain(important) {
        match property.to_css_string(important, minified()) {
            Ok(text) => push_unique(&mut declarations, Declaration::parse(&text)),
            Err(err) => log::debug!("declaration could not be printed: {}", err),
        }
    }
    declarations
}

/// The class that opens the selector's first compound, with the length of
/// its printed form
///
/// Components of a compound are matched against the printed selector, so a
/// leading `.btn` is found whatever order the parser keeps them in.
fn leading_class(selector: &Selector<'_>, printed: &str) -> Option<(String, usize)> {
    let components: Vec<&Component<'_>> = selector.iter_raw_match_order().collect();
    let first_compound = components
        .iter()
        .rposition(|c| matches!(c, Component::Combinator(_)))
        .map_or(0, |i| i + 1);

    components[first_compound..]
        .iter()
        .find_map(|component| match component {
            Component::Class(name) => {
                let name: &str = &name.0;
                let mut escaped = String::from(".");
                cssparser::serialize_identifier(name, &mut escaped).ok()?;
                let rest = printed.strip_prefix(escaped.as_str())?;
                (!continues_identifier(rest)).then(|| (name.to_string(), escaped.len()))
            }
            _ => None,
        })
}

/// Every class referenced anywhere in a selector, `:not()`/`:is()`/`:where()` included
fn collect_classes(selector: &Selector<'_>, out: &mut Vec<String>) {
    for component in selector.iter_raw_match_order() {
        match component {
            Component::Class(name) => out.push(name.0.to_string()),
            Component::Negation(list) | Component::Is(list) | Component::Where(list) => {
                for nested in list.iter() {
                    collect_classes(nested, out);
                }
            }
            _ => {}
        }
    }
}

fn continues_identifier(rest: &str) -> bool {
    match rest.chars().next() {
        Some(c) => c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '\\') || !c.is_ascii(),
        None => false,
    }
}

/// A suffix can be re-keyed onto another class only if it does not add a
/// further simple selector to the same compound (`.a.b`, `.a[x]`, `.a#id`)
fn is_indexable_suffix(suffix: &str) -> bool {
    match suffix.as_bytes().first() {
        None => true,
        Some(b) => matches!(b, b':' | b' ' | b'>' | b'+' | b'~'),
    }
}
