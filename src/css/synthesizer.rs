//! Rule synthesis for consolidated class names.
//!
//! Each token of a mapping is looked up in the compiled stylesheets first;
//! the utility interpreter is the fallback. Indexed tokens are merged in
//! stylesheet order so that later rules still win where two tokens set the
//! same property. Tokens that resolve to nothing contribute nothing.

use super::index::StylesheetIndex;
use super::{push_unique, utilities, Declaration, ScopedRule};
use crate::optimizer::ClassMapping;

/// Styles collected for one token group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStyle {
    /// Declarations of the bare class
    pub declarations: Vec<Declaration>,
    /// Pseudo-class and at-rule scoped variants
    pub scoped: Vec<ScopedRule>,
    /// Tokens with no known definition
    pub unresolved: Vec<String>,
}

impl ResolvedStyle {
    fn merge_rule(&mut self, rule: &ScopedRule) {
        if rule.is_base() {
            push_unique(&mut self.declarations, rule.declarations.iter().cloned());
            return;
        }
        match self.scoped.iter_mut().find(|r| r.same_scope(rule)) {
            Some(existing) => {
                let declarations = rule.declarations.iter().cloned();
                push_unique(&mut existing.declarations, declarations);
            }
            None => self.scoped.push(rule.clone()),
        }
    }
}

/// Builds the consolidated stylesheet block
pub struct RuleSynthesizer<'a> {
    index: &'a StylesheetIndex,
}

impl<'a> RuleSynthesizer<'a> {
    /// Create a synthesizer over an index of the build's stylesheets
    pub fn new(index: &'a StylesheetIndex) -> Self {
        Self { index }
    }

    /// Resolve a token group to declarations
    pub fn resolve(&self, tokens: &[String]) -> ResolvedStyle {
        let mut ordered: Vec<(usize, usize, &str)> = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| {
                let position = self.index.position(token).unwrap_or(usize::MAX);
                (position, i, token.as_str())
            })
            .collect();
        ordered.sort();

        let mut style = ResolvedStyle::default();
        for (_, _, token) in ordered {
            if let Some(rules) = self.index.lookup(token) {
                for rule in rules {
                    style.merge_rule(rule);
                }
            } else if let Some(declarations) = utilities::interpret(token) {
                push_unique(&mut style.declarations, declarations);
            } else {
                style.unresolved.push(token.to_string());
            }
        }
        style
    }

    /// Fill in each mapping's declarations and render the combined CSS
    ///
    /// Mappings that resolve to nothing are kept but emit no rule.
    pub fn synthesize(&self, mappings: &mut [ClassMapping], layer: Option<&str>) -> String {
        let mut rules: Vec<String> = Vec::new();

        for mapping in mappings.iter_mut() {
            let style = self.resolve(&mapping.tokens);
            if !style.unresolved.is_empty() {
                log::debug!(
                    "{}: no definition for {}",
                    mapping.name,
                    style.unresolved.join(", ")
                );
            }
            mapping.declarations = style.declarations;
            mapping.scoped = style.scoped;

            if !mapping.declarations.is_empty() {
                rules.push(render_rule(&mapping.name, "", &mapping.declarations));
            }
            for scoped in &mapping.scoped {
                rules.push(render_scoped(&mapping.name, scoped));
            }
        }

        if rules.is_empty() {
            return String::new();
        }
        let body = rules.join("\n");
        match layer {
            Some(layer) => format!("@layer {}{{\n{}\n}}", layer, body),
            None => body,
        }
    }
}

fn render_rule(name: &str, suffix: &str, declarations: &[Declaration]) -> String {
    let body = declarations
        .iter()
        .map(Declaration::to_string)
        .collect::<Vec<_>>()
        .join(";");
    format!(".{}{}{{{}}}", name, suffix, body)
}

fn render_scoped(name: &str, rule: &ScopedRule) -> String {
    let mut css = render_rule(name, &rule.suffix, &rule.declarations);
    for wrapper in rule.wrappers.iter().rev() {
        css = format!("{}{{{}}}", wrapper, css);
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    fn mapping(name: &str, list: &[&str]) -> ClassMapping {
        ClassMapping {
            name: name.to_string(),
            key: list.join(" "),
            tokens: tokens(list),
            preserved: Vec::new(),
            declarations: Vec::new(),
            scoped: Vec::new(),
            count: 3,
            savings: 50,
        }
    }

    mod resolve {
        use super::*;

        #[test]
        fn test_interpreter_fallback() {
            let index = StylesheetIndex::new();
            let group = tokens(&["flex", "items-center", "gap-2"]);
            let style = RuleSynthesizer::new(&index).resolve(&group);
            assert_eq!(
                style.declarations,
                vec![
                    Declaration::new("display", "flex"),
                    Declaration::new("align-items", "center"),
                    Declaration::new("gap", "0.5rem"),
                ]
            );
            assert!(style.unresolved.is_empty());
        }

        #[test]
        fn test_stylesheet_wins_over_interpreter() {
            let index = StylesheetIndex::parse(".gap-2{gap:8px}");
            let style = RuleSynthesizer::new(&index).resolve(&tokens(&["gap-2"]));
            assert_eq!(style.declarations, vec![Declaration::new("gap", "8px")]);
        }

        #[test]
        fn test_stylesheet_order_decides_conflicts() {
            let css = ".p-4{padding:1rem}.px-2{padding-left:.5rem;padding-right:.5rem}";
            let index = StylesheetIndex::parse(css);
            let style = RuleSynthesizer::new(&index).resolve(&tokens(&["px-2", "p-4"]));
            assert_eq!(style.declarations[0], Declaration::new("padding", "1rem"));
            assert_eq!(style.declarations.len(), 3);
        }

        #[test]
        fn test_scoped_variants_are_collected() {
            let css = concat!(
                r".hover\:underline:hover{text-decoration-line:underline}",
                r"@media (min-width:768px){.md\:flex{display:flex}}"
            );
            let index = StylesheetIndex::parse(css);
            let group = tokens(&["hover:underline", "md:flex"]);
            let style = RuleSynthesizer::new(&index).resolve(&group);
            assert!(style.declarations.is_empty());
            assert_eq!(style.scoped.len(), 2);
            assert_eq!(style.scoped[0].suffix, ":hover");
            assert_eq!(
                style.scoped[1].wrappers,
                index.lookup("md:flex").unwrap()[0].wrappers
            );
            assert!(style.scoped[1].wrappers[0].starts_with("@media"));
        }

        #[test]
        fn test_unknown_tokens_are_omitted() {
            let index = StylesheetIndex::new();
            let style = RuleSynthesizer::new(&index).resolve(&tokens(&["flex", "card-shell"]));
            assert_eq!(
                style.declarations,
                vec![Declaration::new("display", "flex")]
            );
            assert_eq!(style.unresolved, vec!["card-shell"]);
        }

        #[test]
        fn test_duplicate_declarations_are_merged() {
            let index = StylesheetIndex::parse(".block{display:block}.d-block{display:block}");
            let style = RuleSynthesizer::new(&index).resolve(&tokens(&["block", "d-block"]));
            assert_eq!(
                style.declarations,
                vec![Declaration::new("display", "block")]
            );
        }
    }

    mod synthesize {
        use super::*;

        #[test]
        fn test_base_rule_is_emitted_and_mapping_filled() {
            let index = StylesheetIndex::new();
            let mut mappings = vec![mapping("cs-ab", &["flex", "items-center", "gap-2"])];
            let css = RuleSynthesizer::new(&index).synthesize(&mut mappings, None);
            assert_eq!(css, ".cs-ab{display:flex;align-items:center;gap:0.5rem}");
            assert_eq!(mappings[0].declarations.len(), 3);
        }

        #[test]
        fn test_scoped_rules_follow_their_base() {
            let css = r"@media (min-width:768px){.md\:hover\:flex:hover{display:flex}}";
            let index = StylesheetIndex::parse(css);
            let mut mappings = vec![mapping("cs-q", &["block", "md:hover:flex"])];
            let rule = &index.lookup("md:hover:flex").unwrap()[0];
            let media = rule.wrappers[0].clone();
            let out = RuleSynthesizer::new(&index).synthesize(&mut mappings, None);
            assert_eq!(
                out,
                format!(
                    ".cs-q{{display:block}}\n{}{{.cs-q:hover{{display:flex}}}}",
                    media
                )
            );
        }

        #[test]
        fn test_layer_wraps_every_rule() {
            let index = StylesheetIndex::new();
            let mut mappings = vec![
                mapping("cs-a", &["flex", "gap-2"]),
                mapping("cs-b", &["block", "p-4"]),
            ];
            let css = RuleSynthesizer::new(&index).synthesize(&mut mappings, Some("components"));
            assert_eq!(
                css,
                concat!(
                    "@layer components{\n",
                    ".cs-a{display:flex;gap:0.5rem}\n",
                    ".cs-b{display:block;padding:1rem}\n",
                    "}"
                )
            );
        }

        #[test]
        fn test_unresolvable_mapping_emits_nothing() {
            let index = StylesheetIndex::new();
            let mut mappings = vec![mapping("cs-z", &["card", "shell"])];
            let css = RuleSynthesizer::new(&index).synthesize(&mut mappings, Some("components"));
            assert!(css.is_empty());
            assert!(!mappings[0].has_styles());
        }
    }
}
