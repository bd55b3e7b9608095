//! Artifact rewriting.
//!
//! Every artifact is re-matched with the same matcher battery the scanner
//! uses. A value is replaced only when its included tokens are exactly a
//! mapping's token set; order and attribute syntax do not matter. Before
//! replacing, the dynamic-base gate runs for the artifact's kind:
//!
//! - server/static artifacts skip a mapping whose tokens strictly contain
//!   a dynamic base (the client still builds `base + suffix` at runtime);
//! - script artifacts skip a mapping whose tokens equal a dynamic base
//!   (that literal is concatenated with a runtime suffix).
//!
//! Both checks are best-effort heuristics. A static value that is a strict
//! subset of a dynamic base is not guarded.

use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

use super::backup::{BackupError, BackupManager};
use super::mapping::ClassMapping;
use crate::infra::{FileSystem, RealFileSystem};
use crate::scanner::{
    find_class_values, Artifact, DynamicBaseSet, Safelist, SourceKind, ValueVerdict,
};

/// Attribute carrying the original tokens when debug output is enabled
pub const DEBUG_ATTRIBUTE: &str = "data-cs-original";

/// Switches for one rewrite pass
#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteOptions {
    /// Compute everything but write nothing
    pub dry_run: bool,
    /// Append the debug attribute in markup artifacts
    pub debug_attributes: bool,
    /// Create `.bak` siblings before writing
    pub backup: bool,
}

/// Outcome of a rewrite pass
#[derive(Debug, Clone, Default)]
pub struct RewriteReport {
    /// Artifacts whose content changed (or would change, in a dry run)
    pub files_modified: usize,
    /// Relative paths of those artifacts
    pub modified_files: Vec<PathBuf>,
    /// Bytes removed across all artifacts (negative when content grew)
    pub bytes_saved: i64,
    /// Class values replaced
    pub replacements: usize,
    /// Replacements per synthetic name
    pub replacements_by_name: BTreeMap<String, usize>,
    /// Values left alone by the dynamic-base gate
    pub gated: usize,
    /// Non-fatal per-file failures
    pub errors: Vec<String>,
}

/// The dynamic-base gate of one token set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicGate {
    skip_in_server: bool,
    skip_in_script: bool,
}

impl DynamicGate {
    /// Gate for `tokens` against every base seen by the scan
    pub fn new(tokens: &BTreeSet<String>, bases: &DynamicBaseSet) -> Self {
        Self {
            skip_in_server: bases.has_strict_subset_of(tokens),
            skip_in_script: bases.contains_exact(tokens),
        }
    }

    /// Whether values in an artifact of `kind` must be left alone
    pub fn blocks(&self, kind: SourceKind) -> bool {
        if kind.is_server_side() {
            self.skip_in_server
        } else {
            self.skip_in_script
        }
    }

    /// Whether every kind is blocked, so no value would ever be replaced
    pub fn blocks_all<'a>(&self, kinds: impl IntoIterator<Item = &'a SourceKind>) -> bool {
        kinds.into_iter().all(|kind| self.blocks(*kind))
    }
}

/// A mapping prepared for lookup, with the gate precomputed
struct PreparedMapping<'a> {
    name: &'a str,
    original: String,
    gate: DynamicGate,
}

/// Result of rewriting one artifact's text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentRewrite {
    /// New content
    pub content: String,
    /// Replacements per synthetic name
    pub replacements: BTreeMap<String, usize>,
    /// Values left alone by the dynamic-base gate
    pub gated: usize,
}

impl ContentRewrite {
    /// Total replacements
    pub fn total(&self) -> usize {
        self.replacements.values().sum()
    }
}

/// Applies class mappings to artifacts
pub struct Rewriter<FS: FileSystem = RealFileSystem> {
    fs: FS,
    safelist: Safelist,
    options: RewriteOptions,
}

impl Rewriter<RealFileSystem> {
    /// Create a rewriter over the real filesystem
    pub fn new(safelist: Safelist, options: RewriteOptions) -> Self {
        Self::with_fs(safelist, options, RealFileSystem)
    }
}

impl<FS: FileSystem + Sync> Rewriter<FS> {
    /// Create a rewriter with a custom filesystem implementation
    pub fn with_fs(safelist: Safelist, options: RewriteOptions, fs: FS) -> Self {
        Self {
            fs,
            safelist,
            options,
        }
    }

    /// Rewrite every artifact, collecting per-file failures
    pub fn rewrite(
        &self,
        artifacts: &[Artifact],
        mappings: &[ClassMapping],
        bases: &DynamicBaseSet,
    ) -> RewriteReport {
        let mut report = RewriteReport::default();
        if mappings.is_empty() {
            return report;
        }

        let lookup = prepare(mappings, bases);
        let results: Vec<Result<Option<(i64, ContentRewrite)>, String>> = artifacts
            .par_iter()
            .map(|artifact| self.rewrite_file(artifact, &lookup))
            .collect();

        for (artifact, result) in artifacts.iter().zip(results) {
            match result {
                Ok(Some((delta, rewrite))) => {
                    report.files_modified += 1;
                    report.modified_files.push(artifact.relative.clone());
                    report.bytes_saved += delta;
                    report.replacements += rewrite.total();
                    report.gated += rewrite.gated;
                    for (name, n) in rewrite.replacements {
                        *report.replacements_by_name.entry(name).or_insert(0) += n;
                    }
                }
                Ok(None) => {}
                Err(message) => {
                    log::warn!("{}", message);
                    report.errors.push(message);
                }
            }
        }

        log::info!(
            "rewrote {} values in {} files{}",
            report.replacements,
            report.files_modified,
            if self.options.dry_run { " (dry run)" } else { "" }
        );
        report
    }

    fn rewrite_file(
        &self,
        artifact: &Artifact,
        lookup: &HashMap<&str, PreparedMapping<'_>>,
    ) -> Result<Option<(i64, ContentRewrite)>, String> {
        let content = self
            .fs
            .read_to_string(&artifact.path)
            .map_err(|e| format!("Failed to read {}: {}", artifact.relative.display(), e))?;

        let rewrite = rewrite_with(
            &content,
            artifact.kind,
            lookup,
            &self.safelist,
            self.options.debug_attributes,
        );
        if rewrite.content == content {
            return Ok(None);
        }
        let delta = content.len() as i64 - rewrite.content.len() as i64;

        if !self.options.dry_run {
            if self.options.backup {
                BackupManager::with_fs(&self.fs)
                    .create_backup(&artifact.path)
                    .map_err(|e: BackupError| {
                        format!("Skipped {}: {}", artifact.relative.display(), e)
                    })?;
            }
            self.fs
                .write(&artifact.path, &rewrite.content)
                .map_err(|e| format!("Failed to write {}: {}", artifact.relative.display(), e))?;
            log::debug!(
                "{}: {} replacements",
                artifact.relative.display(),
                rewrite.total()
            );
        }

        Ok(Some((delta, rewrite)))
    }
}

fn prepare<'a>(
    mappings: &'a [ClassMapping],
    bases: &DynamicBaseSet,
) -> HashMap<&'a str, PreparedMapping<'a>> {
    mappings
        .iter()
        .map(|mapping| {
            let prepared = PreparedMapping {
                name: mapping.name.as_str(),
                original: mapping.tokens.join(" "),
                gate: DynamicGate::new(&mapping.token_set(), bases),
            };
            (mapping.key.as_str(), prepared)
        })
        .collect()
}

/// Rewrite one artifact's text against a set of mappings
pub fn rewrite_content(
    content: &str,
    kind: SourceKind,
    mappings: &[ClassMapping],
    bases: &DynamicBaseSet,
    safelist: &Safelist,
    debug_attributes: bool,
) -> ContentRewrite {
    let lookup = prepare(mappings, bases);
    rewrite_with(content, kind, &lookup, safelist, debug_attributes)
}

fn rewrite_with(
    content: &str,
    kind: SourceKind,
    lookup: &HashMap<&str, PreparedMapping<'_>>,
    safelist: &Safelist,
    debug_attributes: bool,
) -> ContentRewrite {
    let mut edits: Vec<(usize, usize, String)> = Vec::new();
    let mut result = ContentRewrite::default();

    for m in find_class_values(content) {
        let ValueVerdict::Classified(value) = safelist.classify_value(m.value) else {
            continue;
        };
        let Some(mapping) = lookup.get(value.key().as_str()) else {
            continue;
        };
        if mapping.gate.blocks(kind) {
            log::debug!("dynamic-base gate kept '{}' ({})", m.value, kind.as_str());
            result.gated += 1;
            continue;
        }

        let replacement = std::iter::once(mapping.name)
            .chain(value.preserved.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        edits.push((m.value_span.start, m.value_span.end, replacement));

        if debug_attributes
            && kind == SourceKind::Markup
            && m.syntax.supports_trailing_attribute()
        {
            edits.push((
                m.end,
                m.end,
                format!(" {}=\"{}\"", DEBUG_ATTRIBUTE, mapping.original),
            ));
        }
        *result
            .replacements
            .entry(mapping.name.to_string())
            .or_insert(0) += 1;
    }

    let mut output = content.to_string();
    edits.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
    for (start, end, text) in edits {
        output.replace_range(start..end, &text);
    }
    result.content = output;
    result
}
