//! Occurrence scanning over a build directory.
//!
//! Artifacts are read and matched in parallel; each file yields an
//! independent extraction that is merged into one [`OccurrenceMap`] in path
//! order, so results do not depend on thread scheduling.

pub mod locator;
pub mod occurrence;
pub mod patterns;
pub mod tokens;

pub use locator::{Artifact, ArtifactLocator, BuildTool, LocatorError, SourceKind};
pub use occurrence::{DynamicBase, DynamicBaseSet, Location, Occurrence, OccurrenceMap};
pub use patterns::{find_class_values, find_dynamic_bases, ClassMatch, ClassMatcher, Syntax};
pub use tokens::{normalize_key, ClassifiedValue, Safelist, TokenClass, ValueVerdict};

use crate::config::ConfigFile;
use crate::infra::{FileSystem, RealFileSystem};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// Errors that stop a scan before any artifact is read
#[derive(Error, Debug)]
pub enum ScanError {
    /// Locator could not be prepared
    #[error(transparent)]
    Locator(#[from] LocatorError),

    /// A safelist pattern failed to compile
    #[error("Invalid safelist pattern: {0}")]
    InvalidSafelist(#[from] regex::Error),
}

/// Everything one scan pass learned about a build
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Unique token groups, ordered by normalized key
    pub occurrences: Vec<Occurrence>,
    /// Static prefixes of runtime-suffixed class expressions
    pub dynamic_bases: DynamicBaseSet,
    /// Artifacts that were scanned, in path order
    pub artifacts: Vec<Artifact>,
    /// Non-fatal per-artifact failures
    pub errors: Vec<String>,
    /// Every token that appeared in any class value
    pub seen_tokens: BTreeSet<String>,
    /// Class values matched
    pub values_seen: usize,
    /// Values skipped because they contain a runtime expression
    pub values_dynamic: usize,
    /// Values skipped because of an icon-family or malformed token
    pub values_rejected: usize,
}

impl ScanReport {
    /// Number of artifacts scanned
    pub fn files_scanned(&self) -> usize {
        self.artifacts.len()
    }
}

/// Per-file extraction result, merged after the parallel phase
#[derive(Default)]
struct FileExtraction {
    values: Vec<(ClassifiedValue, usize)>,
    bases: Vec<BTreeSet<String>>,
    tokens: BTreeSet<String>,
    seen: usize,
    dynamic: usize,
    rejected: usize,
}

/// Byte offset to 1-based line lookup
struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    fn new(content: &str) -> Self {
        Self {
            newlines: content
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i)
                .collect(),
        }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&nl| nl < offset) + 1
    }
}

/// Reads artifacts and aggregates their class values
pub struct Scanner<FS: FileSystem = RealFileSystem> {
    fs: FS,
}

impl Scanner<RealFileSystem> {
    /// Create a scanner over the real filesystem
    pub fn new() -> Self {
        Self::with_fs(RealFileSystem)
    }
}

impl Default for Scanner<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<FS: FileSystem + Sync> Scanner<FS> {
    /// Create a scanner with a custom filesystem implementation
    pub fn with_fs(fs: FS) -> Self {
        Self { fs }
    }

    /// Locate and scan every artifact under `root`
    pub fn scan_directory(
        &self,
        root: &Path,
        config: &ConfigFile,
    ) -> Result<ScanReport, ScanError> {
        let safelist = Safelist::from_config(config)?;
        let locator = ArtifactLocator::new(root, &config.include, &config.safelist.files)?;
        let (artifacts, warnings) = locator.locate();
        log::info!(
            "scanning {} artifacts under {}",
            artifacts.len(),
            root.display()
        );

        let mut report = self.scan_artifacts(artifacts, &safelist);
        let mut errors = warnings;
        errors.append(&mut report.errors);
        report.errors = errors;
        Ok(report)
    }

    /// Scan an explicit artifact list
    pub fn scan_artifacts(&self, artifacts: Vec<Artifact>, safelist: &Safelist) -> ScanReport {
        let extractions: Vec<Result<FileExtraction, String>> = artifacts
            .par_iter()
            .map(|artifact| self.extract(artifact, safelist))
            .collect();

        let mut occurrences = OccurrenceMap::new();
        let mut report = ScanReport::default();

        for (artifact, extraction) in artifacts.iter().zip(extractions) {
            let extraction = match extraction {
                Ok(extraction) => extraction,
                Err(message) => {
                    log::warn!("{}", message);
                    report.errors.push(message);
                    continue;
                }
            };

            report.values_seen += extraction.seen;
            report.values_dynamic += extraction.dynamic;
            report.values_rejected += extraction.rejected;
            report.seen_tokens.extend(extraction.tokens);
            for base in extraction.bases {
                report.dynamic_bases.insert(base);
            }
            for (value, line) in extraction.values {
                let location = Location {
                    file: artifact.relative.clone(),
                    line,
                };
                occurrences.record(value, location, artifact.kind);
            }
        }

        log::info!(
            "{} class values, {} unique groups, {} dynamic bases",
            report.values_seen,
            occurrences.len(),
            report.dynamic_bases.len()
        );

        report.occurrences = occurrences.into_vec();
        report.artifacts = artifacts;
        report
    }

    fn extract(&self, artifact: &Artifact, safelist: &Safelist) -> Result<FileExtraction, String> {
        let content = self
            .fs
            .read_to_string(&artifact.path)
            .map_err(|e| format!("Failed to read {}: {}", artifact.relative.display(), e))?;

        Ok(extract_from_content(&content, safelist))
    }
}

fn extract_from_content(content: &str, safelist: &Safelist) -> FileExtraction {
    let lines = LineIndex::new(content);
    let mut extraction = FileExtraction::default();

    for m in find_class_values(content) {
        extraction.seen += 1;
        extraction
            .tokens
            .extend(tokens::split_tokens(m.value).map(str::to_string));

        match safelist.classify_value(m.value) {
            ValueVerdict::Dynamic => extraction.dynamic += 1,
            ValueVerdict::Rejected => extraction.rejected += 1,
            ValueVerdict::Empty => {}
            ValueVerdict::Classified(value) => {
                extraction
                    .values
                    .push((value, lines.line_of(m.value_span.start)));
            }
        }
    }

    extraction.bases = find_dynamic_bases(content);
    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("a\nb\n\nc");
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(2), 2);
        assert_eq!(index.line_of(5), 4);
    }

    mod scan_directory {
        use super::*;

        #[test]
        fn test_reordered_values_aggregate() {
            let temp = TempDir::new().unwrap();
            write(
                temp.path(),
                "index.html",
                "<div class=\"b-1 a-1\"></div>\n<div class=\"a-1 b-1\"></div>",
            );

            let report = Scanner::new()
                .scan_directory(temp.path(), &ConfigFile::default())
                .unwrap();

            assert_eq!(report.occurrences.len(), 1);
            let occ = &report.occurrences[0];
            assert_eq!(occ.key, "a-1 b-1");
            assert_eq!(occ.count, 2);
            assert_eq!(occ.locations[1].line, 2);
        }

        #[test]
        fn test_dynamic_values_are_not_counted() {
            let temp = TempDir::new().unwrap();
            write(
                temp.path(),
                "app.js",
                "a={className:`flex gap-2 ${x}`};b={className:\"flex gap-2\"}",
            );

            let report = Scanner::new()
                .scan_directory(temp.path(), &ConfigFile::default())
                .unwrap();

            assert_eq!(report.values_dynamic, 1);
            assert_eq!(report.occurrences.len(), 1);
            assert_eq!(report.occurrences[0].count, 1);
            assert_eq!(report.dynamic_bases.len(), 1);
        }

        #[test]
        fn test_kinds_are_tracked_per_occurrence() {
            let temp = TempDir::new().unwrap();
            write(temp.path(), "index.html", r#"<p class="p-4 m-2"></p>"#);
            write(temp.path(), "app.js", r#"x={className:"m-2 p-4"}"#);

            let report = Scanner::new()
                .scan_directory(temp.path(), &ConfigFile::default())
                .unwrap();

            assert_eq!(report.files_scanned(), 2);
            assert!(report.occurrences[0].seen_on_both_sides());
        }

        #[test]
        fn test_seen_tokens_include_rejected_values() {
            let temp = TempDir::new().unwrap();
            write(temp.path(), "index.html", r#"<i class="fa-user p-2"></i>"#);

            let report = Scanner::new()
                .scan_directory(temp.path(), &ConfigFile::default())
                .unwrap();

            assert_eq!(report.values_rejected, 1);
            assert!(report.occurrences.is_empty());
            assert!(report.seen_tokens.contains("fa-user"));
        }

        #[test]
        fn test_excluded_files_are_not_scanned() {
            let temp = TempDir::new().unwrap();
            write(temp.path(), "index.html", r#"<p class="p-4 m-2"></p>"#);
            write(temp.path(), "legacy/index.html", r#"<p class="p-4 m-2"></p>"#);

            let mut config = ConfigFile::default();
            config.safelist.files = vec!["legacy/**".to_string()];
            let report = Scanner::new().scan_directory(temp.path(), &config).unwrap();

            assert_eq!(report.files_scanned(), 1);
            assert_eq!(report.occurrences[0].count, 1);
        }

        #[test]
        fn test_invalid_safelist_pattern_is_error() {
            let temp = TempDir::new().unwrap();
            let mut config = ConfigFile::default();
            config.safelist.patterns = vec!["(".to_string()];

            let result = Scanner::new().scan_directory(temp.path(), &config);
            assert!(matches!(result, Err(ScanError::InvalidSafelist(_))));
        }
    }

    mod read_failures {
        use super::*;
        use std::fs::Metadata;
        use std::io;

        struct FailingFs;

        impl FileSystem for FailingFs {
            fn copy(&self, _: &Path, _: &Path) -> io::Result<u64> {
                Err(io::Error::other("copy"))
            }
            fn metadata(&self, path: &Path) -> io::Result<Metadata> {
                std::fs::metadata(path)
            }
            fn read_to_string(&self, path: &Path) -> io::Result<String> {
                if path.ends_with("broken.html") {
                    Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
                } else {
                    std::fs::read_to_string(path)
                }
            }
            fn write(&self, _: &Path, _: impl AsRef<[u8]>) -> io::Result<()> {
                Err(io::Error::other("write"))
            }
        }

        #[test]
        fn test_read_failure_is_recorded_and_scan_continues() {
            let temp = TempDir::new().unwrap();
            write(temp.path(), "broken.html", "");
            write(temp.path(), "index.html", r#"<p class="p-4 m-2"></p>"#);

            let report = Scanner::with_fs(FailingFs)
                .scan_directory(temp.path(), &ConfigFile::default())
                .unwrap();

            assert_eq!(report.errors.len(), 1);
            assert!(report.errors[0].contains("broken.html"));
            assert_eq!(report.occurrences.len(), 1);
        }
    }
}
