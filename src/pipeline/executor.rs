//! Consolidation pipeline executor
//!
//! Runs the stages in order:
//! 1. validate settings (before any file is read)
//! 2. scan artifacts and index the compiled stylesheets
//! 3. select, name and synthesize
//! 4. inject the synthesized block, rewrite artifacts, write the manifest
//!
//! [`ConsolidationPipeline::analyze`] covers steps 1 to 3 and never writes;
//! [`ConsolidationPipeline::apply`] performs step 4.

use std::path::{Path, PathBuf};

use super::config::PipelineConfig;
use super::error::PipelineError;
use super::manifest::Manifest;
use super::metrics::RunMetrics;
use crate::config::ValidatorRegistry;
use crate::css::{
    discover_stylesheets, InjectionOutcome, RuleSynthesizer, StylesheetIndex, StylesheetInjector,
};
use crate::infra::{FileSystem, RealFileSystem};
use crate::optimizer::{
    select, ClassMapping, DynamicGate, NameAssigner, RewriteOptions, RewriteReport, Rewriter,
};
use crate::scanner::{Occurrence, Safelist, ScanError, ScanReport, Scanner};

/// Everything learned before any artifact is touched
#[derive(Debug)]
pub struct Analysis {
    /// Scanner output
    pub scan: ScanReport,
    /// Consolidations, highest savings first
    pub mappings: Vec<ClassMapping>,
    /// Synthesized stylesheet block (without the marker)
    pub css: String,
    /// Token groups left out because a token is part of a compound selector
    pub structural_skipped: usize,
    /// Selected groups dropped because none of their tokens has a known definition
    pub unstyled_skipped: usize,
    /// Selected groups the dynamic-base gate would block in every artifact kind
    pub gated_skipped: usize,
    /// Validation warnings and stylesheet read failures
    pub warnings: Vec<String>,
}

impl Analysis {
    /// Distinct token groups found by the scan
    pub fn unique_patterns(&self) -> usize {
        self.scan.occurrences.len()
    }
}

/// Outcome of [`ConsolidationPipeline::apply`]
#[derive(Debug)]
pub struct RunOutcome {
    /// Mappings that were applied
    pub mappings: Vec<ClassMapping>,
    /// Rewrite totals and per-file failures
    pub rewrite: RewriteReport,
    /// What happened to the target stylesheet
    pub injection: InjectionOutcome,
    /// Run totals
    pub metrics: RunMetrics,
    /// Manifest location, unless this was a dry run
    pub manifest_path: Option<PathBuf>,
    /// Non-fatal problems from every stage
    pub warnings: Vec<String>,
}

/// Coordinates scan → select → name → synthesize → inject → rewrite
pub struct ConsolidationPipeline<FS: FileSystem = RealFileSystem> {
    config: PipelineConfig,
    fs: FS,
}

impl ConsolidationPipeline {
    /// Create a pipeline over the real filesystem
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use class_slim::config::ConfigFile;
    /// use class_slim::pipeline::{ConsolidationPipeline, PipelineConfig};
    ///
    /// let config = PipelineConfig::new("dist", ConfigFile::default());
    /// let pipeline = ConsolidationPipeline::new(config);
    /// let outcome = pipeline.run()?;
    /// println!("{} files rewritten", outcome.metrics.files_modified);
    /// # Ok::<(), class_slim::pipeline::PipelineError>(())
    /// ```
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_fs(config, RealFileSystem)
    }
}

impl<FS: FileSystem + Sync> ConsolidationPipeline<FS> {
    /// Create a pipeline with a custom filesystem implementation
    pub fn with_fs(config: PipelineConfig, fs: FS) -> Self {
        Self { config, fs }
    }

    /// Configuration this pipeline runs with
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Reject invalid settings; returns warnings for the rest
    pub fn validate(&self) -> Result<Vec<String>, PipelineError> {
        let result = ValidatorRegistry::with_defaults().validate_all(&self.config.settings);
        if result.has_errors() {
            return Err(PipelineError::InvalidConfig(
                result
                    .errors()
                    .iter()
                    .map(|issue| issue.to_string())
                    .collect(),
            ));
        }
        Ok(result
            .warnings()
            .iter()
            .map(|issue| issue.to_string())
            .collect())
    }

    /// Scan, select, name and synthesize without writing anything
    pub fn analyze(&self) -> Result<Analysis, PipelineError> {
        let mut warnings = self.validate()?;
        let settings = &self.config.settings;
        let root = &self.config.target_dir;

        let scan = Scanner::with_fs(&self.fs).scan_directory(root, settings)?;
        let index = self.load_index(root, &mut warnings);

        let (eligible, structural): (Vec<&Occurrence>, Vec<&Occurrence>) = scan
            .occurrences
            .iter()
            .partition(|occ| !occ.original.iter().any(|t| index.is_structural(t)));
        for occ in &structural {
            log::debug!("'{}' takes part in a compound selector, skipping", occ.key);
        }
        let eligible: Vec<Occurrence> = eligible.into_iter().cloned().collect();

        let mut candidates = select(&eligible, &scan.dynamic_bases, settings);
        let selected = candidates.len();
        candidates.retain(|candidate| {
            let gate = DynamicGate::new(&candidate.token_set(), &scan.dynamic_bases);
            let blocked = gate.blocks_all(&candidate.kinds);
            if blocked {
                log::debug!(
                    "'{}' is held back by a dynamic base wherever it appears",
                    candidate.key
                );
            }
            !blocked
        });
        let gated_skipped = selected - candidates.len();

        let mut names = NameAssigner::new(settings.naming.prefix.clone(), settings.naming.length);
        names.reserve(scan.seen_tokens.iter().cloned());
        names.reserve(index.class_names().map(str::to_string));
        names.assign_all(&mut candidates);

        let mut mappings: Vec<ClassMapping> = candidates
            .iter()
            .filter_map(|c| Some(ClassMapping::from_candidate(c, c.name.clone()?)))
            .collect();

        let css = RuleSynthesizer::new(&index)
            .synthesize(&mut mappings, settings.output.layer.as_deref());
        let before = mappings.len();
        mappings.retain(|m| {
            let keep = m.has_styles();
            if !keep {
                log::debug!("'{}' has no known styles, not consolidating", m.key);
            }
            keep
        });

        log::info!(
            "{} consolidations from {} token groups",
            mappings.len(),
            scan.occurrences.len()
        );

        Ok(Analysis {
            unstyled_skipped: before - mappings.len(),
            gated_skipped,
            structural_skipped: structural.len(),
            scan,
            mappings,
            css,
            warnings,
        })
    }

    /// Inject, rewrite and record an analysis
    ///
    /// In a dry run nothing is written and a missing stylesheet is reported
    /// as a warning. Otherwise the target stylesheet is resolved before any
    /// artifact changes, so a missing or already-consolidated stylesheet
    /// leaves the build untouched.
    pub fn apply(&self, analysis: Analysis) -> Result<RunOutcome, PipelineError> {
        let settings = &self.config.settings;
        let root = &self.config.target_dir;
        let dry_run = self.config.dry_run;
        let mut warnings = analysis.warnings;
        warnings.extend(analysis.scan.errors.iter().cloned());

        let injector = StylesheetInjector::with_fs(&self.fs, settings.output.backup);
        let mut injection = InjectionOutcome::NothingToInject;
        let mut rewrite = RewriteReport::default();

        if !analysis.mappings.is_empty() {
            let target = match injector.prepare(root, settings.output.stylesheet.as_deref()) {
                Ok(path) => Some(path),
                Err(e) if dry_run => {
                    warnings.push(e.to_string());
                    None
                }
                Err(e) => return Err(e.into()),
            };

            if let Some(target) = &target {
                injection = injector.inject(target, &analysis.css, dry_run)?;
            }

            let safelist = Safelist::from_config(settings).map_err(ScanError::from)?;
            let options = RewriteOptions {
                dry_run,
                debug_attributes: settings.output.debug_attributes,
                backup: settings.output.backup,
            };
            rewrite = Rewriter::with_fs(safelist, options, &self.fs).rewrite(
                &analysis.scan.artifacts,
                &analysis.mappings,
                &analysis.scan.dynamic_bases,
            );
            warnings.extend(rewrite.errors.iter().cloned());
        }

        let metrics = RunMetrics::collect(
            analysis.scan.files_scanned(),
            analysis.scan.occurrences.len(),
            &analysis.mappings,
            &rewrite,
            injection.bytes(),
        );

        let manifest_path = if dry_run {
            None
        } else {
            let path = root.join(&settings.output.manifest);
            Manifest::new(root, settings, analysis.mappings.clone(), metrics.clone())
                .write(&self.fs, &path)?;
            Some(path)
        };

        Ok(RunOutcome {
            mappings: analysis.mappings,
            rewrite,
            injection,
            metrics,
            manifest_path,
            warnings,
        })
    }

    /// Analyze then apply
    pub fn run(&self) -> Result<RunOutcome, PipelineError> {
        let analysis = self.analyze()?;
        self.apply(analysis)
    }

    fn load_index(&self, root: &Path, warnings: &mut Vec<String>) -> StylesheetIndex {
        let mut index = StylesheetIndex::new();
        for path in discover_stylesheets(root) {
            match self.fs.read_to_string(&path) {
                Ok(css) => index.add_stylesheet(&css),
                Err(e) => warnings.push(format!("Failed to read {}: {}", path.display(), e)),
            }
        }
        log::debug!("indexed {} classes", index.len());
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use std::fs;
    use tempfile::TempDir;

    const CARD: &str = r#"<div class="flex items-center gap-2">a</div>"#;

    fn build(html: &str, css: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.html"), html).unwrap();
        fs::create_dir_all(temp.path().join("css")).unwrap();
        fs::write(temp.path().join("css/site.css"), css).unwrap();
        temp
    }

    fn pipeline(root: &Path, settings: ConfigFile) -> ConsolidationPipeline {
        ConsolidationPipeline::new(PipelineConfig::new(root, settings))
    }

    mod validation {
        use super::*;

        #[test]
        fn test_invalid_settings_stop_before_reading() {
            let mut settings = ConfigFile::default();
            settings.naming.prefix = String::new();
            let err = pipeline(Path::new("/does/not/exist"), settings)
                .analyze()
                .unwrap_err();
            assert!(matches!(err, PipelineError::InvalidConfig(_)));
        }

        #[test]
        fn test_missing_target_is_a_scan_error() {
            let err = pipeline(Path::new("/does/not/exist"), ConfigFile::default())
                .analyze()
                .unwrap_err();
            assert!(matches!(err, PipelineError::Scan(_)));
        }
    }

    mod analyze {
        use super::*;

        #[test]
        fn test_repeated_group_becomes_one_mapping() {
            let temp = build(&CARD.repeat(3), ".flex{display:flex}");
            let analysis = pipeline(temp.path(), ConfigFile::default())
                .analyze()
                .unwrap();

            assert_eq!(analysis.mappings.len(), 1);
            assert_eq!(analysis.mappings[0].count, 3);
            assert!(analysis.css.contains("display:flex"));
            assert_eq!(
                fs::read_to_string(temp.path().join("index.html")).unwrap(),
                CARD.repeat(3)
            );
        }

        #[test]
        fn test_compound_selector_tokens_are_skipped() {
            let html = r#"<li class="btn active px-4">a</li>"#.repeat(4);
            let temp = build(&html, ".btn.active{color:red}.px-4{padding-left:1rem}");
            let analysis = pipeline(temp.path(), ConfigFile::default())
                .analyze()
                .unwrap();

            assert!(analysis.mappings.is_empty());
            assert_eq!(analysis.structural_skipped, 1);
        }

        #[test]
        fn test_group_gated_everywhere_is_not_consolidated() {
            let temp = build(&CARD.repeat(3), ".flex{display:flex}");
            fs::write(
                temp.path().join("app.js"),
                r#"const c=`flex items-center ${active?"ring":""}`;"#,
            )
            .unwrap();
            let mut settings = ConfigFile::default();
            settings.include = vec!["**/*.html".to_string(), "**/*.js".to_string()];
            let analysis = pipeline(temp.path(), settings).analyze().unwrap();

            assert!(analysis.mappings.is_empty());
            assert_eq!(analysis.gated_skipped, 1);
            assert!(analysis.css.is_empty());
        }

        #[test]
        fn test_names_avoid_existing_classes() {
            let temp = build(&CARD.repeat(3), "");
            let mut settings = ConfigFile::default();
            settings.naming.prefix = "x".to_string();
            settings.naming.length = 1;
            let analysis = pipeline(temp.path(), settings).analyze().unwrap();

            let name = &analysis.mappings[0].name;
            assert!(!analysis.scan.seen_tokens.contains(name));
        }
    }

    mod apply {
        use super::*;

        #[test]
        fn test_run_rewrites_injects_and_records() {
            let temp = build(&CARD.repeat(3), ".p-4{padding:1rem}");
            let outcome = pipeline(temp.path(), ConfigFile::default()).run().unwrap();

            let name = &outcome.mappings[0].name;
            let html = fs::read_to_string(temp.path().join("index.html")).unwrap();
            assert_eq!(html.matches(&format!("class=\"{}\"", name)).count(), 3);

            let css = fs::read_to_string(temp.path().join("css/site.css")).unwrap();
            assert!(css.contains(crate::css::CONSOLIDATED_MARKER));
            assert!(matches!(outcome.injection, InjectionOutcome::Injected { .. }));

            let manifest = outcome.manifest_path.unwrap();
            assert!(manifest.ends_with("class-slim-manifest.json"));
            assert!(manifest.exists());
            assert_eq!(outcome.metrics.files_modified, 1);
        }

        #[test]
        fn test_dry_run_writes_nothing() {
            let temp = build(&CARD.repeat(3), ".p-4{padding:1rem}");
            let mut config = PipelineConfig::new(temp.path(), ConfigFile::default());
            config.dry_run = true;

            let outcome = ConsolidationPipeline::new(config).run().unwrap();
            assert_eq!(outcome.metrics.files_modified, 1);
            assert!(outcome.manifest_path.is_none());
            assert!(matches!(outcome.injection, InjectionOutcome::DryRun { .. }));
            assert_eq!(
                fs::read_to_string(temp.path().join("index.html")).unwrap(),
                CARD.repeat(3)
            );
            assert!(!temp.path().join("class-slim-manifest.json").exists());
        }

        #[test]
        fn test_missing_stylesheet_is_fatal_before_rewriting() {
            let temp = TempDir::new().unwrap();
            fs::write(temp.path().join("index.html"), CARD.repeat(3)).unwrap();

            let err = pipeline(temp.path(), ConfigFile::default())
                .run()
                .unwrap_err();
            assert!(matches!(err, PipelineError::Stylesheet(_)));
            assert_eq!(
                fs::read_to_string(temp.path().join("index.html")).unwrap(),
                CARD.repeat(3)
            );
        }

        #[test]
        fn test_missing_stylesheet_in_dry_run_is_a_warning() {
            let temp = TempDir::new().unwrap();
            fs::write(temp.path().join("index.html"), CARD.repeat(3)).unwrap();
            let mut config = PipelineConfig::new(temp.path(), ConfigFile::default());
            config.dry_run = true;

            let outcome = ConsolidationPipeline::new(config).run().unwrap();
            assert_eq!(outcome.injection, InjectionOutcome::NothingToInject);
            assert!(outcome.warnings.iter().any(|w| w.contains("No stylesheet")));
        }
    }
}
