//! Artifact location: which files in a build directory carry class attributes.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Directories never descended into
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

/// Errors raised while preparing the locator
#[derive(Error, Debug)]
pub enum LocatorError {
    /// An include or exclude glob failed to compile
    #[error("Invalid glob '{glob}': {source}")]
    Glob {
        /// Offending glob
        glob: String,
        #[source]
        /// Glob compile error
        source: globset::Error,
    },

    /// The target directory does not exist
    #[error("Target directory not found: {0}")]
    MissingRoot(PathBuf),
}

/// What kind of artifact a file is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Static or server-rendered HTML
    Markup,
    /// Client-side JavaScript bundle
    Script,
    /// Serialized server component payload
    ServerFragment,
}

impl SourceKind {
    /// Classify a path by its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("html") | Some("htm") => Some(SourceKind::Markup),
            Some("js") | Some("mjs") | Some("cjs") | Some("jsx") | Some("tsx") => {
                Some(SourceKind::Script)
            }
            Some("rsc") | Some("txt") => Some(SourceKind::ServerFragment),
            _ => None,
        }
    }

    /// Whether the artifact is produced on the server (initial render)
    pub fn is_server_side(&self) -> bool {
        matches!(self, SourceKind::Markup | SourceKind::ServerFragment)
    }

    /// Short display label
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Markup => "markup",
            SourceKind::Script => "script",
            SourceKind::ServerFragment => "server-fragment",
        }
    }
}

/// A candidate file inside the build directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Absolute (or root-joined) path
    pub path: PathBuf,
    /// Path relative to the target directory, used in reports
    pub relative: PathBuf,
    /// Source kind
    pub kind: SourceKind,
}

/// Build tools whose output layout is recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTool {
    /// Target is a `.next` directory
    NextJs,
    /// Target is a project root containing `.next`
    NextJsProject,
    /// Nuxt static output (`_nuxt`)
    Nuxt,
    /// SvelteKit output (`_app/immutable`)
    SvelteKit,
    /// Astro output (`_astro`)
    Astro,
    /// Vite-style output (`assets`)
    Vite,
    /// Anything else
    Generic,
}

impl BuildTool {
    /// Guess the build tool from the directory layout
    pub fn detect(root: &Path) -> Self {
        if root.join("server").join("app").is_dir() || root.join("static").join("chunks").is_dir()
        {
            BuildTool::NextJs
        } else if root.join(".next").is_dir() {
            BuildTool::NextJsProject
        } else if root.join("_nuxt").is_dir() {
            BuildTool::Nuxt
        } else if root.join("_app").join("immutable").is_dir() {
            BuildTool::SvelteKit
        } else if root.join("_astro").is_dir() {
            BuildTool::Astro
        } else if root.join("assets").is_dir() {
            BuildTool::Vite
        } else {
            BuildTool::Generic
        }
    }

    /// Default inclusion globs for this layout
    pub fn default_includes(&self) -> Vec<String> {
        let globs: &[&str] = match self {
            BuildTool::NextJs => &[
                "server/**/*.html",
                "server/**/*.rsc",
                "server/**/*.js",
                "static/chunks/**/*.js",
            ],
            BuildTool::NextJsProject => &[
                ".next/server/**/*.html",
                ".next/server/**/*.rsc",
                ".next/server/**/*.js",
                ".next/static/chunks/**/*.js",
                "out/**/*.html",
            ],
            BuildTool::Nuxt => &["**/*.html", "_nuxt/**/*.js"],
            BuildTool::SvelteKit => &["**/*.html", "_app/**/*.js"],
            BuildTool::Astro => &["**/*.html", "_astro/**/*.js"],
            BuildTool::Vite => &["**/*.html", "assets/**/*.js", "assets/**/*.mjs"],
            BuildTool::Generic => &["**/*.html", "**/*.htm", "**/*.js", "**/*.mjs", "**/*.rsc"],
        };
        globs.iter().map(|g| g.to_string()).collect()
    }
}

/// Walks a build directory and returns every artifact worth scanning
pub struct ArtifactLocator {
    root: PathBuf,
    include: GlobSet,
    exclude: GlobSet,
}

impl ArtifactLocator {
    /// Create a locator; empty `includes` falls back to build-tool defaults
    pub fn new(
        root: impl Into<PathBuf>,
        includes: &[String],
        excludes: &[String],
    ) -> Result<Self, LocatorError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(LocatorError::MissingRoot(root));
        }

        let includes = if includes.is_empty() {
            let tool = BuildTool::detect(&root);
            log::debug!("detected build layout {:?} in {}", tool, root.display());
            tool.default_includes()
        } else {
            includes.to_vec()
        };

        Ok(Self {
            include: build_globset(&includes)?,
            exclude: build_globset(excludes)?,
            root,
        })
    }

    /// Root directory being walked
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a root-relative path is excluded by the safelist file globs
    pub fn is_excluded(&self, relative: &Path) -> bool {
        self.exclude.is_match(relative)
    }

    /// Collect artifacts in path order, plus warnings for unreadable entries
    pub fn locate(&self) -> (Vec<Artifact>, Vec<String>) {
        let mut artifacts = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir()
                    && entry
                        .file_name()
                        .to_str()
                        .map(|name| SKIPPED_DIRS.contains(&name))
                        .unwrap_or(false))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warnings.push(format!("Failed to walk build directory: {}", e));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(kind) = SourceKind::from_path(path) else {
                continue;
            };
            let relative = path.strip_prefix(&self.root).unwrap_or(path).to_path_buf();

            if !self.include.is_match(&relative) || self.is_excluded(&relative) {
                continue;
            }

            artifacts.push(Artifact {
                path: path.to_path_buf(),
                relative,
                kind,
            });
        }

        (artifacts, warnings)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, LocatorError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| LocatorError::Glob {
                glob: pattern.clone(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| LocatorError::Glob {
        glob: patterns.join(", "),
        source,
    })
}
