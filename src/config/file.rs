//! Configuration file data structures

use serde::{Deserialize, Serialize};

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".class-slim.toml";

/// Default synthetic-name prefix
pub const DEFAULT_PREFIX: &str = "cs-";

/// Default manifest file name, relative to the target directory
pub const DEFAULT_MANIFEST: &str = "class-slim-manifest.json";

/// class-slim configuration file structure
///
/// Every field has a default, so an empty file (or no file at all) yields a
/// usable configuration. The same structure is embedded in the manifest as the
/// resolved configuration snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    /// Preset the file was created from
    #[serde(default = "default_template")]
    pub template: String,

    /// Inclusion globs relative to the target directory (empty = build-tool defaults)
    #[serde(default)]
    pub include: Vec<String>,

    /// Candidate selection thresholds
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Synthetic name settings
    #[serde(default)]
    pub naming: NamingSettings,

    /// Tokens and files that must never be consolidated
    #[serde(default)]
    pub safelist: SafelistSettings,

    /// Rendering-consistency guards
    #[serde(default)]
    pub safety: SafetySettings,

    /// Output settings
    #[serde(default)]
    pub output: OutputSettings,
}

fn default_template() -> String {
    "balanced".to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            template: default_template(),
            include: Vec::new(),
            thresholds: Thresholds::default(),
            naming: NamingSettings::default(),
            safelist: SafelistSettings::default(),
            safety: SafetySettings::default(),
            output: OutputSettings::default(),
        }
    }
}

/// Candidate selection thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Thresholds {
    /// Minimum number of times a token group must repeat
    #[serde(default = "default_min_occurrences")]
    pub min_occurrences: usize,

    /// Minimum number of consolidatable tokens in a group
    #[serde(default = "default_min_tokens")]
    pub min_tokens: usize,

    /// Minimum estimated byte savings across all repeats
    #[serde(default = "default_min_savings")]
    pub min_savings: usize,

    /// Keep candidates whose savings do not cover the synthesized rule
    #[serde(default)]
    pub force: bool,
}

fn default_min_occurrences() -> usize {
    2
}

fn default_min_tokens() -> usize {
    2
}

fn default_min_savings() -> usize {
    20
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_occurrences: default_min_occurrences(),
            min_tokens: default_min_tokens(),
            min_savings: default_min_savings(),
            force: false,
        }
    }
}

/// Synthetic name settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NamingSettings {
    /// Fixed prefix for every synthetic name
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Length of the base-36 suffix
    #[serde(default = "default_name_length")]
    pub length: usize,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_name_length() -> usize {
    2
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            length: default_name_length(),
        }
    }
}

impl NamingSettings {
    /// Length of a synthetic name before any collision-driven growth
    pub fn name_len(&self) -> usize {
        self.prefix.len() + self.length
    }
}

/// Tokens and files that must never be consolidated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SafelistSettings {
    /// Token prefixes, e.g. `js-`
    #[serde(default)]
    pub prefixes: Vec<String>,

    /// Token suffixes
    #[serde(default)]
    pub suffixes: Vec<String>,

    /// Exact token names
    #[serde(default)]
    pub names: Vec<String>,

    /// Regular expressions matched against whole tokens
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Path globs excluded from scanning and rewriting
    #[serde(default)]
    pub files: Vec<String>,
}

/// Rendering-consistency guards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SafetySettings {
    /// Require a group to be seen in both server/static and script artifacts
    #[serde(default)]
    pub consistency_safe: bool,

    /// Reject groups that carry safelisted tokens
    #[serde(default)]
    pub reject_safelisted: bool,

    /// Reject groups comparable (subset or superset) to a dynamic base
    #[serde(default)]
    pub exclude_dynamic_overlap: bool,

    /// Exclude values containing icon-font or runtime-generated class families
    #[serde(default = "default_true")]
    pub icon_exclusion: bool,

    /// Prefixes identifying icon-font or runtime-generated families
    #[serde(default = "default_icon_prefixes")]
    pub icon_prefixes: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_icon_prefixes() -> Vec<String> {
    [
        "fa-",
        "fas",
        "far",
        "fab",
        "bi-",
        "mdi-",
        "material-icons",
        "icon-",
        "i-",
        "ri-",
        "lucide-",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self {
            consistency_safe: false,
            reject_safelisted: false,
            exclude_dynamic_overlap: false,
            icon_exclusion: true,
            icon_prefixes: default_icon_prefixes(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputSettings {
    /// Wrap synthesized rules in `@layer <name> { ... }`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,

    /// Append `data-cs-original` attributes in markup artifacts
    #[serde(default)]
    pub debug_attributes: bool,

    /// Create `.bak` siblings before writing
    #[serde(default = "default_true")]
    pub backup: bool,

    /// Stylesheet receiving the synthesized rules, relative to the target directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<String>,

    /// Manifest file name, relative to the target directory
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

fn default_manifest() -> String {
    DEFAULT_MANIFEST.to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            layer: None,
            debug_attributes: false,
            backup: true,
            stylesheet: None,
            manifest: default_manifest(),
        }
    }
}
