//! Core domain types and models

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Version stamp written into JSON sweep reports.
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A file selected by the scanner as a sweep candidate.
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Path relative to the sweep root, with forward slashes.
    pub relative_path: String,
    pub size_bytes: u64,
}

/// Counters collected while walking the source tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub files_included: usize,
    pub files_skipped_extension: usize,
    pub files_skipped_glob: usize,
    pub files_skipped_size: usize,
}

/// What happened to a single candidate file during a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// File was transformed and written back with a marker line.
    Rewritten,
    /// Dry run: the file would have been sent for transformation.
    WouldRewrite,
    /// File already carries the marker for this prompt (and date, when dated).
    SkippedMarker,
    /// File is binary or not valid UTF-8.
    SkippedNonText,
    /// Completion or extraction failed; the file was left untouched.
    Failed,
}

/// Per-file sweep result, in report order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutcome {
    pub path: String,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Aggregate counters for one sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepStats {
    pub files_considered: usize,
    pub files_rewritten: usize,
    pub files_would_rewrite: usize,
    pub files_skipped_marker: usize,
    pub files_skipped_non_text: usize,
    pub files_failed: usize,
    pub processing_time_seconds: f64,
}

/// Tool configuration, merged from defaults, config file, environment
/// variables (`REVIEW_SWEEP_*`), and CLI flags, in that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory to sweep. Defaults to the current directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Directory holding review prompt files (.md or .txt).
    /// Relative paths are resolved against the sweep root.
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,

    /// File extensions eligible for rewriting (with leading dot).
    /// An empty set admits every extension.
    #[serde(
        default = "default_include_extensions",
        deserialize_with = "deserialize_extensions"
    )]
    pub include_extensions: HashSet<String>,

    /// Glob patterns matched against root-relative paths; matches are skipped.
    #[serde(default = "default_exclude_globs", deserialize_with = "deserialize_globs")]
    pub exclude_globs: HashSet<String>,

    /// Files larger than this many bytes are skipped.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    #[serde(default)]
    pub follow_symlinks: bool,

    /// Base URL of the OpenAI-compatible completion endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key for the completion endpoint. Usually supplied via the
    /// REVIEW_SWEEP_API_KEY environment variable rather than on disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier sent with every completion request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature. Omitted from requests when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Cap on completion tokens per request. Omitted when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_response_tokens: Option<usize>,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of files transformed concurrently.
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Whether markers carry today's date. Dated markers let a prompt be
    /// re-applied on a later day; undated markers suppress re-application
    /// for good.
    #[serde(default = "default_true")]
    pub date_markers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            path: None,
            prompts_dir: default_prompts_dir(),
            include_extensions: default_include_extensions(),
            exclude_globs: default_exclude_globs(),
            max_file_bytes: default_max_file_bytes(),
            respect_gitignore: true,
            follow_symlinks: false,
            base_url: default_base_url(),
            api_key: None,
            model: default_model(),
            temperature: None,
            max_response_tokens: None,
            timeout_secs: default_timeout_secs(),
            jobs: default_jobs(),
            date_markers: true,
        }
    }
}

fn default_prompts_dir() -> PathBuf {
    PathBuf::from("prompts")
}

fn default_include_extensions() -> HashSet<String> {
    [
        ".rs", ".py", ".js", ".jsx", ".ts", ".tsx", ".go", ".java", ".kt", ".c", ".h",
        ".cpp", ".hpp", ".cs", ".rb", ".php", ".swift", ".scala", ".sh",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_exclude_globs() -> HashSet<String> {
    [
        "target/**",
        "node_modules/**",
        "dist/**",
        "build/**",
        "out/**",
        ".git/**",
        ".venv/**",
        "venv/**",
        "vendor/**",
        "__pycache__/**",
        ".idea/**",
        ".vscode/**",
        "prompts/**",
        "*.min.js",
        "*.min.css",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_file_bytes() -> u64 {
    262_144
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_jobs() -> usize {
    4
}

fn default_true() -> bool {
    true
}

/// Accepts either a comma-separated string ("rs,py") or a sequence of
/// strings, normalizing each entry to carry a leading dot. Needed because
/// environment variables arrive as plain strings.
fn deserialize_extensions<'de, D>(deserializer: D) -> Result<HashSet<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct ExtensionsVisitor;

    impl<'de> serde::de::Visitor<'de> for ExtensionsVisitor {
        type Value = HashSet<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a comma-separated string or a sequence of extensions")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(normalize_extension)
                .collect())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::SeqAccess<'de>,
        {
            let mut extensions = HashSet::new();
            while let Some(value) = seq.next_element::<String>()? {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    extensions.insert(normalize_extension(trimmed));
                }
            }
            Ok(extensions)
        }
    }

    deserializer.deserialize_any(ExtensionsVisitor)
}

/// Accepts either a comma-separated string or a sequence of glob patterns.
fn deserialize_globs<'de, D>(deserializer: D) -> Result<HashSet<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct GlobsVisitor;

    impl<'de> serde::de::Visitor<'de> for GlobsVisitor {
        type Value = HashSet<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a comma-separated string or a sequence of glob patterns")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::SeqAccess<'de>,
        {
            let mut globs = HashSet::new();
            while let Some(value) = seq.next_element::<String>()? {
                let trimmed = value.trim().to_string();
                if !trimmed.is_empty() {
                    globs.insert(trimmed);
                }
            }
            Ok(globs)
        }
    }

    deserializer.deserialize_any(GlobsVisitor)
}

/// Ensures an extension carries its leading dot ("rs" and ".rs" both
/// normalize to ".rs").
pub fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}
