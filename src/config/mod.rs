//! Configuration loading and merging
//!
//! Precedence, lowest to highest: built-in defaults, a discovered or
//! explicitly named config file, `REVIEW_SWEEP_*` environment variables,
//! CLI flags. The API key in particular is expected to arrive through
//! `REVIEW_SWEEP_API_KEY` rather than a flag, so it never shows up in
//! shell history.

mod merge;

pub use merge::{merge_cli_with_config, CliOverrides};

use crate::domain::Config;
use anyhow::{bail, Context, Result};
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use std::path::{Path, PathBuf};

const CONFIG_TOML: &str = "review-sweep.toml";
const CONFIG_YAML: &str = ".review-sweep.yml";

/// Loads configuration. An explicit path must exist; otherwise the file is
/// discovered by walking up from `anchor` looking for `review-sweep.toml`
/// or `.review-sweep.yml`.
pub fn load_config(anchor: &Path, explicit: Option<&Path>) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("config file {} does not exist", path.display());
        }
        figment = merge_file(figment, path)?;
    } else if let Some(found) = discover_config(anchor) {
        tracing::debug!(path = %found.display(), "using discovered config file");
        figment = merge_file(figment, &found)?;
    }

    figment
        .merge(Env::prefixed("REVIEW_SWEEP_"))
        .extract()
        .context("invalid configuration")
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Ok(figment.merge(Toml::file(path))),
        Some("yml") | Some("yaml") => Ok(figment.merge(Yaml::file(path))),
        _ => bail!(
            "unsupported config format: {} (expected .toml, .yml, or .yaml)",
            path.display()
        ),
    }
}

fn discover_config(anchor: &Path) -> Option<PathBuf> {
    for dir in anchor.ancestors() {
        for name in [CONFIG_TOML, CONFIG_YAML] {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}
