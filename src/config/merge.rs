//! CLI argument merging with config

use crate::domain::Config;
use std::collections::HashSet;
use std::path::PathBuf;

/// Flags the user set on the command line. `None` means "not given";
/// merging only touches fields the user actually passed.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub path: Option<PathBuf>,
    pub prompts_dir: Option<PathBuf>,
    pub include_extensions: Option<HashSet<String>>,
    pub exclude_globs: Option<HashSet<String>>,
    pub max_file_bytes: Option<u64>,
    pub respect_gitignore: Option<bool>,
    pub follow_symlinks: Option<bool>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_response_tokens: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub jobs: Option<usize>,
    pub date_markers: Option<bool>,
}

pub fn merge_cli_with_config(mut base_config: Config, cli: CliOverrides) -> Config {
    if let Some(path) = cli.path {
        base_config.path = Some(path);
    }
    if let Some(prompts_dir) = cli.prompts_dir {
        base_config.prompts_dir = prompts_dir;
    }

    if let Some(include_extensions) = cli.include_extensions {
        base_config.include_extensions = include_extensions;
    }
    if let Some(exclude_globs) = cli.exclude_globs {
        base_config.exclude_globs = exclude_globs;
    }

    if let Some(max_file_bytes) = cli.max_file_bytes {
        base_config.max_file_bytes = max_file_bytes;
    }
    if let Some(respect_gitignore) = cli.respect_gitignore {
        base_config.respect_gitignore = respect_gitignore;
    }
    if let Some(follow_symlinks) = cli.follow_symlinks {
        base_config.follow_symlinks = follow_symlinks;
    }

    if let Some(base_url) = cli.base_url {
        base_config.base_url = base_url;
    }
    if let Some(model) = cli.model {
        base_config.model = model;
    }
    if let Some(temperature) = cli.temperature {
        base_config.temperature = Some(temperature);
    }
    if let Some(max_response_tokens) = cli.max_response_tokens {
        base_config.max_response_tokens = Some(max_response_tokens);
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        base_config.timeout_secs = timeout_secs;
    }

    if let Some(jobs) = cli.jobs {
        base_config.jobs = jobs;
    }
    if let Some(date_markers) = cli.date_markers {
        base_config.date_markers = date_markers;
    }

    base_config
}
