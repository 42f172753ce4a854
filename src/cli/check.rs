//! Check command implementation
//!
//! Reads each candidate file and reports whether it already carries the
//! prompt's marker. Purely local: no completion requests, no writes.

use anyhow::Result;
use clap::Args;
use console::style;
use std::fs;
use std::path::PathBuf;

use super::utils::{parse_csv, parse_extensions};
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::marker::{build_marker, has_marker};
use crate::prompt::resolve_prompt;
use crate::scan::FileScanner;
use crate::utils::{is_probably_binary, today_stamp};

#[derive(Args)]
pub struct CheckArgs {
    /// Review prompt: a name in the prompts directory or a path to a file
    #[arg(short = 'p', long, value_name = "NAME|FILE")]
    pub prompt: String,

    /// Root directory to check (defaults to the current directory)
    #[arg(long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Directory containing prompt files
    #[arg(long, value_name = "DIR")]
    pub prompts_dir: Option<PathBuf>,

    /// Path to config file (review-sweep.toml or .review-sweep.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Include only these extensions (comma-separated, e.g., '.rs,.py')
    #[arg(short = 'i', long, value_name = "EXTS")]
    pub include_ext: Option<String>,

    /// Exclude paths matching these globs (comma-separated)
    #[arg(short = 'e', long, value_name = "GLOBS")]
    pub exclude_glob: Option<String>,

    /// Skip files larger than this (bytes)
    #[arg(long, value_name = "BYTES")]
    pub max_file_bytes: Option<u64>,

    /// Ignore .gitignore rules
    #[arg(long)]
    pub no_gitignore: bool,

    /// Follow symbolic links when scanning
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Check against the undated marker instead of today's
    #[arg(long)]
    pub no_date: bool,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config_anchor = match args.path.as_ref() {
        Some(path) => {
            if path.exists() {
                path.canonicalize().unwrap_or_else(|_| cwd.clone())
            } else {
                cwd.clone()
            }
        }
        None => cwd.clone(),
    };

    let file_config = load_config(&config_anchor, args.config.as_deref())?;
    let cli_overrides = CliOverrides {
        path: args.path.clone(),
        prompts_dir: args.prompts_dir.clone(),
        include_extensions: parse_extensions(&args.include_ext),
        exclude_globs: parse_csv(&args.exclude_glob).map(|v| v.into_iter().collect()),
        max_file_bytes: args.max_file_bytes,
        respect_gitignore: if args.no_gitignore { Some(false) } else { None },
        follow_symlinks: if args.follow_symlinks { Some(true) } else { None },
        date_markers: if args.no_date { Some(false) } else { None },
        ..CliOverrides::default()
    };
    let merged = merge_cli_with_config(file_config, cli_overrides);

    let root_path = merged.path.clone().unwrap_or(cwd);
    if !root_path.is_dir() {
        anyhow::bail!("path {} is not a directory", root_path.display());
    }
    let prompts_dir = if merged.prompts_dir.is_absolute() {
        merged.prompts_dir.clone()
    } else {
        root_path.join(&merged.prompts_dir)
    };
    let prompt = resolve_prompt(&args.prompt, &prompts_dir)?;

    let mut scanner = FileScanner::new(root_path.clone())
        .max_file_bytes(merged.max_file_bytes)
        .respect_gitignore(merged.respect_gitignore)
        .follow_symlinks(merged.follow_symlinks)
        .include_extensions(merged.include_extensions.iter().cloned().collect())
        .exclude_globs(merged.exclude_globs.iter().cloned().collect());
    let files = scanner.scan()?;

    if files.is_empty() {
        println!(
            "No files matched the scan filters under {}",
            root_path.display()
        );
        return Ok(());
    }

    let date = merged.date_markers.then(today_stamp);
    let current_marker = build_marker(&prompt.name, date.as_deref());
    let base_marker = build_marker(&prompt.name, None);

    println!("Marker status for \"{}\" ({current_marker}):", prompt.name);
    println!();

    let mut current = 0usize;
    let mut stale = 0usize;
    let mut unmarked = 0usize;
    let mut non_text = 0usize;
    for file in &files {
        let label = match fs::read(&file.path) {
            Ok(bytes) if is_probably_binary(&bytes) => {
                non_text += 1;
                "non-text"
            }
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(content) => {
                    if has_marker(&content, &current_marker) {
                        current += 1;
                        "current"
                    } else if has_marker(&content, &base_marker) {
                        // Marked by this prompt, but on some other day.
                        stale += 1;
                        "stale"
                    } else {
                        unmarked += 1;
                        "unmarked"
                    }
                }
                Err(_) => {
                    non_text += 1;
                    "non-text"
                }
            },
            Err(_) => {
                non_text += 1;
                "non-text"
            }
        };
        let padded = format!("{label:<9}");
        let painted = match label {
            "current" => style(padded).green(),
            "stale" => style(padded).yellow(),
            "non-text" => style(padded).dim(),
            _ => style(padded),
        };
        println!("  {painted} {}", file.relative_path);
    }

    println!();
    println!(
        "{} file(s): {current} current, {stale} stale, {unmarked} unmarked, {non_text} non-text",
        files.len()
    );

    Ok(())
}
