//! Apply command implementation

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::fs;
use std::path::PathBuf;

use super::utils::{parse_csv, parse_extensions};
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::REPORT_SCHEMA_VERSION;
use crate::prompt::{resolve_prompt, RenderedPrompt};
use crate::provider::{ClientOptions, Completer, CompletionClient, ProviderError};
use crate::scan::FileScanner;
use crate::sweep::{run_sweep, SweepOptions};
use crate::utils::today_stamp;

#[derive(Args)]
pub struct ApplyArgs {
    /// Review prompt: a name in the prompts directory or a path to a file
    #[arg(short = 'p', long, value_name = "NAME|FILE")]
    pub prompt: String,

    /// Root directory to sweep (defaults to the current directory)
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

    /// Model identifier sent to the completion endpoint
    #[arg(short = 'm', long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Sampling temperature
    #[arg(long, value_name = "FLOAT")]
    pub temperature: Option<f32>,

    /// Cap on completion tokens per request
    #[arg(long, value_name = "TOKENS")]
    pub max_response_tokens: Option<usize>,

    /// HTTP timeout per request (seconds)
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Number of files transformed concurrently
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Stamp markers without a date, suppressing re-application for good
    #[arg(long)]
    pub no_date: bool,

    /// Report what would happen without calling the API or writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON sweep report to this path
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

/// Stand-in completer for dry runs, which never reach the endpoint.
struct Offline;

impl Completer for Offline {
    async fn complete(&self, _request: &RenderedPrompt) -> Result<String, ProviderError> {
        Err(ProviderError::Network("dry run".to_string()))
    }
}

pub fn run(args: ApplyArgs) -> Result<()> {
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
        base_url: args.base_url.clone(),
        model: args.model.clone(),
        temperature: args.temperature,
        max_response_tokens: args.max_response_tokens,
        timeout_secs: args.timeout_secs,
        jobs: args.jobs,
        date_markers: if args.no_date { Some(false) } else { None },
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
    let scan_stats = scanner.stats().clone();

    if files.is_empty() {
        println!(
            "No files matched the scan filters under {}",
            root_path.display()
        );
        return Ok(());
    }
    let total_bytes: u64 = files.iter().map(|file| file.size_bytes).sum();

    let options = SweepOptions {
        date: merged.date_markers.then(today_stamp),
        jobs: merged.jobs,
        dry_run: args.dry_run,
    };

    let progress = if args.dry_run {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.cyan/blue} {pos}/{len} files")?
                .progress_chars("█▓▒░ "),
        );
        bar
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let report = if args.dry_run {
        runtime.block_on(run_sweep(&options, &prompt, files, &Offline, &progress))
    } else {
        let api_key = merged.api_key.clone().context(
            "no API key configured; set REVIEW_SWEEP_API_KEY or api_key in review-sweep.toml",
        )?;
        let client = CompletionClient::new(ClientOptions {
            base_url: merged.base_url.clone(),
            api_key,
            model: merged.model.clone(),
            temperature: merged.temperature,
            max_tokens: merged.max_response_tokens,
            timeout_secs: merged.timeout_secs,
        })?;
        runtime.block_on(run_sweep(&options, &prompt, files, &client, &progress))
    };
    progress.finish_and_clear();

    let headline = if args.dry_run {
        "Dry run complete!"
    } else {
        "Sweep complete!"
    };
    println!();
    println!("{}", style(headline).green().bold());
    println!();
    println!("Statistics:");
    println!("  Root:            {}", root_path.display());
    println!("  Prompt:          {} ({})", prompt.name, prompt.path.display());
    println!("  Marker:          {}", report.marker);
    println!("  Model:           {}", merged.model);
    println!("  Files scanned:   {}", scan_stats.files_scanned);
    println!("  Files eligible:  {}", scan_stats.files_included);
    println!("  Total bytes:     {total_bytes}");
    if args.dry_run {
        println!("  Would rewrite:   {}", report.stats.files_would_rewrite);
    } else {
        println!("  Files rewritten: {}", report.stats.files_rewritten);
    }

    // Per-category skip breakdown
    let skipped = scan_stats.files_skipped_size
        + scan_stats.files_skipped_extension
        + scan_stats.files_skipped_glob
        + report.stats.files_skipped_marker
        + report.stats.files_skipped_non_text;
    if skipped > 0 {
        println!("  Files skipped:");
        if scan_stats.files_skipped_extension > 0 {
            println!("    extension:   {}", scan_stats.files_skipped_extension);
        }
        if scan_stats.files_skipped_glob > 0 {
            println!("    glob:        {}", scan_stats.files_skipped_glob);
        }
        if scan_stats.files_skipped_size > 0 {
            println!("    size limit:  {}", scan_stats.files_skipped_size);
        }
        if report.stats.files_skipped_marker > 0 {
            println!("    marker:      {}", report.stats.files_skipped_marker);
        }
        if report.stats.files_skipped_non_text > 0 {
            println!("    non-text:    {}", report.stats.files_skipped_non_text);
        }
    }
    println!("  Processing time: {:.2}s", report.stats.processing_time_seconds);

    if let Some(path) = args.report.as_ref() {
        let payload = json!({
            "schema_version": REPORT_SCHEMA_VERSION,
            "prompt": { "name": &prompt.name, "path": prompt.path.display().to_string() },
            "marker": &report.marker,
            "root": root_path.display().to_string(),
            "model": &merged.model,
            "dry_run": args.dry_run,
            "scan": &scan_stats,
            "sweep": &report.stats,
            "files": &report.outcomes,
        });
        fs::write(path, serde_json::to_string_pretty(&payload)?)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        println!();
        println!("Report written to {}", path.display());
    }

    // Failed files list (up to 5)
    if report.has_failures() {
        println!();
        println!("{} {} file(s) failed:", style("✗").red(), report.stats.files_failed);
        for failure in report.failures().take(5) {
            let detail = failure.detail.as_deref().unwrap_or("unknown error");
            println!("  {} ({})", failure.path, detail);
        }
        if report.stats.files_failed > 5 {
            println!("  ... and {} more (see --report)", report.stats.files_failed - 5);
        }
        anyhow::bail!("{} file(s) failed to transform", report.stats.files_failed);
    }

    Ok(())
}
