//! Init command implementation
//!
//! Scaffolds a working setup: a `review-sweep.toml` rendered from the
//! built-in defaults plus a small example prompt to sweep with.

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use crate::domain::Config;

const EXAMPLE_PROMPT: &str = "Review this file for spelling and grammar mistakes in comments \
and string literals.\nFix what you find and keep the code behavior identical.\n";

#[derive(Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory)
    #[arg(long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let root = match args.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        anyhow::bail!("path {} is not a directory", root.display());
    }

    let config_path = root.join("review-sweep.toml");
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    let rendered =
        toml::to_string_pretty(&Config::default()).context("failed to render default config")?;
    let content = format!(
        "# review-sweep configuration\n\
         # Overridden by REVIEW_SWEEP_* environment variables and CLI flags.\n\
         # The API key belongs in REVIEW_SWEEP_API_KEY, not in this file.\n\n{rendered}"
    );
    fs::write(&config_path, content)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    println!("Wrote {}", config_path.display());

    let prompts_dir = root.join("prompts");
    fs::create_dir_all(&prompts_dir)
        .with_context(|| format!("failed to create {}", prompts_dir.display()))?;
    let example = prompts_dir.join("proofread.md");
    if !example.exists() || args.force {
        fs::write(&example, EXAMPLE_PROMPT)
            .with_context(|| format!("failed to write {}", example.display()))?;
        println!("Wrote {}", example.display());
    }

    println!();
    println!("Set REVIEW_SWEEP_API_KEY, then try: review-sweep apply --prompt proofread --dry-run");
    Ok(())
}
