//! Prompts command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::prompt::discover_prompts;

#[derive(Args)]
pub struct PromptsArgs {
    /// Root directory the prompts directory is resolved against
    #[arg(long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Directory containing prompt files
    #[arg(long, value_name = "DIR")]
    pub prompts_dir: Option<PathBuf>,

    /// Path to config file (review-sweep.toml or .review-sweep.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: PromptsArgs) -> Result<()> {
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
    let merged = merge_cli_with_config(
        file_config,
        CliOverrides {
            path: args.path.clone(),
            prompts_dir: args.prompts_dir.clone(),
            ..CliOverrides::default()
        },
    );

    let root_path = merged.path.clone().unwrap_or(cwd);
    let prompts_dir = if merged.prompts_dir.is_absolute() {
        merged.prompts_dir.clone()
    } else {
        root_path.join(&merged.prompts_dir)
    };

    let prompts = discover_prompts(&prompts_dir)?;
    if prompts.is_empty() {
        println!(
            "No prompt files found in {} (expected .md or .txt).",
            prompts_dir.display()
        );
        return Ok(());
    }

    println!("Available prompts in {}:", prompts_dir.display());
    for prompt in &prompts {
        println!("- {} ({})", prompt.name, prompt.path.display());
        println!("  {}", summarize(&prompt.body));
    }

    Ok(())
}

fn summarize(body: &str) -> String {
    let first_line = body
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("")
        .trim();
    if first_line.chars().count() > 72 {
        let mut out: String = first_line.chars().take(72).collect();
        out.push_str("...");
        out
    } else {
        first_line.to_string()
    }
}
