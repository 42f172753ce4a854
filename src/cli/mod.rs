//! Command-line interface for review-sweep
//!
//! Provides `apply`, `check`, `prompts`, `init`, and `completions`
//! subcommands.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod apply;
mod check;
mod init;
mod prompts;
mod utils;

/// Batch-apply an LLM review prompt across the files of a source tree
#[derive(Parser)]
#[command(name = "review-sweep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a review prompt to every candidate file under a root
    Apply(Box<apply::ApplyArgs>),

    /// Report marker status per file without contacting the API
    Check(check::CheckArgs),

    /// List the review prompts available in the prompts directory
    Prompts(prompts::PromptsArgs),

    /// Write a starter config file and example prompt
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(clap::Args)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Apply(args) => apply::run(*args),
        Commands::Check(args) => check::run(args),
        Commands::Prompts(args) => prompts::run(args),
        Commands::Init(args) => init::run(args),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            clap_complete::generate(
                args.shell,
                &mut command,
                "review-sweep",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
