//! review-sweep: Batch-apply an LLM review prompt across a source tree
//!
//! This tool sends each candidate file to a completion endpoint together
//! with a review prompt, extracts the single fenced code block from the
//! response, and rewrites the file behind a dated provenance marker so the
//! same review is not applied twice.

use anyhow::Result;

mod cli;
mod config;
mod domain;
mod extract;
mod marker;
mod prompt;
mod provider;
mod scan;
mod sweep;
mod utils;

fn main() -> Result<()> {
    cli::run()
}
