//! Review-Sweep: Batch-apply an LLM review prompt across a source tree
//!
//! This library provides the building blocks of the `review-sweep` CLI:
//! scanning a tree for candidate files, rendering review prompts, calling
//! an OpenAI-compatible completion endpoint, extracting the returned code
//! block, and rewriting files behind a provenance marker.

pub mod cli;
pub mod config;
pub mod domain;
pub mod extract;
pub mod marker;
pub mod prompt;
pub mod provider;
pub mod scan;
pub mod sweep;
pub mod utils;
