//! Fenced code block extraction
//!
//! Model replies are free-form text that must contain exactly one
//! triple-backtick fenced block: the rewritten file. This module pulls out
//! that block's inner text, or fails with the number of blocks it saw so the
//! sweep can report a conversational or multi-block reply without touching
//! the file.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// A fenced block: opening fence with optional language tag, a required
/// newline, minimal (lazy) content, then a newline immediately followed by
/// the closing fence. Content therefore has framing newlines on both sides;
/// a fence glued against prose with no interior newline never matches.
static FENCE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```\w*\n(.*?)\n```").expect("fence pattern compiles"));

/// The only failure mode of extraction: the wrong number of fenced blocks.
///
/// `found` is 0 for a reply with no recognizable block (including malformed
/// fence syntax) and ≥2 when the model returned several blocks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("expected exactly one fenced code block in the response, found {found}")]
    BlockCount { found: usize },
}

/// Extract the inner text of the single fenced code block in `text`.
///
/// The fences and the opening fence's language tag are discarded; inner
/// whitespace is preserved verbatim. Counting considers all non-overlapping
/// fence matches, and anything other than exactly one is an error carrying
/// the observed count. Pure function; safe to call from any thread.
pub fn extract_code_block(text: &str) -> Result<String, ExtractError> {
    let mut blocks = FENCE_BLOCK.captures_iter(text);
    let first = blocks.next();
    let extra = blocks.count();

    match first {
        Some(captures) if extra == 0 => Ok(captures[1].to_string()),
        Some(_) => Err(ExtractError::BlockCount { found: extra + 1 }),
        None => Err(ExtractError::BlockCount { found: 0 }),
    }
}
