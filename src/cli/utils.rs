//! Shared helpers for CLI argument handling

use crate::domain::normalize_extension;
use std::collections::HashSet;

/// Splits a comma-separated flag value into trimmed, non-empty entries.
/// Returns `None` when the flag was not given.
pub fn parse_csv(value: &Option<String>) -> Option<Vec<String>> {
    value.as_ref().map(|v| {
        v.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
}

/// Parses `--include-ext` into a normalized extension set ("rs" and ".rs"
/// are the same entry).
pub fn parse_extensions(value: &Option<String>) -> Option<HashSet<String>> {
    parse_csv(value).map(|entries| entries.iter().map(|e| normalize_extension(e)).collect())
}
