//! Utility functions

/// Sniffs for binary content by looking for NUL bytes in the first 8 KiB,
/// the same heuristic git uses. Binary files are skipped, never rewritten.
pub fn is_probably_binary(bytes: &[u8]) -> bool {
    let window = bytes.len().min(8192);
    bytes[..window].contains(&0)
}

/// Today's date in the local timezone as `YYYY-MM-DD`, the format markers
/// carry.
pub fn today_stamp() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
