//! Sweep engine
//!
//! Runs one review prompt across a set of candidate files: each file is
//! read, checked for an existing marker, sent to the completion endpoint,
//! and rewritten as the marker line followed by the extracted code block.
//! Failures are recorded per file and never abort the sweep; a file is
//! only written after a response passes extraction.

use crate::domain::{FileInfo, FileStatus, SweepOutcome, SweepStats};
use crate::extract::extract_code_block;
use crate::marker::{build_marker, has_marker};
use crate::prompt::{render_request, Prompt};
use crate::provider::Completer;
use crate::utils::is_probably_binary;
use futures_util::{stream, StreamExt};
use indicatif::ProgressBar;
use std::fs;
use std::time::Instant;

/// Knobs for one sweep run.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Date stamped into markers, `YYYY-MM-DD`. `None` builds undated
    /// markers, which suppress re-application on any later day.
    pub date: Option<String>,
    /// Number of files in flight at once.
    pub jobs: usize,
    /// Report what would happen without calling the endpoint or writing.
    pub dry_run: bool,
}

/// Everything a sweep produced, with outcomes sorted by path.
#[derive(Debug)]
pub struct SweepReport {
    /// The marker line this sweep stamped (or would stamp) into files.
    pub marker: String,
    pub outcomes: Vec<SweepOutcome>,
    pub stats: SweepStats,
}

impl SweepReport {
    pub fn has_failures(&self) -> bool {
        self.stats.files_failed > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &SweepOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == FileStatus::Failed)
    }
}

/// Sweeps `files` with bounded concurrency. Files are independent, so
/// transformations run in parallel up to `jobs`; outcomes come back in
/// path order regardless of completion order.
pub async fn run_sweep<C: Completer>(
    options: &SweepOptions,
    prompt: &Prompt,
    files: Vec<FileInfo>,
    completer: &C,
    progress: &ProgressBar,
) -> SweepReport {
    let started = Instant::now();
    let marker = build_marker(&prompt.name, options.date.as_deref());
    let marker_line: &str = &marker;
    let jobs = options.jobs.max(1);

    let mut outcomes: Vec<SweepOutcome> = stream::iter(files)
        .map(|file| async move {
            let outcome = process_file(options, prompt, marker_line, completer, &file).await;
            progress.inc(1);
            outcome
        })
        .buffer_unordered(jobs)
        .collect()
        .await;

    outcomes.sort_by(|a, b| a.path.cmp(&b.path));
    let stats = tally(&outcomes, started.elapsed().as_secs_f64());
    SweepReport {
        marker,
        outcomes,
        stats,
    }
}

async fn process_file<C: Completer>(
    options: &SweepOptions,
    prompt: &Prompt,
    marker: &str,
    completer: &C,
    file: &FileInfo,
) -> SweepOutcome {
    let bytes = match fs::read(&file.path) {
        Ok(bytes) => bytes,
        Err(err) => {
            return outcome(
                file,
                FileStatus::Failed,
                Some(format!("read failed: {err}")),
            )
        }
    };

    if is_probably_binary(&bytes) {
        tracing::debug!(path = %file.relative_path, "skipping binary file");
        return outcome(file, FileStatus::SkippedNonText, None);
    }
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(_) => {
            tracing::debug!(path = %file.relative_path, "skipping non-UTF-8 file");
            return outcome(file, FileStatus::SkippedNonText, None);
        }
    };

    if has_marker(&content, marker) {
        tracing::debug!(path = %file.relative_path, "marker already present");
        return outcome(file, FileStatus::SkippedMarker, None);
    }

    if options.dry_run {
        return outcome(file, FileStatus::WouldRewrite, None);
    }

    let request = render_request(prompt, &content);
    let response = match completer.complete(&request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::debug!(path = %file.relative_path, error = %err, "completion failed");
            return outcome(
                file,
                FileStatus::Failed,
                Some(format!("completion request failed: {err}")),
            );
        }
    };

    // An unusable response leaves the file exactly as it was.
    let code = match extract_code_block(&response) {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!(path = %file.relative_path, error = %err, "extraction failed");
            return outcome(file, FileStatus::Failed, Some(err.to_string()));
        }
    };

    match fs::write(&file.path, compose_rewrite(marker, &code)) {
        Ok(()) => outcome(file, FileStatus::Rewritten, None),
        Err(err) => outcome(
            file,
            FileStatus::Failed,
            Some(format!("write failed: {err}")),
        ),
    }
}

fn outcome(file: &FileInfo, status: FileStatus, detail: Option<String>) -> SweepOutcome {
    SweepOutcome {
        path: file.relative_path.clone(),
        status,
        detail,
    }
}

/// Marker line, newline, transformed content, trailing newline.
fn compose_rewrite(marker: &str, code: &str) -> String {
    let mut out = String::with_capacity(marker.len() + code.len() + 2);
    out.push_str(marker);
    out.push('\n');
    out.push_str(code);
    if !code.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn tally(outcomes: &[SweepOutcome], elapsed_secs: f64) -> SweepStats {
    let mut stats = SweepStats {
        files_considered: outcomes.len(),
        processing_time_seconds: elapsed_secs,
        ..SweepStats::default()
    };
    for outcome in outcomes {
        match outcome.status {
            FileStatus::Rewritten => stats.files_rewritten += 1,
            FileStatus::WouldRewrite => stats.files_would_rewrite += 1,
            FileStatus::SkippedMarker => stats.files_skipped_marker += 1,
            FileStatus::SkippedNonText => stats.files_skipped_non_text += 1,
            FileStatus::Failed => stats.files_failed += 1,
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_is_marker_then_content_with_final_newline() {
        let marker = "// performed \"style\" review on 2023-10-01";
        assert_eq!(
            compose_rewrite(marker, "fn main() {}"),
            format!("{marker}\nfn main() {{}}\n")
        );
        assert_eq!(
            compose_rewrite(marker, "fn main() {}\n"),
            format!("{marker}\nfn main() {{}}\n")
        );
    }

    #[test]
    fn tally_counts_every_status() {
        let outcomes = vec![
            SweepOutcome {
                path: "a.rs".into(),
                status: FileStatus::Rewritten,
                detail: None,
            },
            SweepOutcome {
                path: "b.rs".into(),
                status: FileStatus::SkippedMarker,
                detail: None,
            },
            SweepOutcome {
                path: "c.rs".into(),
                status: FileStatus::Failed,
                detail: Some("boom".into()),
            },
            SweepOutcome {
                path: "d.rs".into(),
                status: FileStatus::WouldRewrite,
                detail: None,
            },
            SweepOutcome {
                path: "e.bin".into(),
                status: FileStatus::SkippedNonText,
                detail: None,
            },
        ];
        let stats = tally(&outcomes, 0.5);
        assert_eq!(stats.files_considered, 5);
        assert_eq!(stats.files_rewritten, 1);
        assert_eq!(stats.files_skipped_marker, 1);
        assert_eq!(stats.files_failed, 1);
        assert_eq!(stats.files_would_rewrite, 1);
        assert_eq!(stats.files_skipped_non_text, 1);
    }
}
