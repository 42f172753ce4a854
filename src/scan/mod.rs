//! Source tree scanning
//!
//! Walks the sweep root and selects candidate files by extension, glob,
//! and size. Gitignore rules are honored through the `ignore` crate even
//! outside a git checkout, so filters behave the same in tests and in
//! fresh exports of a repository.

use crate::domain::{FileInfo, ScanStats};
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::PathBuf;

/// Configurable walker producing a sorted list of sweep candidates.
pub struct FileScanner {
    root: PathBuf,
    max_file_bytes: u64,
    respect_gitignore: bool,
    follow_symlinks: bool,
    include_extensions: HashSet<String>,
    exclude_globs: HashSet<String>,
    stats: ScanStats,
}

impl FileScanner {
    pub fn new(root: PathBuf) -> Self {
        FileScanner {
            root,
            max_file_bytes: u64::MAX,
            respect_gitignore: true,
            follow_symlinks: false,
            include_extensions: HashSet::new(),
            exclude_globs: HashSet::new(),
            stats: ScanStats::default(),
        }
    }

    pub fn max_file_bytes(mut self, limit: u64) -> Self {
        self.max_file_bytes = limit;
        self
    }

    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Extensions that qualify a file for the sweep (with leading dot).
    /// An empty set admits every extension.
    pub fn include_extensions(mut self, extensions: HashSet<String>) -> Self {
        self.include_extensions = extensions;
        self
    }

    /// Glob patterns matched against root-relative paths; matches are
    /// skipped.
    pub fn exclude_globs(mut self, globs: HashSet<String>) -> Self {
        self.exclude_globs = globs;
        self
    }

    /// Counters from the most recent [`scan`](Self::scan).
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Walks the root and returns candidates sorted by relative path.
    pub fn scan(&mut self) -> Result<Vec<FileInfo>> {
        self.stats = ScanStats::default();
        let exclude = build_globset(&self.exclude_globs)?;

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .follow_links(self.follow_symlinks)
            .require_git(false)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .ignore(self.respect_gitignore)
            .parents(self.respect_gitignore);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("skipping unreadable entry: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            self.stats.files_scanned += 1;

            let path = entry.path();
            let relative_path = path
                .strip_prefix(&self.root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");

            if let Some(set) = &exclude {
                if set.is_match(&relative_path) {
                    self.stats.files_skipped_glob += 1;
                    continue;
                }
            }

            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{e}"))
                .unwrap_or_default();
            if !self.include_extensions.is_empty() && !self.include_extensions.contains(&extension)
            {
                self.stats.files_skipped_extension += 1;
                continue;
            }

            let metadata = entry
                .metadata()
                .with_context(|| format!("failed to stat {}", path.display()))?;
            let size_bytes = metadata.len();
            if size_bytes > self.max_file_bytes {
                self.stats.files_skipped_size += 1;
                continue;
            }

            files.push(FileInfo {
                path: path.to_path_buf(),
                relative_path,
                size_bytes,
            });
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        self.stats.files_included = files.len();
        Ok(files)
    }
}

fn build_globset(patterns: &HashSet<String>) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(
            Glob::new(pattern).with_context(|| format!("invalid exclude glob '{pattern}'"))?,
        );
    }
    Ok(Some(builder.build()?))
}
