//! Intake of the changed-file list handed over by CI.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::{Error, Result};

/// Environment variable holding newline-separated changed paths.
pub const CHANGED_FILES_ENV: &str = "CHANGED_FILES";

/// Default include pattern, matched against file names.
pub const MARKDOWN_GLOB: &str = "*.{md,markdown}";

/// Filters candidate paths down to the files worth classifying.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    include: GlobSet,
}

impl CandidateFilter {
    pub fn new(patterns: &[&str]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                Error::Config(format!("invalid glob pattern: {e}"))
            })?;
            builder.add(glob);
        }
        let include = builder.build().map_err(|e| {
            Error::Config(format!("invalid glob pattern: {e}"))
        })?;
        Ok(Self { include })
    }

    pub fn markdown() -> Result<Self> {
        Self::new(&[MARKDOWN_GLOB])
    }

    pub fn accepts(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.include.is_match(Path::new(name)))
    }

    /// Trim, drop blanks and non-matching entries, resolve relative paths
    /// against `root`, and drop repeats while keeping first-seen order.
    pub fn select<I, S>(&self, root: &Path, raw: I) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected: Vec<PathBuf> = Vec::new();
        for entry in raw {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                continue;
            }
            let path = Path::new(entry);
            if !self.accepts(path) {
                continue;
            }
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                root.join(path)
            };
            if !selected.contains(&path) {
                selected.push(path);
            }
        }
        selected
    }
}

/// Candidate entries: explicit arguments when given, else the lines of
/// `CHANGED_FILES`.
pub fn raw_candidates(args: &[PathBuf]) -> Vec<String> {
    if !args.is_empty() {
        return args
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
    }
    std::env::var(CHANGED_FILES_ENV)
        .map(|raw| split_changed_files(&raw))
        .unwrap_or_default()
}

/// Split a `CHANGED_FILES` value into entries.
pub fn split_changed_files(raw: &str) -> Vec<String> {
    raw.lines().map(str::to_string).collect()
}
