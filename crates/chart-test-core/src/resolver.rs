//! Test file resolution.
//!
//! A [`FileResolver`] turns a base directory and an ordered list of glob
//! patterns into the deduplicated list of test files those patterns name.
//! Base directories and returned paths are both relative to the resolver's
//! working root, so results for a chart and for one of its sub-charts can be
//! compared directly.

use crate::fs::{EntryKind, FileSystem, HostFs, clean_path};
use crate::ordered::OrderedPathSet;
use glob::{Pattern, PatternError};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during resolution.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("base directory not found: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("base directory is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("cannot read base directory {path}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        source: PatternError,
    },
    #[error("pattern '{0}' must be relative to the base directory")]
    AbsolutePattern(String),
}

/// Resolves test file patterns against directories under a working root.
#[derive(Debug, Clone)]
pub struct FileResolver<F = HostFs> {
    root: PathBuf,
    fs: F,
}

impl FileResolver<HostFs> {
    /// Create a resolver over the real filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_fs(root, HostFs)
    }
}

impl<F: FileSystem> FileResolver<F> {
    pub fn with_fs(root: impl Into<PathBuf>, fs: F) -> Self {
        Self {
            root: root.into(),
            fs,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn fs(&self) -> &F {
        &self.fs
    }

    /// Where a root-relative path lives on the filesystem.
    #[must_use]
    pub fn locate(&self, path: &Path) -> PathBuf {
        non_empty(clean_path(&self.root.join(path)))
    }

    /// Rewrite a located path relative to the working root.
    pub(crate) fn relativize(&self, path: &Path) -> PathBuf {
        let root = clean_path(&self.root);
        non_empty(clean_path(path.strip_prefix(&root).unwrap_or(path)))
    }

    /// Resolve `patterns` against `base_dir`.
    ///
    /// Patterns are processed in order. Within one pattern, matches are sorted
    /// by path; across patterns the first occurrence of a file wins. Only
    /// regular files are returned. Unless `recursive` is set, `**` segments
    /// match a single directory level like `*`.
    ///
    /// An empty `base_dir` means the working root itself.
    ///
    /// # Errors
    /// Returns an error if:
    /// - `base_dir` does not exist, is not a directory or cannot be read
    /// - a pattern is absolute or is not a valid glob
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(root = %self.root.display(), base = %base_dir.display(), recursive = recursive)
    )]
    pub fn resolve(
        &self,
        base_dir: &Path,
        patterns: &[String],
        recursive: bool,
    ) -> Result<Vec<PathBuf>, ResolveError> {
        let base_dir = if base_dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            base_dir
        };
        let base = self.locate(base_dir);
        self.check_base(&base)?;

        let mut found = OrderedPathSet::new();
        for pattern in patterns {
            let matches = self.match_pattern(&base, pattern, recursive)?;
            tracing::debug!(pattern = %pattern, matches = matches.len(), "matched pattern");
            found.extend(matches.iter().map(|path| self.relativize(path)));
        }

        tracing::debug!(files = found.len(), "resolved test files");
        Ok(found.into_vec())
    }

    fn check_base(&self, base: &Path) -> Result<(), ResolveError> {
        match self.fs.entry_kind(base) {
            Ok(Some(EntryKind::Dir)) => {}
            Ok(Some(_)) => return Err(ResolveError::NotADirectory(base.to_path_buf())),
            Ok(None) => return Err(ResolveError::DirectoryNotFound(base.to_path_buf())),
            Err(source) => {
                return Err(ResolveError::Unreadable {
                    path: base.to_path_buf(),
                    source,
                });
            }
        }
        self.fs
            .probe_dir(base)
            .map_err(|source| ResolveError::Unreadable {
                path: base.to_path_buf(),
                source,
            })
    }

    /// Located files matching one pattern, sorted.
    fn match_pattern(
        &self,
        base: &Path,
        pattern: &str,
        recursive: bool,
    ) -> Result<Vec<PathBuf>, ResolveError> {
        if is_absolute_pattern(pattern) {
            return Err(ResolveError::AbsolutePattern(pattern.to_string()));
        }
        let effective = if recursive {
            Cow::Borrowed(pattern)
        } else {
            Cow::Owned(flatten_recursive(pattern))
        };

        let mut matches = if contains_glob_chars(&effective) {
            self.expand_in(base, &effective)
                .map_err(|source| ResolveError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })?
        } else {
            vec![self.locate_exact(base, &effective)]
        };

        matches.retain(|path| self.fs.is_file(path));
        matches.sort();
        Ok(matches)
    }

    /// Located path named by an exact pattern.
    ///
    /// The pattern is looked up below `base` first. When nothing is there, a
    /// pattern that already names a file relative to the working root is
    /// accepted as is.
    fn locate_exact(&self, base: &Path, pattern: &str) -> PathBuf {
        let below_base = clean_path(&base.join(pattern));
        if self.fs.is_file(&below_base) {
            return below_base;
        }
        let from_root = self.locate(Path::new(pattern));
        if self.fs.is_file(&from_root) {
            tracing::debug!(pattern = %pattern, "exact pattern found relative to root");
            return from_root;
        }
        below_base
    }

    /// Expand `pattern` below the located directory `base`.
    pub(crate) fn expand_in(&self, base: &Path, pattern: &str) -> Result<Vec<PathBuf>, PatternError> {
        self.fs.expand(&search_expression(base, pattern))
    }
}

/// Check if a pattern contains glob wildcards.
pub(crate) fn contains_glob_chars(s: &str) -> bool {
    s.contains('*') || s.contains('?') || s.contains('[')
}

pub(crate) fn is_absolute_pattern(pattern: &str) -> bool {
    pattern.starts_with('/') || pattern.starts_with('\\') || Path::new(pattern).is_absolute()
}

/// Replace every `**` segment with `*`.
fn flatten_recursive(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| if segment == "**" { "*" } else { segment })
        .collect::<Vec<_>>()
        .join("/")
}

/// Join an escaped base directory and a pattern into one glob expression.
fn search_expression(base: &Path, pattern: &str) -> String {
    if base == Path::new(".") {
        return pattern.to_string();
    }
    let escaped = Pattern::escape(&base.to_string_lossy());
    let prefix = escaped.trim_end_matches(['/', '\\']);
    format!("{prefix}/{pattern}")
}

fn non_empty(path: PathBuf) -> PathBuf {
    if path.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        path
    }
}
