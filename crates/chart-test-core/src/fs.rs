//! Filesystem access for test file resolution.
//!
//! Resolution, chart detection and config loading never call `std::fs`
//! themselves. Everything goes through [`FileSystem`], so a chart can be
//! resolved against the real disk ([`HostFs`]) or against a tree held in
//! memory ([`MemoryFs`]).

use glob::{MatchOptions, Pattern, PatternError};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Glob options shared by every implementation.
///
/// `*` and `?` never match a path separator, only `**` crosses directories.
pub const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Other,
}

/// Read-only filesystem capability used during resolution.
pub trait FileSystem {
    /// Kind of the entry at `path`, following symlinks.
    /// Returns `Ok(None)` when nothing exists there.
    ///
    /// # Errors
    /// Returns an error if the entry exists but cannot be inspected.
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>>;

    /// Check that the directory at `path` can be listed.
    ///
    /// # Errors
    /// Returns an error if `path` is missing, not a directory or unreadable.
    fn probe_dir(&self, path: &Path) -> io::Result<()>;

    /// Children of the directory at `path`, sorted.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be listed.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Expand a glob expression into the existing paths it matches.
    ///
    /// Entries that cannot be read while expanding are skipped.
    ///
    /// # Errors
    /// Returns an error if the expression is not a valid glob.
    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>, PatternError>;

    /// Contents of the file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file is missing or cannot be read.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.entry_kind(path), Ok(Some(EntryKind::File)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.entry_kind(path), Ok(Some(EntryKind::Dir)))
    }
}

/// The process's real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFs;

impl FileSystem for HostFs {
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => Ok(Some(EntryKind::File)),
            Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Dir)),
            Ok(_) => Ok(Some(EntryKind::Other)),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                ) =>
            {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn probe_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::read_dir(path).map(drop)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut children = std::fs::read_dir(path)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<io::Result<Vec<_>>>()?;
        children.sort();
        Ok(children)
    }

    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>, PatternError> {
        let mut paths = Vec::new();
        for entry in glob::glob_with(pattern, MATCH_OPTIONS)? {
            match entry {
                Ok(path) => paths.push(path),
                Err(err) => tracing::warn!(
                    path = %err.path().display(),
                    error = %err.error(),
                    "skipping unreadable path"
                ),
            }
        }
        Ok(paths)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// An in-memory file tree.
///
/// Adding a file implies all of its parent directories. Files added without
/// contents read as empty. Directories marked with [`MemoryFs::deny_read`]
/// cannot be listed and hide their contents from glob expansion, like a
/// directory without read permission on disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: BTreeSet<PathBuf>,
    contents: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    unreadable: BTreeSet<PathBuf>,
}

impl MemoryFs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree containing the given files.
    #[must_use]
    pub fn with_files<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut fs = Self::new();
        for path in paths {
            fs.add_file(path);
        }
        fs
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>) -> &mut Self {
        let path = clean_path(path.as_ref());
        self.add_ancestors(&path);
        self.files.insert(path);
        self
    }

    /// Add a file with the given contents.
    pub fn write_file(
        &mut self,
        path: impl AsRef<Path>,
        contents: impl Into<String>,
    ) -> &mut Self {
        self.add_file(path.as_ref());
        self.contents
            .insert(clean_path(path.as_ref()), contents.into());
        self
    }

    pub fn add_dir(&mut self, path: impl AsRef<Path>) -> &mut Self {
        let path = clean_path(path.as_ref());
        self.add_ancestors(&path);
        self.dirs.insert(path);
        self
    }

    pub fn deny_read(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.add_dir(path.as_ref());
        self.unreadable.insert(clean_path(path.as_ref()));
        self
    }

    fn add_ancestors(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn is_hidden(&self, path: &Path) -> bool {
        path.ancestors()
            .skip(1)
            .any(|ancestor| self.unreadable.contains(ancestor))
    }
}

impl FileSystem for MemoryFs {
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        let path = clean_path(path);
        if path.as_os_str().is_empty() || self.dirs.contains(&path) {
            Ok(Some(EntryKind::Dir))
        } else if self.files.contains(&path) {
            Ok(Some(EntryKind::File))
        } else {
            Ok(None)
        }
    }

    fn probe_dir(&self, path: &Path) -> io::Result<()> {
        match self.entry_kind(path)? {
            Some(EntryKind::Dir) if self.unreadable.contains(&clean_path(path)) => {
                Err(io::ErrorKind::PermissionDenied.into())
            }
            Some(EntryKind::Dir) => Ok(()),
            Some(_) => Err(io::ErrorKind::NotADirectory.into()),
            None => Err(io::ErrorKind::NotFound.into()),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        self.probe_dir(path)?;
        let dir = clean_path(path);
        let children: BTreeSet<&PathBuf> = self
            .files
            .iter()
            .chain(&self.dirs)
            .filter(|entry| entry.parent() == Some(dir.as_path()))
            .collect();
        Ok(children.into_iter().cloned().collect())
    }

    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>, PatternError> {
        let pattern = Pattern::new(&drop_cur_dir_segments(pattern))?;
        Ok(self
            .files
            .iter()
            .chain(&self.dirs)
            .filter(|path| !self.is_hidden(path))
            .filter(|path| pattern.matches_path_with(path, MATCH_OPTIONS))
            .cloned()
            .collect())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let path = clean_path(path);
        if !self.files.contains(&path) {
            return Err(io::ErrorKind::NotFound.into());
        }
        if self.is_hidden(&path) {
            return Err(io::ErrorKind::PermissionDenied.into());
        }
        Ok(self.contents.get(&path).cloned().unwrap_or_default())
    }
}

/// Remove `.` segments from a glob expression.
///
/// Stored entries are cleaned paths, so an expression like `./tests/*` has to
/// lose its `.` segments to match them the way the host glob does.
fn drop_cur_dir_segments(pattern: &str) -> String {
    let segments: Vec<&str> = pattern.split('/').filter(|segment| *segment != ".").collect();
    if segments.iter().all(|segment| segment.is_empty()) && pattern.starts_with('/') {
        return "/".to_string();
    }
    segments.join("/")
}

/// Drop `.` components and rebuild the path with native separators.
pub(crate) fn clean_path(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}
