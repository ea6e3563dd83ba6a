//! Insertion-ordered path set.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A set of paths that remembers insertion order.
///
/// The first insertion of a path wins; later duplicates are dropped.
#[derive(Debug, Clone, Default)]
pub struct OrderedPathSet {
    order: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl OrderedPathSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a path. Returns `false` if it was already present.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.order.push(path);
        true
    }

    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.order.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<PathBuf> {
        self.order
    }
}

impl Extend<PathBuf> for OrderedPathSet {
    fn extend<I: IntoIterator<Item = PathBuf>>(&mut self, iter: I) {
        for path in iter {
            self.insert(path);
        }
    }
}

impl FromIterator<PathBuf> for OrderedPathSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a OrderedPathSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
