//! Selected entries of the current listing

use std::path::{Path, PathBuf};

/// Ordered set of selected paths
#[derive(Clone, Debug, Default)]
pub struct Selection {
    paths: Vec<PathBuf>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    /// Replace the selection, dropping duplicates
    pub fn set(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        self.paths.clear();
        for path in paths {
            self.add(path);
        }
    }

    pub fn add(&mut self, path: PathBuf) {
        if !self.contains(&path) {
            self.paths.push(path);
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    pub fn remove(&mut self, path: &Path) {
        self.paths.retain(|p| p != path);
    }

    /// Drop paths for which `keep` is false, returns true if anything changed
    pub fn retain(&mut self, keep: impl FnMut(&PathBuf) -> bool) -> bool {
        let before = self.paths.len();
        self.paths.retain(keep);
        before != self.paths.len()
    }

    pub fn first(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn to_paths(&self) -> Vec<PathBuf> {
        self.paths.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }
}
