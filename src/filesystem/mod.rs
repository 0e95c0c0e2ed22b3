//! Filesystem entries and primitive operations
//!
//! Split into modules for reduced complexity.

mod ops;
mod utils;

use std::cmp::Ordering;
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub use ops::{copy_entry, is_within, move_entry, remove_entry};
pub use utils::{format_modified, format_size};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Filesystem entry (file or directory)
#[derive(Clone, Debug)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl Entry {
    fn from_dir_entry(entry: DirEntry) -> Option<Self> {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let kind = if path.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        let metadata = entry.metadata().ok();
        let size = metadata.as_ref().map(|m| m.len()).unwrap_or(0);
        let modified = metadata.and_then(|m| m.modified().ok());

        Some(Self {
            name,
            path,
            kind,
            size,
            modified,
        })
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// List directory contents, directories first
///
/// Unreadable directories yield an empty listing.
pub fn list_directory(path: &Path, show_hidden: bool) -> Vec<Entry> {
    let Ok(read_dir) = fs::read_dir(path) else {
        return Vec::new();
    };

    let mut entries: Vec<Entry> = read_dir
        .filter_map(|e| e.ok())
        .filter_map(Entry::from_dir_entry)
        .filter(|e| show_hidden || !e.is_hidden())
        .collect();

    entries.sort_by(|a, b| match (a.is_dir(), b.is_dir()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    });

    entries
}

/// True if anything (including a dangling symlink) lives at `path`
pub fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
