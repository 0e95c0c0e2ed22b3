//! Trash store following the freedesktop.org layout
//!
//! Content lives in `<root>/files`, one `.trashinfo` sidecar per item lives
//! in `<root>/info`.

mod info;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::error::{FsError, IoResultExt};
use crate::filesystem;

pub use info::{DATE_FORMAT, TRASHINFO_EXTENSION, TrashInfo};

/// One entry under trash control
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrashItem {
    /// Collision-free name inside the files area
    pub name: String,
    pub trashed_path: PathBuf,
    pub original_path: PathBuf,
    pub deletion_date: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct TrashStore {
    root: PathBuf,
    files_dir: PathBuf,
    info_dir: PathBuf,
}

impl TrashStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            files_dir: root.join("files"),
            info_dir: root.join("info"),
            root,
        }
    }

    /// Per-user trash under the XDG data directory
    pub fn at_default_location() -> Result<Self, FsError> {
        let data_dir = dirs::data_dir().ok_or_else(|| FsError::Io {
            path: PathBuf::from("Trash"),
            source: io::Error::other("no user data directory"),
        })?;
        Ok(Self::new(data_dir.join("Trash")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files_dir(&self) -> &Path {
        &self.files_dir
    }

    pub fn info_dir(&self) -> &Path {
        &self.info_dir
    }

    fn ensure_dirs(&self) -> Result<(), FsError> {
        fs::create_dir_all(&self.files_dir).at(&self.files_dir)?;
        fs::create_dir_all(&self.info_dir).at(&self.info_dir)
    }

    fn info_path(&self, name: &str) -> PathBuf {
        self.info_dir.join(format!("{}.{}", name, TRASHINFO_EXTENSION))
    }

    fn is_taken(&self, name: &str) -> bool {
        filesystem::exists(&self.files_dir.join(name)) || filesystem::exists(&self.info_path(name))
    }

    /// First free name of `base`, `base_1`, `base_2`, ... (suffix before the extension)
    fn unique_name(&self, base: &str) -> String {
        let mut name = base.to_string();
        let mut counter = 0;
        while self.is_taken(&name) {
            counter += 1;
            name = suffixed_name(base, counter);
        }
        name
    }

    /// Move `path` into the trash
    ///
    /// The sidecar is written before the move and removed again if the move
    /// does not leave the entry in the files area.
    pub fn move_to_trash(&self, path: &Path) -> Result<TrashItem, FsError> {
        if !filesystem::exists(path) {
            return Err(FsError::NotFound(path.to_path_buf()));
        }

        let original_path = std::path::absolute(path).at(path)?;
        let base = original_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| FsError::InvalidName(path.display().to_string()))?;

        self.ensure_dirs()?;
        if filesystem::is_within(&self.files_dir, &original_path) {
            return Err(FsError::Io {
                path: original_path,
                source: io::Error::new(io::ErrorKind::InvalidInput, "trash lies inside this entry"),
            });
        }

        let name = self.unique_name(&base);
        let info = TrashInfo::now(original_path.clone());
        let info_path = self.info_path(&name);
        fs::write(&info_path, info.render()).at(&info_path)?;

        let trashed_path = self.files_dir.join(&name);
        let moved = filesystem::move_entry(&original_path, &trashed_path).and_then(|()| {
            if filesystem::exists(&trashed_path) {
                Ok(())
            } else {
                Err(io::Error::other("entry missing from trash after move"))
            }
        });
        if let Err(err) = moved {
            warn!("trashing {} failed: {}", original_path.display(), err);
            if let Err(e) = fs::remove_file(&info_path) {
                warn!("orphaned sidecar {} left behind: {}", info_path.display(), e);
            }
            return Err(FsError::failed(&original_path, err));
        }

        info!("trashed {} as {}", original_path.display(), name);
        Ok(TrashItem {
            name,
            trashed_path,
            original_path: info.original_path,
            deletion_date: info.deletion_date,
        })
    }

    /// Permanently delete everything in the trash
    ///
    /// Every removal is attempted; failures are returned together.
    pub fn empty_trash(&self) -> Result<(), FsError> {
        let mut errors = Vec::new();

        for path in read_dir_paths(&self.files_dir, &mut errors) {
            if let Err(err) = filesystem::remove_entry(&path) {
                errors.push(FsError::io(&path, err));
            }
        }

        for path in read_dir_paths(&self.info_dir, &mut errors) {
            if path.extension().is_some_and(|e| e == TRASHINFO_EXTENSION)
                && let Err(err) = fs::remove_file(&path)
            {
                errors.push(FsError::io(&path, err));
            }
        }

        if errors.is_empty() {
            info!("emptied trash at {}", self.root.display());
            Ok(())
        } else {
            warn!("emptying trash left {} failure(s)", errors.len());
            Err(FsError::Aggregate(errors))
        }
    }

    /// Number of top-level entries in the files area, 0 if unreadable
    pub fn get_trash_size(&self) -> usize {
        fs::read_dir(&self.files_dir)
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }

    /// Trashed items with readable metadata, newest first
    pub fn items(&self) -> Vec<TrashItem> {
        let Ok(read_dir) = fs::read_dir(&self.info_dir) else {
            return Vec::new();
        };

        let mut items: Vec<TrashItem> = read_dir
            .filter_map(|e| e.ok())
            .filter_map(|entry| self.item_from_sidecar(&entry.path()))
            .collect();

        items.sort_by(|a, b| {
            b.deletion_date
                .cmp(&a.deletion_date)
                .then_with(|| a.name.cmp(&b.name))
        });
        items
    }

    fn item_from_sidecar(&self, info_path: &Path) -> Option<TrashItem> {
        let file_name = info_path.file_name()?.to_str()?;
        let name = file_name.strip_suffix(&format!(".{}", TRASHINFO_EXTENSION))?;

        let trashed_path = self.files_dir.join(name);
        if !filesystem::exists(&trashed_path) {
            debug!("ignoring orphaned sidecar {}", info_path.display());
            return None;
        }

        let content = fs::read_to_string(info_path).ok()?;
        let Some(info) = TrashInfo::parse(&content) else {
            warn!("malformed trash info {}", info_path.display());
            return None;
        };

        Some(TrashItem {
            name: name.to_string(),
            trashed_path,
            original_path: info.original_path,
            deletion_date: info.deletion_date,
        })
    }

    pub fn find(&self, name: &str) -> Option<TrashItem> {
        if !is_plain_name(name) {
            return None;
        }
        self.item_from_sidecar(&self.info_path(name))
    }

    /// Permanently delete one item and its sidecar
    pub fn purge(&self, name: &str) -> Result<(), FsError> {
        if !is_plain_name(name) {
            return Err(FsError::InvalidName(name.to_string()));
        }

        let trashed_path = self.files_dir.join(name);
        let info_path = self.info_path(name);
        if !filesystem::exists(&trashed_path) && !filesystem::exists(&info_path) {
            return Err(FsError::NotFound(trashed_path));
        }

        if filesystem::exists(&trashed_path) {
            filesystem::remove_entry(&trashed_path).at(&trashed_path)?;
        }
        if filesystem::exists(&info_path) {
            fs::remove_file(&info_path).at(&info_path)?;
        }

        info!("purged {} from trash", name);
        Ok(())
    }

    /// Move an item back to where it was deleted from
    pub fn restore(&self, name: &str) -> Result<PathBuf, FsError> {
        let item = self
            .find(name)
            .ok_or_else(|| FsError::NotFound(self.files_dir.join(name)))?;

        if filesystem::exists(&item.original_path) {
            let taken = item
                .original_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| item.original_path.display().to_string());
            return Err(FsError::AlreadyExists(taken));
        }

        if let Some(parent) = item.original_path.parent() {
            fs::create_dir_all(parent).at(parent)?;
        }
        filesystem::move_entry(&item.trashed_path, &item.original_path).at(&item.trashed_path)?;

        let info_path = self.info_path(name);
        if let Err(err) = fs::remove_file(&info_path) {
            warn!("stale sidecar {} left behind: {}", info_path.display(), err);
        }

        info!("restored {} to {}", name, item.original_path.display());
        Ok(item.original_path)
    }
}

fn suffixed_name(base: &str, counter: usize) -> String {
    // Leading dots belong to the stem: ".bashrc" and "..foo" have no extension
    let leading = base.len() - base.trim_start_matches('.').len();
    match base[leading..].rfind('.') {
        Some(dot) => {
            let (stem, ext) = base.split_at(leading + dot);
            format!("{}_{}{}", stem, counter, ext)
        }
        None => format!("{}_{}", base, counter),
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

fn read_dir_paths(dir: &Path, errors: &mut Vec<FsError>) -> Vec<PathBuf> {
    match fs::read_dir(dir) {
        Ok(read_dir) => read_dir.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(err) => {
            errors.push(FsError::io(dir, err));
            Vec::new()
        }
    }
}
