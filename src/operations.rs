//! Create, rename and delete entries

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{FsError, IoResultExt};
use crate::filesystem;
use crate::trash::{TrashItem, TrashStore};

/// Outcome of trashing a batch of paths
#[derive(Debug, Default)]
pub struct TrashReport {
    pub trashed: Vec<TrashItem>,
    pub failed: Vec<(PathBuf, FsError)>,
}

impl TrashReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

fn validate_name(name: &str) -> Result<(), FsError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(FsError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn new_entry_path(dir: &Path, name: &str) -> Result<PathBuf, FsError> {
    validate_name(name)?;
    let path = dir.join(name);
    if filesystem::exists(&path) {
        return Err(FsError::AlreadyExists(name.to_string()));
    }
    Ok(path)
}

/// Create an empty directory `name` inside `dir`
pub fn create_folder(dir: &Path, name: &str) -> Result<PathBuf, FsError> {
    let path = new_entry_path(dir, name)?;
    fs::create_dir(&path).at(&path)?;
    info!("created folder {}", path.display());
    Ok(path)
}

/// Create a zero-byte file `name` inside `dir`
pub fn create_file(dir: &Path, name: &str) -> Result<PathBuf, FsError> {
    let path = new_entry_path(dir, name)?;
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .at(&path)?;
    info!("created file {}", path.display());
    Ok(path)
}

/// Rename `old_path` within its parent
///
/// Renaming to the current name succeeds without touching the disk.
pub fn rename(old_path: &Path, new_name: &str) -> Result<PathBuf, FsError> {
    if old_path.file_name().is_some_and(|n| n == new_name) {
        return Ok(old_path.to_path_buf());
    }
    if !filesystem::exists(old_path) {
        return Err(FsError::NotFound(old_path.to_path_buf()));
    }

    let parent = old_path.parent().unwrap_or(Path::new("/"));
    let new_path = new_entry_path(parent, new_name)?;
    fs::rename(old_path, &new_path).at(old_path)?;
    info!("renamed {} to {}", old_path.display(), new_name);
    Ok(new_path)
}

/// Move `paths` to the trash once the user confirmed
///
/// Each path is attempted on its own; failures are collected in the report.
pub fn delete(
    trash: &TrashStore,
    paths: &[PathBuf],
    confirmed: bool,
) -> Result<TrashReport, FsError> {
    if !confirmed {
        return Err(FsError::Cancelled);
    }

    let mut report = TrashReport::default();
    for path in paths {
        match trash.move_to_trash(path) {
            Ok(item) => report.trashed.push(item),
            Err(err) => {
                warn!("could not trash {}: {}", path.display(), err);
                report.failed.push((path.clone(), err));
            }
        }
    }
    Ok(report)
}
