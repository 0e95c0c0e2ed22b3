//! File operations (copy, move, remove)

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Copy a file or directory
///
/// Directories are merged into an existing destination directory.
pub fn copy_entry(src: &Path, dest: &Path) -> io::Result<()> {
    if src.is_dir() {
        copy_directory(src, dest)
    } else {
        copy_file(src, dest)
    }
}

/// Copy a directory recursively
fn copy_directory(src: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;

    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry.map_err(io::Error::from)?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let dest_path = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)?;
        } else {
            copy_file(entry.path(), &dest_path)?;
        }
    }

    Ok(())
}

/// Copy file bytes, permissions and timestamps
fn copy_file(src: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(src, dest)?;

    let metadata = fs::metadata(src)?;
    let mut times = fs::FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Err(err) = fs::File::open(dest).and_then(|f| f.set_times(times)) {
        tracing::debug!("could not preserve timestamps on {}: {}", dest.display(), err);
    }

    Ok(())
}

/// Move a file or directory
///
/// Tries a rename first and falls back to copy + remove across devices.
/// An existing destination directory receives the source's contents.
pub fn move_entry(src: &Path, dest: &Path) -> io::Result<()> {
    if src.is_dir() && dest.is_dir() {
        copy_directory(src, dest)?;
        return remove_entry(src);
    }

    if fs::symlink_metadata(dest).is_ok() {
        remove_entry(dest)?;
    }

    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(err),
        Err(err) => {
            tracing::debug!("rename {} failed ({}), copying instead", src.display(), err);
            if let Err(copy_err) = copy_entry(src, dest) {
                let _ = remove_entry(dest);
                return Err(copy_err);
            }
            remove_entry(src)
        }
    }
}

/// Delete a file or directory permanently
///
/// Symlinks are removed, never followed.
pub fn remove_entry(path: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// True if `path` equals `ancestor` or lies below it
pub fn is_within(path: &Path, ancestor: &Path) -> bool {
    match (path.canonicalize(), ancestor.canonicalize()) {
        (Ok(path), Ok(ancestor)) => path.starts_with(ancestor),
        _ => path.starts_with(ancestor),
    }
}
