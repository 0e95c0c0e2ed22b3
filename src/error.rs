//! Typed failures of file operations

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("'{}' does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("'{0}' already exists")]
    AlreadyExists(String),
    #[error("permission denied: {}", .path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("operation on '{}' failed: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("operation cancelled")]
    Cancelled,
    #[error("'{0}' is not a valid name")]
    InvalidName(String),
    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("{} operation(s) failed", .0.len())]
    Aggregate(Vec<FsError>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    PermissionDenied,
    Io,
    Cancelled,
    InvalidName,
    NotADirectory,
}

/// How a failure is reported to the user
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Operation simply was not performed
    Silent,
    Warning,
    Error,
}

impl FsError {
    /// Classify an io error raised while operating on `path`
    pub fn io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists(display_name(path)),
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied {
                path: path.to_path_buf(),
                source,
            },
            _ => FsError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Classify a failure that happened after the source was found
    ///
    /// A missing path at this point is an I/O failure, not a missing source.
    pub fn failed(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => FsError::Io {
                path: path.to_path_buf(),
                source,
            },
            _ => FsError::io(path, source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FsError::NotFound(_) => ErrorKind::NotFound,
            FsError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            FsError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            FsError::Io { .. } | FsError::Aggregate(_) => ErrorKind::Io,
            FsError::Cancelled => ErrorKind::Cancelled,
            FsError::InvalidName(_) => ErrorKind::InvalidName,
            FsError::NotADirectory(_) => ErrorKind::NotADirectory,
        }
    }

    pub fn severity(&self) -> Severity {
        match self.kind() {
            ErrorKind::NotFound | ErrorKind::Cancelled => Severity::Silent,
            ErrorKind::AlreadyExists | ErrorKind::InvalidName | ErrorKind::NotADirectory => {
                Severity::Warning
            }
            ErrorKind::PermissionDenied | ErrorKind::Io => Severity::Error,
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Attach `path` to a raw io result
pub(crate) trait IoResultExt<T> {
    fn at(self, path: &Path) -> Result<T, FsError>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T, FsError> {
        self.map_err(|e| FsError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_classification() {
        let path = Path::new("/tmp/some/file.txt");

        let err = FsError::io(path, io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = FsError::io(path, io::Error::from(io::ErrorKind::AlreadyExists));
        assert!(matches!(err, FsError::AlreadyExists(ref name) if name == "file.txt"));

        let err = FsError::io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);

        let err = FsError::io(path, io::Error::other("disk on fire"));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_failed_is_never_not_found() {
        let path = Path::new("/tmp/dest/file.txt");

        let err = FsError::failed(path, io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.severity(), Severity::Error);
        assert!(err.to_string().contains("/tmp/dest/file.txt"));

        let err = FsError::failed(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_severity() {
        assert_eq!(FsError::Cancelled.severity(), Severity::Silent);
        assert_eq!(FsError::NotFound(PathBuf::from("/x")).severity(), Severity::Silent);
        assert_eq!(FsError::AlreadyExists("x".into()).severity(), Severity::Warning);
        assert_eq!(FsError::Aggregate(Vec::new()).severity(), Severity::Error);
    }
}
