use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors produced by the filesystem helpers and the backup pipeline.
///
/// Every variant carries the path it concerns so callers can report which
/// side of an operation (source or destination) failed.
#[derive(Error, Debug)]
pub enum FileError {
    /// The path did not exist when the operation needed it.
    #[error("path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// Permission was denied reading or writing `path`.
    #[error("permission denied: {}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The operation requires a regular file but `path` is a directory.
    #[error("is a directory: {}", .0.display())]
    IsADirectory(PathBuf),

    /// The operation requires a directory but `path` is something else.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A backup archive with the same name already exists.
    #[error("backup archive already exists: {}", .0.display())]
    BackupConflict(PathBuf),

    /// The device ran out of space while writing `path`.
    #[error("no space left on device writing {}", path.display())]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The zip layer rejected or failed to produce an archive.
    #[error("archive error in {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// A backup's companion record is missing or unreadable.
    #[error("invalid backup record in {}: {message}", path.display())]
    Record { path: PathBuf, message: String },

    /// The search pattern is not a valid regular expression.
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Backup settings failed validation.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),
}

pub type Result<T, E = FileError> = std::result::Result<T, E>;

impl FileError {
    /// Classify an `io::Error` raised while operating on `path`.
    pub fn from_io(err: io::Error, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => FileError::NotFound(path),
            io::ErrorKind::PermissionDenied => FileError::Access { path, source: err },
            io::ErrorKind::IsADirectory => FileError::IsADirectory(path),
            io::ErrorKind::NotADirectory => FileError::NotADirectory(path),
            io::ErrorKind::StorageFull => FileError::DiskFull { path, source: err },
            _ => FileError::Io { path, source: err },
        }
    }

    /// Classify a zip error, unwrapping the I/O failures it wraps.
    pub fn from_zip(err: zip::result::ZipError, path: impl AsRef<Path>) -> Self {
        match err {
            zip::result::ZipError::Io(e) => FileError::from_io(e, path),
            other => FileError::Archive {
                path: path.as_ref().to_path_buf(),
                source: other,
            },
        }
    }

    /// Returns the path the error concerns, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            FileError::NotFound(p)
            | FileError::IsADirectory(p)
            | FileError::NotADirectory(p)
            | FileError::BackupConflict(p) => Some(p),
            FileError::Access { path, .. }
            | FileError::DiskFull { path, .. }
            | FileError::Io { path, .. }
            | FileError::Archive { path, .. }
            | FileError::Record { path, .. } => Some(path),
            FileError::Pattern(_) | FileError::Settings(_) => None,
        }
    }
}
