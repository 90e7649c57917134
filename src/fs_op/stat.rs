//! Live metadata queries. Nothing here caches: every call stats the path.

use std::fs::{self, Metadata};
use std::path::Path;
use std::time::SystemTime;

use crate::fs_op::error::{FileError, Result};

/// Lightweight classification of a filesystem path's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    /// The path does not exist.
    NotFound,
    /// The path exists and is a directory.
    Directory,
    /// The path exists and is a regular file.
    File,
    /// The path exists but is neither a regular file nor a directory
    /// (socket, FIFO, device, ...).
    Other,
}

impl PathType {
    /// Classify `path` with a single `metadata` call.
    pub fn of<P: AsRef<Path>>(path: P) -> Self {
        match fs::metadata(path.as_ref()) {
            Err(_) => PathType::NotFound,
            Ok(m) if m.is_dir() => PathType::Directory,
            Ok(m) if m.is_file() => PathType::File,
            Ok(_) => PathType::Other,
        }
    }
}

/// Return `true` if the provided `path` exists.
pub fn exists<P: AsRef<Path>>(path: P) -> bool {
    PathType::of(path) != PathType::NotFound
}

/// Return `true` if the provided `path` is a directory.
pub fn is_dir<P: AsRef<Path>>(path: P) -> bool {
    PathType::of(path) == PathType::Directory
}

/// Return `true` if the provided `path` is a regular file.
pub fn is_file<P: AsRef<Path>>(path: P) -> bool {
    PathType::of(path) == PathType::File
}

/// Stat `path`, mapping failures onto [`FileError`].
pub fn metadata<P: AsRef<Path>>(path: P) -> Result<Metadata> {
    let p = path.as_ref();
    fs::metadata(p).map_err(|e| FileError::from_io(e, p))
}

/// Stat `path` and require it to be a regular file.
///
/// Directories yield [`FileError::IsADirectory`]; any other non-file kind is
/// reported as an I/O error of kind `InvalidInput`.
pub fn require_file<P: AsRef<Path>>(path: P) -> Result<Metadata> {
    let p = path.as_ref();
    let meta = metadata(p)?;
    if meta.is_dir() {
        return Err(FileError::IsADirectory(p.to_path_buf()));
    }
    if !meta.is_file() {
        return Err(FileError::Io {
            path: p.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }
    Ok(meta)
}

/// Stat `path` and require it to be a directory.
pub fn require_dir<P: AsRef<Path>>(path: P) -> Result<Metadata> {
    let p = path.as_ref();
    let meta = metadata(p)?;
    if !meta.is_dir() {
        return Err(FileError::NotADirectory(p.to_path_buf()));
    }
    Ok(meta)
}

/// Size of `path` in bytes.
pub fn size<P: AsRef<Path>>(path: P) -> Result<u64> {
    Ok(metadata(path)?.len())
}

/// Modification time of `path`.
pub fn last_modified<P: AsRef<Path>>(path: P) -> Result<SystemTime> {
    let p = path.as_ref();
    metadata(p)?.modified().map_err(|e| FileError::from_io(e, p))
}

/// `true` when the modification time of `path` is strictly after `reference`.
pub fn is_modified_since<P: AsRef<Path>>(path: P, reference: SystemTime) -> Result<bool> {
    Ok(last_modified(path)? > reference)
}
