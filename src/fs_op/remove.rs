use std::fs;
use std::io;
use std::path::Path;

use crate::fs_op::error::{FileError, Result};

/// Remove the regular file at `path`.
///
/// Returns `Ok(false)` when the path does not exist so callers can attempt
/// removal without checking for existence first. Directories are refused
/// with [`FileError::IsADirectory`]; a symlink is removed, not its target.
///
/// # Examples
///
/// ```no_run
/// use filekeep::fs_op::remove::delete;
/// let removed = delete("/tmp/some_file.txt").expect("remove failed");
/// ```
pub fn delete(path: impl AsRef<Path>) -> Result<bool> {
    let p = path.as_ref();

    match fs::symlink_metadata(p) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(FileError::from_io(e, p)),
        Ok(m) if m.is_dir() => return Err(FileError::IsADirectory(p.to_path_buf())),
        Ok(_) => {}
    }

    fs::remove_file(p).map_err(|e| FileError::from_io(e, p))?;
    Ok(true)
}

/// Remove a half-written artifact, logging instead of failing. Used on
/// error paths where the original error is the one worth propagating.
pub(crate) fn discard(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::warn!("removed partial file {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("failed to remove partial file {}: {}", path.display(), e),
    }
}
