//! Pure path-string transforms. None of these touch the filesystem except
//! [`abs_path`] and [`relative_path`], which only read the current working
//! directory.

use std::path::{Component, Path, PathBuf};

use crate::fs_op::error::{FileError, Result};

/// Final component of `path` including its extension, or an empty string for
/// paths such as `/` or `..` that have none.
pub fn basename<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Directory containing `path`. A bare file name lives in `.`.
pub fn dirname<P: AsRef<Path>>(path: P) -> PathBuf {
    match path.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        Some(_) => PathBuf::from("."),
        None => path.as_ref().to_path_buf(),
    }
}

/// Final component without its extension (`notes.txt` -> `notes`).
pub fn filename<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extension of the final component, if it has one.
pub fn extension<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
}

/// Dot-files are hidden. `.` and `..` have no basename and are not.
pub fn is_hidden<P: AsRef<Path>>(path: P) -> bool {
    basename(path).starts_with('.')
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| FileError::from_io(e, "."))
}

/// `path` made absolute against the current working directory. Symlinks are
/// not resolved and the path need not exist.
pub fn abs_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let p = path.as_ref();
    if p.is_absolute() {
        return Ok(p.to_path_buf());
    }
    Ok(current_dir()?.join(p))
}

/// `path` expressed relative to `base`, or `None` if it lies outside it.
///
/// Purely lexical: `.` components are ignored, `..` is not collapsed. A path
/// equal to `base` is `.`.
pub fn relative_to<P: AsRef<Path>, B: AsRef<Path>>(path: P, base: B) -> Option<PathBuf> {
    fn lexical(p: &Path) -> PathBuf {
        p.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    }
    let rel = lexical(path.as_ref())
        .strip_prefix(lexical(base.as_ref()))
        .ok()?
        .to_path_buf();
    if rel.as_os_str().is_empty() {
        Some(PathBuf::from("."))
    } else {
        Some(rel)
    }
}

/// `path` relative to the current working directory. A path outside the
/// working directory comes back absolute.
pub fn relative_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let abs = abs_path(path)?;
    let cwd = current_dir()?;
    Ok(relative_to(&abs, &cwd).unwrap_or(abs))
}
