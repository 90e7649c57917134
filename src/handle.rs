use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::backup::{self, BackupRecord, BackupResult, BackupVerification};
use crate::fs_op::error::Result;
use crate::fs_op::hash::{self, FileDigest, HashAlgorithm};
use crate::fs_op::search::{self, GrepLines, SearchPattern};
use crate::fs_op::{path, remove, stat, touch};
use crate::settings::BackupSettings;

/// A file-system path plus the operations that make sense on it.
///
/// The handle stores only the path and its backup settings. Every query
/// goes back to the file system, so results always reflect the file as it
/// is now; two successive calls are not a consistent snapshot. The path
/// need not exist when the handle is created, and no descriptor is held
/// between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    path: PathBuf,
    settings: BackupSettings,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_settings(path, BackupSettings::default())
    }

    pub fn with_settings(path: impl Into<PathBuf>, settings: BackupSettings) -> Self {
        Self {
            path: path.into(),
            settings,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &BackupSettings {
        &self.settings
    }

    // Path transforms: never touch the disk, never fail.

    pub fn basename(&self) -> String {
        path::basename(&self.path)
    }

    pub fn dirname(&self) -> PathBuf {
        path::dirname(&self.path)
    }

    /// Basename without its extension.
    pub fn filename(&self) -> String {
        path::filename(&self.path)
    }

    pub fn extension(&self) -> Option<String> {
        path::extension(&self.path)
    }

    pub fn abs_path(&self) -> Result<PathBuf> {
        path::abs_path(&self.path)
    }

    /// Path relative to the working directory; absolute if outside it.
    pub fn relative_path(&self) -> Result<PathBuf> {
        path::relative_path(&self.path)
    }

    pub fn is_hidden(&self) -> bool {
        path::is_hidden(&self.path)
    }

    pub fn file_class(&self) -> FileClass {
        FileClass::classify(self.is_hidden(), false)
    }

    // Live metadata.

    pub fn exists(&self) -> bool {
        stat::exists(&self.path)
    }

    pub fn size(&self) -> Result<u64> {
        stat::size(&self.path)
    }

    pub fn last_modified(&self) -> Result<SystemTime> {
        stat::last_modified(&self.path)
    }

    /// `true` if the file changed after `reference`.
    pub fn is_modified_since(&self, reference: SystemTime) -> Result<bool> {
        stat::is_modified_since(&self.path, reference)
    }

    pub fn line_count(&self) -> Result<usize> {
        search::line_count(&self.path)
    }

    #[cfg(unix)]
    pub fn owner(&self) -> Result<String> {
        crate::fs_op::permissions::owner(&self.path)
    }

    #[cfg(unix)]
    pub fn group(&self) -> Result<String> {
        crate::fs_op::permissions::group(&self.path)
    }

    // Content.

    pub fn md5(&self) -> Result<FileDigest> {
        hash::digest_file(&self.path, HashAlgorithm::Md5, self.settings.chunk_size)
    }

    pub fn sha256(&self) -> Result<FileDigest> {
        hash::digest_file(&self.path, HashAlgorithm::Sha256, self.settings.chunk_size)
    }

    /// Lazily yield the lines matching `pattern`.
    pub fn grep(&self, pattern: impl Into<SearchPattern>) -> Result<GrepLines> {
        search::grep(&self.path, &pattern.into())
    }

    // Mutation.

    pub fn touch(&self) -> Result<SystemTime> {
        touch::touch(&self.path)
    }

    pub fn truncate(&self, len: u64) -> Result<()> {
        touch::truncate(&self.path, len)
    }

    /// Remove the file; `false` if it was already gone.
    pub fn delete(&self) -> Result<bool> {
        remove::delete(&self.path)
    }

    #[cfg(unix)]
    pub fn set_mode(&self, mode: u32) -> Result<()> {
        crate::fs_op::permissions::set_mode(&self.path, mode)
    }

    // Backups.

    /// Write a timestamped zip of the file into `destination_dir`.
    pub fn create_backup(&self, destination_dir: impl AsRef<Path>) -> Result<BackupResult> {
        backup::create_backup_with(&self.path, destination_dir, &self.settings)
    }

    /// Check a backup archive against its own record.
    pub fn verify_backup(archive: impl AsRef<Path>) -> Result<BackupVerification> {
        backup::verify_backup(archive)
    }

    pub fn read_backup_record(archive: impl AsRef<Path>) -> Result<BackupRecord> {
        backup::read_backup_record(archive)
    }

    /// Hand the file's lifetime to the returned guard, which deletes it on
    /// drop.
    pub fn into_temporary(self) -> TemporaryFile {
        TemporaryFile {
            handle: self,
            keep: false,
        }
    }
}

/// Visibility and lifetime class of a handle's file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileClass {
    Normal,
    Hidden,
    Temporary,
    HiddenTemporary,
}

impl FileClass {
    fn classify(hidden: bool, temporary: bool) -> Self {
        match (hidden, temporary) {
            (false, false) => FileClass::Normal,
            (true, false) => FileClass::Hidden,
            (false, true) => FileClass::Temporary,
            (true, true) => FileClass::HiddenTemporary,
        }
    }

    pub fn is_hidden(self) -> bool {
        matches!(self, FileClass::Hidden | FileClass::HiddenTemporary)
    }

    pub fn is_temporary(self) -> bool {
        matches!(self, FileClass::Temporary | FileClass::HiddenTemporary)
    }
}

/// A [`FileHandle`] whose file is deleted when the guard is dropped.
///
/// Plain handles own nothing; this is the only type in the crate with
/// teardown. Removal failures on drop are logged, not raised. A file that
/// is already gone is not an error.
#[derive(Debug)]
pub struct TemporaryFile {
    handle: FileHandle,
    keep: bool,
}

impl TemporaryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileHandle::new(path).into_temporary()
    }

    pub fn handle(&self) -> &FileHandle {
        &self.handle
    }

    pub fn file_class(&self) -> FileClass {
        FileClass::classify(self.handle.is_hidden(), true)
    }

    /// Disarm the guard and return a plain handle; the file stays.
    pub fn keep(mut self) -> FileHandle {
        self.keep = true;
        self.handle.clone()
    }
}

impl Deref for TemporaryFile {
    type Target = FileHandle;

    fn deref(&self) -> &FileHandle {
        &self.handle
    }
}

impl Drop for TemporaryFile {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        match remove::delete(&self.handle.path) {
            Ok(true) => tracing::debug!("removed temporary file {}", self.handle.path.display()),
            Ok(false) => {}
            Err(e) => tracing::warn!(
                "failed to remove temporary file {}: {}",
                self.handle.path.display(),
                e
            ),
        }
    }
}

impl From<PathBuf> for FileHandle {
    fn from(path: PathBuf) -> Self {
        FileHandle::new(path)
    }
}

impl From<&Path> for FileHandle {
    fn from(path: &Path) -> Self {
        FileHandle::new(path)
    }
}

impl AsRef<Path> for FileHandle {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
