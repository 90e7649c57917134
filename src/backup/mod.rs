//! Timestamped, self-verifying zip backups of a single file.
//!
//! A backup is one zip archive in a caller-chosen directory holding the
//! file's bytes under its original name plus a TOML companion record with
//! the SHA-256 of those bytes. The source is streamed once: each chunk is
//! hashed and archived from the same buffer, so the recorded digest always
//! describes the archived bytes even if the source changes mid-call.
//!
//! Nothing is locked. A backup taken while another process writes the source
//! is internally consistent but may already be stale when it returns.

mod archive;
pub mod naming;
pub mod record;
pub mod verify;

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SubsecRound, Utc};

use crate::fs_op::error::{FileError, Result};
use crate::fs_op::{path, remove, stat};
use crate::settings::BackupSettings;

use self::archive::{write_archive, ArchivePaths, ContentEntry};

pub use self::record::BackupRecord;
pub use self::verify::{read_backup_record, verify_backup, BackupVerification};

/// Outcome of a successful backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupResult {
    pub archive_path: PathBuf,
    /// Lowercase hex SHA-256 of the archived bytes.
    pub sha256: String,
    /// Number of bytes archived.
    pub original_size: u64,
    pub captured_at: DateTime<Utc>,
}

/// Back up `source` into `destination_dir` with default settings.
pub fn create_backup<P, Q>(source: P, destination_dir: Q) -> Result<BackupResult>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    create_backup_with(source, destination_dir, &BackupSettings::default())
}

/// Back up `source` into `destination_dir` using `settings`.
pub fn create_backup_with<P, Q>(
    source: P,
    destination_dir: Q,
    settings: &BackupSettings,
) -> Result<BackupResult>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    create_backup_at(source, destination_dir, settings, naming::capture_timestamp())
}

/// Back up `source` as if captured at `captured_at`.
///
/// The timestamp is truncated to whole seconds and determines the archive
/// name, so two calls with the same second and source collide with
/// [`FileError::BackupConflict`] instead of overwriting each other.
///
/// `settings` is validated first; invalid settings fail with
/// [`FileError::Settings`] before anything is read or created.
pub fn create_backup_at<P, Q>(
    source: P,
    destination_dir: Q,
    settings: &BackupSettings,
    captured_at: DateTime<Utc>,
) -> Result<BackupResult>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let source = source.as_ref();
    let destination_dir = destination_dir.as_ref();
    let captured_at = captured_at.trunc_subsecs(0);
    settings.validate()?;

    let meta = stat::require_file(source)?;
    stat::require_dir(destination_dir)?;

    let basename = path::basename(source);
    let mut reader = File::open(source).map_err(|e| FileError::from_io(e, source))?;

    let archive_path = destination_dir.join(naming::archive_name(
        &basename,
        captured_at,
        &settings.archive_extension,
    ));
    tracing::debug!(
        "backing up {} to {}",
        source.display(),
        archive_path.display()
    );

    let sink = claim(&archive_path)?;
    let entry = ContentEntry {
        name: &basename,
        modified_at: meta.modified().ok(),
        captured_at,
        expected_size: meta.len(),
    };
    let paths = ArchivePaths {
        source,
        archive: &archive_path,
    };

    let written = write_archive(sink, &mut reader, entry, settings, paths).and_then(|(file, record)| {
        if settings.sync_on_finish {
            file.sync_all().map_err(|e| FileError::from_io(e, &archive_path))?;
            sync_dir(destination_dir)?;
        }
        Ok(record)
    });

    match written {
        Ok(record) => {
            tracing::info!(
                "backup of {} written to {} (sha256 {}, {} bytes)",
                source.display(),
                archive_path.display(),
                record.sha256,
                record.original_size
            );
            Ok(BackupResult {
                archive_path,
                sha256: record.sha256,
                original_size: record.original_size,
                captured_at,
            })
        }
        Err(e) => {
            remove::discard(&archive_path);
            Err(e)
        }
    }
}

/// Create the archive file exclusively so an existing backup is never
/// overwritten, even by a concurrent caller.
fn claim(archive_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(archive_path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => FileError::BackupConflict(archive_path.to_path_buf()),
            _ => FileError::from_io(e, archive_path),
        })
}

/// Flush the directory entry of a newly created file.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(|e| FileError::from_io(e, dir))
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}
