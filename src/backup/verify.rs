use std::path::Path;

use crate::backup::archive::BackupArchive;
use crate::backup::record::BackupRecord;
use crate::fs_op::error::Result;
use crate::fs_op::hash::DEFAULT_CHUNK_SIZE;

/// Result of re-checking an archive against its own companion record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupVerification {
    pub record: BackupRecord,
    /// SHA-256 recomputed from the archived content entry.
    pub actual_sha256: String,
    pub actual_size: u64,
    /// `true` when both digest and size agree with the record.
    pub intact: bool,
}

/// Read the companion record of the backup archive at `archive`.
pub fn read_backup_record<P: AsRef<Path>>(archive: P) -> Result<BackupRecord> {
    BackupArchive::open(archive.as_ref())?.record()
}

/// Recompute the digest of the archived bytes and compare it with the
/// record stored in the same archive.
///
/// A mismatch is reported through [`BackupVerification::intact`], not as an
/// error; errors mean the archive could not be read at all.
pub fn verify_backup<P: AsRef<Path>>(archive: P) -> Result<BackupVerification> {
    let archive = archive.as_ref();
    let mut zip = BackupArchive::open(archive)?;
    let record = zip.record()?;
    let (actual_sha256, actual_size) = zip.hash_entry(&record.original_name, DEFAULT_CHUNK_SIZE)?;
    let intact = actual_sha256.eq_ignore_ascii_case(&record.sha256) && actual_size == record.original_size;
    if !intact {
        tracing::warn!(
            "backup {} failed verification: recorded {}, found {}",
            archive.display(),
            record.sha256,
            actual_sha256
        );
    }
    Ok(BackupVerification {
        record,
        actual_sha256,
        actual_size,
        intact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::create_backup;
    use crate::fs_op::error::FileError;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    #[test]
    fn fresh_backup_is_intact() {
        let td = tempdir().unwrap();
        let src = td.path().join("notes.txt");
        fs::write(&src, "hello\nworld\n").unwrap();
        let dest = tempdir().unwrap();
        let r = create_backup(&src, dest.path()).unwrap();

        let v = verify_backup(&r.archive_path).unwrap();
        assert!(v.intact);
        assert_eq!(v.actual_sha256, r.sha256);
        assert_eq!(v.actual_size, 12);
    }

    #[test]
    fn tampered_content_is_detected() {
        let td = tempdir().unwrap();
        let path = td.path().join("forged.zip");
        let record = format!(
            "original_name = \"a.txt\"\nsha256 = \"{}\"\noriginal_size = 3\ncaptured_at = \"2024-01-01T00:00:00Z\"\n",
            "0".repeat(64)
        );
        let mut zip = ZipWriter::new(fs::File::create(&path).unwrap());
        zip.start_file("a.txt", SimpleFileOptions::default()).unwrap();
        zip.write_all(b"abc").unwrap();
        zip.start_file("a.txt.backup.toml", SimpleFileOptions::default()).unwrap();
        zip.write_all(record.as_bytes()).unwrap();
        zip.finish().unwrap();

        let v = verify_backup(&path).unwrap();
        assert!(!v.intact);
        assert_eq!(v.actual_size, 3);
    }

    #[test]
    fn archive_without_record_is_rejected() {
        let td = tempdir().unwrap();
        let path = td.path().join("plain.zip");
        let mut zip = ZipWriter::new(fs::File::create(&path).unwrap());
        zip.start_file("a.txt", SimpleFileOptions::default()).unwrap();
        zip.write_all(b"abc").unwrap();
        zip.finish().unwrap();

        assert!(matches!(verify_backup(&path), Err(FileError::Record { .. })));
    }

    #[test]
    fn file_named_like_a_record_still_resolves() {
        let td = tempdir().unwrap();
        let src = td.path().join("x.backup.toml");
        fs::write(&src, "not a record").unwrap();
        let dest = tempdir().unwrap();
        let r = create_backup(&src, dest.path()).unwrap();

        let v = verify_backup(&r.archive_path).unwrap();
        assert_eq!(v.record.original_name, "x.backup.toml");
        assert!(v.intact);
    }

    #[test]
    fn non_zip_is_an_archive_error() {
        let td = tempdir().unwrap();
        let path = td.path().join("junk.zip");
        fs::write(&path, "definitely not a zip\n".repeat(64)).unwrap();
        assert!(matches!(
            read_backup_record(&path),
            Err(FileError::Archive { .. } | FileError::Io { .. })
        ));
    }
}
