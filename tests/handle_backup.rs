use std::fs;
use std::io::Read;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use chrono::{TimeZone, Utc};
use predicates::prelude::*;

use filekeep::backup::create_backup_at;
use filekeep::{BackupSettings, FileError, FileHandle};

fn dir_len(dir: &std::path::Path) -> usize {
    fs::read_dir(dir).map(|it| it.count()).unwrap_or(0)
}

// The digest stored in the archive equals one computed independently before
// the backup ran.
#[test]
fn backup_digest_matches_prior_sha256() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let notes = tmp.child("notes.txt");
    notes.write_str("hello\nworld\n")?;
    let dest = tmp.child("backups");
    dest.create_dir_all()?;

    let handle = FileHandle::new(notes.path());
    let before = handle.sha256()?.to_hex();
    let result = handle.create_backup(dest.path())?;

    assert_eq!(result.sha256, before);
    assert_eq!(result.original_size, 12);
    let record = FileHandle::read_backup_record(&result.archive_path)?;
    assert_eq!(record.sha256, before);
    assert_eq!(record.original_size, 12);

    let name = result.archive_path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(
        predicate::str::is_match(r"^notes\.txt_\d{8}T\d{6}Z\.zip$")?.eval(&name),
        "unexpected archive name {name}"
    );
    Ok(())
}

// The archive holds the original bytes under the original file name.
#[test]
fn archive_contains_original_bytes() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let src = tmp.child("data.bin");
    let payload: Vec<u8> = (0..300_000u32).map(|i| (i % 253) as u8).collect();
    src.write_binary(&payload)?;
    let dest = TempDir::new()?;

    let result = FileHandle::new(src.path()).create_backup(dest.path())?;

    let mut zip = zip::ZipArchive::new(fs::File::open(&result.archive_path)?)?;
    let mut restored = Vec::new();
    zip.by_name("data.bin")?.read_to_end(&mut restored)?;
    assert_eq!(restored, payload);
    assert!(FileHandle::verify_backup(&result.archive_path)?.intact);
    Ok(())
}

#[test]
fn same_second_backup_conflicts() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let src = tmp.child("a.txt");
    src.write_str("x")?;
    let dest = TempDir::new()?;
    let t = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
    let settings = BackupSettings::default();

    create_backup_at(src.path(), dest.path(), &settings, t)?;
    let second = create_backup_at(src.path(), dest.path(), &settings, t);
    assert!(matches!(second, Err(FileError::BackupConflict(_))));

    let third = create_backup_at(src.path(), dest.path(), &settings, t + chrono::Duration::seconds(1))?;
    assert!(third.archive_path.exists());
    assert_eq!(dir_len(dest.path()), 2);
    Ok(())
}

#[test]
fn nonexistent_source_leaves_destination_empty() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let dest = TempDir::new()?;
    let handle = FileHandle::new(tmp.child("ghost.txt").path());

    assert!(matches!(handle.create_backup(dest.path()), Err(FileError::NotFound(_))));
    assert_eq!(dir_len(dest.path()), 0);
    Ok(())
}

#[cfg(unix)]
#[test]
fn unwritable_destination_is_access_error() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new()?;
    let src = tmp.child("a.txt");
    src.write_str("x")?;
    let dest = TempDir::new()?;
    fs::set_permissions(dest.path(), fs::Permissions::from_mode(0o555))?;

    // Root ignores directory permissions; nothing to assert there.
    let write_check = dest.path().join(".write_check");
    if fs::write(&write_check, b"").is_ok() {
        fs::remove_file(&write_check)?;
        fs::set_permissions(dest.path(), fs::Permissions::from_mode(0o755))?;
        return Ok(());
    }

    let res = FileHandle::new(src.path()).create_backup(dest.path());
    fs::set_permissions(dest.path(), fs::Permissions::from_mode(0o755))?;
    assert!(matches!(res, Err(FileError::Access { .. })));
    assert_eq!(dir_len(dest.path()), 0);
    Ok(())
}

#[cfg(unix)]
#[test]
fn unreadable_source_is_access_error() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new()?;
    let src = tmp.child("secret.txt");
    src.write_str("classified")?;
    fs::set_permissions(src.path(), fs::Permissions::from_mode(0o000))?;
    let dest = TempDir::new()?;

    // Root can read mode 000 files; nothing to assert there.
    if fs::File::open(src.path()).is_ok() {
        fs::set_permissions(src.path(), fs::Permissions::from_mode(0o644))?;
        return Ok(());
    }

    let h = FileHandle::new(src.path());
    let sha = h.sha256();
    let md5 = h.md5();
    let backup = h.create_backup(dest.path());
    fs::set_permissions(src.path(), fs::Permissions::from_mode(0o644))?;

    assert!(matches!(sha, Err(FileError::Access { .. })));
    assert!(matches!(md5, Err(FileError::Access { .. })));
    assert!(matches!(backup, Err(FileError::Access { ref path, .. }) if path == src.path()));
    assert_eq!(dir_len(dest.path()), 0);
    Ok(())
}

#[test]
fn settings_file_drives_archive_extension() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let cfg = tmp.child("filekeep.toml");
    cfg.write_str("archive_extension = \"bak\"\nchunk_size = 1024\nsync_on_finish = false\n")?;
    let settings = filekeep::load_settings(cfg.path())?;

    let src = tmp.child("report.md");
    src.write_str("# title\n")?;
    let dest = TempDir::new()?;
    let result = FileHandle::with_settings(src.path(), settings).create_backup(dest.path())?;

    assert!(result.archive_path.extension().is_some_and(|e| e == "bak"));
    dest.child(result.archive_path.file_name().unwrap())
        .assert(predicate::path::is_file());
    Ok(())
}

#[test]
fn handle_settings_are_validated_at_backup_time() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let src = tmp.child("a.txt");
    src.write_str("x")?;
    let dest = TempDir::new()?;
    let settings = BackupSettings {
        archive_extension: "../escape".into(),
        ..BackupSettings::default()
    };

    let res = FileHandle::with_settings(src.path(), settings).create_backup(dest.path());
    assert!(matches!(res, Err(FileError::Settings(_))));
    assert_eq!(dir_len(dest.path()), 0);
    assert_eq!(dir_len(tmp.path()), 1);
    Ok(())
}
