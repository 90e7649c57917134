//! Zip container plumbing for backup artifacts.

use std::cell::Cell;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::backup::naming::{record_entry_name, RECORD_SUFFIX};
use crate::backup::record::BackupRecord;
use crate::fs_op::error::{FileError, Result};
use crate::fs_op::hash::encode_hex;
use crate::fs_op::test_helpers;
use crate::settings::BackupSettings;

/// Where a single archive write reads from and writes to; used for error
/// attribution.
pub(crate) struct ArchivePaths<'a> {
    pub source: &'a Path,
    pub archive: &'a Path,
}

/// What is known about the source before its bytes are streamed.
pub(crate) struct ContentEntry<'a> {
    pub name: &'a str,
    pub modified_at: Option<SystemTime>,
    pub captured_at: DateTime<Utc>,
    pub expected_size: u64,
}

fn entry_options(settings: &BackupSettings, expected_size: u64) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(settings.compression_level.map(|level| level as _))
        .large_file(expected_size >= u64::from(u32::MAX))
}

/// Sink wrapper that can be cut off once a write has failed.
///
/// Dropping an unfinished `ZipWriter` makes it write a central directory.
/// After detaching, writes and seeks only move a position counter, so that
/// final flush never reaches a file that is about to be discarded.
struct Detachable<W> {
    inner: W,
    detached: Rc<Cell<bool>>,
    pos: u64,
    len: u64,
}

impl<W> Detachable<W> {
    fn new(inner: W, detached: Rc<Cell<bool>>) -> Self {
        Self {
            inner,
            detached,
            pos: 0,
            len: 0,
        }
    }
}

impl<W: Write> Write for Detachable<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = if self.detached.get() {
            buf.len()
        } else {
            self.inner.write(buf)?
        };
        self.pos += n as u64;
        self.len = self.len.max(self.pos);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.detached.get() {
            return Ok(());
        }
        self.inner.flush()
    }
}

impl<W: Seek> Seek for Detachable<W> {
    fn seek(&mut self, to: SeekFrom) -> io::Result<u64> {
        self.pos = if self.detached.get() {
            match to {
                SeekFrom::Start(n) => Some(n),
                SeekFrom::Current(d) => self.pos.checked_add_signed(d),
                SeekFrom::End(d) => self.len.checked_add_signed(d),
            }
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "seek before start"))?
        } else {
            self.inner.seek(to)?
        };
        self.len = self.len.max(self.pos);
        Ok(self.pos)
    }
}

/// Stream `source` into a new zip on `sink`, hashing every chunk as it is
/// archived, then append the companion record.
///
/// The source is read exactly once; the recorded digest and the archived
/// bytes come from the same buffers. On failure nothing further is written
/// to `sink` once the error is known.
pub(crate) fn write_archive<W, R>(
    sink: W,
    source: &mut R,
    entry: ContentEntry<'_>,
    settings: &BackupSettings,
    paths: ArchivePaths<'_>,
) -> Result<(W, BackupRecord)>
where
    W: Write + Seek,
    R: Read,
{
    let detached = Rc::new(Cell::new(false));
    let mut zip = ZipWriter::new(Detachable::new(sink, Rc::clone(&detached)));

    match write_entries(&mut zip, source, entry, settings, &paths) {
        Ok(record) => {
            let sink = zip
                .finish()
                .map_err(|e| FileError::from_zip(e, paths.archive))?;
            Ok((sink.inner, record))
        }
        Err(e) => {
            detached.set(true);
            drop(zip);
            Err(e)
        }
    }
}

fn write_entries<W, R>(
    zip: &mut ZipWriter<W>,
    source: &mut R,
    entry: ContentEntry<'_>,
    settings: &BackupSettings,
    paths: &ArchivePaths<'_>,
) -> Result<BackupRecord>
where
    W: Write + Seek,
    R: Read,
{
    let zip_err = |e: zip::result::ZipError| FileError::from_zip(e, paths.archive);
    let write_err = |e: io::Error| FileError::from_io(e, paths.archive);

    zip.start_file(entry.name, entry_options(settings, entry.expected_size))
        .map_err(zip_err)?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; settings.chunk_size.max(1)];
    let mut size: u64 = 0;
    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(FileError::from_io(e, paths.source)),
        };
        hasher.update(&buf[..n]);
        zip.write_all(&buf[..n]).map_err(write_err)?;
        size += n as u64;
    }

    if test_helpers::should_force_archive_write_fail() {
        return Err(write_err(io::Error::other("injected archive write failure")));
    }

    let record = BackupRecord {
        original_name: entry.name.to_string(),
        sha256: encode_hex(&hasher.finalize()),
        original_size: size,
        modified_at: entry.modified_at.map(DateTime::<Utc>::from),
        captured_at: entry.captured_at,
    };
    let text = record.to_toml(paths.archive)?;

    zip.start_file(record_entry_name(entry.name), entry_options(settings, 0))
        .map_err(zip_err)?;
    zip.write_all(text.as_bytes()).map_err(write_err)?;
    Ok(record)
}

/// Read-side view of a backup artifact.
pub(crate) struct BackupArchive {
    path: PathBuf,
    zip: ZipArchive<File>,
}

impl BackupArchive {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| FileError::from_io(e, path))?;
        let zip = ZipArchive::new(file).map_err(|e| FileError::from_zip(e, path))?;
        Ok(Self {
            path: path.to_path_buf(),
            zip,
        })
    }

    /// The record entry is the one whose name is another entry's name plus
    /// [`RECORD_SUFFIX`]. Matching on the pair keeps this unambiguous even
    /// when the backed-up file itself ends in the suffix.
    fn record_entry(&self) -> Result<String> {
        let names: Vec<&str> = self.zip.file_names().collect();
        names
            .iter()
            .find(|name| {
                name.strip_suffix(RECORD_SUFFIX)
                    .is_some_and(|stem| names.contains(&stem))
            })
            .map(|name| name.to_string())
            .ok_or_else(|| FileError::Record {
                path: self.path.clone(),
                message: "archive has no companion record".into(),
            })
    }

    pub fn record(&mut self) -> Result<BackupRecord> {
        let name = self.record_entry()?;
        let mut entry = self
            .zip
            .by_name(&name)
            .map_err(|e| FileError::from_zip(e, &self.path))?;
        let mut text = String::new();
        entry.read_to_string(&mut text).map_err(|e| FileError::Record {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        BackupRecord::from_toml(&text, &self.path)
    }

    /// Hash the content entry `name`, returning `(sha256 hex, byte count)`.
    pub fn hash_entry(&mut self, name: &str, chunk_size: usize) -> Result<(String, u64)> {
        let path = self.path.clone();
        let mut entry = self
            .zip
            .by_name(name)
            .map_err(|e| FileError::from_zip(e, &path))?;
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; chunk_size.max(1)];
        let mut size: u64 = 0;
        loop {
            let n = match entry.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(FileError::from_io(e, &path)),
            };
            hasher.update(&buf[..n]);
            size += n as u64;
        }
        Ok((encode_hex(&hasher.finalize()), size))
    }
}
