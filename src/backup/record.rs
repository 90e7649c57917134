use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fs_op::error::{FileError, Result};

/// Integrity record stored next to the archived bytes.
///
/// Serialized as TOML with RFC 3339 timestamps:
///
/// ```toml
/// original_name = "notes.txt"
/// sha256 = "…"
/// original_size = 12
/// modified_at = "2024-03-09T07:05:01.123Z"
/// captured_at = "2024-03-09T07:05:02Z"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub original_name: String,
    pub sha256: String,
    pub original_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    pub captured_at: DateTime<Utc>,
}

impl BackupRecord {
    pub(crate) fn to_toml(&self, archive: &Path) -> Result<String> {
        toml::to_string(self).map_err(|e| FileError::Record {
            path: archive.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub(crate) fn from_toml(text: &str, archive: &Path) -> Result<Self> {
        let record: BackupRecord = toml::from_str(text).map_err(|e| FileError::Record {
            path: archive.to_path_buf(),
            message: e.to_string(),
        })?;
        if record.sha256.len() != 64 || !record.sha256.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FileError::Record {
                path: archive.to_path_buf(),
                message: format!("`{}` is not a SHA-256 hex digest", record.sha256),
            });
        }
        Ok(record)
    }
}
