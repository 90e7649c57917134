//! Tunables for hashing and the backup pipeline.
//!
//! Settings are plain data with sensible defaults. They can be built in code
//! or loaded from a TOML file; missing keys fall back to the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fs_op::hash::DEFAULT_CHUNK_SIZE;

/// Errors produced while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupSettings {
    /// Bytes read per chunk when hashing or archiving.
    pub chunk_size: usize,
    /// Extension of produced archives, without the leading dot.
    pub archive_extension: String,
    /// Deflate level; `None` uses the zip library's default.
    pub compression_level: Option<i64>,
    /// fsync the archive before reporting success.
    pub sync_on_finish: bool,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            archive_extension: "zip".to_string(),
            compression_level: None,
            sync_on_finish: true,
        }
    }
}

impl BackupSettings {
    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        let settings: BackupSettings = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.chunk_size == 0 {
            return Err(SettingsError::Invalid {
                field: "chunk_size",
                reason: "must be greater than zero".into(),
            });
        }
        let ext = self.archive_extension.as_str();
        if ext.is_empty() || ext.contains(['.', '/', '\\']) {
            return Err(SettingsError::Invalid {
                field: "archive_extension",
                reason: format!("`{ext}` must be a bare, non-empty extension"),
            });
        }
        if let Some(level) = self.compression_level {
            if !(0..=9).contains(&level) {
                return Err(SettingsError::Invalid {
                    field: "compression_level",
                    reason: format!("{level} is outside 0..=9"),
                });
            }
        }
        Ok(())
    }
}

/// Load settings from the TOML file at `path`.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<BackupSettings, SettingsError> {
    let p = path.as_ref();
    let text = fs::read_to_string(p).map_err(|source| SettingsError::Read {
        path: p.to_path_buf(),
        source,
    })?;
    let settings = BackupSettings::from_toml_str(&text)?;
    tracing::debug!("loaded backup settings from {}", p.display());
    Ok(settings)
}
