use chrono::{DateTime, SubsecRound, Utc};

/// `strftime` layout of the timestamp embedded in archive names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Suffix appended to the original basename to name the companion record.
pub const RECORD_SUFFIX: &str = ".backup.toml";

/// Current UTC time at the one-second resolution archive names use.
pub fn capture_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// `<basename>_<YYYYMMDDTHHMMSSZ>.<ext>`
pub fn archive_name(basename: &str, captured_at: DateTime<Utc>, extension: &str) -> String {
    format!("{}_{}.{}", basename, captured_at.format(TIMESTAMP_FORMAT), extension)
}

/// Entry name of the companion record for a content entry called `basename`.
pub fn record_entry_name(basename: &str) -> String {
    format!("{basename}{RECORD_SUFFIX}")
}
