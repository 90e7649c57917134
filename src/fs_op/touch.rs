use std::fs::OpenOptions;
use std::path::Path;
use std::time::SystemTime;

use filetime::{set_file_times, FileTime};

use crate::fs_op::error::{FileError, Result};
use crate::fs_op::stat;

/// Create `path` as an empty file if it is absent, otherwise bump its access
/// and modification times to now. Returns the resulting modification time.
pub fn touch<P: AsRef<Path>>(path: P) -> Result<SystemTime> {
    let p = path.as_ref();
    if stat::exists(p) {
        let now = FileTime::now();
        set_file_times(p, now, now).map_err(|e| FileError::from_io(e, p))?;
    } else {
        // `append` never clobbers content if another process created the
        // file between the existence check and this open.
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(p)
            .map_err(|e| FileError::from_io(e, p))?;
        tracing::debug!("touch created {}", p.display());
    }
    stat::last_modified(p)
}

/// Resize the regular file at `path` to `len` bytes. `0` empties it.
pub fn truncate<P: AsRef<Path>>(path: P, len: u64) -> Result<()> {
    let p = path.as_ref();
    stat::require_file(p)?;
    let file = OpenOptions::new()
        .write(true)
        .open(p)
        .map_err(|e| FileError::from_io(e, p))?;
    file.set_len(len).map_err(|e| FileError::from_io(e, p))
}
