//! A path-bound file handle bundling hashing, metadata queries, line search,
//! touch, and verifiable zip backups.
//!
//! ```no_run
//! use filekeep::FileHandle;
//!
//! let notes = FileHandle::new("notes.txt");
//! println!("{} bytes, sha256 {}", notes.size()?, notes.sha256()?);
//! for line in notes.grep("world")? {
//!     println!("{}", line?);
//! }
//! let backup = notes.create_backup("backups")?;
//! assert!(FileHandle::verify_backup(&backup.archive_path)?.intact);
//! # Ok::<(), filekeep::FileError>(())
//! ```

pub mod backup;
pub mod fs_op;
pub mod handle;
pub mod logging;
pub mod settings;

pub use crate::backup::{BackupRecord, BackupResult, BackupVerification};
pub use crate::fs_op::error::{FileError, Result};
pub use crate::fs_op::hash::{FileDigest, HashAlgorithm};
pub use crate::fs_op::search::{GrepLines, SearchPattern};
pub use crate::handle::{FileClass, FileHandle, TemporaryFile};
pub use crate::settings::{load_settings, BackupSettings, SettingsError};
