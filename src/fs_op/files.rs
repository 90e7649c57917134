//! Flat, path-taking surface over the focused submodules.
//!
//! [`crate::FileHandle`] binds these to one path; callers that only need a
//! single operation can import them from here instead of constructing a
//! handle. Prefer the specific submodules (`hash`, `search`, `stat`, ...)
//! when you need their supporting types.

/// Pure path transforms.
pub use crate::fs_op::path::{
    abs_path, basename, dirname, extension, filename, is_hidden, relative_path, relative_to,
};

/// Live metadata queries.
pub use crate::fs_op::stat::{exists, is_dir, is_file, is_modified_since, last_modified, size};

/// Content digests.
pub use crate::fs_op::hash::{md5, sha256};

/// Line search.
pub use crate::fs_op::search::{grep, line_count};

/// Mutating helpers.
pub use crate::fs_op::remove::delete;
pub use crate::fs_op::touch::{touch, truncate};

/// Ownership and permission bits.
#[cfg(unix)]
pub use crate::fs_op::permissions::{group, mode, owner, set_mode};

/// Backups.
pub use crate::backup::{create_backup, read_backup_record, verify_backup};
