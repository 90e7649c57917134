//! Ownership and permission bits. Unix only.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::Path;

use nix::unistd::{Gid, Group, Uid, User};

use crate::fs_op::error::{FileError, Result};
use crate::fs_op::stat;

/// Account name owning `path`, or the numeric uid when it has no entry.
pub fn owner<P: AsRef<Path>>(path: P) -> Result<String> {
    let uid = stat::metadata(path)?.uid();
    Ok(match User::from_uid(Uid::from_raw(uid)) {
        Ok(Some(user)) => user.name,
        _ => uid.to_string(),
    })
}

/// Group name of `path`, or the numeric gid when it has no entry.
pub fn group<P: AsRef<Path>>(path: P) -> Result<String> {
    let gid = stat::metadata(path)?.gid();
    Ok(match Group::from_gid(Gid::from_raw(gid)) {
        Ok(Some(group)) => group.name,
        _ => gid.to_string(),
    })
}

/// Permission bits of `path` (the low 12 bits of `st_mode`).
pub fn mode<P: AsRef<Path>>(path: P) -> Result<u32> {
    Ok(stat::metadata(path)?.permissions().mode() & 0o7777)
}

/// Set the permission bits of `path`.
pub fn set_mode<P: AsRef<Path>>(path: P, mode: u32) -> Result<()> {
    let p = path.as_ref();
    fs::set_permissions(p, fs::Permissions::from_mode(mode)).map_err(|e| FileError::from_io(e, p))
}
