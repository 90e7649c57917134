//! Filesystem primitives. Each submodule is a thin, stateless layer over
//! `std::fs` that maps failures onto [`error::FileError`].

pub mod error;
pub mod files;
pub mod hash;
pub mod path;
#[cfg(unix)]
pub mod permissions;
pub mod remove;
pub mod search;
pub mod stat;
pub mod test_helpers;
pub mod touch;
