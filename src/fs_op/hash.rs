//! MD5 and SHA-256 digests over byte streams and files.
//!
//! Everything here is a pure function of its input: hashers are created per
//! call and never shared. Files are read in fixed-size chunks so memory stays
//! bounded; the chunk size never changes the resulting digest.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use md5::Md5;
use sha2::{Digest, Sha256};

use crate::fs_op::error::{FileError, Result};
use crate::fs_op::stat;

/// Default read size for chunked hashing (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha256,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha256 => 32,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Md5 => f.write_str("md5"),
            HashAlgorithm::Sha256 => f.write_str("sha256"),
        }
    }
}

/// A finished digest. Displays as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileDigest {
    algorithm: HashAlgorithm,
    bytes: Vec<u8>,
}

impl FileDigest {
    fn new(algorithm: HashAlgorithm, bytes: &[u8]) -> Self {
        Self {
            algorithm,
            bytes: bytes.to_vec(),
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Raw digest bytes (16 for MD5, 32 for SHA-256).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hexadecimal rendering.
    pub fn to_hex(&self) -> String {
        encode_hex(&self.bytes)
    }
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Encode bytes as lowercase hex.
pub fn encode_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

fn feed<D: Digest, R: Read>(reader: &mut R, chunk_size: usize) -> io::Result<Vec<u8>> {
    let mut hasher = D::new();
    let mut buf = vec![0u8; chunk_size.max(1)];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_vec())
}

/// Hash everything `reader` yields, `chunk_size` bytes at a time.
pub fn digest_reader<R: Read>(
    mut reader: R,
    algorithm: HashAlgorithm,
    chunk_size: usize,
) -> io::Result<FileDigest> {
    let bytes = match algorithm {
        HashAlgorithm::Md5 => feed::<Md5, _>(&mut reader, chunk_size)?,
        HashAlgorithm::Sha256 => feed::<Sha256, _>(&mut reader, chunk_size)?,
    };
    Ok(FileDigest::new(algorithm, &bytes))
}

/// One-shot digest of an in-memory buffer.
pub fn digest_bytes(data: &[u8], algorithm: HashAlgorithm) -> FileDigest {
    match algorithm {
        HashAlgorithm::Md5 => FileDigest::new(algorithm, &Md5::digest(data)),
        HashAlgorithm::Sha256 => FileDigest::new(algorithm, &Sha256::digest(data)),
    }
}

/// Digest the current content of the regular file at `path`.
pub fn digest_file<P: AsRef<Path>>(
    path: P,
    algorithm: HashAlgorithm,
    chunk_size: usize,
) -> Result<FileDigest> {
    let p = path.as_ref();
    stat::require_file(p)?;
    let file = File::open(p).map_err(|e| FileError::from_io(e, p))?;
    digest_reader(file, algorithm, chunk_size).map_err(|e| FileError::from_io(e, p))
}

/// MD5 of the file at `path`.
pub fn md5<P: AsRef<Path>>(path: P) -> Result<FileDigest> {
    digest_file(path, HashAlgorithm::Md5, DEFAULT_CHUNK_SIZE)
}

/// SHA-256 of the file at `path`.
pub fn sha256<P: AsRef<Path>>(path: P) -> Result<FileDigest> {
    digest_file(path, HashAlgorithm::Sha256, DEFAULT_CHUNK_SIZE)
}
