//! SHA-256 digests for downloaded and installed artifacts.
//!
//! Digests are lowercase hex. [`Sha256Hasher`] hashes readers, byte slices
//! and files in fixed-size chunks; [`IncrementalDigest`] hashes a download
//! while it streams to disk.

use crate::constants::HASH_BUFFER_SIZE;
use crate::core::{LauncherError, Result};
use sha2::{Digest, Sha256};
use std::io::{self, Read};
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// SHA-256 digest of zero bytes.
pub const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Computes SHA-256 digests of byte streams and files.
///
/// Every method reads its input in fixed-size chunks, so memory use stays
/// constant no matter how large the client archive grows. Digests are always
/// rendered as 64 lowercase hex characters.
///
/// # Examples
///
/// ```rust
/// use jarlaunch::update::verification::{EMPTY_SHA256, Sha256Hasher};
///
/// assert_eq!(Sha256Hasher::digest_bytes(b""), EMPTY_SHA256);
/// ```
pub struct Sha256Hasher;

impl Sha256Hasher {
    /// Digest everything a reader yields.
    ///
    /// # Errors
    ///
    /// Propagates the first read failure; no partial digest is returned.
    pub fn digest<R: Read>(mut reader: R) -> io::Result<String> {
        let mut digest = IncrementalDigest::new();
        let mut buffer = vec![0u8; HASH_BUFFER_SIZE];
        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            digest.update(&buffer[..read]);
        }
        Ok(digest.finish())
    }

    /// Digest an in-memory buffer.
    #[must_use]
    pub fn digest_bytes(bytes: &[u8]) -> String {
        hex::encode(Sha256::digest(bytes))
    }

    /// Digest a file on disk without loading it into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub async fn digest_file(path: &Path) -> io::Result<String> {
        debug!("Computing SHA256 checksum for: {}", path.display());

        let mut file = tokio::fs::File::open(path).await?;
        let mut digest = IncrementalDigest::new();
        let mut buffer = vec![0u8; HASH_BUFFER_SIZE];
        loop {
            let read = file.read(&mut buffer).await?;
            if read == 0 {
                break;
            }
            digest.update(&buffer[..read]);
        }
        Ok(digest.finish())
    }

    /// Compare a computed digest against an expected one.
    ///
    /// Case-insensitive, since published checksum files are not consistent
    /// about hex casing.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::ChecksumMismatch`] when the digests differ.
    pub fn verify(actual: &str, expected: &str) -> Result<()> {
        if actual.eq_ignore_ascii_case(expected.trim()) {
            debug!("Checksum verification successful");
            Ok(())
        } else {
            Err(LauncherError::ChecksumMismatch {
                expected: expected.trim().to_lowercase(),
                actual: actual.to_lowercase(),
            })
        }
    }
}

/// Running SHA-256 state fed chunk by chunk, e.g. while a download streams.
#[derive(Default)]
pub struct IncrementalDigest {
    hasher: Sha256,
    bytes: u64,
}

impl IncrementalDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
        self.bytes += chunk.len() as u64;
    }

    /// Number of bytes consumed so far.
    pub const fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Consume the state and return the lowercase hex digest.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}
