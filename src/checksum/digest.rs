//! Digest capability used by the checksum engine.

use sha2::{Digest, Sha256};

use super::ChecksumError;

/// A 32-byte cryptographic hash function.
///
/// Implementations are shared across rayon workers, so they must be
/// `Send + Sync`. A failing digest aborts the whole checksum run.
pub trait DigestEngine: Send + Sync {
    /// Short name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Hashes `data`.
    fn digest(&self, data: &[u8]) -> Result<[u8; 32], ChecksumError>;
}

/// SHA-256 from the `sha2` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Engine;

impl DigestEngine for Sha256Engine {
    fn name(&self) -> &'static str {
        "sha256"
    }

    fn digest(&self, data: &[u8]) -> Result<[u8; 32], ChecksumError> {
        Ok(Sha256::digest(data).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        let hash = Sha256Engine.digest(b"abc").unwrap();
        assert_eq!(hash[..4], [0xba, 0x78, 0x16, 0xbf]);
        assert_eq!(hash[28..], [0xf2, 0x00, 0x15, 0xad]);
    }

    #[test]
    fn test_sha256_empty() {
        let hash = Sha256Engine.digest(b"").unwrap();
        assert_eq!(hash[..4], [0xe3, 0xb0, 0xc4, 0x42]);
    }
}
