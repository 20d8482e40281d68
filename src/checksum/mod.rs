//! Block checksums over canonical armored text.
//!
//! Every line between the armor markers is cut into `parts` segments and
//! each segment gets a short base-32 code taken from its SHA-256 digest.
//! A transcription error therefore shows up in exactly one block, on one
//! printed line.

pub mod base32;
pub mod digest;
pub mod engine;
pub mod listing;
pub mod partition;

pub use base32::base32_encode;
pub use digest::{DigestEngine, Sha256Engine};
pub use engine::{compute_checksums, ChecksumEngine};
pub use listing::{format_listing, listing_pages};
pub use partition::{core_segments, segment_sizes, Segment};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of segments per line.
pub const DEFAULT_PARTS: usize = 4;

/// Default number of base-32 characters shown per block.
pub const DEFAULT_DISPLAY_CHARS: usize = 2;

/// Base-32 length of a SHA-256 digest (256 bits / 5, rounded up).
pub const MAX_DISPLAY_CHARS: usize = 52;

/// Errors that can occur while computing checksums.
#[derive(Error, Debug)]
pub enum ChecksumError {
    #[error("Invalid checksum profile: {0}")]
    InvalidProfile(String),

    #[error("Digest '{engine}' failed: {reason}")]
    DigestFailed { engine: &'static str, reason: String },
}

/// Partitioning parameters shared by sender and receiver.
///
/// Both sides must use the same profile. A different profile does not
/// fail, it just produces codes that can never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumProfile {
    /// Segments per line.
    pub parts: usize,
    /// Characters of the base-32 digest kept per block.
    pub display_chars: usize,
}

impl Default for ChecksumProfile {
    fn default() -> Self {
        Self {
            parts: DEFAULT_PARTS,
            display_chars: DEFAULT_DISPLAY_CHARS,
        }
    }
}

impl ChecksumProfile {
    /// Creates a validated profile.
    pub fn new(parts: usize, display_chars: usize) -> Result<Self, ChecksumError> {
        let profile = Self {
            parts,
            display_chars,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Checks that `parts >= 1` and `2 <= display_chars <= 52`.
    pub fn validate(&self) -> Result<(), ChecksumError> {
        if self.parts == 0 {
            return Err(ChecksumError::InvalidProfile(
                "parts must be at least 1".to_string(),
            ));
        }
        if !(2..=MAX_DISPLAY_CHARS).contains(&self.display_chars) {
            return Err(ChecksumError::InvalidProfile(format!(
                "display_chars must be between 2 and {}, got {}",
                MAX_DISPLAY_CHARS, self.display_chars
            )));
        }
        Ok(())
    }
}

/// One checksummed segment of canonical text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumBlock {
    /// 1-based ordinal across the whole text.
    pub index: u32,
    /// Uppercase base-32 code.
    pub checksum: String,
    /// Inclusive start offset, in characters.
    pub start: usize,
    /// Exclusive end offset, in characters.
    pub end: usize,
}

impl ChecksumBlock {
    /// Number of characters covered by this block.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the block covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = ChecksumProfile::default();
        assert_eq!(profile.parts, 4);
        assert_eq!(profile.display_chars, 2);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_profile_validation() {
        assert!(ChecksumProfile::new(1, 2).is_ok());
        assert!(ChecksumProfile::new(8, 52).is_ok());
        assert!(matches!(
            ChecksumProfile::new(0, 2),
            Err(ChecksumError::InvalidProfile(_))
        ));
        assert!(ChecksumProfile::new(4, 1).is_err());
        assert!(ChecksumProfile::new(4, 53).is_err());
    }

    #[test]
    fn test_block_len() {
        let block = ChecksumBlock {
            index: 1,
            checksum: "AB".to_string(),
            start: 3,
            end: 7,
        };
        assert_eq!(block.len(), 4);
        assert!(!block.is_empty());
    }
}
