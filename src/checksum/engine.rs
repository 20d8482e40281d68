//! Checksum computation.
//!
//! Segment digests are independent, so they run on the rayon pool.
//! `collect` into `Result<Vec<_>, _>` keeps the input order and stops at
//! the first failure, so block indices never depend on which digest
//! finished first.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, trace};

use super::base32::base32_encode;
use super::digest::{DigestEngine, Sha256Engine};
use super::partition::core_segments;
use super::{ChecksumBlock, ChecksumError, ChecksumProfile};

/// Computes block checksums with a fixed profile and digest.
///
/// Build one and reuse it across calls; it holds no per-call state.
#[derive(Clone)]
pub struct ChecksumEngine {
    profile: ChecksumProfile,
    digest: Arc<dyn DigestEngine>,
}

impl std::fmt::Debug for ChecksumEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChecksumEngine")
            .field("profile", &self.profile)
            .field("digest", &self.digest.name())
            .finish()
    }
}

impl Default for ChecksumEngine {
    fn default() -> Self {
        Self {
            profile: ChecksumProfile::default(),
            digest: Arc::new(Sha256Engine),
        }
    }
}

impl ChecksumEngine {
    /// Creates a SHA-256 engine for the given profile.
    pub fn new(profile: ChecksumProfile) -> Result<Self, ChecksumError> {
        Self::with_digest(profile, Arc::new(Sha256Engine))
    }

    /// Creates an engine backed by a custom digest.
    pub fn with_digest(
        profile: ChecksumProfile,
        digest: Arc<dyn DigestEngine>,
    ) -> Result<Self, ChecksumError> {
        profile.validate()?;
        Ok(Self { profile, digest })
    }

    /// The profile this engine partitions with.
    pub fn profile(&self) -> ChecksumProfile {
        self.profile
    }

    /// Computes the ordered block list for `text`.
    ///
    /// `text` should already be canonical (see
    /// [`normalize_armored`](crate::armor::normalize_armored)). The result
    /// is deterministic for a given `(text, profile)`.
    pub fn compute(&self, text: &str) -> Result<Vec<ChecksumBlock>, ChecksumError> {
        let chars: Vec<char> = text.chars().collect();
        let segments = core_segments(text, self.profile.parts);
        let display_chars = self.profile.display_chars;

        let codes: Vec<String> = segments
            .par_iter()
            .map(|seg| -> Result<String, ChecksumError> {
                let piece: String = chars[seg.start..seg.end].iter().collect();
                let hash = self.digest.digest(piece.as_bytes())?;
                let mut code = base32_encode(&hash);
                code.truncate(display_chars);
                trace!(line = seg.line, part = seg.part, code = %code, "segment digest");
                Ok(code.to_uppercase())
            })
            .collect::<Result<Vec<_>, _>>()?;

        let blocks: Vec<ChecksumBlock> = segments
            .iter()
            .zip(codes)
            .enumerate()
            .map(|(i, (seg, checksum))| ChecksumBlock {
                index: (i + 1) as u32,
                checksum,
                start: seg.start,
                end: seg.end,
            })
            .collect();

        debug!(
            blocks = blocks.len(),
            digest = self.digest.name(),
            "computed checksums"
        );
        Ok(blocks)
    }
}

/// Computes checksums with SHA-256 and the given profile.
pub fn compute_checksums(
    text: &str,
    profile: ChecksumProfile,
) -> Result<Vec<ChecksumBlock>, ChecksumError> {
    ChecksumEngine::new(profile)?.compute(text)
}
