//! Scan-able checksum payloads.
//!
//! The payload is what goes into the checksum QR code on the postcard.
//! Two wire versions exist, told apart only by their leading tag:
//!
//! - `SC4:<codeLen>:<codes>`: current. Fixed-width codes concatenated in
//!   index order, no separators. Only characters from the QR alphanumeric
//!   set are used, so the QR stays small.
//! - `SC2:<code>-<code>-...`: legacy. Separator-delimited (`-`, `_` or
//!   `.`), variable-width codes. Decoded but never produced.
//!
//! Decoding never fails: a missing or garbled payload is the normal state
//! before anything has been scanned, and yields an empty list.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::checksum::base32::is_base32_char;
use crate::checksum::ChecksumBlock;
use crate::expected::ExpectedChecksum;

/// Tag of the current payload version.
pub const CURRENT_TAG: &str = "SC4";

/// Tag of the legacy payload version.
pub const LEGACY_TAG: &str = "SC2";

static CURRENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"SC4:(\d+):([A-Z2-7]+)").expect("valid SC4 pattern"));

static LEGACY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"SC2:([A-Z0-9]{2,}(?:[-_.][A-Z0-9]{2,})*)").expect("valid SC2 pattern")
});

static ANY_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"SC(\d+):").expect("valid tag pattern"));

/// Errors raised when building a payload from blocks.
///
/// These indicate misuse: blocks from the checksum engine always encode.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Checksum codes have different lengths: block {index} has {found} characters, expected {expected}")]
    NonUniformCodeLength {
        index: u32,
        expected: usize,
        found: usize,
    },

    #[error("Checksum code '{code}' of block {index} is not base-32")]
    InvalidCodeCharacter { index: u32, code: String },
}

/// Payload wire version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadVersion {
    /// `SC4`
    Current,
    /// `SC2`
    Legacy,
}

impl PayloadVersion {
    /// The wire tag of this version.
    pub fn tag(&self) -> &'static str {
        match self {
            PayloadVersion::Current => CURRENT_TAG,
            PayloadVersion::Legacy => LEGACY_TAG,
        }
    }
}

/// A decoded payload, keyed by its version tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// `SC4:<code_len>:<codes>`
    Current { code_len: usize, codes: Vec<String> },
    /// `SC2:<code>-<code>...`
    Legacy { codes: Vec<String> },
}

impl Payload {
    /// Builds a current-version payload from checksum blocks.
    ///
    /// Blocks are ordered by index. Returns `Ok(None)` for an empty list.
    pub fn from_blocks(blocks: &[ChecksumBlock]) -> Result<Option<Self>, PayloadError> {
        let mut sorted: Vec<&ChecksumBlock> = blocks.iter().collect();
        sorted.sort_by_key(|b| b.index);

        let Some(first) = sorted.first() else {
            return Ok(None);
        };
        let code_len = first.checksum.trim().chars().count();
        if code_len == 0 {
            return Ok(None);
        }

        let mut codes = Vec::with_capacity(sorted.len());
        for block in sorted {
            let code = block.checksum.trim().to_uppercase();
            let found = code.chars().count();
            if found != code_len {
                return Err(PayloadError::NonUniformCodeLength {
                    index: block.index,
                    expected: code_len,
                    found,
                });
            }
            if !code.chars().all(is_base32_char) {
                return Err(PayloadError::InvalidCodeCharacter {
                    index: block.index,
                    code,
                });
            }
            codes.push(code);
        }

        Ok(Some(Payload::Current { code_len, codes }))
    }

    /// Finds and decodes a payload anywhere in `input` (case-insensitive).
    ///
    /// The `SC4` form is tried first, then `SC2`. Returns `None` when
    /// neither tag is present in a decodable form.
    pub fn parse(input: &str) -> Option<Self> {
        let upper = input.to_uppercase();

        if let Some(payload) = parse_current(&upper) {
            return Some(payload);
        }
        if let Some(payload) = parse_legacy(&upper) {
            return Some(payload);
        }

        if let Some(caps) = ANY_TAG_RE.captures(&upper) {
            warn!(tag = %&caps[0], "ignoring payload with unsupported or malformed tag");
        }
        None
    }

    /// The wire version of this payload.
    pub fn version(&self) -> PayloadVersion {
        match self {
            Payload::Current { .. } => PayloadVersion::Current,
            Payload::Legacy { .. } => PayloadVersion::Legacy,
        }
    }

    /// Codes in index order.
    pub fn codes(&self) -> &[String] {
        match self {
            Payload::Current { codes, .. } | Payload::Legacy { codes } => codes,
        }
    }

    /// Converts the codes into expected checksums numbered from 1.
    pub fn into_expected(self) -> Vec<ExpectedChecksum> {
        let codes = match self {
            Payload::Current { codes, .. } | Payload::Legacy { codes } => codes,
        };
        codes
            .into_iter()
            .enumerate()
            .map(|(i, checksum)| ExpectedChecksum {
                index: (i + 1) as u32,
                checksum,
            })
            .collect()
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Current { code_len, codes } => {
                write!(f, "{}:{}:{}", self.version().tag(), code_len, codes.concat())
            }
            Payload::Legacy { codes } => write!(f, "{}:{}", self.version().tag(), codes.join("-")),
        }
    }
}

fn parse_current(upper: &str) -> Option<Payload> {
    let caps = CURRENT_RE.captures(upper)?;
    let code_len = match caps[1].parse::<usize>() {
        Ok(0) => return None,
        Ok(n) => n,
        Err(_) => {
            warn!(length = %&caps[1], "SC4 code length out of range");
            return Some(Payload::Current {
                code_len: 0,
                codes: Vec::new(),
            });
        }
    };

    let blob: Vec<char> = caps[2].chars().collect();
    let codes: Vec<String> = blob
        .chunks_exact(code_len)
        .map(|c| c.iter().collect())
        .collect();
    debug!(code_len, blocks = codes.len(), "decoded SC4 payload");
    Some(Payload::Current { code_len, codes })
}

fn parse_legacy(upper: &str) -> Option<Payload> {
    let caps = LEGACY_RE.captures(upper)?;
    let codes: Vec<String> = caps[1]
        .split(['-', '_', '.'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    debug!(blocks = codes.len(), "decoded SC2 payload");
    Some(Payload::Legacy { codes })
}

/// Encodes blocks as an `SC4` payload string.
///
/// Returns `Ok(None)` when there are no blocks.
pub fn encode_payload(blocks: &[ChecksumBlock]) -> Result<Option<String>, PayloadError> {
    Ok(Payload::from_blocks(blocks)?.map(|p| p.to_string()))
}

/// Decodes an `SC4` or `SC2` payload into expected checksums.
///
/// Malformed or missing payloads yield an empty list.
pub fn decode_payload(input: &str) -> Vec<ExpectedChecksum> {
    Payload::parse(input)
        .map(Payload::into_expected)
        .unwrap_or_default()
}
