//! ASCII armor handling.
//!
//! This module provides:
//! - BEGIN/END marker detection shared by normalization and checksumming
//! - Normalization of retyped or OCR'd armor into canonical form
//! - Line-based pagination for printed layout

pub mod normalize;
pub mod paginate;

pub use normalize::normalize_armored;
pub use paginate::split_by_lines;

const BEGIN_PREFIX: &str = "-----BEGIN ";
const END_PREFIX: &str = "-----END ";
const MARKER_SUFFIX: &str = "-----";

/// Returns true if the line is a `-----BEGIN <label>-----` marker.
///
/// Surrounding whitespace is ignored; OCR often leaves a trailing space.
pub fn is_armor_begin(line: &str) -> bool {
    is_marker(line.trim(), BEGIN_PREFIX)
}

/// Returns true if the line is a `-----END <label>-----` marker.
pub fn is_armor_end(line: &str) -> bool {
    is_marker(line.trim(), END_PREFIX)
}

fn is_marker(line: &str, prefix: &str) -> bool {
    line.len() >= prefix.len() + MARKER_SUFFIX.len()
        && line.starts_with(prefix)
        && line.ends_with(MARKER_SUFFIX)
}

/// Line indices of a BEGIN marker and the first END marker after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmorBounds {
    /// Index of the BEGIN line.
    pub begin: usize,
    /// Index of the END line (always greater than `begin`).
    pub end: usize,
}

impl ArmorBounds {
    /// Locates the armor markers in a list of lines.
    ///
    /// Returns `None` unless a BEGIN line is followed by an END line.
    pub fn find<S: AsRef<str>>(lines: &[S]) -> Option<Self> {
        let begin = lines.iter().position(|l| is_armor_begin(l.as_ref()))?;
        let end = lines[begin + 1..]
            .iter()
            .position(|l| is_armor_end(l.as_ref()))
            .map(|offset| begin + 1 + offset)?;
        Some(Self { begin, end })
    }

    /// Range of line indices strictly between the markers.
    pub fn inner(&self) -> std::ops::Range<usize> {
        self.begin + 1..self.end
    }
}
