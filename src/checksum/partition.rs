//! Line/segment partitioning of canonical text.

use tracing::debug;

use crate::armor::ArmorBounds;

/// A contiguous character range of one core line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Line index within the whole text.
    pub line: usize,
    /// Segment position within its line.
    pub part: usize,
    /// Absolute start offset, in characters.
    pub start: usize,
    /// Absolute end offset (exclusive), in characters.
    pub end: usize,
}

/// Splits a line of `len` characters into `parts` sizes.
///
/// The remainder goes to the front: the first `len % parts` segments are
/// one character longer. Codes printed by existing senders depend on this
/// order. A `parts` of zero yields no segments.
pub fn segment_sizes(len: usize, parts: usize) -> Vec<usize> {
    if parts == 0 {
        return Vec::new();
    }
    let base = len / parts;
    let remainder = len % parts;
    (0..parts)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Partitions every core line of `text` into `parts` segments.
///
/// The core is every line strictly between the BEGIN and END markers
/// (headers and the blank separator included), or the whole text when
/// there are no markers. Segments come out in `(line, part)` order.
pub fn core_segments(text: &str, parts: usize) -> Vec<Segment> {
    let lines: Vec<&str> = text.split('\n').collect();

    let mut line_starts = Vec::with_capacity(lines.len());
    let mut offset = 0;
    for line in &lines {
        line_starts.push(offset);
        offset += line.chars().count() + 1;
    }

    let core = match ArmorBounds::find(&lines) {
        Some(bounds) => bounds.inner(),
        None => 0..lines.len(),
    };

    debug!(
        total_lines = lines.len(),
        core_lines = core.len(),
        parts,
        "partitioning text"
    );

    let mut segments = Vec::with_capacity(core.len() * parts);
    for line_idx in core {
        let mut start = line_starts[line_idx];
        let len = lines[line_idx].chars().count();
        for (part, size) in segment_sizes(len, parts).into_iter().enumerate() {
            segments.push(Segment {
                line: line_idx,
                part,
                start,
                end: start + size,
            });
            start += size;
        }
    }
    segments
}
