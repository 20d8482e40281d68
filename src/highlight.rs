//! Correction guidance over canonical text.
//!
//! Produces a flat list of tagged runs that a renderer (terminal, HTML,
//! anything) can paint: each run knows whether its block matched, and
//! whether its characters are easy to confuse in print or OCR.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::checksum::ChecksumBlock;

/// Characters easily confused with one another in print or OCR.
pub const DEFAULT_AMBIGUOUS_CHARS: &str = "0Oo1IlSs5Bb8";

/// A configurable set of visually ambiguous characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct AmbiguousChars {
    chars: String,
}

impl AmbiguousChars {
    /// Builds the set from a string, ignoring whitespace.
    pub fn new(chars: &str) -> Self {
        Self {
            chars: chars.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    /// Returns true if `c` is in the set.
    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(c)
    }

    /// The characters, whitespace removed.
    pub fn as_str(&self) -> &str {
        &self.chars
    }

    /// Returns true if this is the built-in set.
    pub fn is_default(&self) -> bool {
        self.chars == DEFAULT_AMBIGUOUS_CHARS
    }
}

impl Default for AmbiguousChars {
    fn default() -> Self {
        Self::new(DEFAULT_AMBIGUOUS_CHARS)
    }
}

impl FromStr for AmbiguousChars {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for AmbiguousChars {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<AmbiguousChars> for String {
    fn from(chars: AmbiguousChars) -> Self {
        chars.chars
    }
}

impl fmt::Display for AmbiguousChars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.chars)
    }
}

/// Checksum state of the block a run belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStatus {
    /// Not covered by any block (newlines, marker lines).
    None,
    Ok,
    Mismatch,
}

/// Character class of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    Normal,
    Ambiguous,
}

/// A run of text with uniform tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightRun {
    pub text: String,
    pub status: RunStatus,
    pub class: CharClass,
}

/// Annotates `text` with block status and ambiguous-character runs.
///
/// Blocks are walked by start offset. Text not covered by any block is
/// emitted as a plain run. Inside each block, characters are split into
/// alternating normal/ambiguous runs. Concatenating every run's text
/// gives back `text`.
pub fn highlight(
    text: &str,
    blocks: &[ChecksumBlock],
    mismatches: &BTreeSet<u32>,
    ambiguous: &AmbiguousChars,
) -> Vec<HighlightRun> {
    let chars: Vec<char> = text.chars().collect();
    let mut sorted: Vec<&ChecksumBlock> = blocks.iter().collect();
    sorted.sort_by_key(|b| (b.start, b.index));

    let mut runs = Vec::new();
    let mut cursor = 0;

    for block in sorted {
        let start = block.start.clamp(cursor, chars.len());
        let end = block.end.clamp(start, chars.len());

        if start > cursor {
            runs.push(HighlightRun {
                text: chars[cursor..start].iter().collect(),
                status: RunStatus::None,
                class: CharClass::Normal,
            });
        }

        let status = if mismatches.contains(&block.index) {
            RunStatus::Mismatch
        } else {
            RunStatus::Ok
        };
        push_classified(&mut runs, &chars[start..end], status, ambiguous);
        cursor = end;
    }

    if cursor < chars.len() {
        runs.push(HighlightRun {
            text: chars[cursor..].iter().collect(),
            status: RunStatus::None,
            class: CharClass::Normal,
        });
    }

    runs
}

fn push_classified(
    runs: &mut Vec<HighlightRun>,
    chars: &[char],
    status: RunStatus,
    ambiguous: &AmbiguousChars,
) {
    let mut buf = String::new();
    let mut buf_class = CharClass::Normal;

    for &c in chars {
        let class = if ambiguous.contains(c) {
            CharClass::Ambiguous
        } else {
            CharClass::Normal
        };
        if class != buf_class && !buf.is_empty() {
            runs.push(HighlightRun {
                text: std::mem::take(&mut buf),
                status,
                class: buf_class,
            });
        }
        buf_class = class;
        buf.push(c);
    }

    if !buf.is_empty() {
        runs.push(HighlightRun {
            text: buf,
            status,
            class: buf_class,
        });
    }
}

/// Characters of `text` in the ambiguous set, deduplicated, in order of
/// first appearance.
pub fn ambiguous_in(text: &str, ambiguous: &AmbiguousChars) -> Vec<char> {
    let mut seen = HashSet::new();
    text.chars()
        .filter(|&c| ambiguous.contains(c) && seen.insert(c))
        .collect()
}
