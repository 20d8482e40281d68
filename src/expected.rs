//! Expected checksums from manual entry or a scanned payload.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::payload::Payload;

static ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[?\s*(\d+)\s*\]?\s*[:\-]?\s*([A-Za-z0-9]{2,})\s*$")
        .expect("valid manual entry pattern")
});

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bSC\d+:").expect("valid tag pattern"));

/// A checksum the receiver expects for one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedChecksum {
    /// 1-based block index.
    pub index: u32,
    /// Uppercase code.
    pub checksum: String,
}

/// Parses hand-typed checksum lines.
///
/// Accepts one entry per line in any of these forms:
/// `[1] ABCD`, `1 ABCD`, `1:ABCD`, `1-ABCD`. Codes are uppercased.
/// Lines that do not match are skipped. A repeated index keeps its last
/// value, and the result is sorted by index.
pub fn parse_manual(input: &str) -> Vec<ExpectedChecksum> {
    let mut entries: BTreeMap<u32, String> = BTreeMap::new();
    let mut skipped = 0usize;

    for line in input.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let parsed = ENTRY_RE
            .captures(line)
            .and_then(|caps| Some((caps[1].parse::<u32>().ok()?, caps[2].to_uppercase())));
        match parsed {
            Some((index, checksum)) => {
                entries.insert(index, checksum);
            }
            None => skipped += 1,
        }
    }

    debug!(entries = entries.len(), skipped, "parsed manual checksums");
    entries
        .into_iter()
        .map(|(index, checksum)| ExpectedChecksum { index, checksum })
        .collect()
}

/// Reads expected checksums from either a payload or manual entry.
///
/// Input carrying a decodable `SC<N>:` payload is decoded by its tag.
/// Anything else, including text that merely mentions a tag, is parsed as
/// manual entry.
pub fn read_expected(input: &str) -> Vec<ExpectedChecksum> {
    if TAG_RE.is_match(input) {
        if let Some(payload) = Payload::parse(input) {
            return payload.into_expected();
        }
    }
    parse_manual(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(expected: &[ExpectedChecksum]) -> Vec<(u32, &str)> {
        expected
            .iter()
            .map(|e| (e.index, e.checksum.as_str()))
            .collect()
    }

    #[test]
    fn test_parse_mixed_forms() {
        let parsed = parse_manual("[1] abcd\n2:91f3\n[3]-7e0b");
        assert_eq!(
            pairs(&parsed),
            vec![(1, "ABCD"), (2, "91F3"), (3, "7E0B")]
        );
    }

    #[test]
    fn test_parse_space_and_dash_forms() {
        let parsed = parse_manual("  4 QQ  \n5-RR\n[ 6 ] : SS");
        assert_eq!(pairs(&parsed), vec![(4, "QQ"), (5, "RR"), (6, "SS")]);
    }

    #[test]
    fn test_parse_skips_noise() {
        let parsed = parse_manual("Checksums:\n\n[1] AB\nsee back of card\n[2] C\n");
        assert_eq!(pairs(&parsed), vec![(1, "AB")]);
    }

    #[test]
    fn test_parse_last_duplicate_wins_and_sorts() {
        let parsed = parse_manual("[3] CC\n[1] AA\n[3] DD");
        assert_eq!(pairs(&parsed), vec![(1, "AA"), (3, "DD")]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_manual("").is_empty());
        assert!(parse_manual("nothing useful").is_empty());
    }

    #[test]
    fn test_read_expected_dispatch() {
        assert_eq!(
            pairs(&read_expected("sc4:2:abcd")),
            vec![(1, "AB"), (2, "CD")]
        );
        assert_eq!(pairs(&read_expected("[1] ab")), vec![(1, "AB")]);
        assert!(read_expected("SC4:x").is_empty());
    }

    #[test]
    fn test_read_expected_stray_tag_keeps_manual_lines() {
        assert_eq!(
            pairs(&read_expected("[1] AB\nnote: see SC2: list")),
            vec![(1, "AB")]
        );
    }
}
