//! Comparison of computed and expected checksums.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use tracing::{debug, info};

use crate::armor::normalize_armored;
use crate::checksum::{ChecksumBlock, ChecksumEngine, ChecksumError};
use crate::expected::{read_expected, ExpectedChecksum};

/// Maximum number of mismatched indices listed in a summary.
pub const MISMATCH_SUMMARY_LIMIT: usize = 20;

/// Outcome of comparing computed blocks with expected ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MismatchReport {
    /// Indices whose codes differ or are missing on either side.
    pub mismatched_indices: BTreeSet<u32>,
    /// True when the two lists have different lengths.
    pub count_mismatch: bool,
    /// True when every expected block matched and the counts agree.
    pub full_match: bool,
}

/// Compares computed blocks against expected checksums.
///
/// Every expected index that is missing from `computed` or has a different
/// code is reported. When the counts differ, every index from 1 to the
/// larger count that is missing on either side or differs is added too.
pub fn verify(computed: &[ChecksumBlock], expected: &[ExpectedChecksum]) -> MismatchReport {
    let computed_map: HashMap<u32, &str> = computed
        .iter()
        .map(|b| (b.index, b.checksum.as_str()))
        .collect();
    let expected_map: HashMap<u32, &str> = expected
        .iter()
        .map(|e| (e.index, e.checksum.as_str()))
        .collect();

    let mut mismatched_indices = BTreeSet::new();
    for e in expected {
        if !codes_match(computed_map.get(&e.index).copied(), Some(e.checksum.as_str())) {
            mismatched_indices.insert(e.index);
        }
    }

    let count_mismatch = expected.len() != computed.len();
    if count_mismatch {
        let max = expected.len().max(computed.len()) as u32;
        for index in 1..=max {
            let exp = expected_map.get(&index).copied();
            let got = computed_map.get(&index).copied();
            if !codes_match(got, exp) {
                mismatched_indices.insert(index);
            }
        }
    }

    let full_match = !count_mismatch && mismatched_indices.is_empty() && !expected.is_empty();

    debug!(
        computed = computed.len(),
        expected = expected.len(),
        mismatches = mismatched_indices.len(),
        count_mismatch,
        full_match,
        "verified checksums"
    );

    MismatchReport {
        mismatched_indices,
        count_mismatch,
        full_match,
    }
}

fn codes_match(got: Option<&str>, expected: Option<&str>) -> bool {
    match (got, expected) {
        (Some(got), Some(expected)) => got.eq_ignore_ascii_case(expected),
        _ => false,
    }
}

/// User-facing classification of a verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    /// The armored text is empty.
    NoInput,
    /// No expected checksums were recognized.
    NoExpectedChecksums,
    /// Expected and computed block counts differ.
    CountMismatch { expected: usize, computed: usize },
    /// Some blocks differ. `indices` holds at most
    /// [`MISMATCH_SUMMARY_LIMIT`] entries, `total` the full count.
    Mismatches { indices: Vec<u32>, total: usize },
    /// Every block matched.
    FullMatch { blocks: usize },
}

impl Summary {
    /// Classifies a verification attempt.
    pub fn classify(
        text: &str,
        computed: &[ChecksumBlock],
        expected: &[ExpectedChecksum],
        report: &MismatchReport,
    ) -> Self {
        if text.trim().is_empty() {
            return Summary::NoInput;
        }
        if expected.is_empty() {
            return Summary::NoExpectedChecksums;
        }
        if report.count_mismatch {
            return Summary::CountMismatch {
                expected: expected.len(),
                computed: computed.len(),
            };
        }
        if report.full_match {
            return Summary::FullMatch {
                blocks: computed.len(),
            };
        }
        Summary::Mismatches {
            indices: report
                .mismatched_indices
                .iter()
                .copied()
                .take(MISMATCH_SUMMARY_LIMIT)
                .collect(),
            total: report.mismatched_indices.len(),
        }
    }

    /// Returns true for a full match.
    pub fn is_match(&self) -> bool {
        matches!(self, Summary::FullMatch { .. })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::NoInput => write!(f, "No armored message to check"),
            Summary::NoExpectedChecksums => write!(f, "No checksums recognized"),
            Summary::CountMismatch { expected, computed } => write!(
                f,
                "Block count mismatch (expected: {}, computed: {})",
                expected, computed
            ),
            Summary::Mismatches { indices, total } => {
                let list: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
                let noun = if *total == 1 { "block mismatch" } else { "block mismatches" };
                write!(f, "{} {}: {}", total, noun, list.join(", "))?;
                if *total > indices.len() {
                    write!(f, "…")?;
                }
                Ok(())
            }
            Summary::FullMatch { blocks } => {
                write!(f, "All {} blocks match, ready to decrypt", blocks)
            }
        }
    }
}

/// Status of one block in the comparison grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
    /// Both sides present and equal.
    Match,
    /// Reported as mismatched.
    Mismatch,
    /// Present on one side only, or not yet verified.
    Unverified,
}

/// One cell of the comparison grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockComparison {
    pub index: u32,
    pub expected: Option<String>,
    pub computed: Option<String>,
    pub status: BlockStatus,
}

impl BlockComparison {
    /// The code to display: computed if known, else expected.
    pub fn display_code(&self) -> &str {
        self.computed
            .as_deref()
            .or(self.expected.as_deref())
            .unwrap_or("--")
    }
}

/// Lines up computed and expected codes for every index from 1 to the
/// highest index on either side.
pub fn compare_blocks(
    computed: &[ChecksumBlock],
    expected: &[ExpectedChecksum],
    report: &MismatchReport,
) -> Vec<BlockComparison> {
    let computed_map: HashMap<u32, &str> = computed
        .iter()
        .map(|b| (b.index, b.checksum.as_str()))
        .collect();
    let expected_map: HashMap<u32, &str> = expected
        .iter()
        .map(|e| (e.index, e.checksum.as_str()))
        .collect();

    let max_index = computed_map
        .keys()
        .chain(expected_map.keys())
        .copied()
        .max()
        .unwrap_or(0);

    (1..=max_index)
        .map(|index| {
            let exp = expected_map.get(&index).copied();
            let got = computed_map.get(&index).copied();
            let status = if report.mismatched_indices.contains(&index) {
                BlockStatus::Mismatch
            } else if codes_match(got, exp) {
                BlockStatus::Match
            } else {
                BlockStatus::Unverified
            };
            BlockComparison {
                index,
                expected: exp.map(str::to_string),
                computed: got.map(str::to_string),
                status,
            }
        })
        .collect()
}

/// Groups comparison cells into rows of `per_row` (one canonical line per
/// row when `per_row` equals the profile's `parts`).
pub fn grid_rows(cells: &[BlockComparison], per_row: usize) -> Vec<&[BlockComparison]> {
    cells.chunks(per_row.max(1)).collect()
}

/// A complete check of retyped text against expected checksums.
#[derive(Debug, Clone)]
pub struct Verification {
    /// Normalized armored text.
    pub canonical: String,
    /// Blocks computed from `canonical`.
    pub computed: Vec<ChecksumBlock>,
    /// Checksums read from the payload or manual entry.
    pub expected: Vec<ExpectedChecksum>,
    pub report: MismatchReport,
    pub summary: Summary,
}

impl Verification {
    /// Normalizes `raw`, reads `expected_input`, computes and compares.
    ///
    /// Checksums are only computed when there is text and at least one
    /// expected checksum.
    pub fn run(
        raw: &str,
        expected_input: &str,
        engine: &ChecksumEngine,
        columns: usize,
    ) -> Result<Self, ChecksumError> {
        let canonical = normalize_armored(raw, columns);
        let expected = read_expected(expected_input);

        let computed = if canonical.is_empty() || expected.is_empty() {
            Vec::new()
        } else {
            engine.compute(&canonical)?
        };

        let report = verify(&computed, &expected);
        let summary = Summary::classify(&canonical, &computed, &expected, &report);
        info!(summary = %summary, "verification finished");

        Ok(Self {
            canonical,
            computed,
            expected,
            report,
            summary,
        })
    }

    /// Per-block comparison cells for display.
    pub fn comparisons(&self) -> Vec<BlockComparison> {
        compare_blocks(&self.computed, &self.expected, &self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(index: u32, checksum: &str) -> ChecksumBlock {
        ChecksumBlock {
            index,
            checksum: checksum.to_string(),
            start: 0,
            end: 0,
        }
    }

    fn exp(index: u32, checksum: &str) -> ExpectedChecksum {
        ExpectedChecksum {
            index,
            checksum: checksum.to_string(),
        }
    }

    fn indices(report: &MismatchReport) -> Vec<u32> {
        report.mismatched_indices.iter().copied().collect()
    }

    #[test]
    fn test_full_match() {
        let computed = vec![block(1, "AB"), block(2, "CD")];
        let expected = vec![exp(1, "AB"), exp(2, "CD")];
        let report = verify(&computed, &expected);
        assert!(report.full_match);
        assert!(!report.count_mismatch);
        assert!(report.mismatched_indices.is_empty());
    }

    #[test]
    fn test_single_flip() {
        let computed = vec![block(1, "AB"), block(2, "CD"), block(3, "EF")];
        let expected = vec![exp(1, "AB"), exp(2, "CX"), exp(3, "EF")];
        let report = verify(&computed, &expected);
        assert_eq!(indices(&report), vec![2]);
        assert!(!report.full_match);
        assert!(!report.count_mismatch);
    }

    #[test]
    fn test_count_mismatch_reports_missing_indices() {
        let computed = vec![block(1, "AB"), block(2, "CD"), block(3, "EF")];
        let expected = vec![exp(1, "AB")];
        let report = verify(&computed, &expected);
        assert!(report.count_mismatch);
        assert!(!report.full_match);
        assert_eq!(indices(&report), vec![2, 3]);
    }

    #[test]
    fn test_expected_index_missing_from_computed() {
        let computed = vec![block(1, "AB")];
        let expected = vec![exp(5, "ZZ")];
        let report = verify(&computed, &expected);
        assert!(!report.count_mismatch);
        assert_eq!(indices(&report), vec![5]);
    }

    #[test]
    fn test_empty_expected_is_not_a_match() {
        let report = verify(&[], &[]);
        assert!(!report.full_match);
        assert!(report.mismatched_indices.is_empty());
    }

    #[test]
    fn test_codes_compare_case_insensitively() {
        let report = verify(&[block(1, "AB")], &[exp(1, "ab")]);
        assert!(report.full_match);
    }

    #[test]
    fn test_summary_classification() {
        let computed = vec![block(1, "AB"), block(2, "CD")];

        let expected = vec![exp(1, "AB"), exp(2, "CD")];
        let report = verify(&computed, &expected);
        assert_eq!(
            Summary::classify("x", &computed, &expected, &report),
            Summary::FullMatch { blocks: 2 }
        );

        assert_eq!(
            Summary::classify("  ", &computed, &expected, &report),
            Summary::NoInput
        );
        assert_eq!(
            Summary::classify("x", &computed, &[], &verify(&computed, &[])),
            Summary::NoExpectedChecksums
        );

        let short = vec![exp(1, "AB")];
        let report = verify(&computed, &short);
        assert_eq!(
            Summary::classify("x", &computed, &short, &report),
            Summary::CountMismatch {
                expected: 1,
                computed: 2
            }
        );
    }

    #[test]
    fn test_summary_single_mismatch_is_singular() {
        let summary = Summary::Mismatches {
            indices: vec![13],
            total: 1,
        };
        assert_eq!(summary.to_string(), "1 block mismatch: 13");

        let summary = Summary::Mismatches {
            indices: vec![2, 7],
            total: 2,
        };
        assert_eq!(summary.to_string(), "2 block mismatches: 2, 7");
    }

    #[test]
    fn test_summary_truncates_long_lists() {
        let computed: Vec<ChecksumBlock> = (1..=25).map(|i| block(i, "AA")).collect();
        let expected: Vec<ExpectedChecksum> = (1..=25).map(|i| exp(i, "BB")).collect();
        let report = verify(&computed, &expected);
        let summary = Summary::classify("x", &computed, &expected, &report);

        match &summary {
            Summary::Mismatches { indices, total } => {
                assert_eq!(indices.len(), MISMATCH_SUMMARY_LIMIT);
                assert_eq!(*total, 25);
            }
            other => panic!("unexpected summary: {:?}", other),
        }
        assert!(summary.to_string().ends_with("20…"));
        assert!(summary.to_string().starts_with("25 block mismatches: 1, 2, 3"));
    }

    #[test]
    fn test_compare_blocks_grid() {
        let computed = vec![block(1, "AB"), block(2, "CD"), block(3, "EF")];
        let expected = vec![exp(1, "AB"), exp(2, "XX")];
        let report = verify(&computed, &expected);
        let cells = compare_blocks(&computed, &expected, &report);

        let statuses: Vec<BlockStatus> = cells.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![BlockStatus::Match, BlockStatus::Mismatch, BlockStatus::Mismatch]
        );
        assert_eq!(cells[2].expected, None);
        assert_eq!(cells[2].display_code(), "EF");

        let rows = grid_rows(&cells, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].len(), 1);
    }

    #[test]
    fn test_verification_run_skips_without_expected() {
        let engine = ChecksumEngine::default();
        let run = Verification::run("ABCDEFGH", "", &engine, 65).unwrap();
        assert!(run.computed.is_empty());
        assert_eq!(run.summary, Summary::NoExpectedChecksums);

        let run = Verification::run("", "[1] AB", &engine, 65).unwrap();
        assert_eq!(run.summary, Summary::NoInput);
    }
}
