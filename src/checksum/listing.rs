//! Printable checksum listings.
//!
//! The listing uses the manual-entry format (`[index] CODE`), so a receiver
//! can type it back in line by line.

use super::ChecksumBlock;

/// Renders one `[index] CODE` line per block, in index order.
pub fn format_listing(blocks: &[ChecksumBlock]) -> String {
    let mut sorted: Vec<&ChecksumBlock> = blocks.iter().collect();
    sorted.sort_by_key(|b| b.index);
    sorted
        .iter()
        .map(|b| format!("[{}] {}", b.index, b.checksum))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits the listing into pages of at most `per_page` blocks each.
///
/// Returns no pages for an empty block list.
pub fn listing_pages(blocks: &[ChecksumBlock], per_page: usize) -> Vec<String> {
    let mut sorted = blocks.to_vec();
    sorted.sort_by_key(|b| b.index);
    sorted
        .chunks(per_page.max(1))
        .map(format_listing)
        .collect()
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

    #[test]
    fn test_format_listing_sorted() {
        let blocks = vec![block(2, "CD"), block(1, "AB")];
        assert_eq!(format_listing(&blocks), "[1] AB\n[2] CD");
    }

    #[test]
    fn test_listing_pages() {
        let blocks: Vec<ChecksumBlock> = (1..=5).map(|i| block(i, "ZZ")).collect();
        let pages = listing_pages(&blocks, 2);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[2], "[5] ZZ");
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(format_listing(&[]), "");
        assert!(listing_pages(&[], 30).is_empty());
    }
}
