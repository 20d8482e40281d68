//! Line-based pagination for printed postcards.

/// Splits text into pages of at most `max_lines_per_page` lines.
///
/// Pages never break inside a line. CRLF endings are unified first, and
/// empty input still yields a single empty page. A limit of zero is
/// treated as one line per page.
pub fn split_by_lines(input: &str, max_lines_per_page: usize) -> Vec<String> {
    let unified = input.replace("\r\n", "\n");
    let lines: Vec<&str> = unified.split('\n').collect();

    let pages: Vec<String> = lines
        .chunks(max_lines_per_page.max(1))
        .map(|page| page.join("\n"))
        .collect();

    if pages.is_empty() {
        vec![String::new()]
    } else {
        pages
    }
}
