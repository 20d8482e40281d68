//! Normalization of noisy armored text.
//!
//! OCR output and hand-retyped armor come back with stray spaces, broken
//! line lengths and CRLF endings. Normalization rebuilds the canonical
//! layout so that checksums computed on the receiving side line up with
//! the ones printed by the sender:
//!
//! ```text
//! -----BEGIN PGP MESSAGE-----
//! Header: value            (zero or more)
//!                          (one blank line)
//! <body, exactly `columns` characters per line except the last>
//! =CRC                     (optional)
//! -----END PGP MESSAGE-----
//! ```
//!
//! Text without a BEGIN/END pair is passed through trimmed.

use tracing::debug;

use super::ArmorBounds;

/// Rebuilds armored text in canonical, fixed-width form.
///
/// Running this on its own output returns the output unchanged.
///
/// # Arguments
/// * `raw` - Pasted, retyped or OCR'd text
/// * `columns` - Body line width (values below 1 are treated as 1)
pub fn normalize_armored(raw: &str, columns: usize) -> String {
    let unified = raw.replace("\r\n", "\n");
    let trimmed = unified.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let lines: Vec<&str> = trimmed.split('\n').collect();
    let Some(bounds) = ArmorBounds::find(&lines) else {
        debug!("no armor markers found, passing text through");
        return trimmed.to_string();
    };

    let middle = &lines[bounds.inner()];
    let (headers, body) = split_headers(middle);
    let (data, checksum_line) = collect_body(body);
    let wrapped = wrap_chars(&data, columns.max(1));

    debug!(
        headers = headers.len(),
        body_chars = data.chars().count(),
        body_lines = wrapped.len(),
        has_checksum_line = checksum_line.is_some(),
        "normalized armor"
    );

    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + wrapped.len());
    out.extend(lines[..=bounds.begin].iter().map(|l| l.trim_end()));
    out.extend(headers);
    out.push("");
    out.extend(wrapped.iter().map(String::as_str));
    if let Some(line) = &checksum_line {
        out.push(line);
    }
    out.extend(lines[bounds.end..].iter().map(|l| l.trim_end()));

    out.join("\n")
}

/// Splits the lines between the markers into header lines and body lines.
///
/// Headers end at the first blank line, which is consumed. When there is
/// no blank line at all, headers end at the first line that does not look
/// like a `Key: Value` armor header.
fn split_headers<'a, 'b>(middle: &'b [&'a str]) -> (Vec<&'a str>, &'b [&'a str]) {
    if let Some(blank) = middle.iter().position(|l| l.trim().is_empty()) {
        let headers = middle[..blank].iter().map(|l| l.trim_end()).collect();
        return (headers, &middle[blank + 1..]);
    }

    let count = middle.iter().take_while(|l| looks_like_header(l)).count();
    let headers = middle[..count].iter().map(|l| l.trim_end()).collect();
    (headers, &middle[count..])
}

fn looks_like_header(line: &str) -> bool {
    match line.trim().split_once(": ") {
        Some((key, _)) => {
            !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        }
        None => false,
    }
}

/// Joins body lines into one whitespace-free string and pulls out the
/// armor checksum line.
///
/// The checksum line is the last non-blank body line when it begins with
/// `=`. Any other line starting with `=` is kept as data: it is either OCR
/// noise or base64 padding that landed at the start of a wrapped line.
fn collect_body(body: &[&str]) -> (String, Option<String>) {
    let mut lines: Vec<&str> = body
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let checksum_line = match lines.last() {
        Some(last) if last.starts_with('=') => {
            let line = strip_whitespace(last);
            lines.pop();
            Some(line)
        }
        _ => None,
    };

    let data = lines.iter().map(|l| strip_whitespace(l)).collect();
    (data, checksum_line)
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn wrap_chars(data: &str, columns: usize) -> Vec<String> {
    let chars: Vec<char> = data.chars().collect();
    chars.chunks(columns).map(|c| c.iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NOISY: &str = "  -----BEGIN PGP MESSAGE-----\r\n\
        Version: Test 1.0  \r\n\
        \r\n\
        wcBM A1ad 3fG\r\n\
        hiJK lmno\r\n\
        pqr\r\n\
        = AbCd\r\n\
        -----END PGP MESSAGE-----  \r\n";

    #[test]
    fn test_normalize_rewraps_body() {
        let out = normalize_armored(NOISY, 8);
        assert_eq!(
            out,
            "-----BEGIN PGP MESSAGE-----\n\
             Version: Test 1.0\n\
             \n\
             wcBMA1ad\n\
             3fGhiJKl\n\
             mnopqr\n\
             =AbCd\n\
             -----END PGP MESSAGE-----"
        );
    }

    #[test]
    fn test_normalize_idempotent_on_sample() {
        let once = normalize_armored(NOISY, 8);
        assert_eq!(normalize_armored(&once, 8), once);
    }

    #[test]
    fn test_pass_through_without_markers() {
        assert_eq!(normalize_armored("  just text \n", 65), "just text");
        assert_eq!(
            normalize_armored("-----BEGIN PGP MESSAGE-----\nabc", 65),
            "-----BEGIN PGP MESSAGE-----\nabc"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_armored("   \n  ", 65), "");
    }

    #[test]
    fn test_headers_without_blank_line() {
        let raw = "-----BEGIN PGP MESSAGE-----\n\
                   Comment: hi\n\
                   AAAA BBBB\n\
                   -----END PGP MESSAGE-----";
        assert_eq!(
            normalize_armored(raw, 4),
            "-----BEGIN PGP MESSAGE-----\nComment: hi\n\nAAAA\nBBBB\n-----END PGP MESSAGE-----"
        );
    }

    #[test]
    fn test_padding_line_is_data_when_checksum_follows() {
        let raw = "-----BEGIN PGP MESSAGE-----\n\nAAAA\n==\n=XyZw\n-----END PGP MESSAGE-----";
        assert_eq!(
            normalize_armored(raw, 3),
            "-----BEGIN PGP MESSAGE-----\n\nAAA\nA==\n=XyZw\n-----END PGP MESSAGE-----"
        );
    }

    #[test]
    fn test_text_around_armor_is_kept() {
        let raw = "note\n-----BEGIN X-----\n\nab cd\n-----END X-----\nbye";
        assert_eq!(
            normalize_armored(raw, 65),
            "note\n-----BEGIN X-----\n\nabcd\n-----END X-----\nbye"
        );
    }

    fn body_line() -> impl Strategy<Value = String> {
        prop_oneof![
            "[A-Za-z0-9+/ ]{0,20}",
            "=[A-Za-z0-9 ]{0,5}",
            Just(String::new()),
            Just("Key: value ".to_string()),
        ]
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(
            before in proptest::collection::vec("[a-z ]{0,8}", 0..3),
            middle in proptest::collection::vec(body_line(), 0..12),
            after in proptest::collection::vec("[a-z ]{0,8}", 0..3),
            columns in 1usize..12,
        ) {
            let mut lines = before;
            lines.push("-----BEGIN PGP MESSAGE-----".to_string());
            lines.extend(middle);
            lines.push("-----END PGP MESSAGE-----".to_string());
            lines.extend(after);
            let raw = lines.join("\r\n");

            let once = normalize_armored(&raw, columns);
            let twice = normalize_armored(&once, columns);
            prop_assert_eq!(once, twice);
        }
    }
}
