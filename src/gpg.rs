//! Shell command that hands verified armor to `gpg`.
//!
//! Nothing here decrypts. The output is a heredoc the user pastes into a
//! terminal once every block matches.

use crate::armor::normalize_armored;

/// Base heredoc delimiter.
pub const HEREDOC_DELIMITER: &str = "ARMORCHECK_PGP_MESSAGE";

/// Builds `cat <<'DELIM' | gpg --decrypt` around the canonical text.
///
/// `columns` must be the wrap width the text was verified with, so the
/// command carries exactly the checked text. The delimiter is quoted so
/// the shell does no expansion inside the body, and it is chosen so no
/// line of the body equals or contains it.
/// Returns `None` when there is no armored text.
pub fn gpg_decrypt_command(armored: &str, columns: usize) -> Option<String> {
    let canonical = normalize_armored(armored, columns);
    if canonical.is_empty() {
        return None;
    }

    let delimiter = pick_delimiter(&canonical);
    Some(format!(
        "cat <<'{delim}' | gpg --decrypt\n{body}\n{delim}",
        delim = delimiter,
        body = canonical
    ))
}

fn pick_delimiter(text: &str) -> String {
    let mut candidate = HEREDOC_DELIMITER.to_string();
    let mut suffix = 1;
    while text.contains(&candidate) {
        candidate = format!("{}_{}", HEREDOC_DELIMITER, suffix);
        suffix += 1;
    }
    candidate
}
