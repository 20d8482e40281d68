//! Paginate command - split canonical armor into printable pages.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use armorcheck::{normalize_armored, split_by_lines};

use super::{load_preferences, read_input, CommandExecutor};

/// Split armor into postcard-sized pages.
///
/// The input is normalized first so page breaks fall on canonical lines.
#[derive(Args, Debug)]
pub struct PaginateCommand {
    /// Armored text file (reads stdin if omitted or "-")
    pub input: Option<PathBuf>,

    /// Lines per page (default: from preferences, 40)
    #[arg(short, long)]
    pub lines: Option<usize>,
}

impl CommandExecutor for PaginateCommand {
    fn execute(&self) -> Result<()> {
        let raw = read_input(self.input.as_deref())?;
        let prefs = load_preferences()?;
        let lines = self.lines.unwrap_or(prefs.lines_per_page);

        let canonical = normalize_armored(&raw, prefs.wrap_columns);
        if canonical.is_empty() {
            bail!("No armored text in input");
        }

        let pages = split_by_lines(&canonical, lines);
        let total = pages.len();
        for (i, page) in pages.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("--- Page {}/{} ---", i + 1, total);
            println!("{}", page);
        }

        Ok(())
    }
}
