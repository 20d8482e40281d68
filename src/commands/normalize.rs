//! Normalize command - print canonical armor.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use armorcheck::normalize_armored;

use super::{load_preferences, read_input, CommandExecutor};

/// Rebuild retyped or OCR'd armor in canonical, fixed-width form.
///
/// Stray whitespace is removed, CRLF endings are unified and the body is
/// rewrapped. Text without BEGIN/END markers is printed trimmed.
#[derive(Args, Debug)]
pub struct NormalizeCommand {
    /// Armored text file (reads stdin if omitted or "-")
    pub input: Option<PathBuf>,

    /// Body line width (default: from preferences, 65)
    #[arg(short, long)]
    pub columns: Option<usize>,
}

impl CommandExecutor for NormalizeCommand {
    fn execute(&self) -> Result<()> {
        let raw = read_input(self.input.as_deref())?;
        let columns = match self.columns {
            Some(c) => c,
            None => load_preferences()?.wrap_columns,
        };

        let canonical = normalize_armored(&raw, columns);
        if canonical.is_empty() {
            bail!("No armored text in input");
        }

        println!("{}", canonical);
        Ok(())
    }
}
