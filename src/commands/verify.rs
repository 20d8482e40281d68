//! Verify command - check retyped armor against expected checksums.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use crossterm::style::Stylize;

use armorcheck::highlight::ambiguous_in;
use armorcheck::verify::{grid_rows, BlockStatus};
use armorcheck::{
    highlight, ChecksumEngine, ChecksumProfile, CharClass, HighlightRun, RunStatus, Verification,
};

use super::{load_preferences, read_input, CommandExecutor};

/// Check retyped or OCR'd armor against the sender's checksums.
///
/// Expected checksums come from a scanned payload (SC4/SC2) or from a
/// file of hand-typed `[index] CODE` lines. Exits with an error unless
/// every block matches.
#[derive(Args, Debug)]
pub struct VerifyCommand {
    /// Retyped armored text file (reads stdin if omitted or "-")
    pub input: Option<PathBuf>,

    /// Scanned payload string, e.g. "SC4:2:AB7Q..."
    #[arg(short, long, conflicts_with = "expected", required_unless_present = "expected")]
    pub payload: Option<String>,

    /// File with a payload or manual `[index] CODE` lines
    #[arg(short, long, conflicts_with = "payload")]
    pub expected: Option<PathBuf>,

    /// Segments per line used by the sender (default: from preferences)
    #[arg(long)]
    pub parts: Option<usize>,

    /// Characters per code used by the sender (default: from preferences)
    #[arg(long)]
    pub chars: Option<usize>,

    /// Show the per-block comparison grid
    #[arg(short, long)]
    pub grid: bool,

    /// Print the text with mismatched blocks and ambiguous characters marked
    #[arg(long)]
    pub highlight: bool,

    /// Disable colors in highlighted output
    #[arg(long)]
    pub no_color: bool,
}

impl CommandExecutor for VerifyCommand {
    fn execute(&self) -> Result<()> {
        let expected_input = match (&self.payload, &self.expected) {
            (Some(payload), _) => payload.clone(),
            (None, Some(path)) => read_input(Some(path))?,
            (None, None) => bail!("Provide --payload or --expected"),
        };
        let raw = read_input(self.input.as_deref())?;
        let prefs = load_preferences()?;

        let profile = ChecksumProfile::new(
            self.parts.unwrap_or(prefs.profile.parts),
            self.chars.unwrap_or(prefs.profile.display_chars),
        )
        .context("Invalid checksum settings")?;
        let engine = ChecksumEngine::new(profile)?;

        let check = Verification::run(&raw, &expected_input, &engine, prefs.wrap_columns)
            .context("Failed to compute checksums")?;

        if self.grid && !check.computed.is_empty() {
            print_grid(&check, profile.parts);
            println!();
        }

        if self.highlight && !check.computed.is_empty() {
            let runs = highlight(
                &check.canonical,
                &check.computed,
                &check.report.mismatched_indices,
                &prefs.ambiguous_chars,
            );
            let color = !self.no_color && io::stdout().is_terminal();
            print_highlight(&runs, color);
            println!();

            let confusable = ambiguous_in(&check.canonical, &prefs.ambiguous_chars);
            if !confusable.is_empty() {
                let list: String = confusable.into_iter().collect();
                println!("Check easily confused characters: {}", list);
                println!();
            }
        }

        println!("{}", check.summary);

        if !check.summary.is_match() {
            bail!("Verification did not pass");
        }
        Ok(())
    }
}

/// Prints one row per canonical line. Mismatched cells also show the
/// expected code.
fn print_grid(check: &Verification, parts: usize) {
    let cells = check.comparisons();
    for row in grid_rows(&cells, parts) {
        let rendered: Vec<String> = row
            .iter()
            .map(|cell| match cell.status {
                BlockStatus::Match => format!("[{:>3}] {} ok", cell.index, cell.display_code()),
                BlockStatus::Unverified => {
                    format!("[{:>3}] {} ??", cell.index, cell.display_code())
                }
                BlockStatus::Mismatch => format!(
                    "[{:>3}] {} XX (expected {})",
                    cell.index,
                    cell.display_code(),
                    cell.expected.as_deref().unwrap_or("--")
                ),
            })
            .collect();
        println!("{}", rendered.join("  "));
    }
}

/// Prints highlight runs. Without color, mismatched runs are wrapped in
/// `[[ ]]` and ambiguous ones in `{ }`.
fn print_highlight(runs: &[HighlightRun], color: bool) {
    let mut out = String::new();
    for run in runs {
        if color {
            let styled = match (run.status, run.class) {
                (RunStatus::Mismatch, CharClass::Ambiguous) => {
                    run.text.as_str().white().on_red().underlined().to_string()
                }
                (RunStatus::Mismatch, CharClass::Normal) => {
                    run.text.as_str().white().on_red().to_string()
                }
                (_, CharClass::Ambiguous) => run.text.as_str().yellow().underlined().to_string(),
                (RunStatus::Ok, CharClass::Normal) => run.text.as_str().green().to_string(),
                (RunStatus::None, CharClass::Normal) => run.text.clone(),
            };
            out.push_str(&styled);
        } else {
            match (run.status, run.class) {
                (RunStatus::Mismatch, _) => {
                    out.push_str("[[");
                    out.push_str(&run.text);
                    out.push_str("]]");
                }
                (_, CharClass::Ambiguous) => {
                    out.push('{');
                    out.push_str(&run.text);
                    out.push('}');
                }
                _ => out.push_str(&run.text),
            }
        }
    }
    println!("{}", out);
}
