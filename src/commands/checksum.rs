//! Checksum command - print block checksums and the scan payload.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use armorcheck::checksum::listing_pages;
use armorcheck::{encode_payload, normalize_armored, ChecksumEngine, ChecksumProfile};
use armorcheck::CHECKSUM_BLOCKS_PER_PAGE;

use super::{load_preferences, read_input, CommandExecutor};

/// Compute per-segment checksums for the sender's printout.
///
/// Prints the listing in `[index] CODE` form, one page per postcard, and
/// the SC4 payload to put in the checksum QR code. The receiver must use
/// the same --parts and --chars.
#[derive(Args, Debug)]
pub struct ChecksumCommand {
    /// Armored text file (reads stdin if omitted or "-")
    pub input: Option<PathBuf>,

    /// Segments per line (default: from preferences, 4)
    #[arg(long)]
    pub parts: Option<usize>,

    /// Characters per code, 2-52 (default: from preferences, 2)
    #[arg(long)]
    pub chars: Option<usize>,

    /// Print only the payload
    #[arg(long)]
    pub payload_only: bool,
}

impl CommandExecutor for ChecksumCommand {
    fn execute(&self) -> Result<()> {
        let raw = read_input(self.input.as_deref())?;
        let prefs = load_preferences()?;

        let profile = ChecksumProfile::new(
            self.parts.unwrap_or(prefs.profile.parts),
            self.chars.unwrap_or(prefs.profile.display_chars),
        )
        .context("Invalid checksum settings")?;
        let engine = ChecksumEngine::new(profile)?;

        let canonical = normalize_armored(&raw, prefs.wrap_columns);
        if canonical.is_empty() {
            bail!("No armored text in input");
        }

        let blocks = engine
            .compute(&canonical)
            .context("Failed to compute checksums")?;
        let payload = encode_payload(&blocks)
            .context("Failed to encode payload")?
            .context("Armored text has no checksummable lines")?;

        if self.payload_only {
            println!("{}", payload);
            return Ok(());
        }

        if let Some(ref fingerprint) = prefs.sender_fingerprint {
            println!("Sender: {}", fingerprint);
        }
        println!(
            "Blocks: {} ({} per line, {} chars)",
            blocks.len(),
            profile.parts,
            profile.display_chars
        );
        println!();

        let pages = listing_pages(&blocks, CHECKSUM_BLOCKS_PER_PAGE);
        let total = pages.len();
        for (i, page) in pages.iter().enumerate() {
            if total > 1 {
                println!("--- Checksums {}/{} ---", i + 1, total);
            }
            println!("{}", page);
            println!();
        }

        println!("Payload:");
        println!("{}", payload);

        Ok(())
    }
}
