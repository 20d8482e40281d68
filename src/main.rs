//! Armorcheck - Verify hand-transcribed armored ciphertext
//!
//! A CLI tool that prints per-segment checksums for ASCII armor and checks
//! retyped or OCR'd armor against them, pointing at the broken segments.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    ChecksumCommand, CommandExecutor, GpgCommand, NormalizeCommand, PaginateCommand,
    PrefsCommand, VerifyCommand,
};

/// Armorcheck - Verify hand-transcribed armored ciphertext
///
/// Print armor with short checksums per line segment, retype or OCR it on
/// the other side, and find exactly which segments came back wrong.
#[derive(Parser)]
#[command(name = "armorcheck")]
#[command(version)]
#[command(about = "Per-segment checksums for transcribing armored ciphertext")]
#[command(long_about = None)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild armor in canonical form
    Normalize(NormalizeCommand),

    /// Split armor into printable pages
    Paginate(PaginateCommand),

    /// Compute block checksums and the scan payload
    Checksum(ChecksumCommand),

    /// Check retyped armor against expected checksums
    Verify(VerifyCommand),

    /// Show or change preferences
    Prefs(PrefsCommand),

    /// Print a gpg decrypt command for the armor
    #[command(name = "gpg-command")]
    GpgCommand(GpgCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "armorcheck=debug"
    } else {
        "armorcheck=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Normalize(cmd) => cmd.execute(),
        Commands::Paginate(cmd) => cmd.execute(),
        Commands::Checksum(cmd) => cmd.execute(),
        Commands::Verify(cmd) => cmd.execute(),
        Commands::Prefs(cmd) => cmd.execute(),
        Commands::GpgCommand(cmd) => cmd.execute(),
    }
}
