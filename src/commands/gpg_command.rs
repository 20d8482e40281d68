//! Gpg-command - print a shell command that decrypts verified armor.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use armorcheck::gpg_decrypt_command;

use super::{load_preferences, read_input, CommandExecutor};

/// Print a `gpg --decrypt` heredoc for the canonical armor.
///
/// Run `verify` first. This only prints the command, it never decrypts.
#[derive(Args, Debug)]
pub struct GpgCommand {
    /// Armored text file (reads stdin if omitted or "-")
    pub input: Option<PathBuf>,

    /// Body line width; must match the one used by `verify` (default: from preferences, 65)
    #[arg(short, long)]
    pub columns: Option<usize>,
}

impl CommandExecutor for GpgCommand {
    fn execute(&self) -> Result<()> {
        let raw = read_input(self.input.as_deref())?;
        let columns = match self.columns {
            Some(c) => c,
            None => load_preferences()?.wrap_columns,
        };
        let command =
            gpg_decrypt_command(&raw, columns).context("No armored text in input")?;
        println!("{}", command);
        Ok(())
    }
}
