//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod checksum;
mod gpg_command;
mod normalize;
mod paginate;
mod prefs;
mod verify;

pub use checksum::ChecksumCommand;
pub use gpg_command::GpgCommand;
pub use normalize::NormalizeCommand;
pub use paginate::PaginateCommand;
pub use prefs::PrefsCommand;
pub use verify::VerifyCommand;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};

use armorcheck::{Preferences, TomlFileStore};

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self) -> Result<()>;
}

/// Reads a file, or stdin when no path (or `-`) is given.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p)
            .with_context(|| format!("Failed to read {}", p.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

/// Loads preferences from `~/.armorcheck/preferences.toml`.
pub(crate) fn load_preferences() -> Result<Preferences> {
    let store = TomlFileStore::open_default().context("Failed to open preferences")?;
    Preferences::load(&store).context("Failed to load preferences")
}
