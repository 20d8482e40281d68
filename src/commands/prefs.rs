//! Prefs command - show and change stored preferences.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use armorcheck::config::PREFERENCE_KEYS;
use armorcheck::{KeyValueStore, Preferences, TomlFileStore};

use super::CommandExecutor;

/// Manage preferences stored in ~/.armorcheck/preferences.toml.
///
/// Keys: ambiguous_chars, sender_fingerprint, checksum_parts,
/// checksum_display_chars, wrap_columns, lines_per_page.
#[derive(Args, Debug)]
pub struct PrefsCommand {
    #[command(subcommand)]
    pub action: PrefsAction,
}

#[derive(Subcommand, Debug)]
pub enum PrefsAction {
    /// Show effective preferences
    Show,

    /// Set a preference
    Set(PrefsSetArgs),

    /// Reset one preference, or all of them, to the default
    Reset(PrefsResetArgs),
}

#[derive(Args, Debug)]
pub struct PrefsSetArgs {
    /// Preference key
    pub key: String,

    /// New value
    pub value: String,
}

#[derive(Args, Debug)]
pub struct PrefsResetArgs {
    /// Preference key (resets everything if omitted)
    pub key: Option<String>,
}

impl CommandExecutor for PrefsCommand {
    fn execute(&self) -> Result<()> {
        let mut store = TomlFileStore::open_default().context("Failed to open preferences")?;
        match &self.action {
            PrefsAction::Show => show_prefs(&store),
            PrefsAction::Set(args) => set_pref(&mut store, args),
            PrefsAction::Reset(args) => reset_prefs(&mut store, args),
        }
    }
}

/// Show effective preferences.
fn show_prefs(store: &TomlFileStore) -> Result<()> {
    let prefs = Preferences::load(store).context("Failed to load preferences")?;

    println!("Preferences ({}):", store.path().display());
    println!();
    println!("  ambiguous_chars:        {}", prefs.ambiguous_chars);
    println!(
        "  sender_fingerprint:     {}",
        prefs.sender_fingerprint.as_deref().unwrap_or("(not set)")
    );
    println!("  checksum_parts:         {}", prefs.profile.parts);
    println!("  checksum_display_chars: {}", prefs.profile.display_chars);
    println!("  wrap_columns:           {}", prefs.wrap_columns);
    println!("  lines_per_page:         {}", prefs.lines_per_page);

    let extra: Vec<String> = store
        .keys()?
        .into_iter()
        .filter(|k| !PREFERENCE_KEYS.contains(&k.as_str()))
        .collect();
    if !extra.is_empty() {
        println!();
        println!("  Other keys: {}", extra.join(", "));
    }

    Ok(())
}

/// Set a preference.
fn set_pref(store: &mut TomlFileStore, args: &PrefsSetArgs) -> Result<()> {
    Preferences::set_value(store, &args.key, &args.value)
        .with_context(|| format!("Failed to set '{}'", args.key))?;

    println!("Set {} = {}", args.key, args.value.trim());
    Ok(())
}

/// Reset one or all preferences.
fn reset_prefs(store: &mut TomlFileStore, args: &PrefsResetArgs) -> Result<()> {
    match &args.key {
        Some(key) => {
            if !PREFERENCE_KEYS.contains(&key.as_str()) {
                anyhow::bail!("Unknown preference: {}", key);
            }
            store
                .remove(key)
                .with_context(|| format!("Failed to reset '{}'", key))?;
            println!("Reset {} to default.", key);
        }
        None => {
            for key in PREFERENCE_KEYS {
                store
                    .remove(key)
                    .with_context(|| format!("Failed to reset '{}'", key))?;
            }
            println!("All preferences reset to defaults.");
        }
    }
    Ok(())
}
