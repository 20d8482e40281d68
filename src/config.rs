//! User preferences and the key/value store behind them.
//!
//! Preferences are an explicit value passed into checksum and highlight
//! calls. Where they live is up to the caller: anything implementing
//! [`KeyValueStore`] works. The CLI uses [`TomlFileStore`] at
//! `~/.armorcheck/preferences.toml`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::checksum::ChecksumProfile;
use crate::highlight::AmbiguousChars;
use crate::{ARMOR_WRAP_COLUMNS, POSTCARD_LINES_PER_PAGE};

/// Store key for the ambiguous character set.
pub const KEY_AMBIGUOUS_CHARS: &str = "ambiguous_chars";
/// Store key for the last used sender fingerprint.
pub const KEY_SENDER_FINGERPRINT: &str = "sender_fingerprint";
/// Store key for segments per line.
pub const KEY_CHECKSUM_PARTS: &str = "checksum_parts";
/// Store key for characters per code.
pub const KEY_CHECKSUM_DISPLAY_CHARS: &str = "checksum_display_chars";
/// Store key for the body wrap width.
pub const KEY_WRAP_COLUMNS: &str = "wrap_columns";
/// Store key for lines per printed page.
pub const KEY_LINES_PER_PAGE: &str = "lines_per_page";

/// Every key [`Preferences`] reads and writes.
pub const PREFERENCE_KEYS: [&str; 6] = [
    KEY_AMBIGUOUS_CHARS,
    KEY_SENDER_FINGERPRINT,
    KEY_CHECKSUM_PARTS,
    KEY_CHECKSUM_DISPLAY_CHARS,
    KEY_WRAP_COLUMNS,
    KEY_LINES_PER_PAGE,
];

/// Errors that can occur when loading or saving preferences.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Config directory not found. Unable to determine home directory.")]
    NoConfigDir,

    #[error("Invalid value for '{key}': {value}")]
    InvalidValue { key: String, value: String },

    #[error("Unknown preference: {0}")]
    UnknownKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// A string key/value store.
pub trait KeyValueStore {
    /// Reads a value.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes a value, returning it if it existed.
    fn remove(&mut self, key: &str) -> Result<Option<String>, StoreError>;

    /// Lists keys in sorted order.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.remove(key))
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.values.keys().cloned().collect())
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct PreferencesFile {
    #[serde(default)]
    preferences: BTreeMap<String, String>,
}

/// TOML file store. Every `set`/`remove` rewrites the file.
#[derive(Debug, Clone)]
pub struct TomlFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl TomlFileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let file: PreferencesFile = toml::from_str(&content)?;
            file.preferences
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), entries = values.len(), "opened preferences store");
        Ok(Self { path, values })
    }

    /// Opens the store at the default location.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(Self::default_path()?)
    }

    /// `~/.armorcheck/preferences.toml`
    pub fn default_path() -> Result<PathBuf, StoreError> {
        Ok(get_config_dir()?.join("preferences.toml"))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = PreferencesFile {
            preferences: self.values.clone(),
        };
        fs::write(&self.path, toml::to_string_pretty(&file)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }
}

impl KeyValueStore for TomlFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        let removed = self.values.remove(key);
        if removed.is_some() {
            self.persist()?;
        }
        Ok(removed)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.values.keys().cloned().collect())
    }
}

/// Get the armorcheck config directory (`~/.armorcheck`).
pub fn get_config_dir() -> Result<PathBuf, StoreError> {
    dirs::home_dir()
        .map(|home| home.join(".armorcheck"))
        .ok_or(StoreError::NoConfigDir)
}

/// Settings that persist between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    /// Characters flagged as easy to confuse.
    pub ambiguous_chars: AmbiguousChars,
    /// Fingerprint of the key last used to send.
    pub sender_fingerprint: Option<String>,
    /// Partitioning profile; must match the sender's.
    pub profile: ChecksumProfile,
    /// Body wrap width used by normalization.
    pub wrap_columns: usize,
    /// Lines per printed page.
    pub lines_per_page: usize,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            ambiguous_chars: AmbiguousChars::default(),
            sender_fingerprint: None,
            profile: ChecksumProfile::default(),
            wrap_columns: ARMOR_WRAP_COLUMNS,
            lines_per_page: POSTCARD_LINES_PER_PAGE,
        }
    }
}

impl Preferences {
    /// Loads preferences, falling back to defaults for missing keys.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, StoreError> {
        let mut prefs = Self::default();

        if let Some(chars) = store.get(KEY_AMBIGUOUS_CHARS)? {
            prefs.ambiguous_chars = AmbiguousChars::new(&chars);
        }
        prefs.sender_fingerprint = store
            .get(KEY_SENDER_FINGERPRINT)?
            .filter(|f| !f.trim().is_empty());

        let parts = load_number(store, KEY_CHECKSUM_PARTS)?.unwrap_or(prefs.profile.parts);
        let display_chars = load_number(store, KEY_CHECKSUM_DISPLAY_CHARS)?
            .unwrap_or(prefs.profile.display_chars);
        prefs.profile = ChecksumProfile::new(parts, display_chars).map_err(|e| {
            StoreError::InvalidValue {
                key: "checksum profile".to_string(),
                value: e.to_string(),
            }
        })?;

        if let Some(columns) = load_number(store, KEY_WRAP_COLUMNS)? {
            prefs.wrap_columns = columns;
        }
        if let Some(lines) = load_number(store, KEY_LINES_PER_PAGE)? {
            prefs.lines_per_page = lines;
        }

        Ok(prefs)
    }

    /// Writes every preference to the store.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.set(KEY_AMBIGUOUS_CHARS, self.ambiguous_chars.as_str())?;
        match &self.sender_fingerprint {
            Some(fingerprint) => store.set(KEY_SENDER_FINGERPRINT, fingerprint)?,
            None => {
                store.remove(KEY_SENDER_FINGERPRINT)?;
            }
        }
        store.set(KEY_CHECKSUM_PARTS, &self.profile.parts.to_string())?;
        store.set(
            KEY_CHECKSUM_DISPLAY_CHARS,
            &self.profile.display_chars.to_string(),
        )?;
        store.set(KEY_WRAP_COLUMNS, &self.wrap_columns.to_string())?;
        store.set(KEY_LINES_PER_PAGE, &self.lines_per_page.to_string())?;
        Ok(())
    }

    /// Validates and writes a single preference by key.
    pub fn set_value(
        store: &mut dyn KeyValueStore,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        let invalid = || StoreError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        let stored = match key {
            KEY_AMBIGUOUS_CHARS => AmbiguousChars::new(value).to_string(),
            KEY_SENDER_FINGERPRINT => value.trim().to_string(),
            KEY_CHECKSUM_PARTS
            | KEY_CHECKSUM_DISPLAY_CHARS
            | KEY_WRAP_COLUMNS
            | KEY_LINES_PER_PAGE => {
                let n: usize = value.trim().parse().map_err(|_| invalid())?;
                if n == 0 {
                    return Err(invalid());
                }
                n.to_string()
            }
            other => return Err(StoreError::UnknownKey(other.to_string())),
        };

        let previous = store.get(key)?;
        store.set(key, &stored)?;
        // Reject combinations that would not load back.
        if let Err(e) = Self::load(store) {
            match previous {
                Some(old) => store.set(key, &old)?,
                None => {
                    store.remove(key)?;
                }
            }
            return Err(e);
        }
        Ok(())
    }
}

fn load_number(store: &dyn KeyValueStore, key: &str) -> Result<Option<usize>, StoreError> {
    match store.get(key)? {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| StoreError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_empty_store() {
        let store = MemoryStore::new();
        let prefs = Preferences::load(&store).unwrap();
        assert_eq!(prefs, Preferences::default());
        assert!(prefs.ambiguous_chars.is_default());
        assert_eq!(prefs.wrap_columns, 65);
    }

    #[test]
    fn test_save_load_memory() {
        let mut store = MemoryStore::new();
        let prefs = Preferences {
            ambiguous_chars: AmbiguousChars::new("0 O"),
            sender_fingerprint: Some("ABCD1234".to_string()),
            profile: ChecksumProfile::new(3, 4).unwrap(),
            wrap_columns: 64,
            lines_per_page: 30,
        };
        prefs.save(&mut store).unwrap();

        assert_eq!(store.get(KEY_AMBIGUOUS_CHARS).unwrap().as_deref(), Some("0O"));
        assert_eq!(Preferences::load(&store).unwrap(), prefs);
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let mut store = MemoryStore::new();
        store.set(KEY_WRAP_COLUMNS, "wide").unwrap();
        assert!(matches!(
            Preferences::load(&store),
            Err(StoreError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_set_value_validation() {
        let mut store = MemoryStore::new();
        Preferences::set_value(&mut store, KEY_CHECKSUM_PARTS, " 6 ").unwrap();
        assert_eq!(store.get(KEY_CHECKSUM_PARTS).unwrap().as_deref(), Some("6"));

        assert!(matches!(
            Preferences::set_value(&mut store, "colour", "red"),
            Err(StoreError::UnknownKey(_))
        ));
        assert!(Preferences::set_value(&mut store, KEY_WRAP_COLUMNS, "0").is_err());

        // display_chars above 52 cannot load, so it is rolled back.
        assert!(Preferences::set_value(&mut store, KEY_CHECKSUM_DISPLAY_CHARS, "60").is_err());
        assert_eq!(store.get(KEY_CHECKSUM_DISPLAY_CHARS).unwrap(), None);
    }

    #[test]
    fn test_toml_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("preferences.toml");

        let mut store = TomlFileStore::open(&path).unwrap();
        assert!(store.keys().unwrap().is_empty());
        store.set("custom", "kept").unwrap();
        Preferences {
            sender_fingerprint: Some("FEED".to_string()),
            ..Default::default()
        }
        .save(&mut store)
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[preferences]"));

        let reopened = TomlFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("custom").unwrap().as_deref(), Some("kept"));
        let prefs = Preferences::load(&reopened).unwrap();
        assert_eq!(prefs.sender_fingerprint.as_deref(), Some("FEED"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_remove_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.toml");
        let mut store = TomlFileStore::open(&path).unwrap();
        assert_eq!(store.remove("nothing").unwrap(), None);
        assert!(!path.exists());
    }
}
