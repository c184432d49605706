//! Persisted preference: the local-storage analogue.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::I18nError;

/// Storage key the site uses for the chosen language.
pub const DEFAULT_STORAGE_KEY: &str = "servicepro_lang";

/// A string key-value slot store. Last writer wins.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), I18nError>;
}

/// In-process store. Clones share the same slots, so a test (or a second
/// page session) can observe what an earlier one persisted.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemorySlots>>,
}

#[derive(Debug, Default)]
struct MemorySlots {
    values: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .values
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Number of `set` calls so far, across all clones.
    pub fn writes(&self) -> usize {
        self.inner.lock().unwrap().writes
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().unwrap().values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), I18nError> {
        let mut slots = self.inner.lock().unwrap();
        slots.values.insert(key.to_string(), value.to_string());
        slots.writes += 1;
        Ok(())
    }
}

/// A TOML file of string values, rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. An unreadable or malformed file is
    /// logged and treated as empty; the next `set` overwrites it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                warn!("ignoring malformed preference file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("cannot read preference file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), I18nError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(&self.values).map_err(|e| I18nError::Store(e.to_string()))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), I18nError> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn memory_store_counts_writes() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(DEFAULT_STORAGE_KEY), None);
        store.set(DEFAULT_STORAGE_KEY, "ar").unwrap();
        store.set(DEFAULT_STORAGE_KEY, "en").unwrap();
        assert_eq!(store.get(DEFAULT_STORAGE_KEY), Some("en".to_string()));
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn memory_store_clones_share_slots() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.set(DEFAULT_STORAGE_KEY, "ar").unwrap();
        assert_eq!(store.get(DEFAULT_STORAGE_KEY), Some("ar".to_string()));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("nested").join("prefs.toml");

        let mut store = FileStore::open(&path);
        assert_eq!(store.get(DEFAULT_STORAGE_KEY), None);
        store.set(DEFAULT_STORAGE_KEY, "ar").expect("save should create directories");
        assert!(path.exists());

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get(DEFAULT_STORAGE_KEY), Some("ar".to_string()));
    }

    #[test]
    fn file_store_ignores_malformed_file() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "not = valid = toml").unwrap();

        let mut store = FileStore::open(&path);
        assert_eq!(store.get(DEFAULT_STORAGE_KEY), None);

        store.set(DEFAULT_STORAGE_KEY, "en").unwrap();
        assert_eq!(
            FileStore::open(&path).get(DEFAULT_STORAGE_KEY),
            Some("en".to_string())
        );
    }
}
