//! Local persistence: two independent string records in a key-value store.
//!
//! The entry record holds the whole collection as a JSON array and is
//! rewritten in full on every save. The password record holds plain text.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::journal_entry::JournalEntry;

pub const ENTRIES_KEY: &str = "zenjournal_data_v1";
pub const PASSWORD_KEY: &str = "zenjournal_pwd_v1";

/// A flat string-to-string store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(FileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        // Write to a sibling first so a crash never leaves half a record.
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed access to the journal's two records.
#[derive(Debug)]
pub struct JournalStore<S> {
    kv: S,
}

impl<S: KeyValueStore> JournalStore<S> {
    pub fn new(kv: S) -> Self {
        JournalStore { kv }
    }

    /// Missing or corrupt data yields an empty collection.
    pub fn load_entries(&self) -> Vec<JournalEntry> {
        let raw = match self.kv.get(ENTRIES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read entries, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<JournalEntry>>(&raw) {
            Ok(entries) => {
                debug!(count = entries.len(), "loaded entries");
                entries
            }
            Err(e) => {
                warn!(error = %e, "stored entries are malformed, starting empty");
                Vec::new()
            }
        }
    }

    pub fn save_entries(&mut self, entries: &[JournalEntry]) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(entries)?;
        self.kv.set(ENTRIES_KEY, &serialized)?;
        debug!(count = entries.len(), "saved entries");
        Ok(())
    }

    pub fn load_password(&self) -> Option<String> {
        match self.kv.get(PASSWORD_KEY) {
            Ok(password) => password,
            Err(e) => {
                warn!(error = %e, "failed to read password record");
                None
            }
        }
    }

    pub fn save_password(&mut self, password: &str) -> Result<(), StoreError> {
        self.kv.set(PASSWORD_KEY, password)
    }

    #[cfg(test)]
    pub fn kv_mut(&mut self) -> &mut S {
        &mut self.kv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::Mood;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_records_load_as_empty() {
        let store = JournalStore::new(MemoryStore::default());
        assert!(store.load_entries().is_empty());
        assert_eq!(store.load_password(), None);
    }

    #[test]
    fn malformed_entries_load_as_empty() {
        let mut store = JournalStore::new(MemoryStore::default());
        store.kv_mut().set(ENTRIES_KEY, "[{not json").unwrap();
        assert!(store.load_entries().is_empty());
    }

    #[test]
    fn entries_round_trip_in_order() {
        let mut entries = vec![
            JournalEntry::new(Mood::Bad, "rainy".into(), None, vec![]),
            JournalEntry::new(
                Mood::Good,
                "Had a great walk".into(),
                Some("data:image/png;base64,iVBORw0KGgo=".into()),
                vec!["outdoors".into(), "calm".into()],
            ),
        ];
        entries.reverse();

        let mut store = JournalStore::new(MemoryStore::default());
        store.save_entries(&entries).unwrap();
        assert_eq!(store.load_entries(), entries);
    }

    #[test]
    fn password_is_independent_of_entries() {
        let mut store = JournalStore::new(MemoryStore::default());
        store.save_password("abcd").unwrap();
        assert_eq!(store.load_password().as_deref(), Some("abcd"));
        assert!(store.load_entries().is_empty());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let entry = JournalEntry::new(Mood::Rad, "launch day".into(), None, vec!["work".into()]);

        {
            let mut store = JournalStore::new(FileStore::open(dir.path()).unwrap());
            store.save_entries(std::slice::from_ref(&entry)).unwrap();
            store.save_password("hunter22").unwrap();
        }

        let store = JournalStore::new(FileStore::open(dir.path()).unwrap());
        assert_eq!(store.load_entries(), vec![entry]);
        assert_eq!(store.load_password().as_deref(), Some("hunter22"));
        assert!(dir.path().join(ENTRIES_KEY).exists());
        assert!(!dir.path().join(format!("{ENTRIES_KEY}.tmp")).exists());
    }
}
