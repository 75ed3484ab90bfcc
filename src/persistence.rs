// File: src/persistence.rs
use crate::error::StorageError;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

pub const VOCABULARY_KEY: &str = "taskboard.vocabulary";
pub const ENTITIES_KEY: &str = "taskboard.entities";

/// Minimal key-value backend the learned stores persist through.
///
/// Values are whole JSON documents; a missing key reads as `Ok(None)`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Builds the storage key for `base`, optionally scoped to a namespace
/// (e.g. one per signed-in user).
pub fn scoped_key(namespace: Option<&str>, base: &str) -> String {
    match namespace {
        Some(ns) if !ns.trim().is_empty() => format!("{}/{}", ns.trim(), base),
        _ => base.to_string(),
    }
}

pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// One JSON file per key inside a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut file_name = String::with_capacity(key.len() + 5);
        for c in key.chars() {
            match c {
                '/' => file_name.push_str("__"),
                c if c.is_alphanumeric() || matches!(c, '.' | '-') => file_name.push(c),
                _ => file_name.push('-'),
            }
        }
        file_name.push_str(".json");
        self.dir.join(file_name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a temp file in the same directory, then renames it over the
    /// target so readers never see a half-written document.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        let temp_file = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(&temp_file);
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
        }

        temp_file
            .persist(self.path_for(key))
            .map_err(|e| StorageError::Io(e.error))?;
        Ok(())
    }
}

/// In-process store. Used for tests and for sessions without a writable
/// data directory.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn file_store_round_trips_documents() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.get(VOCABULARY_KEY).unwrap().is_none());

        let mut words = BTreeMap::new();
        words.insert("factura".to_string(), 7u32);
        save_json(&store, VOCABULARY_KEY, &words).unwrap();

        let loaded: BTreeMap<String, u32> = load_json(&store, VOCABULARY_KEY).unwrap().unwrap();
        assert_eq!(loaded, words);
    }

    #[test]
    fn file_store_overwrites_existing_value() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.set(ENTITIES_KEY, "[\"Ana\"]").unwrap();
        store.set(ENTITIES_KEY, "[\"Juan\"]").unwrap();

        assert_eq!(store.get(ENTITIES_KEY).unwrap().as_deref(), Some("[\"Juan\"]"));
    }

    #[test]
    fn namespaced_keys_use_distinct_files() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        store.set(&scoped_key(Some("ana"), ENTITIES_KEY), "[\"A\"]").unwrap();
        store.set(&scoped_key(None, ENTITIES_KEY), "[\"B\"]").unwrap();

        assert_eq!(
            store.get(&scoped_key(Some("ana"), ENTITIES_KEY)).unwrap().as_deref(),
            Some("[\"A\"]")
        );
        assert_eq!(store.get(ENTITIES_KEY).unwrap().as_deref(), Some("[\"B\"]"));
    }

    #[test]
    fn corrupt_document_is_a_serialization_error() {
        let store = MemoryStore::new();
        store.set(VOCABULARY_KEY, "{not json").unwrap();

        let result: Result<Option<BTreeMap<String, u32>>, _> = load_json(&store, VOCABULARY_KEY);
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn blank_namespace_falls_back_to_shared_key() {
        assert_eq!(scoped_key(Some("  "), VOCABULARY_KEY), VOCABULARY_KEY);
        assert_eq!(scoped_key(Some("ana"), VOCABULARY_KEY), "ana/taskboard.vocabulary");
    }
}
