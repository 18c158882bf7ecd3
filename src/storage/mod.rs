//! Key-value persistence
//!
//! Every piece of persisted reader state (theme mode, read topics) lives
//! under a string key in a [`KeyValueStore`]. Values are plain strings;
//! structured values are stored as JSON and parsed on the way out.

mod file;

pub use file::FileStore;

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised by a store backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing the backing file failed
    #[error("Failed to write store to {path}: {source}")]
    Write {
        /// Location of the store file
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A value could not be serialized
    #[error("Failed to serialize value for key '{key}': {source}")]
    Serialize {
        /// Key being written
        key: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// A synchronous string key-value store
pub trait KeyValueStore {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key` from the store
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Read and parse a JSON value stored under `key`.
///
/// A missing key yields `Ok(None)`; a value that does not parse yields the
/// parse error so the caller can decide how to recover.
pub fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, serde_json::Error> {
    match store.get(key) {
        Some(raw) => serde_json::from_str(&raw).map(Some),
        None => Ok(None),
    }
}

/// Serialize `value` as JSON and store it under `key`
pub fn set_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)
        .map_err(|source| StorageError::Serialize { key: key.to_string(), source })?;
    store.set(key, &raw)
}

/// In-memory store, used when no file backend is wanted (and in tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("darkMode").is_none());
    }

    #[test]
    fn memory_store_set_overwrites() {
        let mut store = MemoryStore::new();
        store.set("darkMode", "true").unwrap();
        store.set("darkMode", "false").unwrap();
        assert_eq!(store.get("darkMode").as_deref(), Some("false"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn json_helpers_round_trip_a_list() {
        let mut store = MemoryStore::new();
        set_json(&mut store, "readTopics", &["t1", "t2"]).unwrap();
        assert_eq!(store.get("readTopics").as_deref(), Some(r#"["t1","t2"]"#));

        let topics: Option<Vec<String>> = get_json(&store, "readTopics").unwrap();
        assert_eq!(topics, Some(vec!["t1".to_string(), "t2".to_string()]));
    }

    #[test]
    fn get_json_reports_malformed_values() {
        let mut store = MemoryStore::new();
        store.set("readTopics", "not json").unwrap();
        let parsed: Result<Option<Vec<String>>, _> = get_json(&store, "readTopics");
        assert!(parsed.is_err());
    }

    #[test]
    fn remove_deletes_key() {
        let mut store = MemoryStore::new();
        store.set("readTopics", "[]").unwrap();
        store.remove("readTopics").unwrap();
        assert!(store.is_empty());
    }
}
