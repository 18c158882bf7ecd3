//! JSON file backend for the key-value store

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError};

/// A store kept as a single JSON object on disk.
///
/// The whole map is rewritten on every mutation, so the file always holds
/// the latest state.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file starts empty. An unreadable or corrupt file also starts
    /// empty; its contents are replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Ignoring corrupt store {:?}: {}", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Could not read store {:?}: {}", path, e);
                BTreeMap::new()
            }
        };

        Self { path, entries }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        let write_err =
            |source| StorageError::Write { path: self.path.display().to_string(), source };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let contents = serde_json::to_string_pretty(&self.entries)
            .map_err(|source| StorageError::Serialize { key: "*".to_string(), source })?;

        std::fs::write(&self.path, contents).map_err(write_err)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
