// JSON file backed key-value store
use crate::application::state_store::{KeyValueStore, StoreError};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores every key as a string entry of one JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        serde_json::from_slice(&raw)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", self.path.display(), e)))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let encoded = serde_json::to_vec_pretty(entries)?;

        // Write then rename so a crash never leaves a half-written file behind
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, encoded)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        let entries = self.read_entries()?;
        Ok(entries.get(key).map(|value| Bytes::from(value.clone())))
    }

    fn set(&mut self, key: &str, value: Bytes) -> Result<(), StoreError> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StoreError::Corrupt(reason)) => {
                tracing::warn!("Replacing corrupt state file: {}", reason);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        let value = String::from_utf8(value.to_vec())
            .map_err(|e| StoreError::Corrupt(format!("value for {} is not UTF-8: {}", key, e)))?;
        entries.insert(key.to_string(), value);
        self.write_entries(&entries)
    }
}
