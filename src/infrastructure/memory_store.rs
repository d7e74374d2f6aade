// In-memory key-value store, used when no state file is configured
use crate::application::state_store::{KeyValueStore, StoreError};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Bytes) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let mut store = MemoryStore::new();
        let reader = store.clone();
        assert_eq!(reader.get("k").unwrap(), None);

        store.set("k", Bytes::from_static(b"v1")).unwrap();
        store.set("k", Bytes::from_static(b"v2")).unwrap();
        assert_eq!(reader.get("k").unwrap(), Some(Bytes::from_static(b"v2")));
    }
}
