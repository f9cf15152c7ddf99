use crate::core::storage::Storage;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory storage, lost when the process exits.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let store = self
            .inner
            .read()
            .map_err(|e| anyhow!("Storage lock poisoned: {e}"))?;
        Ok(store.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut store = self
            .inner
            .write()
            .map_err(|e| anyhow!("Storage lock poisoned: {e}"))?;
        debug!("Storage SET for key: {key}");
        store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut store = self
            .inner
            .write()
            .map_err(|e| anyhow!("Storage lock poisoned: {e}"))?;
        debug!("Storage REMOVE for key: {key}");
        store.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_get_set_remove() {
        let storage = MemoryStorage::new();

        // Initially, storage is empty
        assert!(storage.get("key1").unwrap().is_none());

        storage.set("key1", "value1").unwrap();
        assert_eq!(storage.get("key1").unwrap().as_deref(), Some("value1"));

        storage.set("key1", "value2").unwrap();
        assert_eq!(storage.get("key1").unwrap().as_deref(), Some("value2"));

        storage.remove("key1").unwrap();
        assert!(storage.get("key1").unwrap().is_none());

        // Removing a missing key is fine
        storage.remove("key2").unwrap();
    }
}
