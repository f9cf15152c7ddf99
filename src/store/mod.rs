pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::storage::Storage;
use anyhow::Result;
use disk::DiskStorage;
use memory::MemoryStorage;
use std::sync::Arc;
use tracing::{debug, warn};

/// Opens the storage backend selected by the config.
///
/// Persistent storage lives under `<data_path>/store`. If it cannot be
/// opened the app keeps running on memory storage.
pub fn open_storage(config: &AppConfig, persist: bool) -> Result<Arc<dyn Storage>> {
    if !persist {
        debug!("Using memory storage");
        return Ok(Arc::new(MemoryStorage::new()));
    }

    let path = config.default_data_path()?.join("store");
    match DiskStorage::open(&path) {
        Ok(storage) => Ok(Arc::new(storage)),
        Err(e) => {
            warn!(error = %e, "Falling back to memory storage");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_persistent_storage_under_data_path() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            data_path: Some(dir.path().to_string_lossy().into_owned()),
            ..AppConfig::default()
        };

        let storage = open_storage(&config, true).unwrap();
        storage.set("key", "value").unwrap();
        assert!(dir.path().join("store").exists());
    }

    #[test]
    fn test_open_memory_storage() {
        let config = AppConfig::default();
        let storage = open_storage(&config, false).unwrap();
        assert!(storage.get("key").unwrap().is_none());
    }
}
