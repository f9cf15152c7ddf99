use crate::core::storage::Storage;
use anyhow::{Context, Result};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION_NAME: &str = "fxconv";

/// Storage backed by a fjall keyspace on disk.
pub struct DiskStorage {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStorage {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;

        let keyspace = Config::new(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION_NAME, PartitionCreateOptions::default())
            .context("Failed to open store partition")?;
        debug!("Opened disk store at {}", path.display());

        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl Storage for DiskStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.partition.get(key.as_bytes())? {
            Some(value) => {
                let value = String::from_utf8(value.to_vec())
                    .with_context(|| format!("Stored value for {key} is not UTF-8"))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.partition.insert(key.as_bytes(), value.as_bytes())?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Storage SET for key: {key}");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.partition.remove(key.as_bytes())?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Storage REMOVE for key: {key}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_disk_storage_get_set_remove() {
        let dir = tempdir().unwrap();
        let storage = DiskStorage::open(dir.path()).unwrap();

        // Initially, storage is empty
        assert!(storage.get("key1").unwrap().is_none());

        storage.set("key1", "value1").unwrap();
        assert_eq!(storage.get("key1").unwrap().as_deref(), Some("value1"));

        storage.remove("key1").unwrap();
        assert!(storage.get("key1").unwrap().is_none());
    }

    #[test]
    fn test_disk_storage_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let storage = DiskStorage::open(dir.path()).unwrap();
            storage.set("pair-cache", r#"{"USD->EUR":0.9}"#).unwrap();
        }

        let storage = DiskStorage::open(dir.path()).unwrap();
        assert_eq!(
            storage.get("pair-cache").unwrap().as_deref(),
            Some(r#"{"USD->EUR":0.9}"#)
        );
    }
}
