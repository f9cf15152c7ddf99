//! String-keyed storage capability used to persist state across sessions.

use anyhow::Result;

/// A synchronous key-value store for small string values.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}
