use crate::core::currency::Pair;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Directional pair-to-rate cache. Entries never expire; they go away only on
/// `clear`.
#[derive(Clone, Default)]
pub struct PairCache {
    inner: Arc<Mutex<HashMap<Pair, f64>>>,
}

impl PairCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cache seeded from a persisted JSON snapshot.
    ///
    /// Entries whose key is not `FROM->TO` or whose value is not a finite
    /// number are skipped. A snapshot that is not a JSON object seeds nothing.
    pub fn from_snapshot(snapshot: &str) -> Self {
        let entries = match serde_json::from_str::<Value>(snapshot) {
            Ok(Value::Object(map)) => map
                .into_iter()
                .filter_map(|(key, value)| {
                    let pair = Pair::from_key(&key)?;
                    let rate = value.as_f64().filter(|r| r.is_finite())?;
                    Some((pair, rate))
                })
                .collect(),
            Ok(other) => {
                warn!("Ignoring pair cache snapshot that is not an object: {other}");
                HashMap::new()
            }
            Err(e) => {
                warn!("Ignoring unparseable pair cache snapshot: {e}");
                HashMap::new()
            }
        };
        debug!("Seeded pair cache with {} entries", entries.len());

        Self {
            inner: Arc::new(Mutex::new(entries)),
        }
    }

    pub async fn get(&self, pair: &Pair) -> Option<f64> {
        let cache = self.inner.lock().await;
        let value = cache.get(pair).copied();
        if value.is_some() {
            debug!("Cache HIT for pair: {pair}");
        } else {
            debug!("Cache MISS for pair: {pair}");
        }
        value
    }

    /// Stores `rate` for `pair` and returns the snapshot of the whole cache
    /// taken under the same lock.
    pub async fn put(&self, pair: Pair, rate: f64) -> String {
        let mut cache = self.inner.lock().await;
        debug!("Cache PUT for pair: {pair}");
        cache.insert(pair, rate);
        Self::serialize(&cache)
    }

    pub async fn clear(&self) {
        let mut cache = self.inner.lock().await;
        cache.clear();
        debug!("Cache CLEAR");
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    pub async fn snapshot(&self) -> String {
        let cache = self.inner.lock().await;
        Self::serialize(&cache)
    }

    fn serialize(cache: &HashMap<Pair, f64>) -> String {
        let map: Map<String, Value> = cache
            .iter()
            .filter_map(|(pair, rate)| Number::from_f64(*rate).map(|n| (pair.key(), n.into())))
            .collect();
        Value::Object(map).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_get_put() {
        let cache = PairCache::new();
        let pair = Pair::new("USD", "EUR");

        // Initially, cache is empty
        assert!(cache.get(&pair).await.is_none());

        cache.put(pair.clone(), 0.9).await;
        assert_eq!(cache.get(&pair).await, Some(0.9));

        // Reverse direction is a separate entry
        assert!(cache.get(&Pair::new("EUR", "USD")).await.is_none());
    }

    #[tokio::test]
    async fn test_put_returns_full_snapshot() {
        let cache = PairCache::new();
        cache.put(Pair::new("USD", "EUR"), 0.9).await;
        let snapshot = cache.put(Pair::new("USD", "GBP"), 0.8).await;

        let value: Value = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(value["USD->EUR"], 0.9);
        assert_eq!(value["USD->GBP"], 0.8);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = PairCache::new();
        cache.put(Pair::new("USD", "EUR"), 0.9).await;
        cache.clear().await;
        assert!(cache.is_empty().await);
        assert_eq!(cache.snapshot().await, "{}");
    }

    #[tokio::test]
    async fn test_from_snapshot_skips_invalid_entries() {
        let cache = PairCache::from_snapshot(
            r#"{"USD->EUR": 0.9, "bogus": 1.0, "USD->GBP": "0.8", "EUR->": 2.0, "EUR->JPY": null}"#,
        );
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get(&Pair::new("USD", "EUR")).await, Some(0.9));
    }

    #[tokio::test]
    async fn test_from_malformed_snapshot_is_empty() {
        assert!(PairCache::from_snapshot("not json").is_empty().await);
        assert!(PairCache::from_snapshot("[1, 2]").is_empty().await);
    }
}
