//! Rate-caching conversion service.

use crate::core::cache::PairCache;
use crate::core::currency::{ConversionResult, DEFAULT_BASE_CURRENCY, Pair, RateSource};
use crate::core::error::Result;
use crate::core::storage::Storage;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Storage key holding the serialized pair cache.
pub const PAIR_CACHE_KEY: &str = "pair-cache";

/// Converts amounts between currencies, fetching each directional pair rate
/// from the [`RateSource`] at most once per cache lifetime.
///
/// Locks are never held across a fetch, so two concurrent conversions of the
/// same uncached pair may both reach the source. Both write the same rate.
pub struct CurrencyService<S: RateSource> {
    source: S,
    currencies: RwLock<Vec<String>>,
    cache: PairCache,
    storage: Option<Arc<dyn Storage>>,
}

impl<S: RateSource> CurrencyService<S> {
    /// Creates a service with a purely in-memory cache.
    pub fn new(source: S) -> Self {
        Self {
            source,
            currencies: RwLock::new(Vec::new()),
            cache: PairCache::new(),
            storage: None,
        }
    }

    /// Creates a service whose cache is seeded from and mirrored to `storage`.
    pub fn with_storage(source: S, storage: Arc<dyn Storage>) -> Self {
        let cache = match storage.get(PAIR_CACHE_KEY) {
            Ok(Some(snapshot)) => PairCache::from_snapshot(&snapshot),
            Ok(None) => PairCache::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted pair cache");
                PairCache::new()
            }
        };

        Self {
            source,
            currencies: RwLock::new(Vec::new()),
            cache,
            storage: Some(storage),
        }
    }

    /// Loads the known currency codes from the rates relative to `base`.
    ///
    /// The list is replaced only on success.
    pub async fn load_currencies(&self, base: Option<&str>) -> Result<Vec<String>> {
        let base = base.unwrap_or(DEFAULT_BASE_CURRENCY);
        let rates = self.source.latest_rates(base).await?;

        let mut codes: Vec<String> = rates.into_keys().collect();
        codes.sort();
        info!("Loaded {} currencies for base {}", codes.len(), base);

        let mut currencies = self.currencies.write().await;
        *currencies = codes.clone();
        Ok(codes)
    }

    /// Returns the last loaded currency list.
    pub async fn currencies(&self) -> Vec<String> {
        self.currencies.read().await.clone()
    }

    /// Converts `amount` of `from` into `to`.
    ///
    /// `amount` is not validated; callers check it before converting.
    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<ConversionResult> {
        let pair = Pair::new(from, to);
        let rate = match self.cache.get(&pair).await {
            Some(rate) => rate,
            None => {
                let rate = self.source.pair_rate(from, to).await?;
                let snapshot = self.cache.put(pair, rate).await;
                self.persist(&snapshot);
                rate
            }
        };

        Ok(ConversionResult {
            from: from.to_string(),
            to: to.to_string(),
            rate,
            amount,
            converted: amount * rate,
            updated_at: Utc::now(),
        })
    }

    /// Drops every cached rate, including the persisted snapshot.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.remove(PAIR_CACHE_KEY) {
                warn!(error = %e, "Failed to remove persisted pair cache");
            }
        }
        info!("Cleared pair cache");
    }

    /// Number of cached pair rates.
    pub async fn cached_pairs(&self) -> usize {
        self.cache.len().await
    }

    fn persist(&self, snapshot: &str) {
        let Some(storage) = &self.storage else {
            return;
        };
        match storage.set(PAIR_CACHE_KEY, snapshot) {
            Ok(()) => debug!("Persisted pair cache"),
            Err(e) => warn!(error = %e, "Failed to persist pair cache"),
        }
    }
}
