//! Currency conversion abstractions and core types

use crate::core::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// Currency used when a caller does not pick a reference for bulk loads.
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// An ordered `(from, to)` currency pair. `USD->EUR` and `EUR->USD` are
/// different pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Pair {
    pub from: String,
    pub to: String,
}

impl Pair {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Parses the `FROM->TO` key used by persisted snapshots.
    pub fn from_key(key: &str) -> Option<Self> {
        let (from, to) = key.split_once("->")?;
        if from.is_empty() || to.is_empty() {
            return None;
        }
        Some(Self::new(from, to))
    }

    pub fn key(&self) -> String {
        format!("{}->{}", self.from, self.to)
    }
}

impl Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Outcome of a single conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub from: String,
    pub to: String,
    /// Units of `to` per one unit of `from`.
    pub rate: f64,
    pub amount: f64,
    pub converted: f64,
    /// When this result was computed, not when the rate was fetched.
    pub updated_at: DateTime<Utc>,
}

/// Source of exchange rates, typically the rate proxy.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetches all rates relative to `base`, keyed by currency code.
    async fn latest_rates(&self, base: &str) -> Result<HashMap<String, f64>>;

    /// Fetches the rate for a single directional pair.
    async fn pair_rate(&self, from: &str, to: &str) -> Result<f64>;
}
