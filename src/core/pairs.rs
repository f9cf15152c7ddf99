//! The user's configured currency pairs, persisted alongside the rate cache.

use crate::core::storage::Storage;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub const PAIRS_KEY: &str = "pairs";

fn default_amount() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PairEntry {
    pub from: String,
    pub to: String,
    #[serde(default = "default_amount")]
    pub amount: f64,
}

impl PairEntry {
    pub fn new(from: &str, to: &str, amount: f64) -> Self {
        Self {
            from: from.to_uppercase(),
            to: to.to_uppercase(),
            amount,
        }
    }

    fn matches(&self, from: &str, to: &str) -> bool {
        self.from.eq_ignore_ascii_case(from) && self.to.eq_ignore_ascii_case(to)
    }
}

/// Ordered list of configured pairs backed by a [`Storage`].
pub struct PairList {
    storage: Arc<dyn Storage>,
    entries: Vec<PairEntry>,
}

impl PairList {
    /// Loads the stored list, falling back to `seed` when storage holds
    /// nothing usable.
    pub fn load(storage: Arc<dyn Storage>, seed: &[PairEntry]) -> Result<Self> {
        let stored = storage
            .get(PAIRS_KEY)
            .context("Failed to read configured pairs")?;

        let entries = match stored {
            Some(raw) => match serde_json::from_str::<Vec<PairEntry>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "Ignoring malformed configured pairs");
                    seed.to_vec()
                }
            },
            None => seed.to_vec(),
        };
        debug!("Loaded {} configured pairs", entries.len());

        Ok(Self { storage, entries })
    }

    pub fn entries(&self) -> &[PairEntry] {
        &self.entries
    }

    /// Adds a pair, or updates the amount of an existing identical pair.
    pub fn add(&mut self, entry: PairEntry) -> Result<()> {
        match self
            .entries
            .iter_mut()
            .find(|e| e.matches(&entry.from, &entry.to))
        {
            Some(existing) => existing.amount = entry.amount,
            None => self.entries.push(entry),
        }
        self.save()
    }

    /// Removes a pair. Returns `false` if it was not configured.
    pub fn remove(&mut self, from: &str, to: &str) -> Result<bool> {
        let before = self.entries.len();
        self.entries.retain(|e| !e.matches(from, to));
        if self.entries.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    fn save(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.entries)?;
        self.storage
            .set(PAIRS_KEY, &raw)
            .context("Failed to save configured pairs")
    }
}
