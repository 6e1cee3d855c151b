//! Key-value cache port definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::CacheResult;

/// Cached payload together with its write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Cached JSON value.
    pub payload: serde_json::Value,
    /// When the value was written.
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    /// Wraps a payload written at `timestamp`.
    #[must_use]
    pub const fn new(payload: serde_json::Value, timestamp: DateTime<Utc>) -> Self {
        Self { payload, timestamp }
    }

    /// Returns whether the entry is younger than `ttl` at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.timestamp) < ttl
    }
}

/// Port for a local key-value cache.
#[async_trait]
pub trait KeyValueCachePort: Send + Sync {
    /// Reads an entry, `None` when absent or unreadable.
    async fn get(&self, key: &str) -> Option<CacheEntry>;

    /// Writes an entry, replacing any previous one.
    ///
    /// # Errors
    /// Returns error if the entry cannot be persisted.
    async fn set(&self, key: &str, entry: CacheEntry) -> CacheResult<()>;

    /// Removes an entry.
    async fn remove(&self, key: &str);
}
