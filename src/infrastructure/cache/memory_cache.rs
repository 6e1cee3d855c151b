//! In-memory LRU key-value cache.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;
use tracing::trace;

use crate::domain::errors::CacheResult;
use crate::domain::ports::{CacheEntry, KeyValueCachePort};

/// Default maximum number of entries kept in memory.
pub const DEFAULT_CACHE_SIZE: usize = 64;

/// LRU cache of entries, lost on exit.
pub struct MemoryKeyValueCache {
    cache: RwLock<LruCache<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryKeyValueCache {
    /// Creates a new cache with the specified capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns cache statistics.
    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.cache.read().await.len(),
        }
    }
}

impl Default for MemoryKeyValueCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found an entry.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Entries currently held.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} entries ({} hits, {} misses)",
            self.size, self.hits, self.misses
        )
    }
}

#[async_trait]
impl KeyValueCachePort for MemoryKeyValueCache {
    async fn get(&self, key: &str) -> Option<CacheEntry> {
        let mut cache = self.cache.write().await;
        if let Some(entry) = cache.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key, "Memory cache hit");
            Some(entry.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key, "Memory cache miss");
            None
        }
    }

    async fn set(&self, key: &str, entry: CacheEntry) -> CacheResult<()> {
        self.cache.write().await.put(key.to_string(), entry);
        Ok(())
    }

    async fn remove(&self, key: &str) {
        self.cache.write().await.pop(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn entry(value: i64) -> CacheEntry {
        CacheEntry::new(json!({ "value": value }), Utc::now())
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryKeyValueCache::new(4);
        cache.set("weather:london", entry(1)).await.unwrap();

        let found = cache.get("weather:london").await.unwrap();
        assert_eq!(found.payload["value"], 1);
        assert!(cache.get("weather:paris").await.is_none());

        let stats = cache.stats().await;
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_least_recently_used_is_evicted() {
        let cache = MemoryKeyValueCache::new(2);
        cache.set("a", entry(1)).await.unwrap();
        cache.set("b", entry(2)).await.unwrap();
        cache.get("a").await;
        cache.set("c", entry(3)).await.unwrap();

        assert!(cache.get("a").await.is_some());
        assert!(cache.get("b").await.is_none());
        assert!(cache.get("c").await.is_some());
    }

    #[tokio::test]
    async fn test_remove() {
        let cache = MemoryKeyValueCache::default();
        cache.set("a", entry(1)).await.unwrap();
        cache.remove("a").await;
        assert!(cache.get("a").await.is_none());
    }
}
