//! JSON file key-value cache that survives restarts.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, trace, warn};

use crate::domain::errors::{CacheError, CacheResult};
use crate::domain::ports::{CacheEntry, KeyValueCachePort};

/// One JSON file per key, named after the key's SHA-256 digest.
pub struct DiskKeyValueCache {
    cache_dir: PathBuf,
}

impl DiskKeyValueCache {
    /// Opens a cache in `cache_dir`, creating the directory.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created.
    pub async fn new(cache_dir: PathBuf) -> CacheResult<Self> {
        fs::create_dir_all(&cache_dir)
            .await
            .map_err(|e| CacheError::Io(format!("failed to create cache dir: {e}")))?;
        debug!(path = %cache_dir.display(), "Opened disk cache");
        Ok(Self { cache_dir })
    }

    /// Directory holding the entry files.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.cache_dir.join(format!("{}.json", hex::encode(digest)))
    }
}

#[async_trait]
impl KeyValueCachePort for DiskKeyValueCache {
    async fn get(&self, key: &str) -> Option<CacheEntry> {
        let path = self.entry_path(key);
        let bytes = fs::read(&path).await.ok()?;

        match serde_json::from_slice(&bytes) {
            Ok(entry) => {
                trace!(key, "Disk cache hit");
                Some(entry)
            }
            Err(e) => {
                warn!(key, error = %e, "Corrupt cache file, ignoring");
                None
            }
        }
    }

    async fn set(&self, key: &str, entry: CacheEntry) -> CacheResult<()> {
        let path = self.entry_path(key);
        let bytes =
            serde_json::to_vec(&entry).map_err(|e| CacheError::Serialization(e.to_string()))?;

        let staging = path.with_extension("json.tmp");
        fs::write(&staging, &bytes)
            .await
            .map_err(|e| CacheError::Io(format!("failed to write cache file: {e}")))?;
        fs::rename(&staging, &path)
            .await
            .map_err(|e| CacheError::Io(format!("failed to commit cache file: {e}")))?;

        trace!(key, size = bytes.len(), "Stored entry in disk cache");
        Ok(())
    }

    async fn remove(&self, key: &str) {
        if let Err(e) = fs::remove_file(self.entry_path(key)).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(key, error = %e, "Failed to remove cache file");
        }
    }
}
