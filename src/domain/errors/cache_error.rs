//! Key-value cache error types.

use thiserror::Error;

/// Cache error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(String),

    #[error("cache serialization error: {0}")]
    Serialization(String),
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
