//! Key-value cache adapters.

mod disk_cache;
mod memory_cache;

pub use disk_cache::DiskKeyValueCache;
pub use memory_cache::{CacheStats, MemoryKeyValueCache};
