//! Infrastructure layer with external service adapters.

/// Weather response caches.
pub mod cache;
/// Application configuration.
pub mod config;
/// Firebase authentication and Firestore clients.
pub mod firebase;
/// Session token storage adapters.
pub mod storage;
/// In-process document store.
pub mod store;
/// Weather API client.
pub mod weather;

pub use cache::{CacheStats, DiskKeyValueCache, MemoryKeyValueCache};
pub use config::{AppConfig, CliArgs, LogLevel, StateConfig, StorageManager};
pub use firebase::{FirebaseAuthClient, FirestoreClient, FirestoreConfig};
pub use storage::KeyringSessionStorage;
pub use store::MemoryDocumentStore;
pub use weather::OpenWeatherClient;
