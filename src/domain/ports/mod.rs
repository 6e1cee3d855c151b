mod auth_port;
mod cache_port;
mod clock_port;
mod document_store_port;
mod session_storage_port;
mod weather_port;

pub use auth_port::{AuthPort, IdTokenSource};
pub use cache_port::{CacheEntry, KeyValueCachePort};
pub use clock_port::{Clock, SystemClock};
pub use document_store_port::{DocumentStorePort, PageQuery};
pub use session_storage_port::SessionStoragePort;
pub use weather_port::WeatherPort;

#[cfg(test)]
pub use weather_port::MockWeatherPort;
