//! Domain error types.

mod auth_error;
mod cache_error;
mod course_error;
mod store_error;
mod weather_error;

pub use auth_error::AuthError;
pub use cache_error::{CacheError, CacheResult};
pub use course_error::CourseError;
pub use store_error::StoreError;
pub use weather_error::WeatherError;
