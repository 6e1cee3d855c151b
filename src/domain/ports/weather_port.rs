//! Weather provider port definition.

use async_trait::async_trait;

use crate::domain::entities::{CurrentWeather, Forecast};
use crate::domain::errors::WeatherError;

/// Port for the weather HTTP API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// Fetches current conditions for a city.
    async fn current(&self, city: &str) -> Result<CurrentWeather, WeatherError>;

    /// Fetches the forecast for a city.
    async fn forecast(&self, city: &str) -> Result<Forecast, WeatherError>;
}
