//! Weather readings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// City name as resolved by the provider.
    pub city: String,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: u8,
    /// Short human readable description.
    pub description: String,
    /// Wind speed in metres per second.
    pub wind_speed: f64,
}

/// A single timestamped forecast sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Time the sample is for.
    pub timestamp: DateTime<Utc>,
    /// Temperature in °C.
    pub temperature: f64,
    /// Conditions text.
    pub description: String,
}

/// Forecast for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// City name as reported by the API.
    pub city: String,
    /// Samples in time order.
    pub samples: Vec<ForecastSample>,
}
