//! Weather lookup error types.

use thiserror::Error;

/// Weather error variants.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum WeatherError {
    #[error("city name must not be empty")]
    InvalidCity,

    #[error("city '{city}' not found")]
    CityNotFound { city: String },

    #[error("weather API key is not configured")]
    MissingApiKey,

    #[error("weather API rejected the key")]
    Unauthorized,

    #[error("network error fetching weather: {message}")]
    Network { message: String },

    #[error("invalid weather response: {message}")]
    InvalidResponse { message: String },
}

impl WeatherError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}
