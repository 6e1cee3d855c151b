//! OpenWeatherMap HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::dto::{ApiError, CurrentResponse, ForecastResponse};
use crate::domain::entities::{CurrentWeather, Forecast};
use crate::domain::errors::WeatherError;
use crate::domain::ports::WeatherPort;

const USER_AGENT: &str = concat!("campusdesk/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the current weather and 5 day forecast endpoints.
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    /// Creates a client. Requests fail with [`WeatherError::MissingApiKey`]
    /// until a key is configured.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WeatherError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    async fn get<R: DeserializeOwned>(&self, endpoint: &str, city: &str) -> Result<R, WeatherError> {
        let key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;
        let url = format!("{}/{endpoint}", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[("q", city), ("appid", key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, endpoint, "Weather request failed");
                WeatherError::network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiError>()
                .await
                .map(|e| e.message)
                .unwrap_or_default();
            debug!(%status, message, "Weather API error");
            return Err(match status {
                StatusCode::NOT_FOUND => WeatherError::CityNotFound {
                    city: city.to_string(),
                },
                StatusCode::UNAUTHORIZED => WeatherError::Unauthorized,
                _ => WeatherError::network(format!("{status}: {message}")),
            });
        }

        response
            .json()
            .await
            .map_err(|e| WeatherError::invalid_response(e.to_string()))
    }
}

#[async_trait]
impl WeatherPort for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn current(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        let raw: CurrentResponse = self.get("weather", city).await?;
        Ok(raw.into())
    }

    #[instrument(skip(self))]
    async fn forecast(&self, city: &str) -> Result<Forecast, WeatherError> {
        let raw: ForecastResponse = self.get("forecast", city).await?;
        raw.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let client = OpenWeatherClient::new("http://127.0.0.1:9", None).unwrap();
        let err = client.current("London").await.unwrap_err();
        assert!(matches!(err, WeatherError::MissingApiKey));
    }

    #[test]
    fn test_blank_key_is_treated_as_missing() {
        let client =
            OpenWeatherClient::new("https://api.example.test/", Some("  ".into())).unwrap();
        assert!(client.api_key.is_none());
        assert_eq!(client.base_url, "https://api.example.test");
    }
}
