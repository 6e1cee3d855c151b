//! Weather lookups with a short-lived local cache.

use std::future::Future;
use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::entities::{CurrentWeather, Forecast};
use crate::domain::errors::WeatherError;
use crate::domain::ports::{CacheEntry, Clock, KeyValueCachePort, WeatherPort};

/// How long a cached reading is served before the API is asked again.
pub const WEATHER_CACHE_TTL: Duration = Duration::minutes(30);

/// City shown before the user types one.
pub const DEFAULT_CITY: &str = "London";

/// Current conditions and forecasts, cached per city.
pub struct WeatherService {
    api: Arc<dyn WeatherPort>,
    cache: Arc<dyn KeyValueCachePort>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl WeatherService {
    /// Creates a service with the default 30-minute TTL.
    #[must_use]
    pub fn new(
        api: Arc<dyn WeatherPort>,
        cache: Arc<dyn KeyValueCachePort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            api,
            cache,
            clock,
            ttl: WEATHER_CACHE_TTL,
        }
    }

    /// Overrides how long cached readings stay valid.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Current conditions for `city`.
    ///
    /// # Errors
    /// Returns error if the city is blank or the API call fails on a cache
    /// miss.
    pub async fn get_weather(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        let city = normalize_city(city)?;
        self.cached(&format!("weather:{}", city.to_lowercase()), || {
            self.api.current(city)
        })
        .await
    }

    /// Forecast for `city`.
    ///
    /// # Errors
    /// Returns error if the city is blank or the API call fails on a cache
    /// miss.
    pub async fn get_forecast(&self, city: &str) -> Result<Forecast, WeatherError> {
        let city = normalize_city(city)?;
        self.cached(&format!("forecast:{}", city.to_lowercase()), || {
            self.api.forecast(city)
        })
        .await
    }

    async fn cached<T, F, Fut>(&self, key: &str, fetch: F) -> Result<T, WeatherError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, WeatherError>>,
    {
        let now = self.clock.now();

        if let Some(entry) = self.cache.get(key).await {
            if entry.is_fresh(now, self.ttl) {
                match serde_json::from_value(entry.payload) {
                    Ok(value) => {
                        debug!(key, "Weather cache hit");
                        return Ok(value);
                    }
                    Err(e) => warn!(key, error = %e, "Discarding unreadable cache entry"),
                }
            } else {
                debug!(key, "Weather cache entry expired");
            }
        }

        let value = fetch().await?;

        match serde_json::to_value(&value) {
            Ok(payload) => {
                if let Err(e) = self.cache.set(key, CacheEntry::new(payload, now)).await {
                    warn!(key, error = %e, "Failed to cache weather");
                }
            }
            Err(e) => warn!(key, error = %e, "Failed to serialize weather"),
        }

        Ok(value)
    }
}

fn normalize_city(city: &str) -> Result<&str, WeatherError> {
    let city = city.trim();
    if city.is_empty() {
        Err(WeatherError::InvalidCity)
    } else {
        Ok(city)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tokio_test::{assert_err, assert_ok};

    use crate::domain::entities::ForecastSample;
    use crate::domain::ports::MockWeatherPort;
    use crate::domain::ports::mocks::ManualClock;
    use crate::infrastructure::cache::MemoryKeyValueCache;

    fn london() -> CurrentWeather {
        CurrentWeather {
            city: "London".into(),
            temperature: 11.5,
            humidity: 81,
            description: "light rain".into(),
            wind_speed: 4.1,
        }
    }

    fn service(api: MockWeatherPort) -> (WeatherService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let service = WeatherService::new(
            Arc::new(api),
            Arc::new(MemoryKeyValueCache::new(16)),
            clock.clone(),
        );
        (service, clock)
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_hits_cache() {
        let mut api = MockWeatherPort::new();
        api.expect_current().times(1).returning(|_| Ok(london()));
        let (service, clock) = service(api);

        let first = service.get_weather("London").await.unwrap();
        clock.advance(Duration::minutes(29));
        let second = service.get_weather("london ").await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let mut api = MockWeatherPort::new();
        api.expect_current().times(2).returning(|_| Ok(london()));
        let (service, clock) = service(api);

        assert_ok!(service.get_weather("London").await);
        clock.advance(Duration::minutes(30));
        assert_ok!(service.get_weather("London").await);
    }

    #[tokio::test]
    async fn test_forecast_uses_its_own_key() {
        let mut api = MockWeatherPort::new();
        api.expect_current().times(1).returning(|_| Ok(london()));
        api.expect_forecast().times(1).returning(|_| {
            Ok(Forecast {
                city: "London".into(),
                samples: vec![ForecastSample {
                    timestamp: Utc::now(),
                    temperature: 9.0,
                    description: "overcast clouds".into(),
                }],
            })
        });
        let (service, _) = service(api);

        service.get_weather("London").await.unwrap();
        let forecast = service.get_forecast("London").await.unwrap();
        service.get_forecast("London").await.unwrap();

        assert_eq!(forecast.samples.len(), 1);
    }

    #[tokio::test]
    async fn test_blank_city_rejected_without_call() {
        let mut api = MockWeatherPort::new();
        api.expect_current().never();
        let (service, _) = service(api);

        let err = service.get_weather("   ").await.unwrap_err();
        assert!(matches!(err, WeatherError::InvalidCity));
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let mut api = MockWeatherPort::new();
        let mut seq = mockall::Sequence::new();
        api.expect_current()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(WeatherError::network("timeout")));
        api.expect_current()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(london()));
        let (service, _) = service(api);

        assert_err!(service.get_weather("London").await);
        assert_eq!(assert_ok!(service.get_weather("London").await), london());
    }
}
