//! OpenWeatherMap wire types.

use chrono::DateTime;
use serde::Deserialize;

use crate::domain::entities::{CurrentWeather, Forecast, ForecastSample};
use crate::domain::errors::WeatherError;

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    #[serde(default)]
    pub humidity: u8,
}

#[derive(Debug, Default, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    pub name: String,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub wind: Wind,
}

impl From<CurrentResponse> for CurrentWeather {
    fn from(raw: CurrentResponse) -> Self {
        Self {
            city: raw.name,
            temperature: raw.main.temp,
            humidity: raw.main.humidity,
            description: first_description(raw.weather),
            wind_speed: raw.wind.speed,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ForecastCity {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub city: ForecastCity,
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
}

impl TryFrom<ForecastResponse> for Forecast {
    type Error = WeatherError;

    fn try_from(raw: ForecastResponse) -> Result<Self, Self::Error> {
        let samples = raw
            .list
            .into_iter()
            .map(|entry| {
                let timestamp = DateTime::from_timestamp(entry.dt, 0).ok_or_else(|| {
                    WeatherError::invalid_response(format!("bad timestamp {}", entry.dt))
                })?;
                Ok(ForecastSample {
                    timestamp,
                    temperature: entry.main.temp,
                    description: first_description(entry.weather),
                })
            })
            .collect::<Result<_, WeatherError>>()?;

        Ok(Self {
            city: raw.city.name,
            samples,
        })
    }
}

fn first_description(conditions: Vec<Condition>) -> String {
    conditions
        .into_iter()
        .next()
        .map(|c| c.description)
        .unwrap_or_default()
}
