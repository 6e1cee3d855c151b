//! Weather provider adapter.

mod client;
mod dto;

pub use client::OpenWeatherClient;
