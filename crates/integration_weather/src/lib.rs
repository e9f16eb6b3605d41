//! Forecast.io weather integration
//!
//! Client for the Dark Sky / forecast.io time machine API. Fetches the
//! daily summary (temperature extremes) for a single day at a location.

pub mod client;
mod models;

pub use client::{ForecastClient, ForecastConfig, ForecastIoClient, WeatherError};
pub use models::{DataBlock, DaySummary, Units};
