//! Forecast data models
//!
//! Types for the Dark Sky / forecast.io "time machine" response format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit system for values in the response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Imperial (Fahrenheit)
    #[default]
    Us,
    /// SI (Celsius)
    Si,
    /// SI with km/h wind speed
    Ca,
    /// SI with miles
    Uk2,
}

impl Units {
    /// Value of the `units` query parameter
    #[must_use]
    pub const fn as_query_value(&self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Si => "si",
            Self::Ca => "ca",
            Self::Uk2 => "uk2",
        }
    }
}

/// Response blocks that can be left out of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataBlock {
    /// Current conditions
    Currently,
    /// Minute-by-minute data for the next hour
    Minutely,
    /// Hour-by-hour data
    Hourly,
    /// Day-by-day data
    Daily,
    /// Severe weather alerts
    Alerts,
    /// Request metadata
    Flags,
}

impl DataBlock {
    /// Name used in the `exclude` query parameter
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Currently => "currently",
            Self::Minutely => "minutely",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Alerts => "alerts",
            Self::Flags => "flags",
        }
    }
}

/// Summary of one day as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Start of the day (UTC)
    pub time: DateTime<Utc>,
    /// Highest temperature of the day
    pub temperature_max: f64,
    /// Lowest temperature of the day
    pub temperature_min: f64,
    /// Short text summary, if provided
    pub summary: Option<String>,
    /// Icon identifier, if provided
    pub icon: Option<String>,
}

/// Raw API response (internal)
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    #[allow(dead_code)]
    pub latitude: f64,
    #[allow(dead_code)]
    pub longitude: f64,
    #[allow(dead_code)]
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub daily: Option<DailyBlock>,
}

/// The `daily` data block (internal)
#[derive(Debug, Deserialize)]
pub(crate) struct DailyBlock {
    #[serde(default)]
    pub data: Vec<DailyDataPoint>,
}

/// One entry of the `daily.data` array (internal)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DailyDataPoint {
    pub time: i64,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub temperature_max: Option<f64>,
    #[serde(default)]
    pub temperature_min: Option<f64>,
}
