//! Forecast.io client
//!
//! HTTP client for the Dark Sky / forecast.io "time machine" API, which
//! returns the observed or forecast conditions for a single point in time.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{ApiResponse, DailyDataPoint, DataBlock, DaySummary, Units};

/// Timestamp layout accepted by the time machine endpoint
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Forecast client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the forecast service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the forecast service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from forecast service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// No API key configured
    #[error("Missing API key for the forecast service")]
    MissingApiKey,

    /// API key rejected by the service
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Forecast service configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// API base URL (default: <https://api.darksky.net>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Secret API key, part of the request path
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Units to request temperatures in (default: us)
    #[serde(default)]
    pub units: Units,

    /// Response blocks to leave out (default: hourly, minutely)
    #[serde(default = "default_exclude")]
    pub exclude: Vec<DataBlock>,
}

impl std::fmt::Debug for ForecastConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("units", &self.units)
            .field("exclude", &self.exclude)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://api.darksky.net".to_string()
}

const fn default_timeout() -> u64 {
    30
}

fn default_exclude() -> Vec<DataBlock> {
    vec![DataBlock::Hourly, DataBlock::Minutely]
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout(),
            units: Units::default(),
            exclude: default_exclude(),
        }
    }
}

/// Forecast client trait for fetching daily summaries
#[async_trait]
pub trait ForecastClient: Send + Sync {
    /// Get the daily summary for the day containing `at` at a location
    async fn get_day_summary(
        &self,
        latitude: f64,
        longitude: f64,
        at: DateTime<FixedOffset>,
    ) -> Result<DaySummary, WeatherError>;
}

/// Forecast.io HTTP client implementation
#[derive(Debug)]
pub struct ForecastIoClient {
    client: Client,
    config: ForecastConfig,
}

impl ForecastIoClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured or the HTTP client
    /// cannot be initialized.
    pub fn new(config: ForecastConfig) -> Result<Self, WeatherError> {
        if config
            .api_key
            .as_ref()
            .is_none_or(|key| key.expose_secret().trim().is_empty())
        {
            return Err(WeatherError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Validate coordinates
    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidCoordinates);
        }
        Ok(())
    }

    /// Format a timestamp the way the time machine endpoint expects it
    fn format_time(at: &DateTime<FixedOffset>) -> String {
        at.format(TIME_FORMAT).to_string()
    }

    /// Path of a time machine request, with the API key in place
    fn request_path(&self, latitude: f64, longitude: f64, at: &DateTime<FixedOffset>) -> String {
        let key = self
            .config
            .api_key
            .as_ref()
            .map_or("", |k| k.expose_secret());
        format!(
            "{}/forecast/{}/{},{},{}",
            self.config.base_url.trim_end_matches('/'),
            key,
            latitude,
            longitude,
            Self::format_time(at)
        )
    }

    /// Query parameters for unit system and excluded blocks
    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("units", self.config.units.as_query_value().to_string())];
        if !self.config.exclude.is_empty() {
            let exclude: Vec<&str> = self.config.exclude.iter().map(DataBlock::as_str).collect();
            params.push(("exclude", exclude.join(",")));
        }
        params
    }

    /// Turn the first daily data point into a summary
    fn parse_day_summary(point: &DailyDataPoint) -> Result<DaySummary, WeatherError> {
        let time = DateTime::<Utc>::from_timestamp(point.time, 0)
            .ok_or_else(|| WeatherError::ParseError(format!("Invalid timestamp: {}", point.time)))?;

        let temperature_max = point
            .temperature_max
            .ok_or_else(|| WeatherError::ParseError("Missing temperatureMax".to_string()))?;
        let temperature_min = point
            .temperature_min
            .ok_or_else(|| WeatherError::ParseError("Missing temperatureMin".to_string()))?;

        Ok(DaySummary {
            time,
            temperature_max,
            temperature_min,
            summary: point.summary.clone(),
            icon: point.icon.clone(),
        })
    }
}

#[async_trait]
impl ForecastClient for ForecastIoClient {
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude, at = %at))]
    async fn get_day_summary(
        &self,
        latitude: f64,
        longitude: f64,
        at: DateTime<FixedOffset>,
    ) -> Result<DaySummary, WeatherError> {
        Self::validate_coordinates(latitude, longitude)?;

        let url = self.request_path(latitude, longitude, &at);
        debug!(
            time = %Self::format_time(&at),
            units = self.config.units.as_query_value(),
            "Fetching daily summary"
        );

        let response = self
            .client
            .get(&url)
            .query(&self.query_params())
            .send()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.without_url().to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimitExceeded);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(WeatherError::Unauthorized(format!("HTTP {status}")));
        }
        if status.is_server_error() {
            return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(WeatherError::RequestFailed(format!("HTTP {status}")));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.without_url().to_string()))?;

        let daily = api_response
            .daily
            .ok_or_else(|| WeatherError::ParseError("No daily data in response".to_string()))?;

        let point = daily
            .data
            .first()
            .ok_or_else(|| WeatherError::ParseError("Empty daily data in response".to_string()))?;

        Self::parse_day_summary(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config_with_key() -> ForecastConfig {
        ForecastConfig {
            api_key: Some(SecretString::from("test-key")),
            ..Default::default()
        }
    }

    fn june_first_noon() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(7 * 3600)
            .expect("valid offset")
            .with_ymd_and_hms(2016, 6, 1, 12, 0, 0)
            .single()
            .expect("unambiguous time")
    }

    #[test]
    fn test_config_defaults() {
        let config = ForecastConfig::default();
        assert_eq!(config.base_url, "https://api.darksky.net");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.units, Units::Us);
        assert_eq!(config.exclude, vec![DataBlock::Hourly, DataBlock::Minutely]);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_client_requires_api_key() {
        let result = ForecastIoClient::new(ForecastConfig::default());
        assert!(matches!(result, Err(WeatherError::MissingApiKey)));

        let blank = ForecastConfig {
            api_key: Some(SecretString::from("  ")),
            ..Default::default()
        };
        assert!(matches!(
            ForecastIoClient::new(blank),
            Err(WeatherError::MissingApiKey)
        ));
    }

    #[test]
    fn test_client_creation() {
        assert!(ForecastIoClient::new(config_with_key()).is_ok());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(ForecastIoClient::validate_coordinates(45.5898, -122.5951).is_ok());
        assert!(ForecastIoClient::validate_coordinates(90.0, 180.0).is_ok());
        assert!(ForecastIoClient::validate_coordinates(91.0, 0.0).is_err());
        assert!(ForecastIoClient::validate_coordinates(0.0, -181.0).is_err());
    }

    #[test]
    fn test_format_time_includes_offset() {
        assert_eq!(
            ForecastIoClient::format_time(&june_first_noon()),
            "2016-06-01T12:00:00-0700"
        );
    }

    #[test]
    fn test_request_path() {
        let client = ForecastIoClient::new(config_with_key()).expect("client");
        let path = client.request_path(45.5898, -122.5951, &june_first_noon());
        assert_eq!(
            path,
            "https://api.darksky.net/forecast/test-key/45.5898,-122.5951,2016-06-01T12:00:00-0700"
        );
    }

    #[test]
    fn test_query_params() {
        let client = ForecastIoClient::new(config_with_key()).expect("client");
        let params = client.query_params();
        assert_eq!(params[0], ("units", "us".to_string()));
        assert_eq!(params[1], ("exclude", "hourly,minutely".to_string()));
    }

    #[test]
    fn test_query_params_without_exclusions() {
        let config = ForecastConfig {
            exclude: Vec::new(),
            units: Units::Si,
            ..config_with_key()
        };
        let client = ForecastIoClient::new(config).expect("client");
        assert_eq!(client.query_params(), vec![("units", "si".to_string())]);
    }

    #[test]
    fn test_parse_day_summary() {
        let point = DailyDataPoint {
            time: 1_464_764_400,
            summary: Some("Clear".to_string()),
            icon: None,
            temperature_max: Some(80.0),
            temperature_min: Some(65.0),
        };
        let summary = ForecastIoClient::parse_day_summary(&point).expect("should parse");
        assert!((summary.temperature_max - 80.0).abs() < f64::EPSILON);
        assert!((summary.temperature_min - 65.0).abs() < f64::EPSILON);
        assert_eq!(summary.time.timestamp(), 1_464_764_400);
    }

    #[test]
    fn test_parse_day_summary_missing_field() {
        let point = DailyDataPoint {
            time: 1_464_764_400,
            summary: None,
            icon: None,
            temperature_max: Some(80.0),
            temperature_min: None,
        };
        let err = ForecastIoClient::parse_day_summary(&point).expect_err("should fail");
        assert!(err.to_string().contains("temperatureMin"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let debug = format!("{:?}", config_with_key());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test-key"));
    }

    #[test]
    fn test_config_deserialization() {
        let json = r#"{"api_key": "abc", "units": "si", "exclude": ["hourly"]}"#;
        let config: ForecastConfig = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(config.units, Units::Si);
        assert_eq!(config.exclude, vec![DataBlock::Hourly]);
        assert_eq!(
            config.api_key.as_ref().map(ExposeSecret::expose_secret),
            Some("abc")
        );
        assert_eq!(config.base_url, "https://api.darksky.net");
    }

    #[test]
    fn test_weather_error_display() {
        let err = WeatherError::InvalidCoordinates;
        assert!(err.to_string().contains("latitude"));

        let err = WeatherError::RateLimitExceeded;
        assert!(err.to_string().contains("Rate limit"));

        let err = WeatherError::MissingApiKey;
        assert!(err.to_string().contains("API key"));
    }
}
