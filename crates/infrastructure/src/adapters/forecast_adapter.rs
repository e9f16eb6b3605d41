//! Forecast adapter - Implements ForecastPort using integration_weather

use application::error::ApplicationError;
use application::ports::ForecastPort;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use domain::{DailyReading, GeoLocation};
use integration_weather::{ForecastClient, ForecastIoClient, WeatherError};
use tracing::{debug, instrument};

use crate::config::ForecastAppConfig;
use crate::retry::{RetryConfig, retry};

/// Adapter fetching one day's temperatures per request from a
/// forecast.io-compatible service
pub struct ForecastAdapter {
    client: ForecastIoClient,
    local_time: NaiveTime,
    utc_offset: FixedOffset,
    retry: RetryConfig,
}

impl std::fmt::Debug for ForecastAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastAdapter")
            .field("client", &"ForecastIoClient")
            .field("local_time", &self.local_time)
            .field("utc_offset", &self.utc_offset)
            .field("max_retries", &self.retry.max_retries)
            .finish()
    }
}

impl ForecastAdapter {
    /// Create an adapter from configuration
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the API key is missing or
    /// the UTC offset is out of range, and `ApplicationError::Internal` if the
    /// HTTP client fails to initialize.
    pub fn new(config: &ForecastAppConfig, retry: RetryConfig) -> Result<Self, ApplicationError> {
        let utc_offset = config
            .utc_offset()
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        let client = ForecastIoClient::new(config.client_config()).map_err(|e| match e {
            WeatherError::MissingApiKey => ApplicationError::Configuration(
                "forecast.api_key is not set (use HEATCAL_FORECAST__API_KEY)".into(),
            ),
            other => ApplicationError::Internal(other.to_string()),
        })?;

        Ok(Self {
            client,
            local_time: config.local_time,
            utc_offset,
            retry,
        })
    }

    /// Instant the provider is asked about for `date`
    fn request_time(&self, date: NaiveDate) -> Result<DateTime<FixedOffset>, ApplicationError> {
        date.and_time(self.local_time)
            .and_local_timezone(self.utc_offset)
            .single()
            .ok_or_else(|| {
                ApplicationError::Internal(format!("No unique local time for {date}"))
            })
    }

    /// Map integration forecast error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::ConnectionFailed(e)
            | WeatherError::RequestFailed(e)
            | WeatherError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
            WeatherError::ParseError(e) => ApplicationError::InvalidData(e),
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
            WeatherError::Unauthorized(e) => {
                ApplicationError::Configuration(format!("API key rejected: {e}"))
            },
            e @ (WeatherError::InvalidCoordinates | WeatherError::MissingApiKey) => {
                ApplicationError::Configuration(e.to_string())
            },
        }
    }
}

#[async_trait]
impl ForecastPort for ForecastAdapter {
    #[instrument(skip(self), fields(lat = location.latitude(), lon = location.longitude()))]
    async fn daily_reading(
        &self,
        location: &GeoLocation,
        date: NaiveDate,
    ) -> Result<DailyReading, ApplicationError> {
        let at = self.request_time(date)?;
        let (latitude, longitude) = (location.latitude(), location.longitude());

        let summary = retry(&self.retry, || async move {
            self.client
                .get_day_summary(latitude, longitude, at)
                .await
                .map_err(Self::map_error)
        })
        .await?;

        let reported = summary.time.with_timezone(&self.utc_offset).date_naive();
        if reported != date {
            debug!(%reported, "Provider day starts on a different local date");
        }
        debug!(
            max = summary.temperature_max,
            min = summary.temperature_min,
            "Retrieved daily temperatures"
        );

        Ok(DailyReading {
            date,
            temperature_max: summary.temperature_max,
            temperature_min: summary.temperature_min,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config() -> ForecastAppConfig {
        ForecastAppConfig {
            api_key: Some(SecretString::from("test-key")),
            ..Default::default()
        }
    }

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 6, day).unwrap()
    }

    #[test]
    fn new_creates_adapter() {
        let adapter = ForecastAdapter::new(&config(), RetryConfig::default());
        assert!(adapter.is_ok());
    }

    #[test]
    fn missing_api_key_is_configuration_error() {
        let result = ForecastAdapter::new(&ForecastAppConfig::default(), RetryConfig::default());
        assert!(matches!(result, Err(ApplicationError::Configuration(_))));
    }

    #[test]
    fn invalid_offset_is_configuration_error() {
        let config = ForecastAppConfig {
            utc_offset_hours: 99,
            ..config()
        };
        let result = ForecastAdapter::new(&config, RetryConfig::default());
        assert!(matches!(result, Err(ApplicationError::Configuration(_))));
    }

    #[test]
    fn request_time_is_local_noon() {
        let adapter = ForecastAdapter::new(&config(), RetryConfig::default()).unwrap();
        let at = adapter.request_time(june(1)).unwrap();
        assert_eq!(at.to_rfc3339(), "2016-06-01T12:00:00-07:00");
    }

    #[test]
    fn debug_impl() {
        let adapter = ForecastAdapter::new(&config(), RetryConfig::default()).unwrap();
        let debug_str = format!("{adapter:?}");
        assert!(debug_str.contains("ForecastAdapter"));
        assert!(!debug_str.contains("test-key"));
    }

    #[test]
    fn map_error_connection_failed() {
        let app_err = ForecastAdapter::map_error(WeatherError::ConnectionFailed("timeout".into()));
        assert!(matches!(app_err, ApplicationError::ExternalService(_)));
        assert!(app_err.is_retryable());
    }

    #[test]
    fn map_error_rate_limited() {
        let app_err = ForecastAdapter::map_error(WeatherError::RateLimitExceeded);
        assert!(matches!(app_err, ApplicationError::RateLimited));
    }

    #[test]
    fn map_error_parse_is_invalid_data() {
        let app_err = ForecastAdapter::map_error(WeatherError::ParseError("no max".into()));
        assert!(matches!(app_err, ApplicationError::InvalidData(_)));
        assert!(!app_err.is_retryable());
    }

    #[test]
    fn map_error_unauthorized() {
        let app_err = ForecastAdapter::map_error(WeatherError::Unauthorized("403".into()));
        assert!(matches!(app_err, ApplicationError::Configuration(_)));
    }

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ForecastAdapter>();
    }
}
