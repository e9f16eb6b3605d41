//! Application configuration
//!
//! Every value the report depends on (date range, location, thresholds,
//! provider settings, output path) lives here instead of in code.

use std::path::{Path, PathBuf};

use application::ProviderFailurePolicy;
use chrono::{FixedOffset, NaiveTime};
use domain::{DateRange, DomainError, GeoLocation, Thresholds, UnitSystem};
use integration_weather::{DataBlock, ForecastConfig, Units};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::adapters::CalendarRenderConfig;
use crate::retry::RetryConfig;
use crate::telemetry::TelemetryConfig;

/// Prefix of environment variable overrides (e.g. `HEATCAL_FORECAST__API_KEY`)
pub const ENV_PREFIX: &str = "HEATCAL";

/// Name of the optional configuration file in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "heatcal";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Date range and output document
    #[serde(default)]
    pub report: ReportConfig,

    /// Where the temperatures are measured
    #[serde(default)]
    pub location: LocationConfig,

    /// Heating and cooling activation temperatures
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Forecast provider settings
    #[serde(default)]
    pub forecast: ForecastAppConfig,

    /// What to do when a day's reading cannot be fetched
    #[serde(default)]
    pub on_provider_error: ProviderFailurePolicy,

    /// Retry behavior for provider calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Icon images drawn in the calendar
    #[serde(default)]
    pub assets: AssetsConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Date range and document settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Year of the reported month
    #[serde(default = "default_year")]
    pub year: i32,

    /// Reported month (1-12)
    #[serde(default = "default_month")]
    pub month: u32,

    /// First reported day of the month
    #[serde(default = "default_first_day")]
    pub first_day: u32,

    /// Last reported day of the month
    #[serde(default = "default_last_day")]
    pub last_day: u32,

    /// Where the PDF is written (overwritten on every run)
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Document title metadata
    #[serde(default = "default_title")]
    pub title: String,

    /// Document subject metadata
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Document author metadata
    #[serde(default = "default_author")]
    pub author: String,

    /// Document creator metadata
    #[serde(default = "default_author")]
    pub creator: String,
}

const fn default_year() -> i32 {
    2016
}

const fn default_month() -> u32 {
    6
}

const fn default_first_day() -> u32 {
    1
}

const fn default_last_day() -> u32 {
    30
}

fn default_output_path() -> PathBuf {
    PathBuf::from("reports/Heating-Cooling.pdf")
}

fn default_title() -> String {
    "Heating and Cooling Data".to_string()
}

fn default_subject() -> String {
    "Work Sample Test".to_string()
}

fn default_author() -> String {
    "HeatCal".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            year: default_year(),
            month: default_month(),
            first_day: default_first_day(),
            last_day: default_last_day(),
            output_path: default_output_path(),
            title: default_title(),
            subject: default_subject(),
            author: default_author(),
            creator: default_author(),
        }
    }
}

impl ReportConfig {
    /// The configured range as a validated domain value
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if the days do not form a
    /// valid range within the month.
    pub fn date_range(&self) -> Result<DateRange, DomainError> {
        DateRange::within_month(self.year, self.month, self.first_day, self.last_day)
    }
}

/// Coordinates of the reported location
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Latitude in degrees
    #[serde(default = "default_latitude")]
    pub latitude: f64,

    /// Longitude in degrees
    #[serde(default = "default_longitude")]
    pub longitude: f64,
}

fn default_latitude() -> f64 {
    GeoLocation::portland().latitude()
}

fn default_longitude() -> f64 {
    GeoLocation::portland().longitude()
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: default_latitude(),
            longitude: default_longitude(),
        }
    }
}

impl LocationConfig {
    /// The configured coordinates as a validated domain value
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if either value is out of range.
    pub fn geo_location(&self) -> Result<GeoLocation, DomainError> {
        Ok(GeoLocation::new(self.latitude, self.longitude)?)
    }
}

/// Forecast provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ForecastAppConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Unit system requested from the provider
    #[serde(default)]
    pub units: UnitSystem,

    /// Local time of day each request is made for
    #[serde(default = "default_local_time")]
    pub local_time: NaiveTime,

    /// Fixed UTC offset of `local_time`, in hours
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    /// Response blocks the provider should leave out
    #[serde(default = "default_exclude")]
    pub exclude: Vec<DataBlock>,
}

impl std::fmt::Debug for ForecastAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastAppConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("units", &self.units)
            .field("local_time", &self.local_time)
            .field("utc_offset_hours", &self.utc_offset_hours)
            .field("exclude", &self.exclude)
            .finish()
    }
}

fn default_base_url() -> String {
    ForecastConfig::default().base_url
}

const fn default_timeout() -> u64 {
    30
}

fn default_local_time() -> NaiveTime {
    NaiveTime::MIN + chrono::Duration::hours(12)
}

const fn default_utc_offset_hours() -> i32 {
    -7
}

fn default_exclude() -> Vec<DataBlock> {
    vec![DataBlock::Hourly, DataBlock::Minutely]
}

impl Default for ForecastAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout(),
            units: UnitSystem::default(),
            local_time: default_local_time(),
            utc_offset_hours: default_utc_offset_hours(),
            exclude: default_exclude(),
        }
    }
}

impl ForecastAppConfig {
    /// The fixed offset requests are made in
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the offset is not within ±23 hours.
    pub fn utc_offset(&self) -> Result<FixedOffset, DomainError> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).ok_or_else(|| {
            DomainError::ValidationError(format!(
                "utc_offset_hours must be between -23 and 23, got {}",
                self.utc_offset_hours
            ))
        })
    }

    /// Client configuration for the integration crate
    #[must_use]
    pub fn client_config(&self) -> ForecastConfig {
        ForecastConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout_secs: self.timeout_secs,
            units: match self.units {
                UnitSystem::Us => Units::Us,
                UnitSystem::Si => Units::Si,
                UnitSystem::Ca => Units::Ca,
                UnitSystem::Uk2 => Units::Uk2,
            },
            exclude: self.exclude.clone(),
        }
    }
}

/// Icon image locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Icon for days with heating on
    #[serde(default = "default_fire_icon")]
    pub fire_icon: PathBuf,

    /// Icon for days with cooling on
    #[serde(default = "default_snowflake_icon")]
    pub snowflake_icon: PathBuf,
}

fn default_fire_icon() -> PathBuf {
    PathBuf::from("img/fire.png")
}

fn default_snowflake_icon() -> PathBuf {
    PathBuf::from("img/snowflake.png")
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            fire_icon: default_fire_icon(),
            snowflake_icon: default_snowflake_icon(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// Reads `path` if given (it must exist), otherwise an optional
    /// `heatcal.toml` in the working directory, then applies `HEATCAL_*`
    /// environment overrides (`__` separates nested keys).
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Configured date range
    pub fn date_range(&self) -> Result<DateRange, DomainError> {
        self.report.date_range()
    }

    /// Configured location
    pub fn geo_location(&self) -> Result<GeoLocation, DomainError> {
        self.location.geo_location()
    }

    /// Configured thresholds, rejecting non-finite values
    pub fn thresholds(&self) -> Result<Thresholds, DomainError> {
        Thresholds::new(self.thresholds.cooling, self.thresholds.heating)
    }

    /// Check that every section converts into valid domain values
    ///
    /// # Errors
    ///
    /// Returns the first `DomainError` found.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.date_range()?;
        self.geo_location()?;
        self.thresholds()?;
        self.forecast.utc_offset()?;
        Ok(())
    }

    /// Renderer settings derived from the report and asset sections
    #[must_use]
    pub fn render_config(&self) -> CalendarRenderConfig {
        CalendarRenderConfig {
            output_path: self.report.output_path.clone(),
            title: self.report.title.clone(),
            subject: self.report.subject.clone(),
            author: self.report.author.clone(),
            creator: self.report.creator.clone(),
            fire_icon: self.assets.fire_icon.clone(),
            snowflake_icon: self.assets.snowflake_icon.clone(),
        }
    }
}
