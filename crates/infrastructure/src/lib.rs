//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the forecast provider
//! over HTTP and the PDF calendar writer. Also owns configuration loading,
//! logging setup and retry policy.

pub mod adapters;
pub mod config;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, AssetsConfig, ForecastAppConfig, LocationConfig, ReportConfig};
pub use retry::{RetryConfig, RetryOutcome, Retryable, retry, with_retry};
pub use telemetry::{TelemetryConfig, TelemetryError, init_logging};
