//! Application-level errors

use chrono::NaiveDate;
use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Provider returned data that could not be used
    #[error("Invalid provider data: {0}")]
    InvalidData(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Fetching the reading for a specific day failed
    #[error("Forecast for {date} failed: {source}")]
    DayFailed {
        date: NaiveDate,
        #[source]
        source: Box<ApplicationError>,
    },

    /// Rendering the calendar document failed
    #[error("Render error: {0}")]
    Render(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Wrap an error with the day it occurred on
    #[must_use]
    pub fn for_day(date: NaiveDate, source: Self) -> Self {
        Self::DayFailed {
            date,
            source: Box::new(source),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited | Self::ExternalService(_) => true,
            Self::DayFailed { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}
