//! Forecast port
//!
//! Defines how the classifier obtains one day's temperature extremes.

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{DailyReading, GeoLocation};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for fetching daily temperature extremes
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ForecastPort: Send + Sync {
    /// Get the maximum and minimum temperature of `date` at `location`
    async fn daily_reading(
        &self,
        location: &GeoLocation,
        date: NaiveDate,
    ) -> Result<DailyReading, ApplicationError>;
}
