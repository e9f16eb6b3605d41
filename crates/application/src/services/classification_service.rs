//! Forecast classification service
//!
//! Walks a date range one day at a time, fetches each day's temperature
//! extremes and classifies them against the heating and cooling thresholds.

use std::sync::Arc;

use domain::{ClassificationTable, DateRange, DayClassification, GeoLocation, Thresholds};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::ForecastPort;

/// What to do when the provider cannot deliver a day's reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderFailurePolicy {
    /// Abort the whole run on the first failing day
    #[default]
    Fail,
    /// Record the day with both indicators off and continue
    AssumeInactive,
}

/// Produces a classification table for a date range
pub struct ClassificationService {
    forecast: Arc<dyn ForecastPort>,
    thresholds: Thresholds,
    failure_policy: ProviderFailurePolicy,
}

impl std::fmt::Debug for ClassificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationService")
            .field("thresholds", &self.thresholds)
            .field("failure_policy", &self.failure_policy)
            .finish_non_exhaustive()
    }
}

impl ClassificationService {
    /// Create a service that aborts on provider failures
    #[must_use]
    pub fn new(forecast: Arc<dyn ForecastPort>, thresholds: Thresholds) -> Self {
        Self {
            forecast,
            thresholds,
            failure_policy: ProviderFailurePolicy::default(),
        }
    }

    /// Set the provider failure policy
    #[must_use]
    pub const fn with_failure_policy(mut self, policy: ProviderFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Classify every day of `range` at `location`
    ///
    /// Days are fetched strictly in ascending order, one request at a time.
    ///
    /// # Errors
    ///
    /// With `ProviderFailurePolicy::Fail`, returns `ApplicationError::DayFailed`
    /// for the first day whose reading cannot be fetched.
    #[instrument(skip(self), fields(range = %range, location = %location))]
    pub async fn classify(
        &self,
        range: &DateRange,
        location: &GeoLocation,
    ) -> Result<ClassificationTable, ApplicationError> {
        let mut days = Vec::with_capacity(range.len());

        for date in range.days() {
            let classification = match self.forecast.daily_reading(location, date).await {
                Ok(reading) => {
                    let classification = self.thresholds.classify(&reading);
                    debug!(
                        %date,
                        max = reading.temperature_max,
                        min = reading.temperature_min,
                        heat_on = classification.heat_on,
                        cooling_on = classification.cooling_on,
                        "Classified day"
                    );
                    classification
                },
                Err(e) => match self.failure_policy {
                    ProviderFailurePolicy::Fail => return Err(ApplicationError::for_day(date, e)),
                    ProviderFailurePolicy::AssumeInactive => {
                        warn!(%date, error = %e, "No reading for day, marking inactive");
                        DayClassification::INACTIVE
                    },
                },
            };
            days.push(classification);
        }

        let table = ClassificationTable::from_days(*range, days)?;
        info!(
            days = table.len(),
            heating_days = table.heating_days(),
            cooling_days = table.cooling_days(),
            "Classification complete"
        );
        Ok(table)
    }
}
