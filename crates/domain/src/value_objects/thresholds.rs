//! Heating and cooling activation thresholds

use serde::{Deserialize, Serialize};

use crate::entities::{DailyReading, DayClassification};
use crate::errors::DomainError;

/// Default temperature at or above which cooling switches on (°F)
pub const DEFAULT_COOLING_THRESHOLD: f64 = 75.0;

/// Default temperature at or below which heating switches on (°F)
pub const DEFAULT_HEATING_THRESHOLD: f64 = 62.0;

/// Temperatures that trigger the heating and cooling systems
///
/// Both values are expressed in the unit system requested from the
/// forecast provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Cooling is on when the daily maximum reaches this value
    #[serde(default = "default_cooling")]
    pub cooling: f64,
    /// Heating is on when the daily minimum drops to this value
    #[serde(default = "default_heating")]
    pub heating: f64,
}

const fn default_cooling() -> f64 {
    DEFAULT_COOLING_THRESHOLD
}

const fn default_heating() -> f64 {
    DEFAULT_HEATING_THRESHOLD
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cooling: DEFAULT_COOLING_THRESHOLD,
            heating: DEFAULT_HEATING_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Create thresholds, rejecting non-finite values
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if either value is NaN or infinite.
    pub fn new(cooling: f64, heating: f64) -> Result<Self, DomainError> {
        if !cooling.is_finite() || !heating.is_finite() {
            return Err(DomainError::ValidationError(
                "thresholds must be finite numbers".to_string(),
            ));
        }
        Ok(Self { cooling, heating })
    }

    /// Whether a daily maximum temperature turns cooling on
    #[must_use]
    pub fn cooling_on(&self, temperature_max: f64) -> bool {
        temperature_max >= self.cooling
    }

    /// Whether a daily minimum temperature turns heating on
    #[must_use]
    pub fn heat_on(&self, temperature_min: f64) -> bool {
        temperature_min <= self.heating
    }

    /// Classify one day's reading; the two indicators are independent
    #[must_use]
    pub fn classify(&self, reading: &DailyReading) -> DayClassification {
        DayClassification {
            heat_on: self.heat_on(reading.temperature_min),
            cooling_on: self.cooling_on(reading.temperature_max),
        }
    }
}
