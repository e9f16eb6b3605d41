//! Per-day temperature extremes and their classification

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum and minimum temperature reported for one day
///
/// Values are in the unit system that was requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyReading {
    /// The day the reading belongs to
    pub date: NaiveDate,
    /// Highest temperature of the day
    pub temperature_max: f64,
    /// Lowest temperature of the day
    pub temperature_min: f64,
}

/// Which climate systems were active on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayClassification {
    /// Heating switched on at least once
    pub heat_on: bool,
    /// Cooling switched on at least once
    pub cooling_on: bool,
}

impl DayClassification {
    /// Neither system active; used for days without a usable reading
    pub const INACTIVE: Self = Self {
        heat_on: false,
        cooling_on: false,
    };
}
