//! Per-day heating/cooling indicators for a whole date range

use chrono::NaiveDate;
use serde::Serialize;

use super::DayClassification;
use crate::errors::DomainError;
use crate::value_objects::DateRange;

/// Two parallel indicator sequences indexed by day offset within the range
///
/// The table always holds exactly one entry per day of its range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationTable {
    range: DateRange,
    heat_on: Vec<bool>,
    cooling_on: Vec<bool>,
}

impl ClassificationTable {
    /// Build a table from one classification per day, in ascending day order
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TableLengthMismatch` if the number of days
    /// differs from the length of `range`.
    pub fn from_days(range: DateRange, days: Vec<DayClassification>) -> Result<Self, DomainError> {
        if days.len() != range.len() {
            return Err(DomainError::TableLengthMismatch {
                expected: range.len(),
                actual: days.len(),
            });
        }

        let (heat_on, cooling_on) = days.iter().map(|d| (d.heat_on, d.cooling_on)).unzip();

        Ok(Self {
            range,
            heat_on,
            cooling_on,
        })
    }

    /// The date range this table covers
    #[must_use]
    pub const fn range(&self) -> &DateRange {
        &self.range
    }

    /// Number of days in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.heat_on.len()
    }

    /// Whether the table has no days (never true for a valid range)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heat_on.is_empty()
    }

    /// Heating indicators, one per day
    #[must_use]
    pub fn heat_on(&self) -> &[bool] {
        &self.heat_on
    }

    /// Cooling indicators, one per day
    #[must_use]
    pub fn cooling_on(&self) -> &[bool] {
        &self.cooling_on
    }

    /// Classification of the day at zero-based `offset`
    #[must_use]
    pub fn day(&self, offset: usize) -> Option<DayClassification> {
        Some(DayClassification {
            heat_on: *self.heat_on.get(offset)?,
            cooling_on: *self.cooling_on.get(offset)?,
        })
    }

    /// Classification for a calendar date
    #[must_use]
    pub fn for_date(&self, date: NaiveDate) -> Option<DayClassification> {
        self.day(self.range.offset_of(date)?)
    }

    /// Number of days with heating on
    #[must_use]
    pub fn heating_days(&self) -> usize {
        self.heat_on.iter().filter(|on| **on).count()
    }

    /// Number of days with cooling on
    #[must_use]
    pub fn cooling_days(&self) -> usize {
        self.cooling_on.iter().filter(|on| **on).count()
    }

    /// Every day of the range with its classification
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, DayClassification)> + '_ {
        self.range
            .days()
            .zip(self.heat_on.iter().zip(&self.cooling_on))
            .map(|(date, (heat_on, cooling_on))| {
                (
                    date,
                    DayClassification {
                        heat_on: *heat_on,
                        cooling_on: *cooling_on,
                    },
                )
            })
    }
}
