//! Date range value object
//!
//! A closed interval of calendar days that lies within a single month.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// A closed, ascending range of days inside one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

/// Unchecked wire form; deserialization goes through `DateRange::new`
#[derive(Deserialize)]
struct RangeBounds {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RangeBounds> for DateRange {
    type Error = DomainError;

    fn try_from(bounds: RangeBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.start, bounds.end)
    }
}

impl DateRange {
    /// Create a range from its first and last day (both inclusive)
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if `start` is after `end`
    /// or the two days fall in different months.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidDateRange(format!(
                "start {start} is after end {end}"
            )));
        }
        if start.year() != end.year() || start.month() != end.month() {
            return Err(DomainError::InvalidDateRange(format!(
                "{start} and {end} are not in the same month"
            )));
        }
        Ok(Self { start, end })
    }

    /// Create a range from a year, a month and two days of that month
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if either day does not exist
    /// in the given month or `first_day > last_day`.
    pub fn within_month(
        year: i32,
        month: u32,
        first_day: u32,
        last_day: u32,
    ) -> Result<Self, DomainError> {
        let start = NaiveDate::from_ymd_opt(year, month, first_day).ok_or_else(|| {
            DomainError::InvalidDateRange(format!("{year}-{month:02}-{first_day:02} does not exist"))
        })?;
        let end = NaiveDate::from_ymd_opt(year, month, last_day).ok_or_else(|| {
            DomainError::InvalidDateRange(format!("{year}-{month:02}-{last_day:02} does not exist"))
        })?;
        Self::new(start, end)
    }

    /// June 1-30, 2016
    #[must_use]
    pub fn june_2016() -> Self {
        #[allow(clippy::unwrap_used)]
        let start = NaiveDate::from_ymd_opt(2016, 6, 1).unwrap();
        #[allow(clippy::unwrap_used)]
        let end = NaiveDate::from_ymd_opt(2016, 6, 30).unwrap();
        Self { start, end }
    }

    /// First day of the range
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn len(&self) -> usize {
        // start <= end is guaranteed by construction
        (self.end - self.start).num_days() as usize + 1
    }

    /// A range always contains at least one day
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Every day of the range in ascending order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        self.start.iter_days().take(self.len())
    }

    /// Zero-based position of `date` in the range, if it lies inside
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn offset_of(&self, date: NaiveDate) -> Option<usize> {
        if date < self.start || date > self.end {
            return None;
        }
        Some((date - self.start).num_days() as usize)
    }

    /// Number of blank cells before the first day in a Sunday-first week grid
    #[must_use]
    pub fn leading_blank_cells(&self) -> usize {
        self.start.weekday().num_days_from_sunday() as usize
    }

    /// Human-readable label, e.g. `6/1/2016 - 6/30/2016`
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{}/{}/{} - {}/{}/{}",
            self.start.month(),
            self.start.day(),
            self.start.year(),
            self.end.month(),
            self.end.day(),
            self.end.year()
        )
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::june_2016()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn june_2016_has_thirty_days() {
        let range = DateRange::june_2016();
        assert_eq!(range.len(), 30);
        assert_eq!(range.start(), date(2016, 6, 1));
        assert_eq!(range.end(), date(2016, 6, 30));
    }

    #[test]
    fn days_are_ascending_and_unique() {
        let days: Vec<_> = DateRange::june_2016().days().collect();
        assert_eq!(days.len(), 30);
        assert_eq!(days.first(), Some(&date(2016, 6, 1)));
        assert_eq!(days.last(), Some(&date(2016, 6, 30)));
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn single_day_range() {
        let range = DateRange::within_month(2016, 6, 15, 15).expect("valid");
        assert_eq!(range.len(), 1);
        assert_eq!(range.days().count(), 1);
    }

    #[test]
    fn rejects_reversed_range() {
        let result = DateRange::new(date(2016, 6, 10), date(2016, 6, 1));
        assert!(matches!(result, Err(DomainError::InvalidDateRange(_))));
    }

    #[test]
    fn rejects_range_spanning_months() {
        let result = DateRange::new(date(2016, 6, 28), date(2016, 7, 2));
        assert!(matches!(result, Err(DomainError::InvalidDateRange(_))));
    }

    #[test]
    fn rejects_nonexistent_day() {
        assert!(DateRange::within_month(2016, 6, 1, 31).is_err());
        assert!(DateRange::within_month(2016, 13, 1, 2).is_err());
        assert!(DateRange::within_month(2016, 6, 0, 2).is_err());
    }

    #[test]
    fn june_2016_starts_on_wednesday() {
        assert_eq!(DateRange::june_2016().leading_blank_cells(), 3);
    }

    #[test]
    fn leading_blanks_follow_first_day_of_range() {
        // May 1, 2016 was a Sunday
        let range = DateRange::within_month(2016, 5, 1, 31).expect("valid");
        assert_eq!(range.leading_blank_cells(), 0);
        // July 2, 2016 was a Saturday
        let range = DateRange::within_month(2016, 7, 2, 31).expect("valid");
        assert_eq!(range.leading_blank_cells(), 6);
    }

    #[test]
    fn offset_of_inside_and_outside() {
        let range = DateRange::june_2016();
        assert_eq!(range.offset_of(date(2016, 6, 1)), Some(0));
        assert_eq!(range.offset_of(date(2016, 6, 30)), Some(29));
        assert_eq!(range.offset_of(date(2016, 7, 1)), None);
        assert_eq!(range.offset_of(date(2016, 5, 31)), None);
    }

    #[test]
    fn deserialize_valid_range() {
        let range: DateRange =
            serde_json::from_str(r#"{"start":"2016-06-01","end":"2016-06-30"}"#).expect("valid");
        assert_eq!(range, DateRange::june_2016());
        assert_eq!(
            serde_json::to_string(&range).expect("serializes"),
            r#"{"start":"2016-06-01","end":"2016-06-30"}"#
        );
    }

    #[test]
    fn deserialize_rejects_reversed_range() {
        let result =
            serde_json::from_str::<DateRange>(r#"{"start":"2016-06-30","end":"2016-06-01"}"#);
        let err = result.expect_err("rejected").to_string();
        assert!(err.contains("is after end"), "{err}");
    }

    #[test]
    fn deserialize_rejects_range_spanning_months() {
        let result =
            serde_json::from_str::<DateRange>(r#"{"start":"2016-06-28","end":"2016-08-02"}"#);
        let err = result.expect_err("rejected").to_string();
        assert!(err.contains("not in the same month"), "{err}");
    }

    #[test]
    fn label_format() {
        assert_eq!(DateRange::june_2016().label(), "6/1/2016 - 6/30/2016");
    }
}
