//! Calendar grid layout
//!
//! Lays a classification table out as a Sunday-first, seven-column month
//! view. The grid is independent of any rendering backend: a renderer only
//! has to walk the rows and draw each cell.

use chrono::Datelike;
use serde::Serialize;
use std::fmt;

use super::{ClassificationTable, DayClassification};

/// Number of columns in the grid (one per weekday)
pub const DAYS_PER_WEEK: usize = 7;

/// Column headings, Sunday first
pub const WEEKDAY_HEADERS: [&str; DAYS_PER_WEEK] = ["Su", "M", "Tu", "W", "Th", "F", "Sa"];

/// A single grid cell below the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarCell {
    /// Padding before the first or after the last day
    Blank,
    /// A day of the range
    Day {
        /// Day of the month (1-31)
        day: u32,
        /// Which icons the cell shows
        classification: DayClassification,
    },
}

impl CalendarCell {
    /// Whether this cell is padding
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }
}

/// Cells of a month view, always a whole number of weeks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    title: String,
    cells: Vec<CalendarCell>,
}

impl CalendarGrid {
    /// Lay out `table`: leading blanks up to the first day's weekday, one
    /// cell per day, then trailing blanks to complete the final week
    #[must_use]
    pub fn from_table(table: &ClassificationTable) -> Self {
        let leading = table.range().leading_blank_cells();
        let mut cells = Vec::with_capacity(leading + table.len() + DAYS_PER_WEEK);

        cells.extend(std::iter::repeat_n(CalendarCell::Blank, leading));
        cells.extend(table.iter().map(|(date, classification)| CalendarCell::Day {
            day: date.day(),
            classification,
        }));

        let remainder = cells.len() % DAYS_PER_WEEK;
        if remainder != 0 {
            cells.extend(std::iter::repeat_n(
                CalendarCell::Blank,
                DAYS_PER_WEEK - remainder,
            ));
        }

        Self {
            title: table.range().label(),
            cells,
        }
    }

    /// Label of the range the grid shows
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Column headings
    #[must_use]
    pub const fn headers(&self) -> &'static [&'static str; DAYS_PER_WEEK] {
        &WEEKDAY_HEADERS
    }

    /// All cells in row-major order, excluding the header row
    #[must_use]
    pub fn cells(&self) -> &[CalendarCell] {
        &self.cells
    }

    /// Cells grouped into weeks
    pub fn rows(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    /// Number of week rows, excluding the header row
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.cells.len() / DAYS_PER_WEEK
    }

    /// Number of blank cells before the first day
    #[must_use]
    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|c| c.is_blank()).count()
    }

    /// Number of blank cells after the last day
    #[must_use]
    pub fn trailing_blanks(&self) -> usize {
        self.cells.iter().rev().take_while(|c| c.is_blank()).count()
    }
}

impl fmt::Display for CalendarGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        let header: Vec<String> = WEEKDAY_HEADERS.iter().map(|h| format!("{h:<5}")).collect();
        writeln!(f, "{}", header.join("").trim_end())?;

        for row in self.rows() {
            let line: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    CalendarCell::Blank => format!("{:<5}", ""),
                    CalendarCell::Day {
                        day,
                        classification,
                    } => {
                        let heat = if classification.heat_on { "H" } else { "" };
                        let cool = if classification.cooling_on { "C" } else { "" };
                        let label = format!("{day}{heat}{cool}");
                        format!("{label:<5}")
                    },
                })
                .collect();
            writeln!(f, "{}", line.join("").trim_end())?;
        }
        Ok(())
    }
}
