//! Domain entities

mod calendar_grid;
mod classification_table;
mod daily_reading;

pub use calendar_grid::{CalendarCell, CalendarGrid, DAYS_PER_WEEK, WEEKDAY_HEADERS};
pub use classification_table::ClassificationTable;
pub use daily_reading::{DailyReading, DayClassification};
