//! Domain layer for HeatCal
//!
//! Dates, thresholds, daily readings and the heating/cooling classification
//! they produce, plus the calendar layout derived from it. No I/O happens here.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
