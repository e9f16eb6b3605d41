//! Value Objects - Immutable, identity-less domain primitives

mod date_range;
mod geo_location;
mod thresholds;
mod unit_system;

pub use date_range::DateRange;
pub use geo_location::{GeoLocation, InvalidCoordinates};
pub use thresholds::{DEFAULT_COOLING_THRESHOLD, DEFAULT_HEATING_THRESHOLD, Thresholds};
pub use unit_system::UnitSystem;
