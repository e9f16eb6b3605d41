//! Domain-level errors

use thiserror::Error;

use crate::value_objects::InvalidCoordinates;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Date range is reversed, spans months, or names a day that does not exist
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// Latitude or longitude out of bounds
    #[error(transparent)]
    InvalidCoordinates(#[from] InvalidCoordinates),

    /// Classification table does not have one entry per day of its range
    #[error("Classification table has {actual} days, expected {expected}")]
    TableLengthMismatch { expected: usize, actual: usize },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}
