//! Logging setup
//!
//! Installs the global `tracing` subscriber used by every crate.

mod logging;

pub use logging::{TelemetryConfig, TelemetryError, init_logging};
