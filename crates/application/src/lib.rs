//! Application layer - Use cases and orchestration
//!
//! Defines the forecast and renderer ports and the services that drive the
//! classify-then-render pipeline through them.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
