//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod calendar_renderer_port;
mod forecast_port;

#[cfg(test)]
pub use calendar_renderer_port::MockCalendarRendererPort;
pub use calendar_renderer_port::CalendarRendererPort;
#[cfg(test)]
pub use forecast_port::MockForecastPort;
pub use forecast_port::ForecastPort;
