//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod forecast_adapter;
mod pdf_calendar_renderer;

pub use forecast_adapter::ForecastAdapter;
pub use pdf_calendar_renderer::{CalendarRenderConfig, PdfCalendarRenderer, RenderError};
