//! Calendar renderer port
//!
//! Defines how a classification table becomes a calendar document.

use std::path::PathBuf;

use domain::ClassificationTable;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for rendering a classification table as a calendar document
///
/// Rendering is blocking file I/O; implementations write exactly one file
/// and return its path.
#[cfg_attr(test, automock)]
pub trait CalendarRendererPort: Send + Sync {
    /// Render `table` and return the path of the written document
    fn render(&self, table: &ClassificationTable) -> Result<PathBuf, ApplicationError>;
}
