//! Report generation service
//!
//! Runs the two pipeline stages in order: classify the date range, then hand
//! the finished table to the calendar renderer.

use std::path::PathBuf;
use std::sync::Arc;

use domain::{ClassificationTable, DateRange, GeoLocation};
use serde::Serialize;
use tracing::{info, instrument};

use super::ClassificationService;
use crate::error::ApplicationError;
use crate::ports::CalendarRendererPort;

/// Outcome of a successful report run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Where the calendar document was written
    pub output_path: PathBuf,
    /// Number of days classified
    pub days: usize,
    /// Days with heating on
    pub heating_days: usize,
    /// Days with cooling on
    pub cooling_days: usize,
}

impl ReportSummary {
    fn new(output_path: PathBuf, table: &ClassificationTable) -> Self {
        Self {
            output_path,
            days: table.len(),
            heating_days: table.heating_days(),
            cooling_days: table.cooling_days(),
        }
    }
}

/// Classifies a date range and renders the result
pub struct ReportService {
    classifier: ClassificationService,
    renderer: Arc<dyn CalendarRendererPort>,
}

impl std::fmt::Debug for ReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportService")
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

impl ReportService {
    /// Create a report service from its two stages
    #[must_use]
    pub fn new(classifier: ClassificationService, renderer: Arc<dyn CalendarRendererPort>) -> Self {
        Self {
            classifier,
            renderer,
        }
    }

    /// Classify `range` at `location` and render the calendar
    ///
    /// Nothing is written if classification fails.
    ///
    /// # Errors
    ///
    /// Returns the classifier's error, or `ApplicationError::Render` if the
    /// document cannot be produced.
    #[instrument(skip(self), fields(range = %range))]
    pub async fn generate(
        &self,
        range: &DateRange,
        location: &GeoLocation,
    ) -> Result<ReportSummary, ApplicationError> {
        let table = self.classifier.classify(range, location).await?;
        let output_path = self.renderer.render(&table)?;

        let summary = ReportSummary::new(output_path, &table);
        info!(
            path = %summary.output_path.display(),
            heating_days = summary.heating_days,
            cooling_days = summary.cooling_days,
            "Report written"
        );
        Ok(summary)
    }
}
