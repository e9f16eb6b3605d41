//! Application services - the two pipeline stages and their orchestration

mod classification_service;
mod report_service;

pub use classification_service::{ClassificationService, ProviderFailurePolicy};
pub use report_service::{ReportService, ReportSummary};
