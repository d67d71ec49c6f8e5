//! Draft reports: section submissions are processed and, when valid, saved
//! against the report they belong to.

pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use repository::{DraftError, DraftStore, ReportDraft, ReportId};
pub use router::report_router;
pub use service::{ReportService, ReportServiceError, SubmissionOutcome};
