use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::repository::{DraftError, DraftStore, ReportDraft, ReportId};
use crate::config::ClockConfig;
use crate::forms::{FormRegistry, SectionName};
use crate::validation::{ProcessedInput, SchemaError};

/// What happened to a submitted section.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Saved(ReportDraft),
    /// Nothing was stored; the processed input is returned for re-display.
    Rejected(ProcessedInput),
}

#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Store(#[from] DraftError),
}

/// Runs submitted sections through the pipeline and keeps valid answers.
pub struct ReportService<S> {
    registry: Arc<FormRegistry>,
    store: Arc<S>,
    clock: ClockConfig,
}

impl<S> ReportService<S>
where
    S: DraftStore + 'static,
{
    pub fn new(registry: Arc<FormRegistry>, store: Arc<S>, clock: ClockConfig) -> Self {
        Self {
            registry,
            store,
            clock,
        }
    }

    pub fn submit_section(
        &self,
        report_id: &ReportId,
        section: SectionName,
        input: Value,
    ) -> Result<SubmissionOutcome, ReportServiceError> {
        let processed = self.registry.process(section, input, &self.clock.policy())?;
        if !processed.is_valid() {
            warn!(
                %report_id,
                %section,
                errors = processed.errors.len(),
                "section submission rejected"
            );
            return Ok(SubmissionOutcome::Rejected(processed));
        }

        let mut draft = self
            .store
            .fetch(report_id)?
            .unwrap_or_else(|| ReportDraft::new(report_id.clone()));
        draft.apply(section, processed);
        self.store.upsert(draft.clone())?;

        info!(%report_id, %section, "section saved");
        Ok(SubmissionOutcome::Saved(draft))
    }

    pub fn draft(&self, report_id: &ReportId) -> Result<Option<ReportDraft>, ReportServiceError> {
        Ok(self.store.fetch(report_id)?)
    }
}
