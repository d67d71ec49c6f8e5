use chrono::NaiveDateTime;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use use_of_force::config::FIXED_NOW_FORMAT;
use use_of_force::reports::{DraftError, DraftStore, ReportDraft, ReportId};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Drafts held for the lifetime of the process.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDraftStore {
    drafts: Arc<Mutex<HashMap<ReportId, ReportDraft>>>,
}

impl DraftStore for InMemoryDraftStore {
    fn fetch(&self, id: &ReportId) -> Result<Option<ReportDraft>, DraftError> {
        let guard = self
            .drafts
            .lock()
            .map_err(|_| DraftError::Unavailable("draft mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn upsert(&self, draft: ReportDraft) -> Result<(), DraftError> {
        let mut guard = self
            .drafts
            .lock()
            .map_err(|_| DraftError::Unavailable("draft mutex poisoned".to_string()))?;
        guard.insert(draft.report_id.clone(), draft);
        Ok(())
    }
}

pub(crate) fn parse_now(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw.trim(), FIXED_NOW_FORMAT)
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DDTHH:MM ({err})"))
}
