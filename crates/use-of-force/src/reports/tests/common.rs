use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::config::ClockConfig;
use crate::forms::FormRegistry;
use crate::reports::repository::{DraftError, DraftStore, ReportDraft, ReportId};
use crate::reports::service::ReportService;

#[derive(Default, Clone)]
pub(super) struct MemoryDrafts {
    drafts: Arc<Mutex<HashMap<ReportId, ReportDraft>>>,
}

impl DraftStore for MemoryDrafts {
    fn fetch(&self, id: &ReportId) -> Result<Option<ReportDraft>, DraftError> {
        Ok(self.drafts.lock().expect("drafts mutex poisoned").get(id).cloned())
    }

    fn upsert(&self, draft: ReportDraft) -> Result<(), DraftError> {
        self.drafts
            .lock()
            .expect("drafts mutex poisoned")
            .insert(draft.report_id.clone(), draft);
        Ok(())
    }
}

pub(super) struct UnavailableDrafts;

impl DraftStore for UnavailableDrafts {
    fn fetch(&self, _id: &ReportId) -> Result<Option<ReportDraft>, DraftError> {
        Err(DraftError::Unavailable("offline".to_string()))
    }

    fn upsert(&self, _draft: ReportDraft) -> Result<(), DraftError> {
        Err(DraftError::Unavailable("offline".to_string()))
    }
}

pub(super) fn clock() -> ClockConfig {
    let now = NaiveDate::from_ymd_opt(2019, 1, 15)
        .and_then(|date| date.and_hms_opt(10, 0, 0))
        .expect("valid timestamp");
    ClockConfig::Fixed(now)
}

pub(super) fn service_with<S>(store: Arc<S>) -> ReportService<S>
where
    S: DraftStore + 'static,
{
    let registry = Arc::new(FormRegistry::build().expect("sections compile"));
    ReportService::new(registry, store, clock())
}

pub(super) fn build_service() -> (ReportService<MemoryDrafts>, MemoryDrafts) {
    let store = MemoryDrafts::default();
    (service_with(Arc::new(store.clone())), store)
}

pub(super) fn report_id() -> ReportId {
    ReportId("report-1".to_string())
}

pub(super) fn incident_details() -> Value {
    json!({
        "incidentDate": {
            "date": { "day": "15", "month": "1", "year": "2019" },
            "time": { "hour": "09", "minute": "30" }
        },
        "locationId": "12",
        "plannedUseOfForce": "false",
        "witnesses": [{ "name": "Jo Bloggs" }]
    })
}

pub(super) fn evidence() -> Value {
    json!({
        "baggedEvidence": "false",
        "photographsTaken": "true",
        "cctvRecording": "NOT_KNOWN"
    })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
