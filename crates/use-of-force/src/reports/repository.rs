use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::forms::incident_details::INCIDENT_DATE_FORMAT;
use crate::forms::SectionName;
use crate::validation::ProcessedInput;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub String);

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Answers saved so far for one report, keyed by section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    pub report_id: ReportId,
    pub sections: BTreeMap<SectionName, Map<String, Value>>,
    /// Promoted out of the incident details payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_date: Option<NaiveDateTime>,
}

impl ReportDraft {
    pub fn new(report_id: ReportId) -> Self {
        Self {
            report_id,
            sections: BTreeMap::new(),
            incident_date: None,
        }
    }

    /// Replaces the section's answers with a cleanly validated submission.
    pub fn apply(&mut self, section: SectionName, processed: ProcessedInput) {
        if let Some(incident_date) = processed
            .extracted_fields
            .get("incidentDate")
            .and_then(|incident| incident.get("value"))
            .and_then(Value::as_str)
            .and_then(|value| NaiveDateTime::parse_from_str(value, INCIDENT_DATE_FORMAT).ok())
        {
            self.incident_date = Some(incident_date);
        }
        self.sections.insert(section, processed.payload_fields);
    }
}

/// Storage abstraction so the report service can be exercised in isolation.
pub trait DraftStore: Send + Sync {
    fn fetch(&self, id: &ReportId) -> Result<Option<ReportDraft>, DraftError>;
    fn upsert(&self, draft: ReportDraft) -> Result<(), DraftError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("draft store unavailable: {0}")]
    Unavailable(String),
}
