use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use super::repository::{DraftStore, ReportId};
use super::service::{ReportService, SubmissionOutcome};
use crate::error::AppError;
use crate::forms::SectionName;

/// Endpoints for saving report sections and reading drafts back.
pub fn report_router<S>(service: Arc<ReportService<S>>) -> Router
where
    S: DraftStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/reports/:report_id/sections/:section",
            post(submit_section_handler::<S>),
        )
        .route("/api/v1/reports/:report_id", get(draft_handler::<S>))
        .with_state(service)
}

pub(crate) async fn submit_section_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    Path((report_id, section)): Path<(String, String)>,
    Json(input): Json<Value>,
) -> Response
where
    S: DraftStore + 'static,
{
    let section = match section.parse::<SectionName>() {
        Ok(section) => section,
        Err(error) => return AppError::from(error).into_response(),
    };

    match service.submit_section(&ReportId(report_id), section, input) {
        Ok(SubmissionOutcome::Saved(draft)) => (StatusCode::OK, Json(draft)).into_response(),
        Ok(SubmissionOutcome::Rejected(processed)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(processed)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn draft_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    Path(report_id): Path<String>,
) -> Response
where
    S: DraftStore + 'static,
{
    let id = ReportId(report_id);
    match service.draft(&id) {
        Ok(Some(draft)) => (StatusCode::OK, Json(draft)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": format!("no draft saved for report '{id}'") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
