use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use crate::error::workflow_status_code;

use super::backend::ReviewBackend;
use super::domain::{
    ApplicantId, EnglishEvidence, EnglishProficiency, EnglishStatus, PrerequisiteUpdate,
    ReviewStatus, ScholarshipDecision,
};
use super::service::{ReviewWorkflowService, WorkflowError};
use super::sync::SurfaceId;
use super::transition::StatusProposal;

/// Router builder exposing the review surface operations over HTTP.
pub fn review_router<B>(service: Arc<ReviewWorkflowService<B>>) -> Router
where
    B: ReviewBackend + 'static,
{
    Router::new()
        .route("/api/v1/review/:applicant_id", get(open_handler::<B>))
        .route(
            "/api/v1/review/:applicant_id/status/preview",
            post(preview_handler::<B>),
        )
        .route(
            "/api/v1/review/:applicant_id/status/commit",
            post(commit_handler::<B>),
        )
        .route(
            "/api/v1/review/:applicant_id/history",
            get(history_handler::<B>),
        )
        .route(
            "/api/v1/review/:applicant_id/credentials",
            get(credentials_handler::<B>),
        )
        .route(
            "/api/v1/review/:applicant_id/prerequisites",
            post(prerequisites_handler::<B>),
        )
        .route(
            "/api/v1/review/:applicant_id/scholarship",
            post(scholarship_handler::<B>),
        )
        .route(
            "/api/v1/review/:applicant_id/english",
            post(english_handler::<B>),
        )
        .route("/api/v1/review/:applicant_id/gpa", post(gpa_handler::<B>))
        .route(
            "/api/v1/review/:applicant_id/panels",
            post(register_panel_handler::<B>),
        )
        .route(
            "/api/v1/review/panels/:surface",
            get(panel_status_handler::<B>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreviewRequest {
    pub(crate) status: ReviewStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScholarshipRequest {
    pub(crate) decision: ScholarshipDecision,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnglishRequest {
    pub(crate) status: EnglishStatus,
    #[serde(default)]
    pub(crate) evidence: Option<EnglishEvidence>,
    /// Anchors the future-date check; defaults to the server's local date.
    #[serde(default)]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GpaRequest {
    pub(crate) gpa_note: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterPanelRequest {
    pub(crate) surface: String,
}

fn workflow_error_response(err: WorkflowError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (workflow_status_code(&err), axum::Json(payload)).into_response()
}

pub(crate) async fn open_handler<B>(
    State(service): State<Arc<ReviewWorkflowService<B>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    B: ReviewBackend + 'static,
{
    match service.open_review(ApplicantId(applicant_id)) {
        Ok(surface) => (StatusCode::OK, axum::Json(surface)).into_response(),
        Err(err) => workflow_error_response(err),
    }
}

pub(crate) async fn preview_handler<B>(
    State(service): State<Arc<ReviewWorkflowService<B>>>,
    Path(applicant_id): Path<String>,
    axum::Json(request): axum::Json<PreviewRequest>,
) -> Response
where
    B: ReviewBackend + 'static,
{
    let id = ApplicantId(applicant_id);
    match service.propose_status(&id, request.status) {
        Ok(StatusProposal::NoOp) => {
            let payload = json!({ "no_op": true, "commit_enabled": false });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(StatusProposal::Staged(preview)) => {
            let payload = json!({
                "no_op": false,
                "commit_enabled": true,
                "preview": preview,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => workflow_error_response(err),
    }
}

pub(crate) async fn commit_handler<B>(
    State(service): State<Arc<ReviewWorkflowService<B>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    B: ReviewBackend + 'static,
{
    let id = ApplicantId(applicant_id);
    match service.commit_status(&id) {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(err) => workflow_error_response(err),
    }
}

pub(crate) async fn history_handler<B>(
    State(service): State<Arc<ReviewWorkflowService<B>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    B: ReviewBackend + 'static,
{
    let id = ApplicantId(applicant_id);
    match service.recent_history(&id) {
        Ok(history) => (StatusCode::OK, axum::Json(history)).into_response(),
        Err(err) => workflow_error_response(err),
    }
}

pub(crate) async fn credentials_handler<B>(
    State(service): State<Arc<ReviewWorkflowService<B>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    B: ReviewBackend + 'static,
{
    let id = ApplicantId(applicant_id);
    match service.credential_summary(&id) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => workflow_error_response(err),
    }
}

pub(crate) async fn prerequisites_handler<B>(
    State(service): State<Arc<ReviewWorkflowService<B>>>,
    Path(applicant_id): Path<String>,
    axum::Json(update): axum::Json<PrerequisiteUpdate>,
) -> Response
where
    B: ReviewBackend + 'static,
{
    let id = ApplicantId(applicant_id);
    match service.save_prerequisites(&id, update) {
        Ok(()) => saved_response(),
        Err(err) => workflow_error_response(err),
    }
}

pub(crate) async fn scholarship_handler<B>(
    State(service): State<Arc<ReviewWorkflowService<B>>>,
    Path(applicant_id): Path<String>,
    axum::Json(request): axum::Json<ScholarshipRequest>,
) -> Response
where
    B: ReviewBackend + 'static,
{
    let id = ApplicantId(applicant_id);
    match service.save_scholarship(&id, request.decision) {
        Ok(()) => saved_response(),
        Err(err) => workflow_error_response(err),
    }
}

pub(crate) async fn english_handler<B>(
    State(service): State<Arc<ReviewWorkflowService<B>>>,
    Path(applicant_id): Path<String>,
    axum::Json(request): axum::Json<EnglishRequest>,
) -> Response
where
    B: ReviewBackend + 'static,
{
    let id = ApplicantId(applicant_id);
    let today = request.as_of.unwrap_or_else(|| Local::now().date_naive());
    let english = EnglishProficiency {
        status: request.status,
        evidence: request.evidence,
    };
    match service.save_english(&id, english, today) {
        Ok(()) => saved_response(),
        Err(err) => workflow_error_response(err),
    }
}

pub(crate) async fn gpa_handler<B>(
    State(service): State<Arc<ReviewWorkflowService<B>>>,
    Path(applicant_id): Path<String>,
    axum::Json(request): axum::Json<GpaRequest>,
) -> Response
where
    B: ReviewBackend + 'static,
{
    let id = ApplicantId(applicant_id);
    match service.save_gpa(&id, &request.gpa_note) {
        Ok(()) => saved_response(),
        Err(err) => workflow_error_response(err),
    }
}

pub(crate) async fn register_panel_handler<B>(
    State(service): State<Arc<ReviewWorkflowService<B>>>,
    Path(applicant_id): Path<String>,
    axum::Json(request): axum::Json<RegisterPanelRequest>,
) -> Response
where
    B: ReviewBackend + 'static,
{
    let id = ApplicantId(applicant_id);
    match service.register_panel(SurfaceId(request.surface), &id) {
        Ok(status) => {
            let payload = json!({
                "status": status,
                "badge_color": status.badge_color(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => workflow_error_response(err),
    }
}

pub(crate) async fn panel_status_handler<B>(
    State(service): State<Arc<ReviewWorkflowService<B>>>,
    Path(surface): Path<String>,
) -> Response
where
    B: ReviewBackend + 'static,
{
    match service.panel_status(&SurfaceId(surface)) {
        Some(status) => {
            let payload = json!({
                "status": status,
                "badge_color": status.badge_color(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        None => {
            let payload = json!({ "error": "surface is not mounted" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

fn saved_response() -> Response {
    let payload = json!({ "success": true, "message": "saved" });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
