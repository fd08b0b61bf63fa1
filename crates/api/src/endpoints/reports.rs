//! Report endpoints: submission and the staff moderation queue.

use atelier_common::AppResult;
use atelier_core::{ReportActionInput, ReportResponse, SubmitReportInput};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

use crate::extractors::{AuthUser, StaffUser};
use crate::middleware::AppState;

/// Create the reports router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_report).get(list_reports))
        .route("/{id}/action", post(act_on_report))
}

async fn submit_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitReportInput>,
) -> AppResult<(StatusCode, Json<ReportResponse>)> {
    let report = state.moderation_service.submit_report(&user.id, input).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

#[derive(Debug, Default, Deserialize)]
struct ReportQuery {
    /// `"false"` includes resolved reports; the queue shows open ones by default.
    unresolved: Option<String>,
}

async fn list_reports(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<ReportResponse>>> {
    let unresolved_only = query.unresolved.as_deref() != Some("false");
    let reports = state.moderation_service.list_reports(unresolved_only).await?;
    Ok(Json(reports))
}

async fn act_on_report(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ReportActionInput>,
) -> AppResult<Json<ReportResponse>> {
    let report = state.moderation_service.act_on_report(&id, input).await?;
    Ok(Json(report))
}
