//! Admin endpoints. All routes are staff only.

use atelier_common::AppResult;
use atelier_core::{StatsResponse, UserResponse};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;

use crate::extractors::StaffUser;
use crate::middleware::AppState;

const DEFAULT_PAGE_SIZE: u64 = 50;
const MAX_PAGE_SIZE: u64 = 100;

/// Create the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}/active", post(set_user_active))
        .route("/stats", get(stats))
}

#[derive(Debug, Default, Deserialize)]
struct ListUsersQuery {
    limit: Option<u64>,
    offset: Option<u64>,
}

async fn list_users(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);
    let users = state.moderation_service.list_users(limit, offset).await?;
    Ok(Json(users))
}

#[derive(Debug, Deserialize)]
struct SetActiveRequest {
    active: bool,
}

async fn set_user_active(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SetActiveRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .moderation_service
        .set_user_active(&id, input.active)
        .await?;
    Ok(Json(user))
}

async fn stats(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
) -> AppResult<Json<StatsResponse>> {
    let stats = state.moderation_service.stats().await?;
    Ok(Json(stats))
}
