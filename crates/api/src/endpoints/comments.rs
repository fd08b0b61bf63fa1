//! Comment endpoints.

use atelier_common::AppResult;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::delete,
};
use serde_json::{Value, json};

use crate::extractors::AuthUser;
use crate::middleware::AppState;

/// Create the comments router.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(delete_comment))
}

async fn delete_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state
        .engagement_service
        .delete_comment(&user.id, user.is_staff, &id)
        .await?;
    Ok(Json(json!({ "message": "Comment deleted" })))
}
