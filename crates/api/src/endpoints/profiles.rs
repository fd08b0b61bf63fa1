//! Profile endpoints.

use atelier_common::{AppError, AppResult};
use atelier_core::{ProfileResponse, UpdateProfileInput};
use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    routing::{get, post, put},
};

use crate::extractors::AuthUser;
use crate::middleware::AppState;

/// Create the profiles router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{username}", get(view_profile))
        .route("/profile", put(update_profile))
        .route("/profile/avatar", post(update_avatar))
}

async fn view_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state.account_service.profile(&username).await?;
    Ok(Json(profile))
}

async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state.account_service.update_profile(&user.id, input).await?;
    Ok(Json(profile))
}

async fn update_avatar(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ProfileResponse>> {
    let mut image: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("avatar") {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read avatar: {e}")))?;
        image = Some((data.to_vec(), content_type));
    }

    let (data, content_type) =
        image.ok_or_else(|| AppError::BadRequest("Missing avatar file".to_string()))?;

    let profile = state
        .account_service
        .update_avatar(&user.id, &data, &content_type)
        .await?;
    Ok(Json(profile))
}
