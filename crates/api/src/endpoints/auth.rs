//! Authentication endpoints.

use atelier_common::AppResult;
use atelier_core::{AuthResponse, LoginInput, RegisterInput, UserResponse};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::extractors::AuthUser;
use crate::middleware::AppState;

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/check", get(check))
}

async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let auth = state.account_service.register(input).await?;
    Ok((StatusCode::CREATED, Json(auth)))
}

async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<AuthResponse>> {
    let auth = state.account_service.login(input).await?;
    Ok(Json(auth))
}

async fn logout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<StatusCode> {
    state.account_service.logout(&user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Who the bearer token belongs to.
async fn check(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(user.into())
}
