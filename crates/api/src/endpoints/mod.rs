//! API endpoints.

mod admin;
mod artworks;
mod auth;
mod categories;
mod comments;
mod profiles;
mod reports;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(profiles::router())
        .nest("/auth", auth::router())
        .nest("/artworks", artworks::router())
        .nest("/comments", comments::router())
        .nest("/categories", categories::router())
        .nest("/reports", reports::router())
        .nest("/admin", admin::router())
}
