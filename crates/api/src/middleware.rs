//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use atelier_core::{
    AccountService, ArtworkService, CategoryService, CuratorService, EngagementService,
    FeedService, ModerationService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub artwork_service: ArtworkService,
    pub category_service: CategoryService,
    pub curator_service: CuratorService,
    pub engagement_service: EngagementService,
    pub feed_service: FeedService,
    pub moderation_service: ModerationService,
}

/// Authentication middleware.
///
/// Resolves a bearer token to its user and stashes the model in the request
/// extensions. Requests without a valid token pass through anonymously; the
/// extractors decide whether that is acceptable.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(Some(user)) = state.account_service.authenticate(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
