//! Category endpoints.

use atelier_common::AppResult;
use atelier_core::CategoryResponse;
use axum::{Json, Router, extract::State, routing::get};

use crate::middleware::AppState;

/// Create the categories router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_categories))
}

async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryResponse>>> {
    let categories = state.category_service.list().await?;
    Ok(Json(categories))
}
