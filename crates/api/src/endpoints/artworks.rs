//! Artwork endpoints: feed, detail, upload, and engagement.

use atelier_common::{AppError, AppResult};
use atelier_core::{
    AddCommentInput, ArtworkDetail, ArtworkResponse, ArtworkSummary, CommentResponse, FeedRequest,
    LikeToggleResponse, UpdateArtworkInput, UploadArtworkInput,
};
use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::extractors::{AuthUser, MaybeAuthUser};
use crate::middleware::AppState;

/// Create the artworks router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_artworks).post(upload_artwork))
        .route(
            "/{id}",
            get(artwork_detail)
                .put(update_artwork)
                .delete(delete_artwork),
        )
        .route("/{id}/like", post(toggle_like))
        .route("/{id}/comment", post(add_comment))
        .route("/{id}/suggest-comments", get(suggest_comments))
        .route("/{id}/generate-description", post(generate_description))
}

/// Query parameters accepted by the feed.
#[derive(Debug, Default, Deserialize)]
struct FeedQuery {
    search: Option<String>,
    category: Option<String>,
    style: Option<String>,
    /// Only `"true"` narrows the feed to featured artworks.
    featured: Option<String>,
    sort: Option<String>,
}

async fn list_artworks(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<Vec<ArtworkSummary>>> {
    let req = FeedRequest {
        search: query.search,
        category: query.category,
        style: query.style,
        featured_only: query.featured.as_deref() == Some("true"),
        sort: query.sort,
    };

    let viewer_id = viewer.as_ref().map(|u| u.id.as_str());
    let feed = state.feed_service.list(viewer_id, &req).await?;
    Ok(Json(feed))
}

async fn artwork_detail(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ArtworkDetail>> {
    let viewer_id = viewer.as_ref().map(|u| u.id.as_str());
    let detail = state.feed_service.detail(viewer_id, &id).await?;
    Ok(Json(detail))
}

async fn upload_artwork(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ArtworkResponse>)> {
    let (input, image) = parse_artwork_form(multipart).await?;
    let (data, content_type) =
        image.ok_or_else(|| AppError::BadRequest("Missing image file".to_string()))?;

    let artwork = state
        .artwork_service
        .upload(&user.id, input, &data, &content_type)
        .await?;
    Ok((StatusCode::CREATED, Json(artwork)))
}

async fn update_artwork(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateArtworkInput>,
) -> AppResult<Json<ArtworkResponse>> {
    let artwork = state
        .artwork_service
        .update(&user.id, user.is_staff, &id, input)
        .await?;
    Ok(Json(artwork))
}

async fn delete_artwork(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state
        .artwork_service
        .delete(&user.id, user.is_staff, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<LikeToggleResponse>> {
    let result = state.engagement_service.toggle_like(&user.id, &id).await?;
    Ok(Json(result))
}

async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AddCommentInput>,
) -> AppResult<(StatusCode, Json<CommentResponse>)> {
    let comment = state
        .engagement_service
        .add_comment(&user.id, &id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[derive(Debug, Serialize)]
struct SuggestionsResponse {
    suggestions: Vec<String>,
}

async fn suggest_comments(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SuggestionsResponse>> {
    let ctx = state.artwork_service.curation_context(&id).await?;
    let suggestions = state
        .curator_service
        .suggest_comments(&ctx.title, &ctx.artist, &ctx.style)
        .await?;
    Ok(Json(SuggestionsResponse { suggestions }))
}

#[derive(Debug, Serialize)]
struct DescriptionResponse {
    description: String,
}

async fn generate_description(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DescriptionResponse>> {
    let ctx = state.artwork_service.curation_context(&id).await?;
    let description = state
        .curator_service
        .generate_description(&ctx.title, &ctx.style, ctx.category.as_deref())
        .await?;
    Ok(Json(DescriptionResponse { description }))
}

/// Read the upload form: scalar fields feed the input, `image` carries bytes.
async fn parse_artwork_form(
    mut multipart: Multipart,
) -> AppResult<(UploadArtworkInput, Option<(Vec<u8>, String)>)> {
    let mut input = UploadArtworkInput::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        if name == "image" {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read image: {e}")))?;
            image = Some((data.to_vec(), content_type));
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read field '{name}': {e}")))?;
        match name.as_str() {
            "title" => input.title = value,
            "description" => input.description = Some(value),
            "style" => input.style = value,
            "category" => input.category = Some(value),
            "price" => {
                input.price = Some(value.parse().map_err(|_| {
                    AppError::Validation("Price must be a number".to_string())
                })?);
            }
            "in_stock" => input.in_stock = Some(value == "true"),
            _ => {}
        }
    }

    Ok((input, image))
}
