//! API integration tests.
//!
//! These tests drive the router against a mock database connection.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use std::path::PathBuf;
use std::sync::Arc;

use atelier_api::{middleware::AppState, middleware::auth_middleware, router as api_router};
use atelier_common::{LocalStorage, config::AiConfig};
use atelier_core::{
    AccountService, ArtworkService, CategoryService, CuratorService, EngagementService,
    FeedService, MediaService, ModerationService,
};
use atelier_db::entities::{artwork, category, user};
use atelier_db::repositories::{
    ArtworkRepository, CategoryRepository, CommentRepository, LikeRepository, ReportRepository,
    UserRepository,
};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use tower::ServiceExt;

/// Create test app state over the given connection.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);
    let media = MediaService::new(Arc::new(LocalStorage::new(
        PathBuf::from("/tmp/atelier-api-test"),
        "/media".to_string(),
    )));

    let user_repo = UserRepository::new(Arc::clone(&db));
    let artwork_repo = ArtworkRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));

    AppState {
        account_service: AccountService::new(
            user_repo.clone(),
            artwork_repo.clone(),
            media.clone(),
        ),
        artwork_service: ArtworkService::new(
            artwork_repo.clone(),
            category_repo.clone(),
            user_repo.clone(),
            media.clone(),
        ),
        category_service: CategoryService::new(category_repo.clone(), artwork_repo.clone()),
        curator_service: CuratorService::new(AiConfig::default()).unwrap(),
        engagement_service: EngagementService::new(
            artwork_repo.clone(),
            like_repo.clone(),
            comment_repo.clone(),
            user_repo.clone(),
            media.clone(),
        ),
        feed_service: FeedService::new(
            artwork_repo.clone(),
            like_repo,
            comment_repo,
            user_repo.clone(),
            category_repo,
            media,
        ),
        moderation_service: ModerationService::new(
            report_repo,
            artwork_repo,
            CommentRepository::new(Arc::clone(&db)),
            LikeRepository::new(Arc::clone(&db)),
            user_repo,
            MediaService::new(Arc::new(LocalStorage::new(
                PathBuf::from("/tmp/atelier-api-test"),
                "/media".to_string(),
            ))),
        ),
    }
}

/// Create the test router with the auth middleware applied, as the server does.
fn create_test_app(db: DatabaseConnection) -> Router {
    let state = create_test_state(db);
    Router::new()
        .nest("/api", api_router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

fn test_user(id: &str, username: &str, is_staff: bool) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        username_lower: username.to_lowercase(),
        email: format!("{username}@example.com"),
        password_hash: "hash".to_string(),
        token: Some("tok".to_string()),
        is_staff,
        is_active: true,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_empty_feed_returns_empty_array() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<artwork::Model>::new()])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/artworks")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "[]");
}

#[tokio::test]
async fn test_unknown_artwork_returns_not_found_envelope() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<artwork::Model>::new()])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/artworks/nope")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(body.contains("NOT_FOUND"));
}

#[tokio::test]
async fn test_like_requires_authentication() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/artworks/a1/like")
                .method("POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_comment_requires_authentication() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/comments/c1")
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_stats_forbidden_for_regular_user() {
    // First query resolves the bearer token to a non-staff user
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("u1", "maya", false)]])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/stats")
                .method("GET")
                .header("Authorization", "Bearer tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_categories() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[category::Model {
            id: "cat1".to_string(),
            name: "Landscapes".to_string(),
            description: String::new(),
            created_at: Utc::now().into(),
        }]])
        .append_query_results([[maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(2)),
        }]])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/categories")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Landscapes"));
}

#[tokio::test]
async fn test_register_with_invalid_json_returns_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/register")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nonexistent")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_suggest_comments_without_curator_key() {
    // Token lookup, then artwork and artist context queries
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("u1", "maya", false)]])
        .append_query_results([[artwork::Model {
            id: "a1".to_string(),
            user_id: "u1".to_string(),
            category_id: None,
            title: "Dawn".to_string(),
            description: String::new(),
            style: "abstract".to_string(),
            image_key: "artworks/dawn.jpg".to_string(),
            is_featured: false,
            views: 0,
            price: None,
            in_stock: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }]])
        .append_query_results([[test_user("u1", "maya", false)]])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/artworks/a1/suggest-comments")
                .method("GET")
                .header("Authorization", "Bearer tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // No API key is configured in tests
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
