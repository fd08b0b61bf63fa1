//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `atelier_test`)
//!   `TEST_DB_PASSWORD` (default: `atelier_test`)
//!   `TEST_DB_NAME` (default: `atelier_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use atelier_common::IdGenerator;
use atelier_db::entities::{artwork, like, user};
use atelier_db::repositories::{ArtworkRepository, LikeRepository, UserRepository};
use atelier_db::test_utils::{TestDatabase, TestDbConfig};
use chrono::Utc;
use sea_orm::Set;

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_cleanup() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let result = db.cleanup().await;
    assert!(result.is_ok(), "Cleanup failed: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_like_unique_index_enforced() {
    let db = TestDatabase::create_unique().await.expect("Failed to create");
    atelier_db::migrate(db.connection()).await.expect("migrate");

    let conn = Arc::new(db.conn.clone());
    let ids = IdGenerator::new();

    let users = UserRepository::new(Arc::clone(&conn));
    let artworks = ArtworkRepository::new(Arc::clone(&conn));
    let likes = LikeRepository::new(Arc::clone(&conn));

    let user_id = ids.generate();
    users
        .create(user::ActiveModel {
            id: Set(user_id.clone()),
            username: Set("maya".to_string()),
            username_lower: Set("maya".to_string()),
            email: Set("maya@example.com".to_string()),
            password_hash: Set("hash".to_string()),
            token: Set(None),
            is_staff: Set(false),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    let artwork_id = ids.generate();
    artworks
        .create(artwork::ActiveModel {
            id: Set(artwork_id.clone()),
            user_id: Set(user_id.clone()),
            category_id: Set(None),
            title: Set("Dawn".to_string()),
            description: Set(String::new()),
            style: Set("abstract".to_string()),
            image_key: Set("artworks/dawn.jpg".to_string()),
            is_featured: Set(false),
            views: Set(0),
            price: Set(None),
            in_stock: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    likes
        .create(like::ActiveModel {
            id: Set(ids.generate()),
            user_id: Set(user_id.clone()),
            artwork_id: Set(artwork_id.clone()),
            created_at: Set(Utc::now().into()),
        })
        .await
        .unwrap();

    // Second insert for the same pair must hit the unique index
    let dup = likes
        .create(like::ActiveModel {
            id: Set(ids.generate()),
            user_id: Set(user_id.clone()),
            artwork_id: Set(artwork_id.clone()),
            created_at: Set(Utc::now().into()),
        })
        .await;
    assert!(matches!(dup, Err(atelier_common::AppError::Conflict(_))));

    assert_eq!(likes.count_by_artwork(&artwork_id).await.unwrap(), 1);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_increment_views_is_atomic_update() {
    let db = TestDatabase::create_unique().await.expect("Failed to create");
    atelier_db::migrate(db.connection()).await.expect("migrate");

    let conn = Arc::new(db.conn.clone());
    let ids = IdGenerator::new();

    let users = UserRepository::new(Arc::clone(&conn));
    let artworks = ArtworkRepository::new(Arc::clone(&conn));

    let user_id = ids.generate();
    users
        .create(user::ActiveModel {
            id: Set(user_id.clone()),
            username: Set("ren".to_string()),
            username_lower: Set("ren".to_string()),
            email: Set("ren@example.com".to_string()),
            password_hash: Set("hash".to_string()),
            token: Set(None),
            is_staff: Set(false),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    let artwork_id = ids.generate();
    artworks
        .create(artwork::ActiveModel {
            id: Set(artwork_id.clone()),
            user_id: Set(user_id),
            category_id: Set(None),
            title: Set("Tide".to_string()),
            description: Set(String::new()),
            style: Set("digital".to_string()),
            image_key: Set("artworks/tide.jpg".to_string()),
            is_featured: Set(false),
            views: Set(0),
            price: Set(None),
            in_stock: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    for _ in 0..5 {
        artworks.increment_views(&artwork_id).await.unwrap();
    }

    let fresh = artworks.get_by_id(&artwork_id).await.unwrap();
    assert_eq!(fresh.views, 5);

    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    // Test that default config is valid
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}
