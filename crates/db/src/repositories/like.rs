//! Like repository.

use std::sync::Arc;

use crate::entities::{like, Like};
use atelier_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, SqlErr,
};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by user and artwork.
    pub async fn find_by_user_and_artwork(
        &self,
        user_id: &str,
        artwork_id: &str,
    ) -> AppResult<Option<like::Model>> {
        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::ArtworkId.eq(artwork_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user has liked an artwork.
    pub async fn has_liked(&self, user_id: &str, artwork_id: &str) -> AppResult<bool> {
        Ok(self
            .find_by_user_and_artwork(user_id, artwork_id)
            .await?
            .is_some())
    }

    /// Create a new like.
    ///
    /// The unique (user, artwork) index is the arbiter under concurrency; a
    /// violation maps to `Conflict` so the caller can treat the like as
    /// already present.
    pub async fn create(&self, model: like::ActiveModel) -> AppResult<like::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AppError::Conflict("Like already exists".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Delete a like by user and artwork. Returns whether a row was removed.
    pub async fn delete_by_user_and_artwork(
        &self,
        user_id: &str,
        artwork_id: &str,
    ) -> AppResult<bool> {
        let like = self.find_by_user_and_artwork(user_id, artwork_id).await?;
        if let Some(l) = like {
            l.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Count all likes.
    pub async fn count(&self) -> AppResult<u64> {
        Like::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count likes on an artwork.
    pub async fn count_by_artwork(&self, artwork_id: &str) -> AppResult<u64> {
        Like::find()
            .filter(like::Column::ArtworkId.eq(artwork_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count likes given by a user.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
