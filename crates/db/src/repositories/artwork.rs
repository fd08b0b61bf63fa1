//! Artwork repository.

use std::sync::Arc;

use crate::entities::{artwork, Artwork};
use atelier_common::{AppError, AppResult};
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

/// Filters applied to the artwork feed.
///
/// All fields are optional; empty filters select every artwork. Filters
/// compose with AND semantics.
#[derive(Debug, Clone, Default)]
pub struct ArtworkFilter {
    /// Case-insensitive substring match against title and description.
    pub search: Option<String>,
    /// Restrict to a single category.
    pub category_id: Option<String>,
    /// Restrict to a single style.
    pub style: Option<String>,
    /// Keep only featured artworks when true.
    pub featured_only: bool,
}

/// Escape LIKE wildcards in user-supplied search terms.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Artwork repository for database operations.
#[derive(Clone)]
pub struct ArtworkRepository {
    db: Arc<DatabaseConnection>,
}

impl ArtworkRepository {
    /// Create a new artwork repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an artwork by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<artwork::Model>> {
        Artwork::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an artwork by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<artwork::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Artwork: {id}")))
    }

    /// Find artworks matching a filter, newest first.
    pub async fn find_filtered(&self, filter: &ArtworkFilter) -> AppResult<Vec<artwork::Model>> {
        let mut query = Artwork::find();

        if let Some(term) = filter.search.as_deref() {
            let pattern = format!("%{}%", escape_like(term).to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(
                        Func::lower(Expr::col((artwork::Entity, artwork::Column::Title)))
                            .like(pattern.clone()),
                    )
                    .add(
                        Func::lower(Expr::col((artwork::Entity, artwork::Column::Description)))
                            .like(pattern),
                    ),
            );
        }

        if let Some(category_id) = filter.category_id.as_deref() {
            query = query.filter(artwork::Column::CategoryId.eq(category_id));
        }

        if let Some(style) = filter.style.as_deref() {
            query = query.filter(artwork::Column::Style.eq(style));
        }

        if filter.featured_only {
            query = query.filter(artwork::Column::IsFeatured.eq(true));
        }

        query
            .order_by_desc(artwork::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find all artworks by a user, newest first.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Vec<artwork::Model>> {
        Artwork::find()
            .filter(artwork::Column::UserId.eq(user_id))
            .order_by_desc(artwork::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all artworks.
    pub async fn count(&self) -> AppResult<u64> {
        Artwork::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count artworks by a user.
    pub async fn count_by_user_id(&self, user_id: &str) -> AppResult<u64> {
        Artwork::find()
            .filter(artwork::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count artworks in a category.
    pub async fn count_by_category_id(&self, category_id: &str) -> AppResult<u64> {
        Artwork::find()
            .filter(artwork::Column::CategoryId.eq(category_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new artwork.
    pub async fn create(&self, model: artwork::ActiveModel) -> AppResult<artwork::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an artwork.
    pub async fn update(&self, model: artwork::ActiveModel) -> AppResult<artwork::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an artwork.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Artwork::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Atomically bump the view counter of an artwork.
    ///
    /// A single UPDATE so concurrent detail requests never lose increments.
    pub async fn increment_views(&self, id: &str) -> AppResult<()> {
        Artwork::update_many()
            .col_expr(
                artwork::Column::Views,
                Expr::col(artwork::Column::Views).add(1),
            )
            .filter(artwork::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
