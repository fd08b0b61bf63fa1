//! Category service.

use atelier_common::AppResult;
use atelier_db::repositories::{ArtworkRepository, CategoryRepository};
use serde::Serialize;

/// A category as returned to clients.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub artworks_count: u64,
    pub created_at: String,
}

/// Service for listing categories.
#[derive(Clone)]
pub struct CategoryService {
    category_repo: CategoryRepository,
    artwork_repo: ArtworkRepository,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub const fn new(category_repo: CategoryRepository, artwork_repo: ArtworkRepository) -> Self {
        Self {
            category_repo,
            artwork_repo,
        }
    }

    /// List all categories with their artwork counts, sorted by name.
    pub async fn list(&self) -> AppResult<Vec<CategoryResponse>> {
        let categories = self.category_repo.find_all().await?;

        let mut out = Vec::with_capacity(categories.len());
        for c in categories {
            let artworks_count = self.artwork_repo.count_by_category_id(&c.id).await?;
            out.push(CategoryResponse {
                id: c.id,
                name: c.name,
                description: c.description,
                artworks_count,
                created_at: c.created_at.to_rfc3339(),
            });
        }
        Ok(out)
    }
}
