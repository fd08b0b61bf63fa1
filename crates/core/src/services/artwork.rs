//! Artwork lifecycle service: upload, update, delete.

use atelier_common::{id::IdGenerator, AppError, AppResult};
use atelier_db::entities::{artwork, category};
use atelier_db::repositories::{ArtworkRepository, CategoryRepository, UserRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use super::media::MediaService;

/// Recognized artwork styles.
pub const ARTWORK_STYLES: &[&str] = &[
    "abstract",
    "realistic",
    "digital",
    "generative",
    "photography",
    "mixed",
];

/// Input for uploading an artwork (multipart fields besides the image).
#[derive(Debug, Default, Deserialize)]
pub struct UploadArtworkInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub style: String,
    /// Category display name; created on first use.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub in_stock: Option<bool>,
}

/// Input for updating an artwork.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateArtworkInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub style: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub in_stock: Option<bool>,
    /// Staff only.
    pub is_featured: Option<bool>,
}

/// An artwork as returned from mutations.
#[derive(Debug, Serialize)]
pub struct ArtworkResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub style: String,
    pub category: Option<String>,
    pub image: String,
    pub is_featured: bool,
    pub views: i64,
    pub price: f64,
    pub in_stock: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Prompt context for the AI curator.
#[derive(Debug)]
pub struct CurationContext {
    pub title: String,
    pub artist: String,
    pub style: String,
    pub category: Option<String>,
}

/// Service managing the artwork lifecycle.
#[derive(Clone)]
pub struct ArtworkService {
    artwork_repo: ArtworkRepository,
    category_repo: CategoryRepository,
    user_repo: UserRepository,
    media: MediaService,
    id_gen: IdGenerator,
}

impl ArtworkService {
    /// Create a new artwork service.
    #[must_use]
    pub fn new(
        artwork_repo: ArtworkRepository,
        category_repo: CategoryRepository,
        user_repo: UserRepository,
        media: MediaService,
    ) -> Self {
        Self {
            artwork_repo,
            category_repo,
            user_repo,
            media,
            id_gen: IdGenerator::new(),
        }
    }

    /// Prompt context for an artwork, for the AI curator.
    pub async fn curation_context(&self, artwork_id: &str) -> AppResult<CurationContext> {
        let model = self.artwork_repo.get_by_id(artwork_id).await?;
        let artist = self.user_repo.get_by_id(&model.user_id).await?.username;
        let category = match model.category_id.as_deref() {
            Some(id) => self.category_repo.find_by_id(id).await?.map(|c| c.name),
            None => None,
        };

        Ok(CurationContext {
            title: model.title,
            artist,
            style: model.style,
            category,
        })
    }

    /// Upload a new artwork with its image.
    pub async fn upload(
        &self,
        user_id: &str,
        input: UploadArtworkInput,
        image_data: &[u8],
        content_type: &str,
    ) -> AppResult<ArtworkResponse> {
        validate_title(&input.title)?;
        validate_style(&input.style)?;
        if let Some(price) = input.price {
            validate_price(price)?;
        }

        let category = match input.category.as_deref() {
            Some(name) => Some(self.get_or_create_category(name).await?),
            None => None,
        };

        let stored = self.media.store_artwork_image(image_data, content_type).await?;

        // A fresh artwork counts as updated at its creation time
        let now = chrono::Utc::now();
        let model = artwork::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            category_id: Set(category.as_ref().map(|c| c.id.clone())),
            title: Set(input.title),
            description: Set(input.description.unwrap_or_default()),
            style: Set(input.style),
            image_key: Set(stored.key),
            is_featured: Set(false),
            views: Set(0),
            price: Set(input.price),
            in_stock: Set(input.in_stock.unwrap_or(true)),
            created_at: Set(now.into()),
            updated_at: Set(Some(now.into())),
        };

        let created = self.artwork_repo.create(model).await?;
        Ok(self.to_response(created, category.map(|c| c.name)))
    }

    /// Update an artwork. Only its owner or staff; featuring is staff only.
    pub async fn update(
        &self,
        user_id: &str,
        is_staff: bool,
        artwork_id: &str,
        input: UpdateArtworkInput,
    ) -> AppResult<ArtworkResponse> {
        let existing = self.artwork_repo.get_by_id(artwork_id).await?;

        if existing.user_id != user_id && !is_staff {
            return Err(AppError::Forbidden(
                "You can only update your own artworks".to_string(),
            ));
        }
        if input.is_featured.is_some() && !is_staff {
            return Err(AppError::Forbidden(
                "Only staff can feature artworks".to_string(),
            ));
        }

        let mut category_name: Option<String> = None;
        let mut active: artwork::ActiveModel = existing.into();

        if let Some(title) = input.title {
            validate_title(&title)?;
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(style) = input.style {
            validate_style(&style)?;
            active.style = Set(style);
        }
        if let Some(name) = input.category {
            let category = self.get_or_create_category(&name).await?;
            active.category_id = Set(Some(category.id));
            category_name = Some(category.name);
        }
        if let Some(price) = input.price {
            validate_price(price)?;
            active.price = Set(Some(price));
        }
        if let Some(in_stock) = input.in_stock {
            active.in_stock = Set(in_stock);
        }
        if let Some(is_featured) = input.is_featured {
            active.is_featured = Set(is_featured);
        }

        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.artwork_repo.update(active).await?;

        let category_name = match category_name {
            Some(name) => Some(name),
            None => match updated.category_id.as_deref() {
                Some(id) => self.category_repo.find_by_id(id).await?.map(|c| c.name),
                None => None,
            },
        };

        Ok(self.to_response(updated, category_name))
    }

    /// Delete an artwork and its stored image. Only its owner or staff.
    pub async fn delete(&self, user_id: &str, is_staff: bool, artwork_id: &str) -> AppResult<()> {
        let existing = self.artwork_repo.get_by_id(artwork_id).await?;

        if existing.user_id != user_id && !is_staff {
            return Err(AppError::Forbidden(
                "You can only delete your own artworks".to_string(),
            ));
        }

        self.artwork_repo.delete(artwork_id).await?;

        if let Err(e) = self.media.delete(&existing.image_key).await {
            tracing::warn!(
                artwork_id = artwork_id,
                key = %existing.image_key,
                error = %e,
                "Failed to delete artwork image"
            );
        }

        Ok(())
    }

    async fn get_or_create_category(&self, name: &str) -> AppResult<category::Model> {
        let name = name.trim();
        if name.is_empty() || name.len() > 100 {
            return Err(AppError::Validation(
                "Category name must be between 1 and 100 characters".to_string(),
            ));
        }

        if let Some(existing) = self.category_repo.find_by_name(name).await? {
            return Ok(existing);
        }

        self.category_repo
            .create(category::ActiveModel {
                id: Set(self.id_gen.generate()),
                name: Set(name.to_string()),
                description: Set(String::new()),
                created_at: Set(chrono::Utc::now().into()),
            })
            .await
    }

    fn to_response(&self, model: artwork::Model, category: Option<String>) -> ArtworkResponse {
        ArtworkResponse {
            id: model.id,
            title: model.title,
            description: model.description,
            style: model.style,
            category,
            image: self.media.public_url(&model.image_key),
            is_featured: model.is_featured,
            views: model.views,
            price: model.price.unwrap_or(0.0),
            in_stock: model.in_stock,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model
                .updated_at
                .unwrap_or(model.created_at)
                .to_rfc3339(),
        }
    }
}

fn validate_title(title: &str) -> AppResult<()> {
    if title.trim().is_empty() || title.len() > 200 {
        return Err(AppError::Validation(
            "Title must be between 1 and 200 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_style(style: &str) -> AppResult<()> {
    if !ARTWORK_STYLES.contains(&style) {
        return Err(AppError::Validation(format!(
            "Unknown style '{}'; expected one of: {}",
            style,
            ARTWORK_STYLES.join(", ")
        )));
    }
    Ok(())
}

fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::Validation(
            "Price must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use atelier_common::LocalStorage;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn service(db: Arc<DatabaseConnection>) -> ArtworkService {
        let media = MediaService::new(Arc::new(LocalStorage::new(
            PathBuf::from("/tmp/atelier-test"),
            "/media".to_string(),
        )));
        ArtworkService::new(
            ArtworkRepository::new(Arc::clone(&db)),
            CategoryRepository::new(Arc::clone(&db)),
            UserRepository::new(db),
            media,
        )
    }

    fn test_artwork(id: &str, owner: &str) -> artwork::Model {
        artwork::Model {
            id: id.to_string(),
            user_id: owner.to_string(),
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
        }
    }

    #[test]
    fn test_validate_style() {
        assert!(validate_style("abstract").is_ok());
        assert!(validate_style("generative").is_ok());
        assert!(matches!(
            validate_style("cubist"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(149.99).is_ok());
        assert!(matches!(validate_price(-1.0), Err(AppError::Validation(_))));
        assert!(matches!(
            validate_price(f64::NAN),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_style() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let input = UploadArtworkInput {
            title: "Dawn".to_string(),
            style: "cubist".to_string(),
            ..UploadArtworkInput::default()
        };
        let result = service(db).upload("u1", input, b"img", "image/png").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_forbidden_for_non_owner() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_artwork("a1", "artist1")]])
                .into_connection(),
        );

        let result = service(db)
            .update("someone-else", false, "a1", UpdateArtworkInput::default())
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_featuring_requires_staff() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_artwork("a1", "artist1")]])
                .into_connection(),
        );

        let input = UpdateArtworkInput {
            is_featured: Some(true),
            ..UpdateArtworkInput::default()
        };
        let result = service(db).update("artist1", false, "a1", input).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_staff_can_feature() {
        let mut featured = test_artwork("a1", "artist1");
        featured.is_featured = true;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_artwork("a1", "artist1")]])
                .append_query_results([[featured]])
                .into_connection(),
        );

        let input = UpdateArtworkInput {
            is_featured: Some(true),
            ..UpdateArtworkInput::default()
        };
        let result = service(db).update("mod1", true, "a1", input).await.unwrap();

        assert!(result.is_featured);
    }
}
