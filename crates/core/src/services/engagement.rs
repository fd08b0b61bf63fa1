//! Engagement service: likes and comments.

use atelier_common::{id::IdGenerator, AppError, AppResult};
use atelier_db::entities::{comment, like};
use atelier_db::repositories::{
    ArtworkRepository, CommentRepository, LikeRepository, UserRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use super::feed::ArtistRef;
use super::media::MediaService;

/// Maximum length of a comment in characters.
const MAX_COMMENT_LENGTH: usize = 2000;

/// Input for posting a comment.
#[derive(Debug, Deserialize)]
pub struct AddCommentInput {
    pub text: String,
}

/// Result of toggling a like.
#[derive(Debug, Serialize)]
pub struct LikeToggleResponse {
    /// Whether the viewer now likes the artwork.
    pub liked: bool,
    /// Total likes after the toggle.
    pub likes_count: u64,
}

/// A comment as returned to clients.
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub artwork_id: String,
    pub user: ArtistRef,
    pub text: String,
    pub created_at: String,
}

/// Service for likes and comments on artworks.
#[derive(Clone)]
pub struct EngagementService {
    artwork_repo: ArtworkRepository,
    like_repo: LikeRepository,
    comment_repo: CommentRepository,
    user_repo: UserRepository,
    media: MediaService,
    id_gen: IdGenerator,
}

impl EngagementService {
    /// Create a new engagement service.
    #[must_use]
    pub fn new(
        artwork_repo: ArtworkRepository,
        like_repo: LikeRepository,
        comment_repo: CommentRepository,
        user_repo: UserRepository,
        media: MediaService,
    ) -> Self {
        Self {
            artwork_repo,
            like_repo,
            comment_repo,
            user_repo,
            media,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle the viewer's like on an artwork.
    ///
    /// A like exists afterwards exactly when none existed before. Under
    /// concurrent toggles the unique (user, artwork) index arbitrates: an
    /// insert that loses the race converts into a removal.
    pub async fn toggle_like(&self, user_id: &str, artwork_id: &str) -> AppResult<LikeToggleResponse> {
        self.artwork_repo.get_by_id(artwork_id).await?;

        let liked = if self
            .like_repo
            .delete_by_user_and_artwork(user_id, artwork_id)
            .await?
        {
            false
        } else {
            let model = like::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(user_id.to_string()),
                artwork_id: Set(artwork_id.to_string()),
                created_at: Set(chrono::Utc::now().into()),
            };
            match self.like_repo.create(model).await {
                Ok(_) => true,
                Err(AppError::Conflict(_)) => {
                    // Another request inserted the like first
                    self.like_repo
                        .delete_by_user_and_artwork(user_id, artwork_id)
                        .await?;
                    false
                }
                Err(e) => return Err(e),
            }
        };

        let likes_count = self.like_repo.count_by_artwork(artwork_id).await?;
        Ok(LikeToggleResponse { liked, likes_count })
    }

    /// Post a comment on an artwork.
    pub async fn add_comment(
        &self,
        user_id: &str,
        artwork_id: &str,
        input: AddCommentInput,
    ) -> AppResult<CommentResponse> {
        let text = input.text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Comment cannot be empty".to_string()));
        }
        if text.chars().count() > MAX_COMMENT_LENGTH {
            return Err(AppError::Validation(format!(
                "Comment must be at most {MAX_COMMENT_LENGTH} characters"
            )));
        }

        self.artwork_repo.get_by_id(artwork_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            artwork_id: Set(artwork_id.to_string()),
            text: Set(text.to_string()),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.comment_repo.create(model).await?;
        let author = self.author_ref(&created.user_id).await?;

        Ok(CommentResponse {
            id: created.id,
            artwork_id: created.artwork_id,
            user: author,
            text: created.text,
            created_at: created.created_at.to_rfc3339(),
        })
    }

    /// Delete a comment. Only its author or staff may do so.
    pub async fn delete_comment(
        &self,
        user_id: &str,
        is_staff: bool,
        comment_id: &str,
    ) -> AppResult<()> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;

        if comment.user_id != user_id && !is_staff {
            return Err(AppError::Forbidden(
                "You can only delete your own comments".to_string(),
            ));
        }

        self.comment_repo.delete(comment_id).await
    }

    async fn author_ref(&self, user_id: &str) -> AppResult<ArtistRef> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let avatar = self
            .user_repo
            .find_profile(user_id)
            .await?
            .and_then(|p| p.avatar_key)
            .map(|key| self.media.public_url(&key));

        Ok(ArtistRef {
            id: user.id,
            username: user.username,
            avatar,
        })
    }
}
