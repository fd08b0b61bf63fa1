//! Artwork feed service.
//!
//! Builds the browse feed and the artwork detail view: filtering, engagement
//! aggregation, and ordering all live here.

use atelier_common::AppResult;
use atelier_db::entities::artwork;
use atelier_db::repositories::{
    artwork::ArtworkFilter, ArtworkRepository, CategoryRepository, CommentRepository,
    LikeRepository, UserRepository,
};
use serde::Serialize;

use super::engagement::CommentResponse;
use super::media::MediaService;

/// Feed ordering. Unrecognized sort keys fall back to newest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSort {
    CreatedAtDesc,
    CreatedAtAsc,
    UpdatedAtDesc,
    UpdatedAtAsc,
    ViewsDesc,
    ViewsAsc,
    LikesDesc,
    LikesAsc,
    CommentsDesc,
    CommentsAsc,
}

impl FeedSort {
    /// Parse a sort key in the `field` / `-field` convention.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("created_at") => Self::CreatedAtAsc,
            Some("updated_at") => Self::UpdatedAtAsc,
            Some("-updated_at") => Self::UpdatedAtDesc,
            Some("views") => Self::ViewsAsc,
            Some("-views") => Self::ViewsDesc,
            Some("likes_count") => Self::LikesAsc,
            Some("-likes_count") => Self::LikesDesc,
            Some("comments_count") => Self::CommentsAsc,
            Some("-comments_count") => Self::CommentsDesc,
            _ => Self::CreatedAtDesc,
        }
    }
}

/// Parameters for the feed listing.
#[derive(Debug, Clone, Default)]
pub struct FeedRequest {
    /// Case-insensitive substring match on title and description.
    pub search: Option<String>,
    /// Category display name.
    pub category: Option<String>,
    /// Style key.
    pub style: Option<String>,
    /// Keep only featured artworks.
    pub featured_only: bool,
    /// Sort key (`-created_at`, `likes_count`, ...).
    pub sort: Option<String>,
}

/// Minimal artist reference embedded in feed responses.
#[derive(Debug, Clone, Serialize)]
pub struct ArtistRef {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
}

/// One artwork row in the feed.
#[derive(Debug, Serialize)]
pub struct ArtworkSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub artist: ArtistRef,
    pub category: Option<String>,
    pub style: String,
    pub image: String,
    pub is_featured: bool,
    pub views: i64,
    pub price: f64,
    pub in_stock: bool,
    pub likes_count: u64,
    pub comments_count: u64,
    pub is_liked: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Full artwork detail.
#[derive(Debug, Serialize)]
pub struct ArtworkDetail {
    pub id: String,
    pub title: String,
    pub description: String,
    pub artist: ArtistRef,
    pub category: Option<String>,
    pub style: String,
    pub image: String,
    pub is_featured: bool,
    pub views: i64,
    pub price: f64,
    pub in_stock: bool,
    pub likes_count: u64,
    pub comments_count: u64,
    pub is_liked: bool,
    pub comments: Vec<CommentResponse>,
    pub created_at: String,
    pub updated_at: String,
}

/// An artwork with its aggregated engagement state.
struct FeedRow {
    model: artwork::Model,
    likes_count: u64,
    comments_count: u64,
    is_liked: bool,
}

/// Order feed rows. Every non-recency sort breaks ties by newest-first so
/// equal rows keep a stable, predictable order.
fn sort_rows(rows: &mut [FeedRow], sort: FeedSort) {
    match sort {
        FeedSort::CreatedAtDesc => {
            rows.sort_by(|a, b| b.model.created_at.cmp(&a.model.created_at));
        }
        FeedSort::CreatedAtAsc => {
            rows.sort_by(|a, b| a.model.created_at.cmp(&b.model.created_at));
        }
        // An artwork never touched since upload sorts by its creation time
        FeedSort::UpdatedAtDesc => rows.sort_by(|a, b| {
            b.model
                .updated_at
                .unwrap_or(b.model.created_at)
                .cmp(&a.model.updated_at.unwrap_or(a.model.created_at))
                .then_with(|| b.model.created_at.cmp(&a.model.created_at))
        }),
        FeedSort::UpdatedAtAsc => rows.sort_by(|a, b| {
            a.model
                .updated_at
                .unwrap_or(a.model.created_at)
                .cmp(&b.model.updated_at.unwrap_or(b.model.created_at))
                .then_with(|| b.model.created_at.cmp(&a.model.created_at))
        }),
        FeedSort::ViewsDesc => rows.sort_by(|a, b| {
            b.model
                .views
                .cmp(&a.model.views)
                .then_with(|| b.model.created_at.cmp(&a.model.created_at))
        }),
        FeedSort::ViewsAsc => rows.sort_by(|a, b| {
            a.model
                .views
                .cmp(&b.model.views)
                .then_with(|| b.model.created_at.cmp(&a.model.created_at))
        }),
        FeedSort::LikesDesc => rows.sort_by(|a, b| {
            b.likes_count
                .cmp(&a.likes_count)
                .then_with(|| b.model.created_at.cmp(&a.model.created_at))
        }),
        FeedSort::LikesAsc => rows.sort_by(|a, b| {
            a.likes_count
                .cmp(&b.likes_count)
                .then_with(|| b.model.created_at.cmp(&a.model.created_at))
        }),
        FeedSort::CommentsDesc => rows.sort_by(|a, b| {
            b.comments_count
                .cmp(&a.comments_count)
                .then_with(|| b.model.created_at.cmp(&a.model.created_at))
        }),
        FeedSort::CommentsAsc => rows.sort_by(|a, b| {
            a.comments_count
                .cmp(&b.comments_count)
                .then_with(|| b.model.created_at.cmp(&a.model.created_at))
        }),
    }
}

/// Service producing the artwork feed and detail views.
#[derive(Clone)]
pub struct FeedService {
    artwork_repo: ArtworkRepository,
    like_repo: LikeRepository,
    comment_repo: CommentRepository,
    user_repo: UserRepository,
    category_repo: CategoryRepository,
    media: MediaService,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(
        artwork_repo: ArtworkRepository,
        like_repo: LikeRepository,
        comment_repo: CommentRepository,
        user_repo: UserRepository,
        category_repo: CategoryRepository,
        media: MediaService,
    ) -> Self {
        Self {
            artwork_repo,
            like_repo,
            comment_repo,
            user_repo,
            category_repo,
            media,
        }
    }

    /// List artworks matching the request, with per-row engagement state.
    ///
    /// `"all"` and empty category/style values mean no filter. A category
    /// name that matches no category selects nothing rather than everything.
    pub async fn list(
        &self,
        viewer_id: Option<&str>,
        req: &FeedRequest,
    ) -> AppResult<Vec<ArtworkSummary>> {
        let category_id = match normalize_filter(req.category.as_deref()) {
            Some(name) => match self.category_repo.find_by_name(name).await? {
                Some(c) => Some(c.id),
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        let filter = ArtworkFilter {
            search: req
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string),
            category_id,
            style: normalize_filter(req.style.as_deref()).map(ToString::to_string),
            featured_only: req.featured_only,
        };

        let models = self.artwork_repo.find_filtered(&filter).await?;

        let mut rows = Vec::with_capacity(models.len());
        for model in models {
            let likes_count = self.like_repo.count_by_artwork(&model.id).await?;
            let comments_count = self.comment_repo.count_by_artwork(&model.id).await?;
            let is_liked = match viewer_id {
                Some(uid) => self.like_repo.has_liked(uid, &model.id).await?,
                None => false,
            };
            rows.push(FeedRow {
                model,
                likes_count,
                comments_count,
                is_liked,
            });
        }

        sort_rows(&mut rows, FeedSort::parse(req.sort.as_deref()));

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            summaries.push(self.summarize(row).await?);
        }
        Ok(summaries)
    }

    /// Get an artwork detail view, bumping its view counter.
    pub async fn detail(
        &self,
        viewer_id: Option<&str>,
        artwork_id: &str,
    ) -> AppResult<ArtworkDetail> {
        let model = self.artwork_repo.get_by_id(artwork_id).await?;
        self.artwork_repo.increment_views(artwork_id).await?;

        let likes_count = self.like_repo.count_by_artwork(artwork_id).await?;
        let is_liked = match viewer_id {
            Some(uid) => self.like_repo.has_liked(uid, artwork_id).await?,
            None => false,
        };

        let comment_models = self.comment_repo.find_by_artwork(artwork_id).await?;
        let comments_count = comment_models.len() as u64;
        let mut comments = Vec::with_capacity(comment_models.len());
        for c in comment_models {
            let author = self.artist_ref(&c.user_id).await?;
            comments.push(CommentResponse {
                id: c.id,
                artwork_id: c.artwork_id,
                user: author,
                text: c.text,
                created_at: c.created_at.to_rfc3339(),
            });
        }

        let artist = self.artist_ref(&model.user_id).await?;
        let category = self.category_name(model.category_id.as_deref()).await?;

        Ok(ArtworkDetail {
            id: model.id,
            title: model.title,
            description: model.description,
            artist,
            category,
            style: model.style,
            image: self.media.public_url(&model.image_key),
            is_featured: model.is_featured,
            // The atomic bump already happened; reflect it without re-reading
            views: model.views + 1,
            price: model.price.unwrap_or(0.0),
            in_stock: model.in_stock,
            likes_count,
            comments_count,
            is_liked,
            comments,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model
                .updated_at
                .unwrap_or(model.created_at)
                .to_rfc3339(),
        })
    }

    async fn summarize(&self, row: FeedRow) -> AppResult<ArtworkSummary> {
        let artist = self.artist_ref(&row.model.user_id).await?;
        let category = self.category_name(row.model.category_id.as_deref()).await?;

        Ok(ArtworkSummary {
            id: row.model.id,
            title: row.model.title,
            description: row.model.description,
            artist,
            category,
            style: row.model.style,
            image: self.media.public_url(&row.model.image_key),
            is_featured: row.model.is_featured,
            views: row.model.views,
            price: row.model.price.unwrap_or(0.0),
            in_stock: row.model.in_stock,
            likes_count: row.likes_count,
            comments_count: row.comments_count,
            is_liked: row.is_liked,
            created_at: row.model.created_at.to_rfc3339(),
            updated_at: row
                .model
                .updated_at
                .unwrap_or(row.model.created_at)
                .to_rfc3339(),
        })
    }

    async fn artist_ref(&self, user_id: &str) -> AppResult<ArtistRef> {
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

    async fn category_name(&self, category_id: Option<&str>) -> AppResult<Option<String>> {
        match category_id {
            Some(id) => Ok(self.category_repo.find_by_id(id).await?.map(|c| c.name)),
            None => Ok(None),
        }
    }
}

/// Treat `"all"` and blank filter values as absent.
fn normalize_filter(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use atelier_common::LocalStorage;
    use atelier_db::entities::{user, user_profile};
    use chrono::{Duration, Utc};
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn service(db: Arc<DatabaseConnection>) -> FeedService {
        let media = MediaService::new(Arc::new(LocalStorage::new(
            PathBuf::from("/tmp/atelier-test"),
            "/media".to_string(),
        )));
        FeedService::new(
            ArtworkRepository::new(Arc::clone(&db)),
            LikeRepository::new(Arc::clone(&db)),
            CommentRepository::new(Arc::clone(&db)),
            UserRepository::new(Arc::clone(&db)),
            CategoryRepository::new(db),
            media,
        )
    }

    fn row(id: &str, title: &str, views: i64, likes: u64, comments: u64, age_secs: i64) -> FeedRow {
        FeedRow {
            model: artwork::Model {
                id: id.to_string(),
                user_id: "u1".to_string(),
                category_id: None,
                title: title.to_string(),
                description: String::new(),
                style: "abstract".to_string(),
                image_key: format!("artworks/{id}.jpg"),
                is_featured: false,
                views,
                price: None,
                in_stock: true,
                created_at: (Utc::now() - Duration::seconds(age_secs)).into(),
                updated_at: None,
            },
            likes_count: likes,
            comments_count: comments,
            is_liked: false,
        }
    }

    fn ids(rows: &[FeedRow]) -> Vec<&str> {
        rows.iter().map(|r| r.model.id.as_str()).collect()
    }

    #[test]
    fn test_parse_unknown_sort_falls_back_to_newest() {
        assert_eq!(FeedSort::parse(Some("bogus")), FeedSort::CreatedAtDesc);
        assert_eq!(FeedSort::parse(Some("-created_at")), FeedSort::CreatedAtDesc);
        assert_eq!(FeedSort::parse(None), FeedSort::CreatedAtDesc);
        assert_eq!(FeedSort::parse(Some("-likes_count")), FeedSort::LikesDesc);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut rows = vec![row("old", "a", 0, 0, 0, 300), row("new", "b", 0, 0, 0, 10)];
        sort_rows(&mut rows, FeedSort::CreatedAtDesc);
        assert_eq!(ids(&rows), vec!["new", "old"]);
    }

    #[test]
    fn test_sort_by_likes_breaks_ties_by_recency() {
        let mut rows = vec![
            row("a", "a", 0, 2, 0, 300),
            row("b", "b", 0, 5, 0, 200),
            row("c", "c", 0, 2, 0, 100),
        ];
        sort_rows(&mut rows, FeedSort::LikesDesc);
        // b wins on likes; a and c tie on likes and order by recency
        assert_eq!(ids(&rows), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_by_views_desc() {
        let mut rows = vec![
            row("a", "a", 10, 0, 0, 100),
            row("b", "b", 50, 0, 0, 200),
            row("c", "c", 30, 0, 0, 300),
        ];
        sort_rows(&mut rows, FeedSort::ViewsDesc);
        assert_eq!(ids(&rows), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_parse_title_is_not_a_sort_key() {
        assert_eq!(FeedSort::parse(Some("title")), FeedSort::CreatedAtDesc);
        assert_eq!(FeedSort::parse(Some("-title")), FeedSort::CreatedAtDesc);
    }

    #[test]
    fn test_sort_by_comments_asc() {
        let mut rows = vec![
            row("a", "a", 0, 0, 7, 100),
            row("b", "b", 0, 0, 1, 200),
        ];
        sort_rows(&mut rows, FeedSort::CommentsAsc);
        assert_eq!(ids(&rows), vec!["b", "a"]);
    }

    #[test]
    fn test_sort_by_updated_at_falls_back_to_created_at() {
        let mut touched = row("touched", "a", 0, 0, 0, 600);
        touched.model.updated_at = Some(Utc::now().into());
        let mut rows = vec![touched, row("untouched", "b", 0, 0, 0, 300)];
        sort_rows(&mut rows, FeedSort::UpdatedAtDesc);
        assert_eq!(ids(&rows), vec!["touched", "untouched"]);
    }

    #[tokio::test]
    async fn test_untouched_artwork_reports_creation_time_as_updated_at() {
        let model = row("a1", "Dawn", 0, 0, 0, 60).model;
        let artist = user::Model {
            id: "u1".to_string(),
            username: "maya".to_string(),
            username_lower: "maya".to_string(),
            email: "maya@example.com".to_string(),
            password_hash: "hash".to_string(),
            token: None,
            is_staff: false,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[model]])
                .append_query_results([[btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0)),
                }]])
                .append_query_results([[btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0)),
                }]])
                .append_query_results([[artist]])
                .append_query_results([Vec::<user_profile::Model>::new()])
                .into_connection(),
        );

        let summaries = service(db)
            .list(None, &FeedRequest::default())
            .await
            .unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].updated_at, summaries[0].created_at);

        // The wire field is always a timestamp string
        let json = serde_json::to_value(&summaries[0]).unwrap();
        assert!(json["updated_at"].is_string());
    }

    #[test]
    fn test_normalize_filter_treats_all_as_absent() {
        assert_eq!(normalize_filter(Some("all")), None);
        assert_eq!(normalize_filter(Some("ALL")), None);
        assert_eq!(normalize_filter(Some("  ")), None);
        assert_eq!(normalize_filter(Some("abstract")), Some("abstract"));
        assert_eq!(normalize_filter(None), None);
    }
}
