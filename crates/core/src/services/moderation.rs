//! Moderation service: abuse reports and admin queries.

use atelier_common::{id::IdGenerator, AppError, AppResult};
use atelier_db::entities::report::{self, ReportReason};
use atelier_db::repositories::{
    ArtworkRepository, CommentRepository, LikeRepository, ReportRepository, UserRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use super::account::UserResponse;
use super::media::MediaService;

/// Input for submitting a report.
#[derive(Debug, Deserialize)]
pub struct SubmitReportInput {
    #[serde(default)]
    pub artwork_id: Option<String>,
    #[serde(default)]
    pub comment_id: Option<String>,
    pub reason: ReportReason,
    #[serde(default)]
    pub description: Option<String>,
}

/// Action taken on a report by staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportAction {
    /// Dismiss the report, keeping the content.
    Resolve,
    /// Remove the reported artwork.
    DeleteArtwork,
    /// Remove the reported comment.
    DeleteComment,
}

/// Input carrying a report action.
#[derive(Debug, Deserialize)]
pub struct ReportActionInput {
    pub action: ReportAction,
}

/// A report as shown to staff.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub id: String,
    pub reporter_username: String,
    pub artwork_id: Option<String>,
    pub comment_id: Option<String>,
    pub reason: ReportReason,
    pub description: String,
    pub resolved: bool,
    pub created_at: String,
}

/// Instance-wide counters for the admin dashboard.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub users: u64,
    pub artworks: u64,
    pub likes: u64,
    pub comments: u64,
    pub unresolved_reports: u64,
}

/// Service for abuse reports and admin operations.
#[derive(Clone)]
pub struct ModerationService {
    report_repo: ReportRepository,
    artwork_repo: ArtworkRepository,
    comment_repo: CommentRepository,
    like_repo: LikeRepository,
    user_repo: UserRepository,
    media: MediaService,
    id_gen: IdGenerator,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub fn new(
        report_repo: ReportRepository,
        artwork_repo: ArtworkRepository,
        comment_repo: CommentRepository,
        like_repo: LikeRepository,
        user_repo: UserRepository,
        media: MediaService,
    ) -> Self {
        Self {
            report_repo,
            artwork_repo,
            comment_repo,
            like_repo,
            user_repo,
            media,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a report against an artwork or a comment.
    pub async fn submit_report(
        &self,
        reporter_id: &str,
        input: SubmitReportInput,
    ) -> AppResult<ReportResponse> {
        match (input.artwork_id.as_deref(), input.comment_id.as_deref()) {
            (Some(artwork_id), None) => {
                self.artwork_repo.get_by_id(artwork_id).await?;
            }
            (None, Some(comment_id)) => {
                self.comment_repo.get_by_id(comment_id).await?;
            }
            _ => {
                return Err(AppError::BadRequest(
                    "Report exactly one of artwork_id or comment_id".to_string(),
                ));
            }
        }

        let model = report::ActiveModel {
            id: Set(self.id_gen.generate()),
            reporter_id: Set(reporter_id.to_string()),
            artwork_id: Set(input.artwork_id),
            comment_id: Set(input.comment_id),
            reason: Set(input.reason),
            description: Set(input.description.unwrap_or_default()),
            resolved: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        let created = self.report_repo.create(model).await?;
        self.to_response(created).await
    }

    /// List reports for the moderation queue, newest first.
    pub async fn list_reports(&self, unresolved_only: bool) -> AppResult<Vec<ReportResponse>> {
        let reports = self.report_repo.find_all(unresolved_only).await?;
        let mut out = Vec::with_capacity(reports.len());
        for r in reports {
            out.push(self.to_response(r).await?);
        }
        Ok(out)
    }

    /// Apply a staff action to a report and mark it resolved.
    pub async fn act_on_report(
        &self,
        report_id: &str,
        input: ReportActionInput,
    ) -> AppResult<ReportResponse> {
        let report = self.report_repo.get_by_id(report_id).await?;

        match input.action {
            ReportAction::Resolve => {}
            ReportAction::DeleteArtwork => {
                let Some(artwork_id) = report.artwork_id.as_deref() else {
                    return Err(AppError::BadRequest(
                        "Report does not reference an artwork".to_string(),
                    ));
                };
                // The artwork may already be gone; that still resolves the report
                if let Some(artwork) = self.artwork_repo.find_by_id(artwork_id).await? {
                    self.artwork_repo.delete(artwork_id).await?;
                    if let Err(e) = self.media.delete(&artwork.image_key).await {
                        tracing::warn!(key = %artwork.image_key, error = %e, "Failed to delete reported image");
                    }
                }
            }
            ReportAction::DeleteComment => {
                let Some(comment_id) = report.comment_id.as_deref() else {
                    return Err(AppError::BadRequest(
                        "Report does not reference a comment".to_string(),
                    ));
                };
                if self.comment_repo.find_by_id(comment_id).await?.is_some() {
                    self.comment_repo.delete(comment_id).await?;
                }
            }
        }

        let mut active: report::ActiveModel = report.into();
        active.resolved = Set(true);
        let updated = self.report_repo.update(active).await?;

        self.to_response(updated).await
    }

    /// List users for the admin panel.
    pub async fn list_users(&self, limit: u64, offset: u64) -> AppResult<Vec<UserResponse>> {
        let users = self.user_repo.find_with_pagination(limit, offset).await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Enable or disable an account.
    pub async fn set_user_active(&self, user_id: &str, active: bool) -> AppResult<UserResponse> {
        let user = self.user_repo.get_by_id(user_id).await?;

        if user.is_staff && !active {
            return Err(AppError::Forbidden(
                "Staff accounts cannot be disabled".to_string(),
            ));
        }

        let mut model: atelier_db::entities::user::ActiveModel = user.into();
        model.is_active = Set(active);
        if !active {
            // Disabling also closes any open session
            model.token = Set(None);
        }
        let updated = self.user_repo.update(model).await?;
        Ok(updated.into())
    }

    /// Instance-wide counters.
    pub async fn stats(&self) -> AppResult<StatsResponse> {
        Ok(StatsResponse {
            users: self.user_repo.count().await?,
            artworks: self.artwork_repo.count().await?,
            likes: self.like_repo.count().await?,
            comments: self.comment_repo.count().await?,
            unresolved_reports: self.report_repo.count_unresolved().await?,
        })
    }

    async fn to_response(&self, r: report::Model) -> AppResult<ReportResponse> {
        let reporter_username = self
            .user_repo
            .find_by_id(&r.reporter_id)
            .await?
            .map_or_else(|| "deleted".to_string(), |u| u.username);

        Ok(ReportResponse {
            id: r.id,
            reporter_username,
            artwork_id: r.artwork_id,
            comment_id: r.comment_id,
            reason: r.reason,
            description: r.description,
            resolved: r.resolved,
            created_at: r.created_at.to_rfc3339(),
        })
    }
}
