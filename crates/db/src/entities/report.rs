//! Abuse report entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reason given by the reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ReportReason {
    #[sea_orm(string_value = "inappropriate")]
    Inappropriate,
    #[sea_orm(string_value = "spam")]
    Spam,
    #[sea_orm(string_value = "copyright")]
    Copyright,
    #[sea_orm(string_value = "other")]
    #[default]
    Other,
}

/// Abuse report against an artwork or a comment.
///
/// Deleting the reported artwork or comment nulls the reference here; the
/// report itself survives for the moderation trail.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user who submitted the report.
    pub reporter_id: String,

    /// Reported artwork, if any.
    #[sea_orm(nullable)]
    pub artwork_id: Option<String>,

    /// Reported comment, if any.
    #[sea_orm(nullable)]
    pub comment_id: Option<String>,

    pub reason: ReportReason,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(default_value = false)]
    pub resolved: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReporterId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Reporter,
    #[sea_orm(
        belongs_to = "super::artwork::Entity",
        from = "Column::ArtworkId",
        to = "super::artwork::Column::Id",
        on_delete = "SetNull"
    )]
    Artwork,
    #[sea_orm(
        belongs_to = "super::comment::Entity",
        from = "Column::CommentId",
        to = "super::comment::Column::Id",
        on_delete = "SetNull"
    )]
    Comment,
}

impl ActiveModelBehavior for ActiveModel {}
