//! Artwork entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Artwork entity - an uploaded creative work with metadata.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artwork")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning artist.
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Category reference; nulled when the category is deleted.
    #[sea_orm(indexed, nullable)]
    pub category_id: Option<String>,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Style tag, one of the fixed set validated at the service layer.
    pub style: String,

    /// Storage key of the artwork image.
    pub image_key: String,

    /// Staff-curated flag.
    #[sea_orm(default_value = false)]
    pub is_featured: bool,

    /// Monotonic view counter; incremented by exactly 1 per detail fetch.
    #[sea_orm(default_value = 0)]
    pub views: i64,

    /// Optional non-negative listing price.
    #[sea_orm(nullable)]
    pub price: Option<f64>,

    #[sea_orm(default_value = true)]
    pub in_stock: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(has_many = "super::like::Entity")]
    Likes,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
