//! Create artwork table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Artwork::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Artwork::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Artwork::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Artwork::CategoryId).string_len(32))
                    .col(ColumnDef::new(Artwork::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Artwork::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Artwork::Style).string_len(32).not_null())
                    .col(ColumnDef::new(Artwork::ImageKey).string_len(512).not_null())
                    .col(ColumnDef::new(Artwork::IsFeatured).boolean().not_null().default(false))
                    .col(ColumnDef::new(Artwork::Views).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Artwork::Price).double())
                    .col(ColumnDef::new(Artwork::InStock).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Artwork::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Artwork::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Foreign key: user_id -> user.id
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_artwork_user_id")
                    .from(Artwork::Table, Artwork::UserId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        // Foreign key: category_id -> category.id
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_artwork_category_id")
                    .from(Artwork::Table, Artwork::CategoryId)
                    .to(Category::Table, Category::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        // Index: user_id for per-artist listings
        manager
            .create_index(
                Index::create()
                    .name("idx_artwork_user_id")
                    .table(Artwork::Table)
                    .col(Artwork::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: category_id for feed filtering
        manager
            .create_index(
                Index::create()
                    .name("idx_artwork_category_id")
                    .table(Artwork::Table)
                    .col(Artwork::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at for recency ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_artwork_created_at")
                    .table(Artwork::Table)
                    .col(Artwork::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Artwork::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Artwork {
    Table,
    Id,
    UserId,
    CategoryId,
    Title,
    Description,
    Style,
    ImageKey,
    IsFeatured,
    Views,
    Price,
    InStock,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
}
