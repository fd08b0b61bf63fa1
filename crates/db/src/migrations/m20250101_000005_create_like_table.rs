//! Create like table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Like::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Like::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Like::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Like::ArtworkId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Like::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Foreign key: user_id -> user.id
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_like_user_id")
                    .from(Like::Table, Like::UserId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        // Foreign key: artwork_id -> artwork.id
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_like_artwork_id")
                    .from(Like::Table, Like::ArtworkId)
                    .to(Artwork::Table, Artwork::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        // Unique index: one like per (user, artwork)
        manager
            .create_index(
                Index::create()
                    .name("idx_like_user_id_artwork_id")
                    .table(Like::Table)
                    .col(Like::UserId)
                    .col(Like::ArtworkId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: artwork_id for per-artwork counts
        manager
            .create_index(
                Index::create()
                    .name("idx_like_artwork_id")
                    .table(Like::Table)
                    .col(Like::ArtworkId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Like::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Like {
    Table,
    Id,
    UserId,
    ArtworkId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Artwork {
    Table,
    Id,
}
