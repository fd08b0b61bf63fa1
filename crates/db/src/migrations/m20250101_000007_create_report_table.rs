//! Create report table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Report::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Report::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Report::ReporterId).string_len(32).not_null())
                    .col(ColumnDef::new(Report::ArtworkId).string_len(32))
                    .col(ColumnDef::new(Report::CommentId).string_len(32))
                    .col(ColumnDef::new(Report::Reason).string_len(32).not_null())
                    .col(ColumnDef::new(Report::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Report::Resolved).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Report::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Foreign key: reporter_id -> user.id
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_report_reporter_id")
                    .from(Report::Table, Report::ReporterId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        // Foreign key: artwork_id -> artwork.id; keep the report when the
        // artwork is removed.
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_report_artwork_id")
                    .from(Report::Table, Report::ArtworkId)
                    .to(Artwork::Table, Artwork::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        // Foreign key: comment_id -> comment.id
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_report_comment_id")
                    .from(Report::Table, Report::CommentId)
                    .to(Comment::Table, Comment::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        // Index: resolved for the moderation queue
        manager
            .create_index(
                Index::create()
                    .name("idx_report_resolved")
                    .table(Report::Table)
                    .col(Report::Resolved)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Report::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Report {
    Table,
    Id,
    ReporterId,
    ArtworkId,
    CommentId,
    Reason,
    Description,
    Resolved,
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

#[derive(Iden)]
enum Comment {
    Table,
    Id,
}
