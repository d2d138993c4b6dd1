//! Migration to create the notices table.
//!
//! Notices reference a category; removing the category keeps the notice and
//! clears the reference.

use sea_orm_migration::prelude::*;

use super::m2025_01_06_000001_create_notice_categories::NoticeCategories;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notices::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notices::Title).text().not_null())
                    .col(ColumnDef::new(Notices::Body).text().not_null())
                    .col(ColumnDef::new(Notices::CategoryId).big_integer().null())
                    .col(
                        ColumnDef::new(Notices::Published)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Notices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notices_category_id")
                            .from(Notices::Table, Notices::CategoryId)
                            .to(NoticeCategories::Table, NoticeCategories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notices_published_created_at")
                    .table(Notices::Table)
                    .col(Notices::Published)
                    .col(Notices::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notices::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Notices {
    Table,
    Id,
    Title,
    Body,
    CategoryId,
    Published,
    CreatedAt,
    UpdatedAt,
}
