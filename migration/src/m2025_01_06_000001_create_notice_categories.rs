//! Migration to create the notice_categories table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NoticeCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NoticeCategories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NoticeCategories::Name).text().not_null())
                    .col(
                        ColumnDef::new(NoticeCategories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NoticeCategories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum NoticeCategories {
    Table,
    Id,
    Name,
    CreatedAt,
}
