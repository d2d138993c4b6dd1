//! Migration to create the products table and its link tables.
//!
//! `product_partners` and `product_notices` hold the many-to-many references
//! from a product to partners and notices. Link rows cascade with either side.

use sea_orm_migration::prelude::*;

use super::m2025_01_06_000002_create_notices::Notices;
use super::m2025_01_06_000003_create_partners::Partners;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Name).text().not_null())
                    .col(
                        ColumnDef::new(Products::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Products::Category).text().null())
                    .col(ColumnDef::new(Products::Images).json_binary().not_null())
                    .col(
                        ColumnDef::new(Products::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Products::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductPartners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductPartners::ProductId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductPartners::PartnerId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ProductPartners::ProductId)
                            .col(ProductPartners::PartnerId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_partners_product_id")
                            .from(ProductPartners::Table, ProductPartners::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_partners_partner_id")
                            .from(ProductPartners::Table, ProductPartners::PartnerId)
                            .to(Partners::Table, Partners::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductNotices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductNotices::ProductId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductNotices::NoticeId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ProductNotices::ProductId)
                            .col(ProductNotices::NoticeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_notices_product_id")
                            .from(ProductNotices::Table, ProductNotices::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_notices_notice_id")
                            .from(ProductNotices::Table, ProductNotices::NoticeId)
                            .to(Notices::Table, Notices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductNotices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProductPartners::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    Description,
    Category,
    Images,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProductPartners {
    Table,
    ProductId,
    PartnerId,
}

#[derive(DeriveIden)]
enum ProductNotices {
    Table,
    ProductId,
    NoticeId,
}
