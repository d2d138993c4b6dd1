//! Migration to create the singleton settings tables.
//!
//! Both tables hold exactly one row with id 1; the application seeds it on
//! startup.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CompanySettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompanySettings::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CompanySettings::CompanyName)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CompanySettings::Address)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(CompanySettings::Phone).text().null())
                    .col(ColumnDef::new(CompanySettings::Fax).text().null())
                    .col(ColumnDef::new(CompanySettings::Email).text().null())
                    .col(ColumnDef::new(CompanySettings::BusinessHours).text().null())
                    .col(ColumnDef::new(CompanySettings::CeoName).text().null())
                    .col(
                        ColumnDef::new(CompanySettings::CeoMessage)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CompanySettings::UpdatedAt)
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
                    .table(HomeSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HomeSettings::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HomeSettings::BannerTitle)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(HomeSettings::BannerSubtitle).text().null())
                    .col(ColumnDef::new(HomeSettings::BannerImageUrl).text().null())
                    .col(ColumnDef::new(HomeSettings::Content).json_binary().not_null())
                    .col(
                        ColumnDef::new(HomeSettings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HomeSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CompanySettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CompanySettings {
    Table,
    Id,
    CompanyName,
    Address,
    Phone,
    Fax,
    Email,
    BusinessHours,
    CeoName,
    CeoMessage,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum HomeSettings {
    Table,
    Id,
    BannerTitle,
    BannerSubtitle,
    BannerImageUrl,
    Content,
    UpdatedAt,
}
