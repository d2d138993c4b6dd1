//! Database migrations for the corporate site.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_01_06_000001_create_notice_categories;
mod m2025_01_06_000002_create_notices;
mod m2025_01_06_000003_create_partners;
mod m2025_01_06_000004_create_facilities;
mod m2025_01_06_000005_create_products;
mod m2025_01_06_000006_create_settings;
mod m2025_01_06_000007_create_admins;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_01_06_000001_create_notice_categories::Migration),
            Box::new(m2025_01_06_000002_create_notices::Migration),
            Box::new(m2025_01_06_000003_create_partners::Migration),
            Box::new(m2025_01_06_000004_create_facilities::Migration),
            Box::new(m2025_01_06_000005_create_products::Migration),
            Box::new(m2025_01_06_000006_create_settings::Migration),
            Box::new(m2025_01_06_000007_create_admins::Migration),
        ]
    }
}
