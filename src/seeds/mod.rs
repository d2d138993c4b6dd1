//! Database seeding functionality
//!
//! Ensures the singleton settings rows exist once migrations have run, so the
//! first public request never has to create them, and registers admins from
//! the command line.

use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;

use crate::models::admin::{self, AdminForm};
use crate::models::{company_settings, home_settings};
use crate::repositories::{ContentRepository, SettingsRepository};

/// Seeds the company and home settings rows if they are missing.
///
/// Running it against an already seeded database changes nothing.
pub async fn seed_settings(db: &DatabaseConnection) -> Result<()> {
    let company = SettingsRepository::<company_settings::Entity>::new(db)
        .get()
        .await
        .context("seeding company settings")?;
    log::info!("Company settings present (id {})", company.id);

    let home = SettingsRepository::<home_settings::Entity>::new(db)
        .get()
        .await
        .context("seeding home settings")?;
    log::info!("Home settings present (id {})", home.id);

    Ok(())
}

/// Creates the admin row for `form.id`, or overwrites it if the user is
/// already an admin.
pub async fn grant_admin(db: &DatabaseConnection, form: AdminForm) -> Result<admin::Model> {
    let repo = ContentRepository::<admin::Entity>::new(db);
    let existing = repo.get(form.id).await.context("looking up admin")?;
    let saved = match existing {
        Some(_) => repo
            .update(form.id, form)
            .await
            .context("updating admin")?,
        None => repo.create(form).await.context("creating admin")?,
    };
    log::info!("Granted admin role '{}' to {}", saved.role, saved.id);
    Ok(saved)
}
