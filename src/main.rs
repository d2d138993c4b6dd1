//! # Corpsite Main Entry Point
//!
//! Loads configuration, prepares the database and serves the API.

use anyhow::Context;
use corpsite::{
    config::ConfigLoader,
    db,
    migration::{Migrator, MigratorTrait},
    seeds, server::run_server, telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from layered env files and variables
    let config = ConfigLoader::new()
        .load()
        .context("loading configuration")?;

    telemetry::init_tracing(&config).context("initializing tracing")?;

    tracing::info!(profile = %config.profile, "configuration loaded");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "effective configuration");
    }

    let db = db::init_pool(&config)
        .await
        .context("initializing database connection pool")?;
    Migrator::up(&db, None)
        .await
        .context("running database migrations")?;
    seeds::seed_settings(&db).await?;

    run_server(config, db).await
}
