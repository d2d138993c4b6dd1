//! Registers an auth service user as a site admin, or updates the existing
//! admin row for that user. Pending migrations are applied first, so it also
//! works against a database the server has never touched.

use anyhow::{Context, Result};
use clap::Parser;
use corpsite::{
    config::ConfigLoader,
    db,
    migration::{Migrator, MigratorTrait},
    models::admin::{AdminForm, DEFAULT_ROLE},
    seeds,
};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(about = "Grant admin access to an auth service user")]
struct Args {
    /// Auth service user id (the `sub` claim of the user's session token)
    #[arg(long)]
    user_id: Uuid,

    #[arg(long)]
    email: String,

    /// Display name; defaults to the email address
    #[arg(long)]
    name: Option<String>,

    #[arg(long, default_value = DEFAULT_ROLE)]
    role: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ConfigLoader::new()
        .load()
        .context("loading configuration")?;
    let db = db::init_pool(&config)
        .await
        .context("initializing database connection pool")?;
    Migrator::up(&db, None)
        .await
        .context("running database migrations")?;

    let form = AdminForm {
        id: args.user_id,
        name: args.name.unwrap_or_else(|| args.email.clone()),
        email: args.email,
        role: args.role,
    };

    let saved = seeds::grant_admin(&db, form).await?;

    println!(
        "{} is an admin ({}) with role '{}'",
        saved.email, saved.id, saved.role
    );
    Ok(())
}
