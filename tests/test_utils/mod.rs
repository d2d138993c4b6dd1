//! Test utilities shared by the integration tests.
//!
//! In-memory SQLite with migrations applied, an app wired to it, and helpers
//! for minting session tokens and reading responses.

#![allow(dead_code)]

use anyhow::Result;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use corpsite::{
    config::AppConfig,
    models::admin::{self, AdminForm},
    repositories::ContentRepository,
    server::{AppState, create_app},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// A router over a fresh database, plus the handles tests poke at directly.
pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub config: AppConfig,
    /// Holds the history file; removed on drop.
    pub data_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        Self::with_config(AppConfig::default()).await
    }

    pub async fn with_config(config: AppConfig) -> Result<Self> {
        let db = setup_test_db().await?;
        let data_dir = TempDir::new()?;
        let config = AppConfig {
            auth_jwt_secret: Some(JWT_SECRET.to_string()),
            history_file: data_dir.path().join("history.json"),
            ..config
        };
        let state = AppState::new(config.clone(), db.clone())?;

        Ok(Self {
            router: create_app(state),
            db,
            config,
            data_dir,
        })
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Registers `id` as an admin and returns a bearer token for it.
    pub async fn admin_token(&self, id: Uuid) -> Result<String> {
        ContentRepository::<admin::Entity>::new(&self.db)
            .create(AdminForm {
                id,
                name: "Test Admin".to_string(),
                email: format!("{id}@example.com"),
                role: "admin".to_string(),
            })
            .await?;
        Ok(mint_token(id, &self.config.auth_jwt_audience))
    }
}

/// Signs a session token as the auth service would.
pub fn mint_token(sub: Uuid, audience: &str) -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    encode(
        &Header::new(Algorithm::HS256),
        &json!({ "sub": sub, "aud": audience, "exp": exp, "email": "admin@example.com" }),
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("token encodes")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

/// JSON request with an optional bearer token.
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request builds")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is JSON")
}
