//! # API Handlers
//!
//! HTTP endpoints: public localized pages, the admin API, the history
//! document, and health checks.

use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::config::AppConfig;
use crate::db;
use crate::error::ApiError;
use crate::models::ServiceInfo;
use crate::server::AppState;

pub mod admin;
pub mod history;
pub mod pages;
pub mod types;

pub use types::{HealthStatus, SuccessResponse};

/// Service name, version and locale setup
#[utoipa::path(
    get,
    path = "/api/info",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn info(State(config): State<Arc<AppConfig>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        locales: config.locales.supported.clone(),
        default_locale: config.locales.default.clone(),
        ..ServiceInfo::default()
    })
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Process is up", body = HealthStatus)
    ),
    tag = "root"
)]
pub async fn healthz() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}

/// Readiness check; pings the content store
#[utoipa::path(
    get,
    path = "/readyz",
    responses(
        (status = 200, description = "Content store reachable", body = HealthStatus),
        (status = 503, description = "Content store unreachable", body = ApiError)
    ),
    tag = "root"
)]
pub async fn readyz(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    db::health_check(&state.db).await.map_err(|err| {
        tracing::warn!(error = %err, "readiness check failed");
        ApiError::new(
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            "Content store unavailable",
        )
    })?;
    Ok(Json(HealthStatus::ok()))
}
