//! # Server Configuration
//!
//! Application state, router assembly and the OpenAPI document.

use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    http::HeaderValue,
    middleware,
    routing::get,
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::auth_middleware;
use crate::config::AppConfig;
use crate::handlers;
use crate::history::HistoryStore;
use crate::locale::locale_fallback;
use crate::sanitize::HtmlSanitizer;
use crate::telemetry::trace_id_middleware;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub sanitizer: Arc<dyn HtmlSanitizer>,
    pub history: Arc<HistoryStore>,
}

impl AppState {
    /// Builds the state; fails only if the configured sanitizer cannot be
    /// constructed.
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Result<Self, regex::Error> {
        let sanitizer = config.sanitizer.build()?;
        let history = Arc::new(HistoryStore::new(config.history_file.clone()));
        Ok(Self {
            config: Arc::new(config),
            db,
            sanitizer,
            history,
        })
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.config)
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let admin = handlers::admin::router().layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/api/info", get(handlers::info))
        .route(
            "/api/history",
            get(handlers::history::get_history).post(handlers::history::save_history),
        )
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .nest("/api/admin", admin)
        .merge(handlers::pages::router())
        .fallback(locale_fallback)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id_middleware))
        .layer(cors)
}

/// Cross-origin access is only granted to configured origins.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let addr = config.bind_addr()?;
    let profile = config.profile.clone();
    let state = AppState::new(config, db)?;
    tracing::info!(
        sanitizer = %state.sanitizer.backend(),
        history_file = %state.history.path().display(),
        "application state ready"
    );
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}

/// Registers the admin session scheme referenced by `security(("session" = []))`.
struct SessionSecurity;

impl Modify for SessionSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::info,
        crate::handlers::healthz,
        crate::handlers::readyz,
        crate::handlers::history::get_history,
        crate::handlers::history::save_history,
        crate::handlers::pages::home,
        crate::handlers::pages::notices,
        crate::handlers::pages::notice_detail,
        crate::handlers::pages::products,
        crate::handlers::pages::product_detail,
        crate::handlers::pages::partners,
        crate::handlers::pages::facilities,
        crate::handlers::pages::company,
        crate::handlers::admin::current_session,
        crate::handlers::admin::get_company_settings,
        crate::handlers::admin::put_company_settings,
        crate::handlers::admin::get_home_settings,
        crate::handlers::admin::put_home_settings,
        crate::handlers::admin::notice_categories::list,
        crate::handlers::admin::notice_categories::fetch,
        crate::handlers::admin::notice_categories::create,
        crate::handlers::admin::notice_categories::update,
        crate::handlers::admin::notice_categories::remove,
        crate::handlers::admin::notices::list,
        crate::handlers::admin::notices::fetch,
        crate::handlers::admin::notices::create,
        crate::handlers::admin::notices::update,
        crate::handlers::admin::notices::remove,
        crate::handlers::admin::partners::list,
        crate::handlers::admin::partners::fetch,
        crate::handlers::admin::partners::create,
        crate::handlers::admin::partners::update,
        crate::handlers::admin::partners::remove,
        crate::handlers::admin::facilities::list,
        crate::handlers::admin::facilities::fetch,
        crate::handlers::admin::facilities::create,
        crate::handlers::admin::facilities::update,
        crate::handlers::admin::facilities::remove,
        crate::handlers::admin::products::list,
        crate::handlers::admin::products::fetch,
        crate::handlers::admin::products::create,
        crate::handlers::admin::products::update,
        crate::handlers::admin::products::remove,
        crate::handlers::admin::admins::list,
        crate::handlers::admin::admins::fetch,
        crate::handlers::admin::admins::create,
        crate::handlers::admin::admins::update,
        crate::handlers::admin::admins::remove,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::handlers::HealthStatus,
            crate::handlers::SuccessResponse,
            crate::error::ApiError,
            crate::auth::AdminSession,
            crate::models::admin::Model,
            crate::models::admin::AdminForm,
            crate::models::notice_category::Model,
            crate::models::notice_category::NoticeCategoryForm,
            crate::models::notice::Model,
            crate::models::notice::NoticeForm,
            crate::models::partner::Model,
            crate::models::partner::PartnerForm,
            crate::models::facility::Model,
            crate::models::facility::FacilityForm,
            crate::models::product::Model,
            crate::models::product::ProductFields,
            crate::models::product::ProductForm,
            crate::models::company_settings::Model,
            crate::models::company_settings::CompanySettingsForm,
            crate::models::home_settings::Model,
            crate::models::home_settings::HomeSettingsForm,
            crate::repositories::ProductRecord,
            crate::repositories::ProductDetail,
            crate::handlers::pages::HomePage,
            crate::handlers::pages::NoticeListPage,
            crate::handlers::pages::NoticePage,
            crate::handlers::pages::ProductListPage,
            crate::handlers::pages::ProductPage,
            crate::handlers::pages::PartnerListPage,
            crate::handlers::pages::FacilityListPage,
            crate::handlers::pages::CompanyPage,
        )
    ),
    modifiers(&SessionSecurity),
    tags(
        (name = "root", description = "Service information and health checks"),
        (name = "pages", description = "Localized public page payloads"),
        (name = "admin", description = "Content management, admin session required"),
        (name = "history", description = "Company history document")
    ),
    info(
        title = "Corpsite API",
        description = "Corporate site pages and content management",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
