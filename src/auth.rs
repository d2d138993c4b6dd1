//! # Admin Session Authentication
//!
//! Identity is issued by an external auth service as HS256-signed session
//! tokens. Admin requests carry the token in the session cookie or in an
//! `Authorization: Bearer` header. The token's `sub` must match a row of the
//! `admins` table.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{ApiError, forbidden, unauthorized};
use crate::models::admin;
use crate::repositories::ContentRepository;
use crate::server::AppState;

/// Claims read from the auth service's session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Auth service user id
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: u64,
}

/// The authenticated admin behind the current request.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminSession {
    pub admin: admin::Model,
    /// Email as asserted by the auth service
    pub session_email: Option<String>,
}

/// Middleware guarding `/api/admin`: 401 without a valid session, 403 when the
/// identity is not a registered admin.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(request.headers(), &state.config.session_cookie_name)
        .ok_or_else(|| unauthorized(Some("Missing session token")))?;
    let claims = verify_session_token(&state.config, &token)?;

    let admin = ContentRepository::<admin::Entity>::new(&state.db)
        .get(claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::warn!(user_id = %claims.sub, "session is valid but user is not an admin");
            forbidden(Some("Administrator access required"))
        })?;

    tracing::debug!(admin_id = %admin.id, role = %admin.role, "admin session authenticated");
    request.extensions_mut().insert(AdminSession {
        admin,
        session_email: claims.email,
    });

    Ok(next.run(request).await)
}

/// Bearer header first, session cookie second.
fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Check signature, expiry and audience of a session token.
pub fn verify_session_token(config: &AppConfig, token: &str) -> Result<SessionClaims, ApiError> {
    let Some(secret) = config.auth_jwt_secret.as_deref() else {
        tracing::warn!("admin request rejected: AUTH_JWT_SECRET is not configured");
        return Err(unauthorized(Some("Session verification is not configured")));
    };

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.auth_jwt_audience.as_str()]);

    decode::<SessionClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|err| {
            tracing::debug!(error = %err, "session token rejected");
            unauthorized(Some("Invalid or expired session token"))
        })
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminSession>()
            .cloned()
            .ok_or_else(|| unauthorized(Some("Admin session required")))
    }
}
