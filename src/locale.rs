//! # Locale Resolution
//!
//! Public pages live under a `/{locale}` prefix. The first path segment alone
//! decides the locale; request headers such as `Accept-Language` are ignored.
//! Paths without a supported prefix are redirected to the default locale.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, FromRequestParts, State},
    http::{HeaderValue, Uri, header::CONTENT_LANGUAGE, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;

use crate::config::{AppConfig, LocaleConfig};
use crate::error::not_found;

/// First path segments that belong to the API surface, never to pages.
pub const RESERVED_PREFIXES: &[&str] = &["api", "docs", "openapi.json", "healthz", "readyz"];

/// Outcome of resolving a request path against the locale configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The path already starts with a supported locale.
    Localized(String),
    /// The path needs the default locale prefix; carries the new target.
    Redirect(String),
    /// The path is outside the localized page space.
    Reserved,
}

/// Resolve `path` (and its optional query string) to a locale.
pub fn resolve(path: &str, query: Option<&str>, locales: &LocaleConfig) -> Resolution {
    let first = path
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default();

    if locales.is_supported(first) {
        return Resolution::Localized(first.to_string());
    }
    if RESERVED_PREFIXES.contains(&first) {
        return Resolution::Reserved;
    }

    let mut target = format!("/{}", locales.default);
    if path != "/" {
        if !path.starts_with('/') {
            target.push('/');
        }
        target.push_str(path);
    }
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }
    Resolution::Redirect(target)
}

/// Locale taken from the first path segment of a page request.
///
/// Rejects with a temporary redirect to the default locale when the segment is
/// not supported, and with 404 for reserved API prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Locale {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Locale
where
    Arc<AppConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<AppConfig>::from_ref(state);
        match resolve(parts.uri.path(), parts.uri.query(), &config.locales) {
            Resolution::Localized(locale) => Ok(Locale(locale)),
            Resolution::Redirect(target) => Err(Redirect::temporary(&target).into_response()),
            Resolution::Reserved => Err(not_found("Resource").into_response()),
        }
    }
}

/// Fallback for unmatched paths: redirect page paths to the default locale,
/// 404 everything else.
pub async fn locale_fallback(State(config): State<Arc<AppConfig>>, uri: Uri) -> Response {
    match resolve(uri.path(), uri.query(), &config.locales) {
        Resolution::Redirect(target) => Redirect::temporary(&target).into_response(),
        Resolution::Localized(_) => not_found("Page").into_response(),
        Resolution::Reserved => not_found("Resource").into_response(),
    }
}

/// JSON page payload tagged with a `Content-Language` header.
pub struct Localized<T>(pub Locale, pub T);

impl<T: Serialize> IntoResponse for Localized<T> {
    fn into_response(self) -> Response {
        let Localized(locale, body) = self;
        let mut response = Json(body).into_response();
        if let Ok(value) = HeaderValue::from_str(locale.as_str()) {
            response.headers_mut().insert(CONTENT_LANGUAGE, value);
        }
        response
    }
}
