//! Configuration loading for the corporate site.
//!
//! Loads layered `.env` files and environment variables prefixed with
//! `CORPSITE_`, producing a typed [`AppConfig`].

use std::{collections::BTreeMap, env, net::SocketAddr, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sanitize::SanitizerBackend;

/// Prefix shared by every configuration key.
pub const ENV_PREFIX: &str = "CORPSITE_";

/// Application configuration derived from `CORPSITE_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AppConfig {
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default = "default_api_bind_addr")]
    pub api_bind_addr: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_db_acquire_timeout_ms")]
    pub db_acquire_timeout_ms: u64,
    /// Secret the auth service signs session tokens with (HS256).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_jwt_secret: Option<String>,
    #[serde(default = "default_auth_jwt_audience")]
    pub auth_jwt_audience: String,
    #[serde(default = "default_session_cookie_name")]
    pub session_cookie_name: String,
    #[serde(default)]
    pub locales: LocaleConfig,
    #[serde(default)]
    pub sanitizer: SanitizerBackend,
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cors_allowed_origins: Vec<String>,
}

/// Locales served under the `/{locale}` path prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct LocaleConfig {
    /// Two-letter codes, in preference order.
    ///
    /// Environment variable: `CORPSITE_SUPPORTED_LOCALES` (comma-separated)
    #[serde(default = "default_supported_locales")]
    pub supported: Vec<String>,

    /// Locale used when a path carries no recognized prefix.
    ///
    /// Environment variable: `CORPSITE_DEFAULT_LOCALE`
    #[serde(default = "default_locale")]
    pub default: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            supported: default_supported_locales(),
            default: default_locale(),
        }
    }
}

impl LocaleConfig {
    /// Returns true when `code` is one of the configured locales.
    pub fn is_supported(&self, code: &str) -> bool {
        self.supported.iter().any(|supported| supported == code)
    }

    /// Validate locale codes and the default locale membership.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.supported.is_empty() {
            return Err(ConfigError::NoSupportedLocales);
        }

        for code in &self.supported {
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_lowercase()) {
                return Err(ConfigError::InvalidLocaleCode { code: code.clone() });
            }
        }

        if !self.is_supported(&self.default) {
            return Err(ConfigError::DefaultLocaleNotSupported {
                default: self.default.clone(),
                supported: self.supported.join(","),
            });
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            api_bind_addr: default_api_bind_addr(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            database_url: default_database_url(),
            db_max_connections: default_db_max_connections(),
            db_acquire_timeout_ms: default_db_acquire_timeout_ms(),
            auth_jwt_secret: None,
            auth_jwt_audience: default_auth_jwt_audience(),
            session_cookie_name: default_session_cookie_name(),
            locales: LocaleConfig::default(),
            sanitizer: SanitizerBackend::default(),
            history_file: default_history_file(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Returns the configured bind address as a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.api_bind_addr.parse()
    }

    /// Returns true for profiles that run without external services.
    pub fn is_local_profile(&self) -> bool {
        matches!(self.profile.as_str(), "local" | "test")
    }

    /// Returns a redacted JSON representation (secrets are redacted).
    pub fn redacted_json(&self) -> serde_json::Result<String> {
        let mut config = self.clone();
        if config.auth_jwt_secret.is_some() {
            config.auth_jwt_secret = Some("[REDACTED]".to_string());
        }
        if let Some((scheme, _)) = config.database_url.split_once("://")
            && config.database_url.contains('@')
        {
            config.database_url = format!("{scheme}://[REDACTED]");
        }
        serde_json::to_string_pretty(&config)
    }

    /// Validates the configuration, returning an error if required settings are missing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidDbMaxConnections {
                value: self.db_max_connections,
            });
        }

        // Session tokens cannot be verified without the signing secret; local
        // and test profiles may run the public site only.
        match self.auth_jwt_secret.as_deref() {
            Some(secret) if secret.len() < 32 => {
                return Err(ConfigError::WeakJwtSecret {
                    length: secret.len(),
                });
            }
            None if !self.is_local_profile() => return Err(ConfigError::MissingJwtSecret),
            _ => {}
        }

        if !matches!(self.log_format.as_str(), "json" | "pretty") {
            return Err(ConfigError::InvalidLogFormat {
                value: self.log_format.clone(),
            });
        }

        if self.session_cookie_name.trim().is_empty() {
            return Err(ConfigError::EmptySessionCookieName);
        }

        self.locales.validate()?;

        Ok(())
    }
}

fn default_profile() -> String {
    "local".to_string()
}

fn default_api_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_database_url() -> String {
    "postgresql://localhost:5432/corpsite".to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_db_acquire_timeout_ms() -> u64 {
    5000
}

fn default_auth_jwt_audience() -> String {
    "authenticated".to_string()
}

fn default_session_cookie_name() -> String {
    "sb-access-token".to_string()
}

fn default_supported_locales() -> Vec<String> {
    vec!["ko".to_string(), "en".to_string()]
}

fn default_locale() -> String {
    "ko".to_string()
}

fn default_history_file() -> PathBuf {
    PathBuf::from("data/history.json")
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load environment file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },
    #[error("invalid api bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("database url is empty; set CORPSITE_DATABASE_URL")]
    MissingDatabaseUrl,
    #[error("database max connections must be at least 1, got {value}")]
    InvalidDbMaxConnections { value: u32 },
    #[error("auth JWT secret is missing; set CORPSITE_AUTH_JWT_SECRET")]
    MissingJwtSecret,
    #[error("auth JWT secret must be at least 32 bytes, got {length}")]
    WeakJwtSecret { length: usize },
    #[error("log format must be 'json' or 'pretty', got '{value}'")]
    InvalidLogFormat { value: String },
    #[error("session cookie name cannot be empty")]
    EmptySessionCookieName,
    #[error("at least one supported locale is required")]
    NoSupportedLocales,
    #[error("locale code '{code}' must be two lowercase ASCII letters")]
    InvalidLocaleCode { code: String },
    #[error("default locale '{default}' is not among supported locales ({supported})")]
    DefaultLocaleNotSupported { default: String, supported: String },
    #[error("unknown sanitizer backend '{value}' (expected 'html5' or 'pattern')")]
    InvalidSanitizer { value: String },
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Loads configuration using layered `.env` files and `CORPSITE_*` env vars.
pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a new loader rooted at the current working directory.
    pub fn new() -> Self {
        Self {
            base_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Creates a loader rooted at the provided directory (useful for tests).
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Loads configuration: `.env` files first, process environment last.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let (mut layered, profile_hint) = self.collect_layered_env()?;

        // Overlay process environment last so it wins.
        for (key, value) in env::vars() {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                layered.insert(stripped.to_string(), value);
            }
        }

        let profile = layered
            .remove("PROFILE")
            .filter(|v| !v.is_empty())
            .unwrap_or(profile_hint);
        let api_bind_addr = layered
            .remove("API_BIND_ADDR")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_api_bind_addr);
        let log_level = layered
            .remove("LOG_LEVEL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_level);
        let log_format = layered
            .remove("LOG_FORMAT")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_format);
        let database_url = layered
            .remove("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_database_url);
        let db_max_connections = layered
            .remove("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_db_max_connections);
        let db_acquire_timeout_ms = layered
            .remove("DB_ACQUIRE_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_db_acquire_timeout_ms);

        let auth_jwt_secret = layered.remove("AUTH_JWT_SECRET").and_then(|val| {
            let trimmed = val.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        });
        let auth_jwt_audience = layered
            .remove("AUTH_JWT_AUDIENCE")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_auth_jwt_audience);
        let session_cookie_name = layered
            .remove("SESSION_COOKIE_NAME")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_session_cookie_name);

        let locales = LocaleConfig {
            supported: layered
                .remove("SUPPORTED_LOCALES")
                .map(|raw| split_list(&raw.to_lowercase()))
                .filter(|list| !list.is_empty())
                .unwrap_or_else(default_supported_locales),
            default: layered
                .remove("DEFAULT_LOCALE")
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(default_locale),
        };

        let sanitizer = match layered.remove("SANITIZER").filter(|v| !v.is_empty()) {
            Some(value) => value
                .parse::<SanitizerBackend>()
                .map_err(|_| ConfigError::InvalidSanitizer { value })?,
            None => SanitizerBackend::default(),
        };

        let history_file = layered
            .remove("HISTORY_FILE")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_history_file);

        let cors_allowed_origins = layered
            .remove("CORS_ALLOWED_ORIGINS")
            .map(|raw| split_list(&raw))
            .unwrap_or_default();

        let config = AppConfig {
            profile,
            api_bind_addr,
            log_level,
            log_format,
            database_url,
            db_max_connections,
            db_acquire_timeout_ms,
            auth_jwt_secret,
            auth_jwt_audience,
            session_cookie_name,
            locales,
            sanitizer,
            history_file,
            cors_allowed_origins,
        };

        config.validate()?;

        match config.bind_addr() {
            Ok(_) => Ok(config),
            Err(source) => Err(ConfigError::InvalidBindAddr {
                value: config.api_bind_addr.clone(),
                source,
            }),
        }
    }

    fn collect_layered_env(&self) -> Result<(BTreeMap<String, String>, String), ConfigError> {
        let mut values = BTreeMap::new();

        self.merge_dotenv(self.base_dir.join(".env"), &mut values)?;
        self.merge_dotenv(self.base_dir.join(".env.local"), &mut values)?;

        let profile = env::var(format!("{ENV_PREFIX}PROFILE"))
            .ok()
            .or_else(|| values.get("PROFILE").cloned())
            .unwrap_or_else(default_profile);

        self.merge_dotenv(
            self.base_dir.join(format!(".env.{}", &profile)),
            &mut values,
        )?;
        self.merge_dotenv(
            self.base_dir.join(format!(".env.{}.local", &profile)),
            &mut values,
        )?;

        Ok((values, profile))
    }

    fn merge_dotenv(
        &self,
        path: PathBuf,
        values: &mut BTreeMap<String, String>,
    ) -> Result<(), ConfigError> {
        match dotenvy::from_path_iter(&path) {
            Ok(iter) => {
                for item in iter {
                    let (key, value) = item.map_err(|source| ConfigError::EnvFile {
                        path: path.clone(),
                        source,
                    })?;
                    if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                        values.insert(stripped.to_string(), value);
                    }
                }
                Ok(())
            }
            Err(dotenvy::Error::Io(ref io_err))
                if io_err.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(())
            }
            Err(err) => Err(ConfigError::EnvFile { path, source: err }),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_for_local_profile() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.locales.default, "ko");
        assert!(config.locales.is_supported("en"));
    }

    #[test]
    fn production_profile_requires_jwt_secret() {
        let mut config = AppConfig {
            profile: "production".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingJwtSecret)
        ));

        config.auth_jwt_secret = Some("short".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WeakJwtSecret { length: 5 })
        ));

        config.auth_jwt_secret = Some("x".repeat(32));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn locale_validation() {
        let mut locales = LocaleConfig::default();
        assert!(locales.validate().is_ok());

        locales.default = "ja".to_string();
        assert!(matches!(
            locales.validate(),
            Err(ConfigError::DefaultLocaleNotSupported { .. })
        ));

        locales.supported = vec!["ko".to_string(), "EN".to_string()];
        locales.default = "ko".to_string();
        assert!(matches!(
            locales.validate(),
            Err(ConfigError::InvalidLocaleCode { .. })
        ));

        locales.supported.clear();
        assert!(matches!(
            locales.validate(),
            Err(ConfigError::NoSupportedLocales)
        ));
    }

    #[test]
    fn redacted_json_hides_secrets() {
        let config = AppConfig {
            auth_jwt_secret: Some("super-secret-signing-key-value-0123456789".to_string()),
            database_url: "postgresql://user:pass@db:5432/corpsite".to_string(),
            ..Default::default()
        };

        let json = config.redacted_json().unwrap();
        assert!(!json.contains("super-secret"));
        assert!(!json.contains("user:pass"));
        assert!(json.contains("[REDACTED]"));
    }

    #[test]
    fn invalid_log_format_rejected() {
        let config = AppConfig {
            log_format: "xml".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLogFormat { .. })
        ));
    }
}
