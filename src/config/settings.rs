//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_EXTERNAL_HTTP_TIMEOUT_SECONDS, DEFAULT_JWT_EXPIRATION_MINUTES,
    DEFAULT_NOMINATIM_BASE_URL, DEFAULT_NOMINATIM_USER_AGENT, DEFAULT_RECEITAWS_BASE_URL,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SIGNED_URL_EXPIRATION_SECONDS,
    DEFAULT_STORAGE_ENDPOINT, DEFAULT_VIACEP_BASE_URL, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub server_host: String,
    pub server_port: u16,
    pub viacep_base_url: String,
    pub nominatim_base_url: String,
    pub nominatim_user_agent: String,
    pub receitaws_base_url: String,
    pub external_http_timeout_seconds: u64,
    pub storage: StorageConfig,
}

/// Object storage credentials (HMAC interoperability keys).
#[derive(Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub access_id: String,
    secret: String,
    pub signed_url_expiration_seconds: u64,
}

impl StorageConfig {
    pub fn new(
        endpoint: impl Into<String>,
        access_id: impl Into<String>,
        secret: impl Into<String>,
        signed_url_expiration_seconds: u64,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_id: access_id.into(),
            secret: secret.into(),
            signed_url_expiration_seconds,
        }
    }

    /// HMAC secret used to sign storage requests.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("endpoint", &self.endpoint)
            .field("access_id", &self.access_id)
            .field("secret", &"[REDACTED]")
            .field(
                "signed_url_expiration_seconds",
                &self.signed_url_expiration_seconds,
            )
            .finish()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("viacep_base_url", &self.viacep_base_url)
            .field("nominatim_base_url", &self.nominatim_base_url)
            .field("receitaws_base_url", &self.receitaws_base_url)
            .field("storage", &self.storage)
            .finish()
    }
}

/// Read a variable, falling back to `default` when unset.
fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a variable, falling back to `default` when unset or malformed.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        if env::var("STORAGE_ACCESS_ID").is_err() {
            tracing::warn!("STORAGE_ACCESS_ID not set, image uploads will be rejected by storage");
        }

        Self {
            database_url: var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            jwt_secret,
            jwt_expiration_minutes: parse_or(
                "JWT_EXPIRATION_MINUTES",
                DEFAULT_JWT_EXPIRATION_MINUTES,
            ),
            server_host: var_or("SERVER_HOST", DEFAULT_SERVER_HOST),
            server_port: parse_or("SERVER_PORT", DEFAULT_SERVER_PORT),
            viacep_base_url: var_or("VIACEP_BASE_URL", DEFAULT_VIACEP_BASE_URL),
            nominatim_base_url: var_or("NOMINATIM_BASE_URL", DEFAULT_NOMINATIM_BASE_URL),
            nominatim_user_agent: var_or("NOMINATIM_USER_AGENT", DEFAULT_NOMINATIM_USER_AGENT),
            receitaws_base_url: var_or("RECEITAWS_BASE_URL", DEFAULT_RECEITAWS_BASE_URL),
            external_http_timeout_seconds: parse_or(
                "EXTERNAL_HTTP_TIMEOUT_SECONDS",
                DEFAULT_EXTERNAL_HTTP_TIMEOUT_SECONDS,
            ),
            storage: StorageConfig::new(
                var_or("STORAGE_ENDPOINT", DEFAULT_STORAGE_ENDPOINT),
                var_or("STORAGE_ACCESS_ID", ""),
                var_or("STORAGE_SECRET", ""),
                parse_or(
                    "SIGNED_URL_EXPIRATION_SECONDS",
                    DEFAULT_SIGNED_URL_EXPIRATION_SECONDS,
                ),
            ),
        }
    }

    /// Build a configuration with explicit secrets and default endpoints.
    ///
    /// Used by tests and tooling that must not depend on the environment.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: jwt_secret.into(),
            jwt_expiration_minutes: DEFAULT_JWT_EXPIRATION_MINUTES,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            viacep_base_url: DEFAULT_VIACEP_BASE_URL.to_string(),
            nominatim_base_url: DEFAULT_NOMINATIM_BASE_URL.to_string(),
            nominatim_user_agent: DEFAULT_NOMINATIM_USER_AGENT.to_string(),
            receitaws_base_url: DEFAULT_RECEITAWS_BASE_URL.to_string(),
            external_http_timeout_seconds: DEFAULT_EXTERNAL_HTTP_TIMEOUT_SECONDS,
            storage: StorageConfig::new(
                DEFAULT_STORAGE_ENDPOINT,
                "",
                "",
                DEFAULT_SIGNED_URL_EXPIRATION_SECONDS,
            ),
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
