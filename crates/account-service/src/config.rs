//! Account service configuration.
//!
//! Configuration is loaded from environment variables. The database URL
//! is redacted in Debug output.

use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default base URL of the authentication service.
pub const DEFAULT_AUTH_SERVICE_URL: &str = "http://utopiaauthentication";

/// Default timeout for authentication service requests in seconds.
pub const DEFAULT_AUTH_REQUEST_TIMEOUT_SECONDS: u64 = 10;

/// Upper bound for the authentication request timeout.
pub const MAX_AUTH_REQUEST_TIMEOUT_SECONDS: u64 = 120;

/// Default database pool size.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;

/// Account service configuration.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Base URL of the authentication service, without trailing slash.
    pub auth_service_url: String,

    /// Timeout for a single authentication service request.
    pub auth_request_timeout_seconds: u64,

    /// Maximum connections in the database pool.
    pub db_max_connections: u32,

    /// Origin allowed by CORS. No CORS layer when unset.
    pub cors_allowed_origin: Option<String>,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("auth_service_url", &self.auth_service_url)
            .field(
                "auth_request_timeout_seconds",
                &self.auth_request_timeout_seconds,
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid auth request timeout configuration: {0}")]
    InvalidAuthTimeout(String),

    #[error("Invalid database pool configuration: {0}")]
    InvalidDbMaxConnections(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let auth_service_url = vars
            .get("AUTH_SERVICE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_AUTH_SERVICE_URL.to_string());

        let auth_request_timeout_seconds =
            if let Some(value_str) = vars.get("AUTH_REQUEST_TIMEOUT_SECONDS") {
                let value: u64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidAuthTimeout(format!(
                        "AUTH_REQUEST_TIMEOUT_SECONDS must be a valid positive integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value == 0 {
                    return Err(ConfigError::InvalidAuthTimeout(
                        "AUTH_REQUEST_TIMEOUT_SECONDS must be greater than 0".to_string(),
                    ));
                }

                if value > MAX_AUTH_REQUEST_TIMEOUT_SECONDS {
                    return Err(ConfigError::InvalidAuthTimeout(format!(
                        "AUTH_REQUEST_TIMEOUT_SECONDS must not exceed {} seconds, got {}",
                        MAX_AUTH_REQUEST_TIMEOUT_SECONDS, value
                    )));
                }

                value
            } else {
                DEFAULT_AUTH_REQUEST_TIMEOUT_SECONDS
            };

        let db_max_connections = if let Some(value_str) = vars.get("DB_MAX_CONNECTIONS") {
            let value: u32 = value_str.parse().map_err(|e| {
                ConfigError::InvalidDbMaxConnections(format!(
                    "DB_MAX_CONNECTIONS must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidDbMaxConnections(
                    "DB_MAX_CONNECTIONS must be greater than 0".to_string(),
                ));
            }

            value
        } else {
            DEFAULT_DB_MAX_CONNECTIONS
        };

        let cors_allowed_origin = vars
            .get("CORS_ALLOWED_ORIGIN")
            .filter(|origin| !origin.trim().is_empty())
            .cloned();

        Ok(Config {
            database_url,
            bind_address,
            auth_service_url,
            auth_request_timeout_seconds,
            db_max_connections,
            cors_allowed_origin,
        })
    }
}
