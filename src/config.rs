//! Configuration module for loading and parsing TOML configuration files.
//!
//! Configuration is resolved once at startup: the optional TOML file is
//! parsed first, environment variables override individual keys, and the
//! result is validated before being shared read-only through
//! [`crate::state::AppState`].

use axum::http::HeaderValue;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Secret used when nothing else is configured. Only accepted in debug mode.
pub const INSECURE_DEFAULT_SECRET: &str = "vesselhire-insecure-development-key";

/// Longest accepted access token lifetime (one day).
pub const MAX_ACCESS_TOKEN_MINUTES: i64 = 24 * 60;

/// Longest accepted refresh token lifetime.
pub const MAX_REFRESH_TOKEN_DAYS: i64 = 365;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Token and password configuration.
    pub auth: AuthConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
    /// Development mode: relaxes CORS and allows the default secret.
    pub debug: bool,
    /// Directory holding the built frontend (`index.html` and assets).
    pub static_dir: PathBuf,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            debug: false,
            static_dir: PathBuf::from("dist"),
            allowed_origins: Vec::new(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string. `None` selects the in-memory store.
    pub url: Option<String>,
    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

/// Token and password configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret for signing tokens.
    pub secret: String,
    /// Access token lifetime in minutes.
    pub access_token_minutes: i64,
    /// Refresh token lifetime in days.
    pub refresh_token_days: i64,
    /// bcrypt cost factor for new password hashes.
    pub password_hash_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: INSECURE_DEFAULT_SECRET.to_string(),
            access_token_minutes: 5,
            refresh_token_days: 1,
            password_hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    /// Parses configuration from a TOML string.
    ///
    /// # Arguments
    /// * `content` - TOML content as string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolves the startup configuration: file (if any), then environment
    /// overrides, then validation.
    ///
    /// # Errors
    /// Returns error if the file is unreadable or a value is invalid.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            None => Config::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from a key lookup (normally the process environment).
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT is not a port: {port}")))?;
        }
        if let Some(debug) = lookup("DEBUG") {
            self.server.debug = matches!(
                debug.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            self.server.static_dir = PathBuf::from(dir);
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.is_empty()) {
            self.database.url = Some(url);
        }
        if let Some(secret) = lookup("SECRET_KEY") {
            self.auth.secret = secret;
        }
        Ok(())
    }

    /// Validates the configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue(
                "server port must be non-zero".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "database max_connections must be positive".to_string(),
            ));
        }
        if self.auth.secret.is_empty() {
            return Err(ConfigError::InvalidValue(
                "auth secret cannot be empty".to_string(),
            ));
        }
        if !self.server.debug && self.auth.secret == INSECURE_DEFAULT_SECRET {
            return Err(ConfigError::InvalidValue(
                "auth secret must be set (SECRET_KEY) outside debug mode".to_string(),
            ));
        }
        if !(1..=MAX_ACCESS_TOKEN_MINUTES).contains(&self.auth.access_token_minutes) {
            return Err(ConfigError::InvalidValue(format!(
                "access_token_minutes must be between 1 and {MAX_ACCESS_TOKEN_MINUTES}"
            )));
        }
        if !(1..=MAX_REFRESH_TOKEN_DAYS).contains(&self.auth.refresh_token_days) {
            return Err(ConfigError::InvalidValue(format!(
                "refresh_token_days must be between 1 and {MAX_REFRESH_TOKEN_DAYS}"
            )));
        }
        if !(4..=31).contains(&self.auth.password_hash_cost) {
            return Err(ConfigError::InvalidValue(
                "password_hash_cost must be between 4 and 31".to_string(),
            ));
        }
        self.cors_origins()?;
        Ok(())
    }

    /// Parses the configured CORS origins into header values.
    ///
    /// # Errors
    /// Returns error if an origin is not a valid header value.
    pub fn cors_origins(&self) -> Result<Vec<HeaderValue>, ConfigError> {
        self.server
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| ConfigError::InvalidValue(format!("invalid origin: {origin}")))
            })
            .collect()
    }

    /// Address the server binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Configuration for local development and tests: debug on, no database.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Config::default();
        config.server.debug = true;
        config
    }
}
