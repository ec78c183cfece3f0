//! Application configuration loaded from environment.

mod rest;

pub use rest::{RestOptions, DEFAULT_HTTPS_PORT, DEFAULT_HTTP_PORT, DEFAULT_REST_API_HOST};

use std::net::SocketAddr;

use crate::models::auth::AppSecret;

/// Application configuration loaded from `.env` and environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g. `0.0.0.0:3000`).
    pub server_addr: SocketAddr,
    /// Application key, the prefix of every `auth` token.
    pub app_key: String,
    /// Secret for signing private/presence channel auth. Debug output is redacted.
    pub app_secret: AppSecret,
    /// Log level: `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
    /// Broker REST API endpoint.
    pub rest: RestOptions,
}

impl Config {
    /// Load configuration from environment. Call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_addr = var("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let server_addr: SocketAddr = server_addr
            .parse()
            .map_err(|_| ConfigLoadError::InvalidServerAddr)?;

        let app_key = var("APP_KEY")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigLoadError::Missing("APP_KEY"))?;
        let app_secret = var("APP_SECRET")
            .filter(|v| !v.is_empty())
            .map(AppSecret::new)
            .ok_or(ConfigLoadError::Missing("APP_SECRET"))?;
        let log_level = var("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let mut rest = RestOptions::new();
        if let Some(host) = var("PUSHER_HOST") {
            rest = rest.with_host(host);
        }
        if let Some(port) = var("PUSHER_PORT") {
            let port = port
                .parse()
                .map_err(|_| ConfigLoadError::InvalidPort(port))?;
            rest = rest.with_port(port);
        }
        if let Some(encrypted) = var("PUSHER_ENCRYPTED") {
            rest = rest.with_encrypted(matches!(encrypted.as_str(), "1" | "true" | "TRUE" | "True"));
        }

        Ok(Self {
            server_addr,
            app_key,
            app_secret,
            log_level,
            rest,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Invalid SERVER_ADDR")]
    InvalidServerAddr,
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid PUSHER_PORT: {0}")]
    InvalidPort(String),
}
