//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Default bind address.
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Default base URL of the video generation API.
pub const DEFAULT_VIDEO_API_BASE: &str = "https://api.z.ai/api/paas/v4";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// Postgres connection URL.
    pub database_url: String,
    /// Pool size.
    pub database_max_connections: u32,
    /// Token Meta echoes in the subscription handshake.
    pub verify_token: String,
    /// App secret for payload signatures. Unset disables the check.
    pub app_secret: Option<String>,
    /// Send token for pages without their own.
    pub page_access_token: Option<String>,
    /// Base URL for order tracking links.
    pub public_base_url: Option<String>,
    /// Upstream for the video proxy.
    pub video_api_base: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `API_ADDR` | Server bind address | `0.0.0.0:3000` |
    /// | `DATABASE_URL` | Postgres URL | (required) |
    /// | `DATABASE_MAX_CONNECTIONS` | Pool size | `10` |
    /// | `META_VERIFY_TOKEN` | Webhook verify token | (required) |
    /// | `META_APP_SECRET` | Webhook signature secret | unset |
    /// | `META_PAGE_ACCESS_TOKEN` | Fallback send token | unset |
    /// | `PUBLIC_BASE_URL` | Tracking link base | unset |
    /// | `VIDEO_API_BASE` | Video API base URL | `https://api.z.ai/api/paas/v4` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("API_ADDR")
            .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = non_empty_var("DATABASE_URL").ok_or(ConfigError::MissingDatabaseUrl)?;

        let database_max_connections = match non_empty_var("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidMaxConnections(raw))?,
            None => database::Database::DEFAULT_POOL_SIZE,
        };

        let verify_token =
            non_empty_var("META_VERIFY_TOKEN").ok_or(ConfigError::MissingVerifyToken)?;

        let video_api_base = non_empty_var("VIDEO_API_BASE")
            .unwrap_or_else(|| DEFAULT_VIDEO_API_BASE.to_string());

        Ok(Self {
            addr,
            database_url,
            database_max_connections,
            verify_token,
            app_secret: non_empty_var("META_APP_SECRET"),
            page_access_token: non_empty_var("META_PAGE_ACCESS_TOKEN"),
            public_base_url: non_empty_var("PUBLIC_BASE_URL"),
            video_api_base: video_api_base.trim_end_matches('/').to_string(),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API_ADDR format")]
    InvalidAddr,

    #[error("DATABASE_URL environment variable is required")]
    MissingDatabaseUrl,

    #[error("DATABASE_MAX_CONNECTIONS must be a positive integer, got {0:?}")]
    InvalidMaxConnections(String),

    #[error("META_VERIFY_TOKEN environment variable is required")]
    MissingVerifyToken,
}
