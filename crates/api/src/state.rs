//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use orchestrator::Orchestrator;

/// Secrets for the Meta webhook.
#[derive(Debug, Clone)]
pub struct WebhookSettings {
    /// Expected `hub.verify_token`.
    pub verify_token: String,
    /// When set, POST bodies must carry a valid `X-Hub-Signature-256`.
    pub app_secret: Option<String>,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Conversation loop.
    pub orchestrator: Arc<Orchestrator>,
    /// Webhook secrets.
    pub webhook: Arc<WebhookSettings>,
    /// Client for the video proxy.
    pub http: reqwest::Client,
    /// Video API base URL, without trailing slash.
    pub video_api_base: String,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        db: Database,
        orchestrator: Arc<Orchestrator>,
        webhook: WebhookSettings,
        http: reqwest::Client,
        video_api_base: impl Into<String>,
    ) -> Self {
        Self {
            db,
            orchestrator,
            webhook: Arc::new(webhook),
            http,
            video_api_base: video_api_base.into(),
        }
    }
}
