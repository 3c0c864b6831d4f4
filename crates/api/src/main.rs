//! pagebot HTTP server.
//!
//! Receives Meta Messenger webhooks, answers customers through the
//! conversation loop and serves the JSON API the dashboard polls.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use database::Database;
use groq_brain::GroqBrain;
use messenger::{MessengerClient, MessengerConfig};
use orchestrator::{MessengerSender, Orchestrator, OrchestratorConfig};
use sales_tools::{default_registry, SalesToolExecutor};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::{AppState, WebhookSettings};

/// Timeout for proxied video API calls.
const VIDEO_TIMEOUT_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting pagebot API");

    // Connect to database
    let db =
        Database::connect_with_pool_size(&config.database_url, config.database_max_connections)
            .await?;
    db.migrate().await?;

    // Model, tools and transport
    let model = GroqBrain::from_env()?;
    info!(model = %model.config().model, "Groq model configured");

    let registry = default_registry(db.clone(), config.public_base_url.clone());
    info!(tools = ?registry.list_tools(), "Sales tools registered");
    let tools = SalesToolExecutor::new(registry);

    let messenger = MessengerClient::new(MessengerConfig::from_env())?;
    let sender = MessengerSender::new(messenger, config.page_access_token.clone());

    let orchestrator = Orchestrator::new(
        Arc::new(model),
        Arc::new(tools),
        Arc::new(db.clone()),
        Arc::new(sender),
        OrchestratorConfig::from_env()?,
    );

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(VIDEO_TIMEOUT_SECS))
        .build()?;

    // Build application state
    let state = AppState::new(
        db,
        Arc::new(orchestrator),
        WebhookSettings {
            verify_token: config.verify_token.clone(),
            app_secret: config.app_secret.clone(),
        },
        http,
        config.video_api_base.clone(),
    );
    if state.webhook.app_secret.is_none() {
        info!("META_APP_SECRET not set, webhook signatures are not checked");
    }

    // Build router
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "pagebot API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
