//! Route handlers.

pub mod analytics;
pub mod bot_configs;
pub mod health;
pub mod leads;
pub mod messages;
pub mod orders;
pub mod services;
pub mod video;
pub mod webhook;

use axum::routing::{get, post};
use axum::Router;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Meta webhook
        .route("/api/webhook", get(webhook::verify).post(webhook::receive))
        // Dashboard API
        .route(
            "/api/bot-configs",
            get(bot_configs::list)
                .post(bot_configs::create)
                .patch(bot_configs::patch)
                .put(bot_configs::update),
        )
        .route("/api/leads", get(leads::list).put(leads::update))
        .route("/api/messages", get(messages::list))
        .route("/api/orders", get(orders::list).put(orders::update))
        .route("/api/orders/:id", get(orders::get))
        .route(
            "/api/services",
            get(services::list)
                .post(services::create)
                .put(services::update)
                .delete(services::delete),
        )
        .route("/api/analytics", get(analytics::get))
        .route("/api/video", post(video::proxy))
}

/// Trimmed, non-empty value of an optional request field.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a required row ID.
pub(crate) fn require_id(raw: Option<&str>) -> Result<Uuid> {
    let raw = present(raw).ok_or_else(|| ApiError::bad_request("ID is required"))?;
    parse_id(raw)
}

/// Parse a row ID.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::bad_request(format!("Invalid ID: {}", raw)))
}
