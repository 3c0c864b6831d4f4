//! Error types for the Messenger client.

use thiserror::Error;

/// Errors that can occur when talking to Meta.
#[derive(Debug, Error)]
pub enum MessengerError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Graph API returned an error response.
    #[error("Graph API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Message sending failed before reaching the API.
    #[error("Send failed: {0}")]
    SendFailed(String),
}
