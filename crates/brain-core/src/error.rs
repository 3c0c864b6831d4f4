//! Error types for model operations.

use thiserror::Error;

/// Errors that can occur while talking to a chat model.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The client is misconfigured (missing key, bad URL, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never reached the provider.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response could not be interpreted.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// A timeout occurred during processing.
    #[error("processing timed out")]
    Timeout,
}
