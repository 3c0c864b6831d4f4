//! Error types for orchestrator operations.

use brain_core::BrainError;
use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Model call failed.
    #[error("brain error: {0}")]
    Brain(#[from] BrainError),

    /// Conversation storage failed.
    #[error("store error: {0}")]
    Store(#[from] DatabaseError),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}
