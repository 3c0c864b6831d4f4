//! Error types for tool operations.

use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur during tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool not found in registry.
    #[error("Unknown tool: {0}")]
    NotFound(String),

    /// Missing required parameter.
    #[error("Missing required argument: {0}")]
    MissingParameter(String),

    /// Invalid parameter value.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The call carried no page/sender context.
    #[error("Tool call has no conversation context")]
    MissingContext,

    /// Storage failed.
    #[error("{0}")]
    Database(#[from] DatabaseError),

    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
