//! Core trait and types for chat model implementations.
//!
//! This crate provides the shared interface between the conversation loop
//! and the pieces it talks to. It defines:
//!
//! - [`ChatModel`] - The trait a hosted LLM client implements
//! - [`ChatMessage`] / [`ModelReply`] - OpenAI-style chat messages and replies
//! - [`ToolExecutor`] - Trait for executing model-requested tool calls
//! - [`BrainError`] - Error types for model operations
//!
//! # Example
//!
//! ```rust
//! use brain_core::{async_trait, BrainError, ChatMessage, ChatModel, ModelReply, ToolDefinition};
//!
//! struct CannedModel;
//!
//! #[async_trait]
//! impl ChatModel for CannedModel {
//!     async fn complete(
//!         &self,
//!         _messages: &[ChatMessage],
//!         _tools: &[ToolDefinition],
//!     ) -> Result<ModelReply, BrainError> {
//!         Ok(ModelReply::text("Hello!"))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "CannedModel"
//!     }
//! }
//! ```

mod error;
mod message;
mod tools;
mod trait_def;

pub use error::BrainError;
pub use message::{ChatMessage, FunctionCall, ModelReply, Role, ToolCall};
pub use tools::{
    FunctionDefinition, ToolDefinition, ToolExecutor, ToolRequest, ToolRequestMeta, ToolResult,
};
pub use trait_def::ChatModel;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
