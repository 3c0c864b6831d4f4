//! Groq-based chat model implementation.
//!
//! This crate provides a [`ChatModel`] that talks to Groq's
//! OpenAI-compatible chat-completions API with tool calling.
//!
//! # Usage
//!
//! ```rust,no_run
//! use groq_brain::{ChatMessage, ChatModel, GroqBrain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let brain = GroqBrain::from_env()?;
//!     let reply = brain.complete(&[ChatMessage::user("Hello")], &[]).await?;
//!     println!("{:?}", reply.content);
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::GroqBrain;
pub use config::{GroqBrainConfig, GroqBrainConfigBuilder, DEFAULT_API_URL, DEFAULT_MODEL};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, BrainError, ChatMessage, ChatModel, ModelReply, ToolDefinition};
