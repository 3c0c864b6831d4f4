//! The ChatModel trait definition.

use async_trait::async_trait;

use crate::error::BrainError;
use crate::message::{ChatMessage, ModelReply};
use crate::tools::ToolDefinition;

/// A hosted chat-completions model with tool calling.
///
/// One call is one round trip: the caller owns the transcript and the
/// tool loop. This trait is object-safe and can be used with `Arc<dyn ChatModel>`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run a single completion over `messages`, offering `tools`.
    ///
    /// An empty `tools` slice means tool calling is disabled for the call.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ModelReply, BrainError>;

    /// Get a human-readable name for this model client.
    fn name(&self) -> &str;
}
