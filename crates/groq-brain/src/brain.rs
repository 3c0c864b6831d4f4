//! GroqBrain implementation using the Groq chat-completions API.

use std::time::Duration;

use brain_core::{async_trait, BrainError, ChatMessage, ChatModel, ModelReply, ToolDefinition};
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse};
use crate::config::GroqBrainConfig;

/// A [`ChatModel`] backed by Groq's hosted models.
///
/// GroqBrain is stateless: every call sends the full transcript it is
/// given. Conversation history lives in the database, not here.
pub struct GroqBrain {
    client: Client,
    config: GroqBrainConfig,
}

impl GroqBrain {
    /// Create a new GroqBrain with the given configuration.
    pub fn new(config: GroqBrainConfig) -> Result<Self, BrainError> {
        if config.api_key.trim().is_empty() {
            return Err(BrainError::Configuration("Groq API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!(model = %config.model, "GroqBrain initialized");

        Ok(Self { client, config })
    }

    /// Create a GroqBrain from environment variables.
    ///
    /// See [`GroqBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(GroqBrainConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GroqBrainConfig {
        &self.config
    }

    fn build_request<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        tools: &'a [ToolDefinition],
    ) -> ChatCompletionRequest<'a> {
        let has_tools = !tools.is_empty();
        ChatCompletionRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            tools: has_tools.then_some(tools),
            tool_choice: has_tools.then_some("auto"),
        }
    }
}

#[async_trait]
impl ChatModel for GroqBrain {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ModelReply, BrainError> {
        let url = self.config.completions_url();
        let request = self.build_request(messages, tools);

        debug!(messages = messages.len(), tools = tools.len(), "Sending request to Groq API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BrainError::Timeout
                } else {
                    BrainError::Network(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Try to parse as API error
            let message = serde_json::from_str::<ApiError>(&error_text)
                .map(|api_error| api_error.error.message)
                .unwrap_or(error_text);

            return Err(BrainError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to parse response: {}", e)))?;

        if let Some(ref usage) = completion.usage {
            debug!(
                prompt = usage.prompt_tokens,
                completion = usage.completion_tokens,
                total = usage.total_tokens,
                "Groq token usage"
            );
        }

        reply_from_completion(completion)
    }

    fn name(&self) -> &str {
        "GroqBrain"
    }
}

/// Reduce a completion to the first choice's content and tool calls.
fn reply_from_completion(completion: ChatCompletionResponse) -> Result<ModelReply, BrainError> {
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| BrainError::ProcessingFailed("Response contained no choices".to_string()))?;

    let content = choice
        .message
        .content
        .filter(|text| !text.trim().is_empty());

    Ok(ModelReply {
        content,
        tool_calls: choice.message.tool_calls.unwrap_or_default(),
    })
}
