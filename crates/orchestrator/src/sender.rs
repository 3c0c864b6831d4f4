//! Message sender trait and implementations.

use async_trait::async_trait;
use messenger::MessengerClient;

use crate::error::OrchestratorError;

/// Trait for delivering replies to a customer.
///
/// Abstracted to support different transports (Messenger, tests, etc.)
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a text message.
    ///
    /// # Arguments
    /// * `access_token` - Page access token from the bot config, if it has one
    /// * `recipient` - Page-scoped ID of the customer
    /// * `text` - Message content
    async fn send_message(
        &self,
        access_token: Option<&str>,
        recipient: &str,
        text: &str,
    ) -> Result<(), OrchestratorError>;
}

/// Sends replies through the Messenger Send API.
///
/// Pages without their own token fall back to a process-wide token.
#[derive(Debug, Clone)]
pub struct MessengerSender {
    client: MessengerClient,
    fallback_token: Option<String>,
}

impl MessengerSender {
    pub fn new(client: MessengerClient, fallback_token: Option<String>) -> Self {
        Self {
            client,
            fallback_token: fallback_token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Pick the token to send with: the page's own, else the fallback.
    pub fn resolve_token<'a>(&'a self, page_token: Option<&'a str>) -> Option<&'a str> {
        page_token
            .filter(|t| !t.trim().is_empty())
            .or(self.fallback_token.as_deref())
    }
}

#[async_trait]
impl MessageSender for MessengerSender {
    async fn send_message(
        &self,
        access_token: Option<&str>,
        recipient: &str,
        text: &str,
    ) -> Result<(), OrchestratorError> {
        let token = self.resolve_token(access_token).ok_or_else(|| {
            OrchestratorError::SendFailed("no page access token configured".to_string())
        })?;

        self.client
            .send_text(token, recipient, text)
            .await
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))?;
        Ok(())
    }
}

/// A no-op message sender for testing that discards all messages.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl MessageSender for NoOpSender {
    async fn send_message(
        &self,
        _access_token: Option<&str>,
        _recipient: &str,
        _text: &str,
    ) -> Result<(), OrchestratorError> {
        Ok(())
    }
}

/// A logging message sender for debugging that logs all operations.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MessageSender for LoggingSender {
    async fn send_message(
        &self,
        access_token: Option<&str>,
        recipient: &str,
        text: &str,
    ) -> Result<(), OrchestratorError> {
        tracing::info!(
            recipient,
            has_token = access_token.is_some(),
            "Sending message: {}",
            text
        );
        Ok(())
    }
}
