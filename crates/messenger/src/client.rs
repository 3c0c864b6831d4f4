//! Graph API Send client.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error};

use crate::config::MessengerConfig;
use crate::error::MessengerError;
use crate::types::{GraphErrorBody, SendRequest, SendResponse};

/// Longest text the Send API accepts in one message, in characters.
pub const MAX_TEXT_CHARS: usize = 2000;

/// Client for the Messenger Send API.
#[derive(Debug, Clone)]
pub struct MessengerClient {
    http: Client,
    config: MessengerConfig,
}

impl MessengerClient {
    /// Create a client.
    pub fn new(config: MessengerConfig) -> Result<Self, MessengerError> {
        if config.graph_api_url.trim().is_empty() {
            return Err(MessengerError::Config(
                "Graph API URL cannot be empty".to_string(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(MessengerError::Http)?;

        Ok(Self { http, config })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &MessengerConfig {
        &self.config
    }

    /// Send a text reply to a customer.
    ///
    /// Texts longer than [`MAX_TEXT_CHARS`] go out as several messages.
    /// Returns the response for the last part.
    pub async fn send_text(
        &self,
        access_token: &str,
        recipient_id: &str,
        text: &str,
    ) -> Result<SendResponse, MessengerError> {
        if access_token.is_empty() {
            return Err(MessengerError::SendFailed(
                "page access token is empty".to_string(),
            ));
        }

        let mut last = SendResponse::default();
        for part in split_text(text, MAX_TEXT_CHARS) {
            last = self
                .send(access_token, &SendRequest::text(recipient_id, part))
                .await?;
        }
        Ok(last)
    }

    async fn send(
        &self,
        access_token: &str,
        request: &SendRequest,
    ) -> Result<SendResponse, MessengerError> {
        let url = self.config.send_url();
        debug!(recipient_id = %request.recipient.id, "Sending message");

        let response = self
            .http
            .post(&url)
            .query(&[("access_token", access_token)])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GraphErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            error!(status = status.as_u16(), %message, "Send API error");
            return Err(MessengerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let sent: SendResponse = serde_json::from_str(&body)?;
        debug!(message_id = ?sent.message_id, "Message sent");
        Ok(sent)
    }
}

/// Split `text` into parts of at most `max_chars` characters.
///
/// Breaks at the last newline or space inside the limit when there is one.
/// Never returns an empty list for non-empty input.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut parts = Vec::new();
    let mut rest = text.trim();

    while rest.chars().count() > max_chars {
        let limit = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let head = &rest[..limit];
        let cut = head
            .rfind('\n')
            .or_else(|| head.rfind(' '))
            .filter(|&i| i > 0)
            .unwrap_or(limit);
        parts.push(rest[..cut].trim_end().to_string());
        rest = rest[cut..].trim_start();
    }

    if !rest.is_empty() || parts.is_empty() {
        parts.push(rest.to_string());
    }
    parts
}
