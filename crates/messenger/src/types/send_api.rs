//! Types for the Graph API Send endpoint.

use serde::{Deserialize, Serialize};

/// Body of a `POST /me/messages` call.
#[derive(Debug, Clone, Serialize)]
pub struct SendRequest {
    pub recipient: Recipient,
    pub message: OutgoingMessage,
    /// `RESPONSE` for replies inside the 24-hour window.
    pub messaging_type: &'static str,
}

impl SendRequest {
    /// A text reply to a customer.
    pub fn text(recipient_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            recipient: Recipient {
                id: recipient_id.into(),
            },
            message: OutgoingMessage { text: text.into() },
            messaging_type: "RESPONSE",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Recipient {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutgoingMessage {
    pub text: String,
}

/// Successful Send API response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendResponse {
    #[serde(default)]
    pub recipient_id: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
}

/// Error body returned by the Graph API.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorBody {
    pub error: GraphError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphError {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
}
