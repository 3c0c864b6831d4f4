//! Webhook payloads pushed by Meta.

use serde::{Deserialize, Serialize};

/// Webhook event envelope.
///
/// `object` is `"page"` for Messenger and `"instagram"` for Instagram DMs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

/// One entry per page in the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Page (or Instagram account) ID the events belong to.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
}

/// A messaging event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingEvent {
    #[serde(default)]
    pub sender: Option<Participant>,
    #[serde(default)]
    pub recipient: Option<Participant>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

/// Sender or recipient reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
}

/// Message body of a messaging event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub mid: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Set on copies of messages the page itself sent.
    #[serde(default)]
    pub is_echo: bool,
}

/// A customer text message ready for the conversation loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundText {
    pub page_id: String,
    pub sender_id: String,
    pub text: String,
    pub mid: Option<String>,
}

impl WebhookEvent {
    /// Parse a webhook event from a raw body.
    pub fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// All customer text messages in the batch, in delivery order.
    ///
    /// Echoes, events without a sender and blank texts (attachments,
    /// reactions, read receipts) are dropped.
    pub fn text_messages(&self) -> Vec<InboundText> {
        self.entry
            .iter()
            .flat_map(|entry| {
                entry.messaging.iter().filter_map(move |event| {
                    let sender = event.sender.as_ref()?;
                    let message = event.message.as_ref()?;
                    if message.is_echo || sender.id.is_empty() {
                        return None;
                    }
                    let text = message.text.as_deref()?.trim();
                    if text.is_empty() {
                        return None;
                    }
                    Some(InboundText {
                        page_id: entry.id.clone(),
                        sender_id: sender.id.clone(),
                        text: text.to_string(),
                        mid: message.mid.clone(),
                    })
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "object": "page",
        "entry": [{
            "id": "PAGE_1",
            "time": 1700000000000,
            "messaging": [
                {
                    "sender": {"id": "USER_1"},
                    "recipient": {"id": "PAGE_1"},
                    "timestamp": 1700000000000,
                    "message": {"mid": "m_1", "text": "How much is a website?"}
                },
                {
                    "sender": {"id": "PAGE_1"},
                    "recipient": {"id": "USER_1"},
                    "message": {"mid": "m_2", "text": "Our reply", "is_echo": true}
                },
                {
                    "sender": {"id": "USER_2"},
                    "recipient": {"id": "PAGE_1"},
                    "message": {"mid": "m_3"}
                },
                {
                    "sender": {"id": "USER_3"},
                    "recipient": {"id": "PAGE_1"},
                    "timestamp": 1700000000001
                }
            ]
        }]
    }"#;

    #[test]
    fn test_text_messages_filters_noise() {
        let event = WebhookEvent::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(event.object, "page");

        let texts = event.text_messages();
        assert_eq!(
            texts,
            vec![InboundText {
                page_id: "PAGE_1".to_string(),
                sender_id: "USER_1".to_string(),
                text: "How much is a website?".to_string(),
                mid: Some("m_1".to_string()),
            }]
        );
    }

    #[test]
    fn test_missing_entry_and_messaging() {
        let event = WebhookEvent::parse(br#"{"object":"page"}"#).unwrap();
        assert!(event.entry.is_empty());
        assert!(event.text_messages().is_empty());

        let event =
            WebhookEvent::parse(br#"{"object":"page","entry":[{"id":"P","time":1}]}"#).unwrap();
        assert!(event.text_messages().is_empty());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(WebhookEvent::parse(b"not json").is_err());
    }

    #[test]
    fn test_parse_without_object() {
        let event = WebhookEvent::parse(br#"{"entry":[]}"#).unwrap();
        assert_eq!(event.object, "");
        assert!(event.text_messages().is_empty());
    }
}
