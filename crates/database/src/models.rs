//! Database models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::validation::ValidationError;

/// Per-page bot configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BotConfig {
    pub id: Uuid,
    /// Facebook page ID the bot answers for.
    pub page_id: String,
    pub page_name: Option<String>,
    /// System prompt sent ahead of every conversation.
    pub system_prompt: String,
    /// Page access token used for the Send API.
    pub access_token: Option<String>,
    /// When false, incoming messages are stored but never answered.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a bot config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewBotConfig {
    pub page_id: String,
    #[serde(default)]
    pub page_name: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Partial update of a bot config. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotConfigUpdate {
    #[serde(default)]
    pub page_name: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// A single stored chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub page_id: Option<String>,
    /// Page-scoped ID of the customer.
    pub sender_id: String,
    /// "user" or "assistant".
    pub role: String,
    pub message_text: String,
    /// "facebook" or "instagram".
    pub platform: String,
    pub created_at: DateTime<Utc>,
}

/// A message about to be stored.
///
/// `created_at` is explicit so a user message and its reply written in the
/// same transaction still sort in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub page_id: Option<String>,
    pub sender_id: String,
    pub role: MessageRole,
    pub message_text: String,
    pub platform: Platform,
    pub created_at: DateTime<Utc>,
}

impl NewMessage {
    /// Build a message stamped with the current time.
    pub fn now(
        page_id: Option<String>,
        sender_id: impl Into<String>,
        role: MessageRole,
        message_text: impl Into<String>,
        platform: Platform,
    ) -> Self {
        Self {
            page_id,
            sender_id: sender_id.into(),
            role,
            message_text: message_text.into(),
            platform,
            created_at: Utc::now(),
        }
    }
}

/// Latest message of one conversation, for the inbox view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    pub sender_id: String,
    pub last_message: String,
    pub last_role: String,
    pub last_timestamp: DateTime<Utc>,
}

/// A customer in the sales pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub id: Uuid,
    pub page_id: String,
    pub sender_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub interested_service: Option<String>,
    pub objection: Option<String>,
    /// One of [`LeadStatus`].
    pub status: String,
    /// Set when the bot handed the conversation to a human.
    pub needs_human: bool,
    pub human_reason: Option<String>,
    pub last_interaction: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Profile fields the bot learned about a lead. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub interested_service: Option<String>,
    pub objection: Option<String>,
    pub status: Option<LeadStatus>,
}

impl LeadUpdate {
    /// True when nothing would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.interested_service.is_none()
            && self.objection.is_none()
            && self.status.is_none()
    }
}

/// A confirmed sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub page_id: Option<String>,
    pub sender_id: Option<String>,
    pub client_name: String,
    pub client_contact: String,
    pub service_name: String,
    /// Price as agreed in conversation, kept verbatim.
    pub agreed_price: String,
    /// One of [`OrderStatus`].
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub page_id: Option<String>,
    pub sender_id: Option<String>,
    pub client_name: String,
    pub client_contact: String,
    pub service_name: String,
    pub agreed_price: String,
}

/// A catalog entry the bot can sell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewService {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
}

/// Partial update of a service. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Declares a closed set of text values stored in a TEXT column.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, kind = $err:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every allowed value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The stored text form.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(text_enum!(@err $err, $kind, other)),
                }
            }
        }
    };
    (@err status, $kind:literal, $value:expr) => {
        ValidationError::InvalidStatus { kind: $kind, value: $value.to_string() }
    };
    (@err value, $kind:literal, $value:expr) => {
        ValidationError::InvalidValue { field: $kind, value: $value.to_string() }
    };
}

text_enum! {
    /// Where a lead sits in the sales pipeline.
    LeadStatus, "lead", kind = status {
        Lead => "Lead",
        Thinking => "Thinking",
        Closed => "Closed",
        Lost => "Lost",
    }
}

text_enum! {
    /// Fulfillment state of an order.
    OrderStatus, "order", kind = status {
        PendingConfiguration => "Pending Configuration",
        InProgress => "In Progress",
        AwaitingClientReview => "Awaiting Client Review",
        Completed => "Completed",
        Cancelled => "Cancelled",
    }
}

text_enum! {
    /// Author of a stored message.
    MessageRole, "role", kind = value {
        User => "user",
        Assistant => "assistant",
    }
}

text_enum! {
    /// Channel a conversation happens on.
    Platform, "platform", kind = value {
        Facebook => "facebook",
        Instagram => "instagram",
    }
}

impl Platform {
    /// Map a webhook `object` field to a platform.
    ///
    /// Messenger sends `"page"`, Instagram messaging sends `"instagram"`.
    pub fn from_webhook_object(object: &str) -> Option<Self> {
        match object {
            "page" => Some(Platform::Facebook),
            "instagram" => Some(Platform::Instagram),
            _ => None,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::Facebook
    }
}
