//! Meta Messenger platform client library.
//!
//! This crate covers both directions of a Messenger (or Instagram DM)
//! integration:
//!
//! - Parsing webhook payloads into customer text messages
//! - The `GET` subscription handshake and `X-Hub-Signature-256` checks
//! - Sending replies through the Graph API Send endpoint
//!
//! # Example
//!
//! ```no_run
//! use messenger::{MessengerClient, MessengerConfig, WebhookEvent};
//!
//! # async fn example(body: &[u8]) -> Result<(), messenger::MessengerError> {
//! let client = MessengerClient::new(MessengerConfig::default())?;
//!
//! let event = WebhookEvent::parse(body)?;
//! for inbound in event.text_messages() {
//!     let reply = format!("You said: {}", inbound.text);
//!     client.send_text("PAGE_ACCESS_TOKEN", &inbound.sender_id, &reply).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;
pub mod verify;

pub use client::{split_text, MessengerClient, MAX_TEXT_CHARS};
pub use config::{MessengerConfig, DEFAULT_GRAPH_API_URL};
pub use error::MessengerError;
pub use types::*;
pub use verify::{sign, verify_signature, verify_subscription, SIGNATURE_HEADER};
