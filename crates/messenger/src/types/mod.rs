//! Wire types for the Messenger platform.

mod send_api;
mod webhook;

pub use send_api::{GraphError, GraphErrorBody, OutgoingMessage, Recipient, SendRequest, SendResponse};
pub use webhook::{Entry, IncomingMessage, InboundText, MessagingEvent, Participant, WebhookEvent};
