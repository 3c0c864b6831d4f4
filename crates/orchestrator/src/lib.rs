//! Conversation loop for pagebot.
//!
//! This crate provides the [`Orchestrator`] type which turns one inbound
//! customer message into a stored and delivered reply.
//!
//! # Architecture
//!
//! ```text
//! Inbound message (from the webhook)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Load page config (skip unknown / inactive / takeover)   │
//! │         ↓                                                   │
//! │  2. Build prompt: system + recent history + new message     │
//! │         ↓                                                   │
//! │  3. Tool loop: model → tool calls → results → model ...     │
//! │         ↓                                                   │
//! │  4. Store user message and reply, touch the lead            │
//! │         ↓                                                   │
//! │  5. Send the reply                                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage, model, tools and transport are trait objects
//! ([`ConversationStore`], `ChatModel`, `ToolExecutor`, [`MessageSender`]),
//! so the loop runs the same against Postgres or [`MemoryStore`].

mod config;
mod error;
mod orchestrator;
mod sender;
mod store;

pub use config::{
    OrchestratorConfig, DEFAULT_MAX_HISTORY_MESSAGES, DEFAULT_MAX_TOOL_ITERATIONS,
    DEFAULT_SYSTEM_PROMPT, FALLBACK_REPLY,
};
pub use error::OrchestratorError;
pub use orchestrator::{InboundMessage, Orchestrator, Outcome, SkipReason};
pub use sender::{LoggingSender, MessageSender, MessengerSender, NoOpSender};
pub use store::{ConversationStore, MemoryStore};
