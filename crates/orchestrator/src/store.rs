//! Conversation storage seam.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use database::{bot_config, lead, message, BotConfig, Database, Message, NewMessage};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::OrchestratorError;

/// Everything the conversation loop reads and writes.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Config for a page, if the page is known.
    async fn bot_config(&self, page_id: &str) -> Result<Option<BotConfig>, OrchestratorError>;

    /// Whether a human has taken over this conversation.
    async fn needs_human(&self, page_id: &str, sender_id: &str) -> Result<bool, OrchestratorError>;

    /// Most recent `limit` messages for a sender, oldest first.
    async fn recent_messages(
        &self,
        sender_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, OrchestratorError>;

    /// Store a single message.
    async fn save_message(&self, message: &NewMessage) -> Result<(), OrchestratorError>;

    /// Store a user message and the reply to it.
    async fn save_exchange(
        &self,
        user: &NewMessage,
        assistant: &NewMessage,
    ) -> Result<(), OrchestratorError>;

    /// Record an interaction on the lead, creating it if needed.
    async fn touch_lead(&self, page_id: &str, sender_id: &str) -> Result<(), OrchestratorError>;
}

#[async_trait]
impl ConversationStore for Database {
    async fn bot_config(&self, page_id: &str) -> Result<Option<BotConfig>, OrchestratorError> {
        Ok(bot_config::get_by_page_id(self.pool(), page_id).await?)
    }

    async fn needs_human(&self, page_id: &str, sender_id: &str) -> Result<bool, OrchestratorError> {
        let lead = lead::get_lead(self.pool(), page_id, sender_id).await?;
        Ok(lead.map(|l| l.needs_human).unwrap_or(false))
    }

    async fn recent_messages(
        &self,
        sender_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, OrchestratorError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        Ok(message::recent_messages(self.pool(), sender_id, limit).await?)
    }

    async fn save_message(&self, message: &NewMessage) -> Result<(), OrchestratorError> {
        message::insert_message(self.pool(), message).await?;
        Ok(())
    }

    async fn save_exchange(
        &self,
        user: &NewMessage,
        assistant: &NewMessage,
    ) -> Result<(), OrchestratorError> {
        message::insert_exchange(self.pool(), user, assistant).await?;
        Ok(())
    }

    async fn touch_lead(&self, page_id: &str, sender_id: &str) -> Result<(), OrchestratorError> {
        lead::touch_lead(self.pool(), page_id, sender_id).await?;
        Ok(())
    }
}

/// In-memory store for tests and local experiments.
#[derive(Debug, Default)]
pub struct MemoryStore {
    configs: Mutex<HashMap<String, BotConfig>>,
    messages: Mutex<Vec<Message>>,
    human_takeovers: Mutex<HashSet<(String, String)>>,
    touched: Mutex<Vec<(String, String)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page config.
    pub async fn insert_config(&self, config: BotConfig) {
        self.configs
            .lock()
            .await
            .insert(config.page_id.clone(), config);
    }

    /// Mark a conversation as taken over by a human.
    pub async fn set_needs_human(&self, page_id: &str, sender_id: &str) {
        self.human_takeovers
            .lock()
            .await
            .insert((page_id.to_string(), sender_id.to_string()));
    }

    /// Every stored message, in insertion order.
    pub async fn messages(&self) -> Vec<Message> {
        self.messages.lock().await.clone()
    }

    /// Every `(page_id, sender_id)` touched, in call order.
    pub async fn touched(&self) -> Vec<(String, String)> {
        self.touched.lock().await.clone()
    }

    fn to_row(message: &NewMessage) -> Message {
        Message {
            id: Uuid::new_v4(),
            page_id: message.page_id.clone(),
            sender_id: message.sender_id.clone(),
            role: message.role.as_str().to_string(),
            message_text: message.message_text.clone(),
            platform: message.platform.as_str().to_string(),
            created_at: message.created_at,
        }
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn bot_config(&self, page_id: &str) -> Result<Option<BotConfig>, OrchestratorError> {
        Ok(self.configs.lock().await.get(page_id).cloned())
    }

    async fn needs_human(&self, page_id: &str, sender_id: &str) -> Result<bool, OrchestratorError> {
        Ok(self
            .human_takeovers
            .lock()
            .await
            .contains(&(page_id.to_string(), sender_id.to_string())))
    }

    async fn recent_messages(
        &self,
        sender_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, OrchestratorError> {
        // Insertion order is chronological.
        let matching: Vec<Message> = self
            .messages
            .lock()
            .await
            .iter()
            .filter(|m| m.sender_id == sender_id)
            .cloned()
            .collect();
        let skip = matching.len().saturating_sub(limit);
        Ok(matching.into_iter().skip(skip).collect())
    }

    async fn save_message(&self, message: &NewMessage) -> Result<(), OrchestratorError> {
        self.messages.lock().await.push(Self::to_row(message));
        Ok(())
    }

    async fn save_exchange(
        &self,
        user: &NewMessage,
        assistant: &NewMessage,
    ) -> Result<(), OrchestratorError> {
        let mut messages = self.messages.lock().await;
        messages.push(Self::to_row(user));
        messages.push(Self::to_row(assistant));
        Ok(())
    }

    async fn touch_lead(&self, page_id: &str, sender_id: &str) -> Result<(), OrchestratorError> {
        self.touched
            .lock()
            .await
            .push((page_id.to_string(), sender_id.to_string()));
        Ok(())
    }
}
