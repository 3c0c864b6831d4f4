//! Main orchestrator that runs one inbound message through the model.

use std::sync::Arc;

use brain_core::{ChatMessage, ChatModel, ToolExecutor, ToolRequest, ToolRequestMeta};
use chrono::{Duration, Utc};
use database::{Message, MessageRole, NewMessage, Platform};
use tracing::{debug, error, info, warn};

use crate::config::{OrchestratorConfig, FALLBACK_REPLY};
use crate::error::OrchestratorError;
use crate::sender::MessageSender;
use crate::store::ConversationStore;

/// A customer text message to answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub page_id: String,
    pub sender_id: String,
    pub platform: Platform,
    pub text: String,
}

impl InboundMessage {
    pub fn new(
        page_id: impl Into<String>,
        sender_id: impl Into<String>,
        platform: Platform,
        text: impl Into<String>,
    ) -> Self {
        Self {
            page_id: page_id.into(),
            sender_id: sender_id.into(),
            platform,
            text: text.into(),
        }
    }
}

/// Why a message was not answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No bot config exists for the page.
    UnknownPage,
    /// The page's bot is switched off.
    Inactive,
    /// A human has taken over the conversation.
    HumanTakeover,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SkipReason::UnknownPage => "no bot config for page",
            SkipReason::Inactive => "bot inactive",
            SkipReason::HumanTakeover => "human takeover",
        };
        f.write_str(text)
    }
}

/// What happened to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A reply was generated, stored and handed to the sender.
    Replied {
        text: String,
        /// Number of tool calls executed on the way.
        tool_calls: usize,
    },
    /// No reply was generated.
    Skipped(SkipReason),
}

/// Answer produced by the tool loop.
struct LoopResult {
    text: String,
    tool_calls: usize,
}

/// Coordinates storage, the model, tools and the transport for one page
/// conversation turn.
///
/// All collaborators are trait objects so tests can swap any of them.
pub struct Orchestrator {
    model: Arc<dyn ChatModel>,
    tools: Arc<dyn ToolExecutor>,
    store: Arc<dyn ConversationStore>,
    sender: Arc<dyn MessageSender>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(
        model: Arc<dyn ChatModel>,
        tools: Arc<dyn ToolExecutor>,
        store: Arc<dyn ConversationStore>,
        sender: Arc<dyn MessageSender>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            model,
            tools,
            store,
            sender,
            config,
        }
    }

    /// Get the loop settings.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Process an incoming message end-to-end.
    ///
    /// This method:
    /// 1. Loads the page config and checks the bot may answer
    /// 2. Builds the prompt from the system prompt and recent history
    /// 3. Runs the model, executing tool calls until it answers
    /// 4. Stores the exchange and touches the lead
    /// 5. Sends the reply (send failures are logged, not returned)
    pub async fn process(&self, message: InboundMessage) -> Result<Outcome, OrchestratorError> {
        info!(
            page_id = %message.page_id,
            sender_id = %message.sender_id,
            platform = %message.platform,
            "Processing message"
        );
        debug!(text = %message.text, "Inbound text");

        // 1. Page config
        let Some(bot) = self.store.bot_config(&message.page_id).await? else {
            warn!(page_id = %message.page_id, "No bot config for page, ignoring message");
            return Ok(Outcome::Skipped(SkipReason::UnknownPage));
        };

        let user_message = NewMessage::now(
            Some(message.page_id.clone()),
            &message.sender_id,
            MessageRole::User,
            &message.text,
            message.platform,
        );

        if !bot.is_active {
            info!(page_id = %message.page_id, "Bot inactive, storing message only");
            self.store.save_message(&user_message).await?;
            return Ok(Outcome::Skipped(SkipReason::Inactive));
        }

        if self
            .store
            .needs_human(&message.page_id, &message.sender_id)
            .await?
        {
            info!(sender_id = %message.sender_id, "Human takeover active, storing message only");
            self.store.save_message(&user_message).await?;
            return Ok(Outcome::Skipped(SkipReason::HumanTakeover));
        }

        // 2. Prompt
        let history = self
            .store
            .recent_messages(&message.sender_id, self.config.max_history_messages)
            .await?;
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(
            self.config.system_prompt(&bot.system_prompt),
        ));
        messages.extend(history.iter().filter_map(history_to_chat));
        messages.push(ChatMessage::user(&message.text));

        // 3. Model + tools
        let meta = ToolRequestMeta::new(&message.page_id, &message.sender_id);
        let result = self.run_tool_loop(messages, &meta).await?;

        // 4. Persist. The reply is stamped strictly after the user message.
        let replied_at = Utc::now().max(user_message.created_at + Duration::milliseconds(1));
        let assistant_message = NewMessage {
            role: MessageRole::Assistant,
            message_text: result.text.clone(),
            created_at: replied_at,
            ..user_message.clone()
        };
        self.store
            .save_exchange(&user_message, &assistant_message)
            .await?;
        self.store
            .touch_lead(&message.page_id, &message.sender_id)
            .await?;

        // 5. Deliver
        if let Err(e) = self
            .sender
            .send_message(bot.access_token.as_deref(), &message.sender_id, &result.text)
            .await
        {
            error!(sender_id = %message.sender_id, error = %e, "Failed to send reply");
        }

        info!(
            sender_id = %message.sender_id,
            tool_calls = result.tool_calls,
            "Reply generated"
        );
        Ok(Outcome::Replied {
            text: result.text,
            tool_calls: result.tool_calls,
        })
    }

    /// Call the model until it answers without tool calls or the
    /// iteration cap is reached.
    async fn run_tool_loop(
        &self,
        mut messages: Vec<ChatMessage>,
        meta: &ToolRequestMeta,
    ) -> Result<LoopResult, OrchestratorError> {
        let definitions = self.tools.definitions();
        let mut tool_calls = 0;

        for iteration in 0..self.config.max_tool_iterations {
            let reply = self.model.complete(&messages, &definitions).await?;

            if !reply.has_tool_calls() {
                let text = reply
                    .content
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| FALLBACK_REPLY.to_string());
                return Ok(LoopResult { text, tool_calls });
            }

            debug!(
                iteration,
                requested = reply.tool_calls.len(),
                "Model requested tool calls"
            );

            let calls = reply.tool_calls.clone();
            messages.push(reply.into_assistant_message());

            for call in calls {
                info!(tool = %call.function.name, iteration, "Executing tool call");
                tool_calls += 1;

                let request = match ToolRequest::from_call(
                    call.id.clone(),
                    call.function.name.clone(),
                    &call.function.arguments,
                ) {
                    Ok(request) => request.with_metadata(meta.clone()),
                    Err(e) => {
                        warn!(tool = %call.function.name, error = %e, "Malformed tool arguments");
                        messages.push(ChatMessage::tool(
                            call.id,
                            format!("Error: arguments are not a JSON object: {}", e),
                        ));
                        continue;
                    }
                };

                let result = self.tools.execute(request).await;
                debug!(tool = %call.function.name, success = result.success, "Tool result");
                messages.push(ChatMessage::tool(result.tool_call_id, result.content));
            }
        }

        warn!(
            max = self.config.max_tool_iterations,
            "Tool loop hit iteration cap without an answer"
        );
        Ok(LoopResult {
            text: FALLBACK_REPLY.to_string(),
            tool_calls,
        })
    }
}

/// Replay a stored message to the model.
fn history_to_chat(message: &Message) -> Option<ChatMessage> {
    match message.role.parse::<MessageRole>() {
        Ok(MessageRole::User) => Some(ChatMessage::user(&message.message_text)),
        Ok(MessageRole::Assistant) => Some(ChatMessage::assistant(&message.message_text)),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sender::NoOpSender;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use brain_core::{
        BrainError, ModelReply, Role, ToolCall, ToolDefinition, ToolResult,
    };
    use database::BotConfig;
    use serde_json::json;
    use std::collections::VecDeque;
    use tokio::sync::Mutex;

    /// Model that replays canned replies and records every prompt.
    struct ScriptedModel {
        replies: Mutex<VecDeque<Result<ModelReply, BrainError>>>,
        prompts: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Result<ModelReply, BrainError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Always asks for the same tool.
        fn looping() -> Self {
            Self::new(Vec::new())
        }

        async fn prompts(&self) -> Vec<Vec<ChatMessage>> {
            self.prompts.lock().await.clone()
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            _tools: &[ToolDefinition],
        ) -> Result<ModelReply, BrainError> {
            self.prompts.lock().await.push(messages.to_vec());
            match self.replies.lock().await.pop_front() {
                Some(reply) => reply,
                None => Ok(ModelReply::tool_calls(vec![ToolCall::function(
                    "call_loop",
                    "get_active_services",
                    "{}",
                )])),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    /// Tool executor that answers every known tool with a fixed string.
    #[derive(Default)]
    struct FakeTools {
        requests: Mutex<Vec<ToolRequest>>,
    }

    #[async_trait]
    impl ToolExecutor for FakeTools {
        async fn execute(&self, request: ToolRequest) -> ToolResult {
            let id = request.id.clone();
            let name = request.name.clone();
            self.requests.lock().await.push(request);
            match name.as_str() {
                "get_active_services" => {
                    ToolResult::success(id, r#"[{"name":"Logo","price":120.0}]"#)
                }
                other => ToolResult::error(id, format!("Unknown tool: {}", other)),
            }
        }

        fn definitions(&self) -> Vec<ToolDefinition> {
            vec![ToolDefinition::function(
                "get_active_services",
                "List services",
                json!({"type": "object", "properties": {}}),
            )]
        }
    }

    /// Sender that records what it was asked to send.
    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<(Option<String>, String, String)>>,
    }

    #[async_trait]
    impl MessageSender for RecordingSender {
        async fn send_message(
            &self,
            access_token: Option<&str>,
            recipient: &str,
            text: &str,
        ) -> Result<(), OrchestratorError> {
            self.sent.lock().await.push((
                access_token.map(str::to_string),
                recipient.to_string(),
                text.to_string(),
            ));
            Ok(())
        }
    }

    /// Sender that always fails.
    struct FailingSender;

    #[async_trait]
    impl MessageSender for FailingSender {
        async fn send_message(
            &self,
            _access_token: Option<&str>,
            _recipient: &str,
            _text: &str,
        ) -> Result<(), OrchestratorError> {
            Err(OrchestratorError::SendFailed("boom".to_string()))
        }
    }

    fn bot(page_id: &str, prompt: &str, active: bool) -> BotConfig {
        BotConfig {
            id: uuid::Uuid::new_v4(),
            page_id: page_id.to_string(),
            page_name: Some("Studio".to_string()),
            system_prompt: prompt.to_string(),
            access_token: Some("page-token".to_string()),
            is_active: active,
            created_at: Utc::now(),
        }
    }

    fn inbound(text: &str) -> InboundMessage {
        InboundMessage::new("PAGE_1", "USER_1", Platform::Facebook, text)
    }

    struct Harness {
        model: Arc<ScriptedModel>,
        tools: Arc<FakeTools>,
        store: Arc<MemoryStore>,
        sender: Arc<RecordingSender>,
        orchestrator: Orchestrator,
    }

    async fn harness(model: ScriptedModel, config: OrchestratorConfig) -> Harness {
        let model = Arc::new(model);
        let tools = Arc::new(FakeTools::default());
        let store = Arc::new(MemoryStore::new());
        let sender = Arc::new(RecordingSender::default());
        store.insert_config(bot("PAGE_1", "Sell websites.", true)).await;

        let orchestrator = Orchestrator::new(
            model.clone(),
            tools.clone(),
            store.clone(),
            sender.clone(),
            config,
        );
        Harness {
            model,
            tools,
            store,
            sender,
            orchestrator,
        }
    }

    #[tokio::test]
    async fn test_plain_reply_is_stored_and_sent() {
        let h = harness(
            ScriptedModel::new(vec![Ok(ModelReply::text("Hi! How can I help?"))]),
            OrchestratorConfig::default(),
        )
        .await;

        let outcome = h.orchestrator.process(inbound("hello")).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Replied {
                text: "Hi! How can I help?".to_string(),
                tool_calls: 0
            }
        );

        let stored = h.store.messages().await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].role, "user");
        assert_eq!(stored[0].message_text, "hello");
        assert_eq!(stored[1].role, "assistant");
        assert!(stored[0].created_at < stored[1].created_at);

        let sent = h.sender.sent.lock().await.clone();
        assert_eq!(
            sent,
            vec![(
                Some("page-token".to_string()),
                "USER_1".to_string(),
                "Hi! How can I help?".to_string()
            )]
        );
        assert_eq!(
            h.store.touched().await,
            vec![("PAGE_1".to_string(), "USER_1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_prompt_has_system_history_then_user() {
        let h = harness(
            ScriptedModel::new(vec![
                Ok(ModelReply::text("first answer")),
                Ok(ModelReply::text("second answer")),
            ]),
            OrchestratorConfig::default(),
        )
        .await;

        h.orchestrator.process(inbound("first")).await.unwrap();
        h.orchestrator.process(inbound("second")).await.unwrap();

        let prompts = h.model.prompts().await;
        let second = &prompts[1];
        let roles: Vec<Role> = second.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(second[0].content.as_deref(), Some("Sell websites."));
        assert_eq!(second[1].content.as_deref(), Some("first"));
        assert_eq!(second[2].content.as_deref(), Some("first answer"));
        assert_eq!(second[3].content.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_history_is_capped() {
        let config = OrchestratorConfig {
            max_history_messages: 2,
            ..Default::default()
        };
        let h = harness(
            ScriptedModel::new(vec![
                Ok(ModelReply::text("a1")),
                Ok(ModelReply::text("a2")),
                Ok(ModelReply::text("a3")),
            ]),
            config,
        )
        .await;

        h.orchestrator.process(inbound("u1")).await.unwrap();
        h.orchestrator.process(inbound("u2")).await.unwrap();
        h.orchestrator.process(inbound("u3")).await.unwrap();

        let prompts = h.model.prompts().await;
        let last = &prompts[2];
        let contents: Vec<_> = last.iter().filter_map(|m| m.content.as_deref()).collect();
        assert_eq!(contents, vec!["Sell websites.", "u2", "a2", "u3"]);
    }

    #[tokio::test]
    async fn test_default_prompt_when_empty() {
        let h = harness(
            ScriptedModel::new(vec![Ok(ModelReply::text("ok"))]),
            OrchestratorConfig::default(),
        )
        .await;
        h.store.insert_config(bot("PAGE_1", "", true)).await;

        h.orchestrator.process(inbound("hi")).await.unwrap();

        let prompts = h.model.prompts().await;
        assert_eq!(
            prompts[0][0].content.as_deref(),
            Some(crate::config::DEFAULT_SYSTEM_PROMPT)
        );
    }

    #[tokio::test]
    async fn test_tool_round_trip() {
        let h = harness(
            ScriptedModel::new(vec![
                Ok(ModelReply::tool_calls(vec![ToolCall::function(
                    "call_1",
                    "get_active_services",
                    "{}",
                )])),
                Ok(ModelReply::text("A logo is $120.")),
            ]),
            OrchestratorConfig::default(),
        )
        .await;

        let outcome = h.orchestrator.process(inbound("prices?")).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Replied {
                text: "A logo is $120.".to_string(),
                tool_calls: 1
            }
        );

        let requests = h.tools.requests.lock().await.clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].metadata,
            Some(ToolRequestMeta::new("PAGE_1", "USER_1"))
        );

        // Second prompt carries the assistant tool call and the tool result.
        let prompts = h.model.prompts().await;
        let second = &prompts[1];
        let n = second.len();
        assert_eq!(second[n - 2].role, Role::Assistant);
        assert!(second[n - 2].tool_calls.is_some());
        assert_eq!(second[n - 1].role, Role::Tool);
        assert_eq!(second[n - 1].tool_call_id.as_deref(), Some("call_1"));
        assert!(second[n - 1]
            .content
            .as_deref()
            .unwrap_or_default()
            .contains("Logo"));

        // Only the user message and the final answer are stored.
        assert_eq!(h.store.messages().await.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_tool_and_bad_arguments_fed_back() {
        let h = harness(
            ScriptedModel::new(vec![
                Ok(ModelReply::tool_calls(vec![
                    ToolCall::function("call_1", "launch_rocket", "{}"),
                    ToolCall::function("call_2", "get_active_services", "[1, 2"),
                ])),
                Ok(ModelReply::text("Sorry about that.")),
            ]),
            OrchestratorConfig::default(),
        )
        .await;

        let outcome = h.orchestrator.process(inbound("hi")).await.unwrap();
        assert!(matches!(outcome, Outcome::Replied { tool_calls: 2, .. }));

        let prompts = h.model.prompts().await;
        let tool_messages: Vec<_> = prompts[1]
            .iter()
            .filter(|m| m.role == Role::Tool)
            .collect();
        assert_eq!(tool_messages.len(), 2);
        assert!(tool_messages[0]
            .content
            .as_deref()
            .unwrap_or_default()
            .starts_with("Error: Unknown tool"));
        assert!(tool_messages[1]
            .content
            .as_deref()
            .unwrap_or_default()
            .starts_with("Error: arguments"));
    }

    #[tokio::test]
    async fn test_iteration_cap_uses_fallback() {
        let config = OrchestratorConfig {
            max_tool_iterations: 3,
            ..Default::default()
        };
        let h = harness(ScriptedModel::looping(), config).await;

        let outcome = h.orchestrator.process(inbound("hi")).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Replied {
                text: FALLBACK_REPLY.to_string(),
                tool_calls: 3
            }
        );
        assert_eq!(h.model.prompts().await.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_content_uses_fallback() {
        let h = harness(
            ScriptedModel::new(vec![Ok(ModelReply::default())]),
            OrchestratorConfig::default(),
        )
        .await;

        let outcome = h.orchestrator.process(inbound("hi")).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Replied {
                text: FALLBACK_REPLY.to_string(),
                tool_calls: 0
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_page_skipped() {
        let h = harness(ScriptedModel::new(vec![]), OrchestratorConfig::default()).await;

        let outcome = h
            .orchestrator
            .process(InboundMessage::new("OTHER", "USER_1", Platform::Facebook, "hi"))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Skipped(SkipReason::UnknownPage));
        assert!(h.store.messages().await.is_empty());
        assert!(h.model.prompts().await.is_empty());
    }

    #[tokio::test]
    async fn test_inactive_bot_stores_only() {
        let h = harness(ScriptedModel::new(vec![]), OrchestratorConfig::default()).await;
        h.store.insert_config(bot("PAGE_1", "x", false)).await;

        let outcome = h.orchestrator.process(inbound("anyone?")).await.unwrap();
        assert_eq!(outcome, Outcome::Skipped(SkipReason::Inactive));

        let stored = h.store.messages().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].role, "user");
        assert!(h.sender.sent.lock().await.is_empty());
        assert!(h.model.prompts().await.is_empty());
    }

    #[tokio::test]
    async fn test_human_takeover_stores_only() {
        let h = harness(ScriptedModel::new(vec![]), OrchestratorConfig::default()).await;
        h.store.set_needs_human("PAGE_1", "USER_1").await;

        let outcome = h.orchestrator.process(inbound("hello?")).await.unwrap();
        assert_eq!(outcome, Outcome::Skipped(SkipReason::HumanTakeover));
        assert_eq!(h.store.messages().await.len(), 1);
        assert!(h.model.prompts().await.is_empty());
    }

    #[tokio::test]
    async fn test_model_error_fails_without_storing() {
        let h = harness(
            ScriptedModel::new(vec![Err(BrainError::Timeout)]),
            OrchestratorConfig::default(),
        )
        .await;

        let result = h.orchestrator.process(inbound("hi")).await;
        assert!(matches!(result, Err(OrchestratorError::Brain(_))));
        assert!(h.store.messages().await.is_empty());
        assert!(h.sender.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_send_failure_still_replies() {
        let store = Arc::new(MemoryStore::new());
        store.insert_config(bot("PAGE_1", "x", true)).await;
        let orchestrator = Orchestrator::new(
            Arc::new(ScriptedModel::new(vec![Ok(ModelReply::text("hey"))])),
            Arc::new(FakeTools::default()),
            store.clone(),
            Arc::new(FailingSender),
            OrchestratorConfig::default(),
        );

        let outcome = orchestrator.process(inbound("hi")).await.unwrap();
        assert!(matches!(outcome, Outcome::Replied { .. }));
        assert_eq!(store.messages().await.len(), 2);
    }

    #[tokio::test]
    async fn test_noop_sender_works() {
        let store = Arc::new(MemoryStore::new());
        store.insert_config(bot("PAGE_1", "x", true)).await;
        let orchestrator = Orchestrator::new(
            Arc::new(ScriptedModel::new(vec![Ok(ModelReply::text("hey"))])),
            Arc::new(FakeTools::default()),
            store,
            Arc::new(NoOpSender),
            OrchestratorConfig::default(),
        );
        assert!(orchestrator.process(inbound("hi")).await.is_ok());
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::HumanTakeover.to_string(), "human takeover");
    }
}
