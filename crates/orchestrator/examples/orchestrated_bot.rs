//! Console chat through the full conversation loop.
//!
//! Uses Groq for the model, an in-memory store and a sender that logs
//! replies instead of calling the Send API. No sales tools are offered.
//!
//! Run with: cargo run -p orchestrator --example orchestrated_bot
//!
//! Requires GROQ_API_KEY (read from .env if present).

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use brain_core::{async_trait, ToolDefinition, ToolExecutor, ToolRequest, ToolResult};
use chrono::Utc;
use database::{BotConfig, Platform};
use groq_brain::GroqBrain;
use orchestrator::{
    InboundMessage, LoggingSender, MemoryStore, Orchestrator, OrchestratorConfig, Outcome,
};

const PAGE_ID: &str = "console-page";
const SENDER_ID: &str = "console-user";

struct NoTools;

#[async_trait]
impl ToolExecutor for NoTools {
    async fn execute(&self, request: ToolRequest) -> ToolResult {
        ToolResult::error(request.id, format!("Unknown tool: {}", request.name))
    }

    fn definitions(&self) -> Vec<ToolDefinition> {
        Vec::new()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orchestrator=info".into()),
        )
        .init();

    let store = Arc::new(MemoryStore::new());
    store
        .insert_config(BotConfig {
            id: uuid::Uuid::new_v4(),
            page_id: PAGE_ID.to_string(),
            page_name: Some("Console".to_string()),
            system_prompt: String::new(),
            access_token: None,
            is_active: true,
            created_at: Utc::now(),
        })
        .await;

    let orchestrator = Orchestrator::new(
        Arc::new(GroqBrain::from_env()?),
        Arc::new(NoTools),
        store,
        Arc::new(LoggingSender),
        OrchestratorConfig::from_env()?,
    );

    println!("Type a message (Ctrl-D to quit).");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let message = InboundMessage::new(PAGE_ID, SENDER_ID, Platform::Facebook, text);
        match orchestrator.process(message).await? {
            Outcome::Replied { text, tool_calls } => {
                println!("{} ({} tool calls)", text, tool_calls)
            }
            Outcome::Skipped(reason) => println!("[skipped: {}]", reason),
        }
    }

    Ok(())
}
