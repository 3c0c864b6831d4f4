//! Simple smoke test for GroqBrain chat completion.
//!
//! Run with: cargo run -p groq-brain --example test_chat
//! Or with a custom message: cargo run -p groq-brain --example test_chat -- "Your message here"
//!
//! Make sure to set environment variables in .env:
//!   GROQ_API_KEY - Groq API key for authentication

use groq_brain::{ChatMessage, ChatModel, GroqBrain};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let message_text = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        "Hello! Please respond with a short greeting.".to_string()
    };

    let brain = GroqBrain::from_env()?;
    println!("API URL: {}", brain.config().api_url);
    println!("Model: {}", brain.config().model);
    println!("Sending: \"{}\"\n", message_text);

    let messages = vec![
        ChatMessage::system("You are a helpful assistant. Keep answers short."),
        ChatMessage::user(message_text),
    ];
    let reply = brain.complete(&messages, &[]).await?;

    println!("=== Response ===");
    println!("{}", reply.content.unwrap_or_default());
    println!("================");

    Ok(())
}
