//! Send a single text message through the Send API.
//!
//! Run with: cargo run -p messenger --example send_text -- <PSID> "Hello there"
//!
//! Configuration via .env file or environment variables:
//!   META_PAGE_ACCESS_TOKEN - Page access token (required)
//!   META_GRAPH_API_URL     - Graph API base (default: https://graph.facebook.com/v18.0)

use messenger::{MessengerClient, MessengerConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (from project root)
    let _ = dotenvy::from_path("../../.env");
    let _ = dotenvy::dotenv();

    let args: Vec<String> = env::args().collect();
    let Some(recipient) = args.get(1) else {
        eprintln!("usage: send_text <PSID> [message]");
        std::process::exit(2);
    };
    let text = if args.len() > 2 {
        args[2..].join(" ")
    } else {
        "Hello from pagebot!".to_string()
    };

    let token = env::var("META_PAGE_ACCESS_TOKEN")?;
    let client = MessengerClient::new(MessengerConfig::from_env())?;
    println!("Sending via {}", client.config().send_url());

    let sent = client.send_text(&token, recipient, &text).await?;
    println!("Sent: message_id={:?}", sent.message_id);

    Ok(())
}
