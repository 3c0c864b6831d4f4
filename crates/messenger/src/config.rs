//! Configuration types for the Messenger client.

/// Default Graph API base URL.
pub const DEFAULT_GRAPH_API_URL: &str = "https://graph.facebook.com/v18.0";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for talking to the Meta Graph API.
#[derive(Debug, Clone)]
pub struct MessengerConfig {
    /// Base URL including the API version (e.g., "https://graph.facebook.com/v18.0").
    pub graph_api_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl MessengerConfig {
    /// Create a new configuration with the given Graph API base URL.
    pub fn new(graph_api_url: impl Into<String>) -> Self {
        Self {
            graph_api_url: graph_api_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load from `META_GRAPH_API_URL`, falling back to the default.
    pub fn from_env() -> Self {
        match std::env::var("META_GRAPH_API_URL") {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    /// Get the Send API endpoint URL.
    pub fn send_url(&self) -> String {
        format!("{}/me/messages", self.graph_api_url.trim_end_matches('/'))
    }
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GRAPH_API_URL)
    }
}
