//! Conversation loop settings.

use std::env;
use std::str::FromStr;

use crate::error::OrchestratorError;

/// Default number of past messages sent to the model.
pub const DEFAULT_MAX_HISTORY_MESSAGES: usize = 10;

/// Default cap on model rounds per inbound message.
pub const DEFAULT_MAX_TOOL_ITERATIONS: usize = 10;

/// System prompt used when a page has none configured.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant for a chatbot. Provide concise and friendly responses.";

/// Reply sent when the model produced no usable answer.
pub const FALLBACK_REPLY: &str = "Sorry, I could not generate a response.";

/// Settings for the conversation loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// How many stored messages to replay as history.
    pub max_history_messages: usize,
    /// Maximum model calls per inbound message.
    pub max_tool_iterations: usize,
    /// Prompt for pages with an empty `system_prompt`.
    pub default_system_prompt: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_history_messages: DEFAULT_MAX_HISTORY_MESSAGES,
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
            default_system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl OrchestratorConfig {
    /// Load from environment variables.
    ///
    /// Optional:
    /// - `MAX_HISTORY_MESSAGES` (default 10)
    /// - `MAX_TOOL_ITERATIONS` (default 10, minimum 1)
    pub fn from_env() -> Result<Self, OrchestratorError> {
        let max_history_messages =
            parse_var("MAX_HISTORY_MESSAGES", DEFAULT_MAX_HISTORY_MESSAGES)?;
        let max_tool_iterations = parse_var("MAX_TOOL_ITERATIONS", DEFAULT_MAX_TOOL_ITERATIONS)?;

        if max_tool_iterations == 0 {
            return Err(OrchestratorError::Config(
                "MAX_TOOL_ITERATIONS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            max_history_messages,
            max_tool_iterations,
            ..Default::default()
        })
    }

    /// The prompt to use for a page.
    pub fn system_prompt<'a>(&'a self, configured: &'a str) -> &'a str {
        if configured.trim().is_empty() {
            &self.default_system_prompt
        } else {
            configured
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, OrchestratorError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|_| {
            OrchestratorError::Config(format!("{} must be a non-negative integer, got {:?}", name, raw))
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Env vars are process-wide; serialize the tests that touch them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.max_history_messages, 10);
        assert_eq!(config.max_tool_iterations, 10);
    }

    #[test]
    fn test_from_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("MAX_HISTORY_MESSAGES", "4");
        env::set_var("MAX_TOOL_ITERATIONS", "3");

        let config = OrchestratorConfig::from_env().unwrap();
        assert_eq!(config.max_history_messages, 4);
        assert_eq!(config.max_tool_iterations, 3);

        env::set_var("MAX_TOOL_ITERATIONS", "0");
        assert!(matches!(
            OrchestratorConfig::from_env(),
            Err(OrchestratorError::Config(_))
        ));

        env::set_var("MAX_TOOL_ITERATIONS", "lots");
        assert!(OrchestratorConfig::from_env().is_err());

        env::remove_var("MAX_HISTORY_MESSAGES");
        env::remove_var("MAX_TOOL_ITERATIONS");
        assert_eq!(
            OrchestratorConfig::from_env().unwrap(),
            OrchestratorConfig::default()
        );
    }

    #[test]
    fn test_system_prompt_fallback() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.system_prompt("  "), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.system_prompt("Sell websites."), "Sell websites.");
    }
}
