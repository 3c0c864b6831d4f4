//! Tool trait definition and types.

use std::collections::HashMap;

use async_trait::async_trait;
use brain_core::ToolRequestMeta;
use serde_json::Value;

use crate::error::ToolError;

/// Arguments passed to a tool for execution.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    /// Parameters as key-value pairs.
    pub params: HashMap<String, Value>,
    /// Conversation the call was made in.
    pub context: Option<ToolRequestMeta>,
}

impl ToolArgs {
    /// Create new tool arguments with the given parameters.
    pub fn new(params: HashMap<String, Value>) -> Self {
        Self {
            params,
            context: None,
        }
    }

    /// Create tool arguments bound to a conversation.
    pub fn with_context(params: HashMap<String, Value>, context: ToolRequestMeta) -> Self {
        Self {
            params,
            context: Some(context),
        }
    }

    /// The conversation context, required by every sales tool.
    pub fn context(&self) -> Result<&ToolRequestMeta, ToolError> {
        self.context.as_ref().ok_or(ToolError::MissingContext)
    }

    /// Get a required non-empty string parameter, trimmed.
    ///
    /// Numbers are accepted and rendered as text, since models often send
    /// prices unquoted.
    pub fn get_string(&self, key: &str) -> Result<String, ToolError> {
        let value = self
            .params
            .get(key)
            .filter(|v| !v.is_null())
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))?;

        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => {
                return Err(ToolError::InvalidParameter {
                    name: key.to_string(),
                    reason: "expected string".to_string(),
                })
            }
        };

        if text.is_empty() {
            return Err(ToolError::MissingParameter(key.to_string()));
        }
        Ok(text)
    }

    /// Get an optional string parameter. Blank strings count as absent.
    pub fn get_string_opt(&self, key: &str) -> Result<Option<String>, ToolError> {
        match self.get_string(key) {
            Ok(value) => Ok(Some(value)),
            Err(ToolError::MissingParameter(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Output from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// The result content (text or JSON).
    pub content: String,
    /// Whether the execution was successful.
    pub success: bool,
}

impl ToolOutput {
    /// Create a successful output.
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: true,
        }
    }

    /// Create a successful output from a JSON value.
    pub fn json(value: &Value) -> Result<Self, ToolError> {
        Ok(Self::success(serde_json::to_string(value)?))
    }
}

/// A capability the model can call by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's unique name (used for dispatch).
    fn name(&self) -> &str;

    /// Description shown to the model.
    fn description(&self) -> &str;

    /// JSON schema of the parameters object.
    fn parameters(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError>;
}
