//! Tool execution support for the conversation loop.
//!
//! The model requests tool calls by name with JSON arguments; a
//! [`ToolExecutor`] runs them and hands back a [`ToolResult`] whose content
//! is fed to the model on the next round.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Conversation the tool call belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRequestMeta {
    /// Messenger page the conversation happens on.
    pub page_id: String,
    /// Page-scoped sender ID of the customer.
    pub sender_id: String,
}

impl ToolRequestMeta {
    /// Create metadata for a page/sender pair.
    pub fn new(page_id: impl Into<String>, sender_id: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            sender_id: sender_id.into(),
        }
    }
}

/// Result of a tool execution.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// The tool call ID this result corresponds to.
    pub tool_call_id: String,
    /// The result content (will be sent back to the model).
    pub content: String,
    /// Whether the tool execution succeeded.
    pub success: bool,
}

impl ToolResult {
    /// Create a successful tool result.
    pub fn success(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
            success: true,
        }
    }

    /// Create a failed tool result.
    pub fn error(tool_call_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            content: format!("Error: {}", error.into()),
            success: false,
        }
    }
}

/// A request to execute a tool.
#[derive(Debug, Clone)]
pub struct ToolRequest {
    /// Unique ID for this tool call.
    pub id: String,
    /// Name of the tool to execute.
    pub name: String,
    /// Arguments as a JSON object.
    pub arguments: HashMap<String, Value>,
    /// Conversation the call was made in.
    pub metadata: Option<ToolRequestMeta>,
}

impl ToolRequest {
    /// Parse arguments from a JSON string.
    ///
    /// Models sometimes send `""` or `"null"` for tools without parameters;
    /// both parse to an empty argument map.
    pub fn from_call(
        id: String,
        name: String,
        arguments_json: &str,
    ) -> Result<Self, serde_json::Error> {
        let trimmed = arguments_json.trim();
        let arguments = if trimmed.is_empty() || trimmed == "null" {
            HashMap::new()
        } else {
            serde_json::from_str(trimmed)?
        };
        Ok(Self {
            id,
            name,
            arguments,
            metadata: None,
        })
    }

    /// Attach metadata to an existing tool request.
    pub fn with_metadata(mut self, metadata: ToolRequestMeta) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Get a string argument by name.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a non-empty string argument, trimmed.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get_string(key)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Get a required string argument, or return an error message.
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_non_empty(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }
}

/// JSON-schema description of a function tool offered to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool type (always "function" for function tools).
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function specification.
    pub function: FunctionDefinition,
}

/// Function definition for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Name of the function.
    pub name: String,
    /// Description of what the function does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the function parameters.
    pub parameters: Value,
}

impl ToolDefinition {
    /// Create a function tool definition.
    pub fn function(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: Some(description.into()),
                parameters,
            },
        }
    }
}

/// Trait for executing tools called by a model.
///
/// # Example
///
/// ```ignore
/// use brain_core::{ToolExecutor, ToolRequest, ToolResult};
///
/// struct Lookup;
///
/// #[async_trait]
/// impl ToolExecutor for Lookup {
///     async fn execute(&self, request: ToolRequest) -> ToolResult {
///         match request.name.as_str() {
///             "lookup" => ToolResult::success(&request.id, "42"),
///             _ => ToolResult::error(&request.id, "Unknown tool"),
///         }
///     }
///
///     fn definitions(&self) -> Vec<ToolDefinition> {
///         vec![]
///     }
/// }
/// ```
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a tool and return the result.
    ///
    /// Failures are reported in-band as error results so the model can
    /// react to them.
    async fn execute(&self, request: ToolRequest) -> ToolResult;

    /// Schemas of the tools this executor supports, as offered to the model.
    fn definitions(&self) -> Vec<ToolDefinition>;

    /// List the tools this executor supports.
    fn supported_tools(&self) -> Vec<String> {
        self.definitions()
            .into_iter()
            .map(|definition| definition.function.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("call-123", "Some data");
        assert!(result.success);
        assert_eq!(result.tool_call_id, "call-123");
        assert_eq!(result.content, "Some data");
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("call-456", "Something went wrong");
        assert!(!result.success);
        assert_eq!(result.content, "Error: Something went wrong");
    }

    #[test]
    fn test_tool_request_parsing() {
        let request = ToolRequest::from_call(
            "id-1".to_string(),
            "create_order".to_string(),
            r#"{"client_name": "Ana", "agreed_price": "500"}"#,
        )
        .unwrap();

        assert_eq!(request.name, "create_order");
        assert_eq!(request.get_string("client_name"), Some("Ana"));
        assert_eq!(request.get_string("agreed_price"), Some("500"));
        assert!(request.metadata.is_none());
    }

    #[test]
    fn test_tool_request_empty_arguments() {
        for raw in ["", "null", "  "] {
            let request =
                ToolRequest::from_call("id".to_string(), "get_active_services".to_string(), raw)
                    .unwrap();
            assert!(request.arguments.is_empty());
        }
    }

    #[test]
    fn test_tool_request_malformed_arguments() {
        let result =
            ToolRequest::from_call("id".to_string(), "create_order".to_string(), "{not json");
        assert!(result.is_err());
    }

    #[test]
    fn test_require_string_missing_or_blank() {
        let request = ToolRequest::from_call(
            "id-1".to_string(),
            "test".to_string(),
            r#"{"foo": "bar", "blank": "   "}"#,
        )
        .unwrap();

        assert!(request.require_string("missing").is_err());
        assert!(request.require_string("blank").is_err());
        assert_eq!(request.require_string("foo"), Ok("bar"));
    }

    #[test]
    fn test_tool_definition_serialization() {
        let definition = ToolDefinition::function(
            "request_human_intervention",
            "Hand the chat to a human",
            serde_json::json!({"type": "object", "properties": {}}),
        );
        let json = serde_json::to_value(&definition).unwrap();
        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "request_human_intervention");
    }
}
