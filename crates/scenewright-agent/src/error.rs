//! Agent and tool error types.

use serde_json::{json, Value};

use scenewright_providers::ProviderError;

/// Why a single tool call produced no regular result.
///
/// None of these stop the loop: each becomes an error record that the model
/// reads as the tool's output.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool '{0}' not found")]
    UnknownTool(String),
    #[error("Malformed JSON arguments for '{tool}': {reason}")]
    MalformedArguments { tool: String, reason: String },
    #[error("Invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },
    #[error("Error executing {tool}: {message}")]
    Failed { tool: String, message: String },
}

impl ToolError {
    /// The record appended to the conversation in place of a tool result.
    pub fn to_record(&self) -> Value {
        json!({ "success": false, "error": self.to_string() })
    }
}

/// Conversation ordering violations. These indicate a bug in the loop, not
/// bad model output.
#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("{0} tool call(s) still awaiting results")]
    PendingCalls(usize),
    #[error("result for call '{got}' does not answer the next pending call ({expected})")]
    UnexpectedResult { expected: String, got: String },
}

/// Errors that end an agent run.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("model call failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("no final answer after {0} model calls")]
    IterationLimit(u32),
    #[error(transparent)]
    Conversation(#[from] ConversationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_record_shape() {
        let record = ToolError::UnknownTool("fly_away".into()).to_record();
        assert_eq!(record["success"], false);
        assert_eq!(record["error"], "Tool 'fly_away' not found");
    }

    #[test]
    fn test_malformed_mentions_reason() {
        let err = ToolError::MalformedArguments {
            tool: "spawn_object".into(),
            reason: "EOF while parsing an object at line 1 column 1".into(),
        };
        let text = err.to_string();
        assert!(text.contains("spawn_object"));
        assert!(text.contains("EOF while parsing"));
    }

    #[test]
    fn test_iteration_limit_display() {
        assert_eq!(
            AgentError::IterationLimit(10).to_string(),
            "no final answer after 10 model calls"
        );
    }
}
