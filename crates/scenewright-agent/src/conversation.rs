//! Conversation — the append-only message history for one goal.
//!
//! Enforces the tool-call ordering rule: once an assistant turn requests
//! tools, each call must be answered, in order and by id, before anything
//! else is appended or the model is called again.

use std::collections::VecDeque;

use serde_json::Value;

use scenewright_core::types::{Message, ToolCall};

use crate::error::ConversationError;

/// One executed tool call with its structured output.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolRecord {
    pub call_id: String,
    pub tool: String,
    pub output: Value,
}

#[derive(Debug)]
pub struct Conversation {
    messages: Vec<Message>,
    /// Call ids of the last assistant turn still awaiting a result.
    pending: VecDeque<String>,
    records: Vec<ToolRecord>,
}

impl Conversation {
    /// Seed with the system instruction and the user's goal.
    pub fn new(system_prompt: &str, goal: &str) -> Self {
        Self {
            messages: vec![Message::system(system_prompt), Message::user(goal)],
            pending: VecDeque::new(),
            records: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Structured outputs of every tool call so far, oldest first.
    pub fn records(&self) -> &[ToolRecord] {
        &self.records
    }

    /// Whether the model may be called now.
    pub fn ready_for_model(&self) -> bool {
        self.pending.is_empty()
    }

    fn ensure_ready(&self) -> Result<(), ConversationError> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(ConversationError::PendingCalls(self.pending.len()))
        }
    }

    /// Append the model's turn. Its tool calls become pending.
    pub fn push_assistant(
        &mut self,
        content: Option<String>,
        tool_calls: Vec<ToolCall>,
    ) -> Result<(), ConversationError> {
        self.ensure_ready()?;
        self.pending.extend(tool_calls.iter().map(|c| c.id.clone()));
        self.messages
            .push(Message::assistant_with_calls(content, tool_calls));
        Ok(())
    }

    /// Answer the next pending call.
    pub fn push_tool_result(
        &mut self,
        call_id: &str,
        tool: &str,
        output: Value,
    ) -> Result<(), ConversationError> {
        match self.pending.front() {
            Some(expected) if expected == call_id => {
                self.pending.pop_front();
            }
            Some(expected) => {
                return Err(ConversationError::UnexpectedResult {
                    expected: expected.clone(),
                    got: call_id.to_string(),
                })
            }
            None => {
                return Err(ConversationError::UnexpectedResult {
                    expected: "none pending".into(),
                    got: call_id.to_string(),
                })
            }
        }

        self.messages
            .push(Message::tool_result(call_id, output.to_string()));
        self.records.push(ToolRecord {
            call_id: call_id.to_string(),
            tool: tool.to_string(),
            output,
        });
        Ok(())
    }

    /// Append a follow-up user message (e.g. a verification correction).
    pub fn push_user(&mut self, text: impl Into<String>) -> Result<(), ConversationError> {
        self.ensure_ready()?;
        self.messages.push(Message::user(text));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
