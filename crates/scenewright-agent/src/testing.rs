//! Scripted collaborators shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use scenewright_core::types::{LlmResponse, Message, ToolDefinition};
use scenewright_engine::{EngineCommand, EngineReply, EngineTransport};
use scenewright_providers::{LlmProvider, LlmRequestConfig, ProviderError};

type ReplyFn = Box<dyn Fn(&EngineCommand) -> EngineReply + Send + Sync>;

/// Engine double that records every command and answers from a closure.
pub struct RecordingEngine {
    commands: Mutex<Vec<EngineCommand>>,
    reply: ReplyFn,
}

impl RecordingEngine {
    pub fn with_reply(
        reply: impl Fn(&EngineCommand) -> EngineReply + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            commands: Mutex::new(Vec::new()),
            reply: Box::new(reply),
        })
    }

    /// Acknowledges everything.
    pub fn ok() -> Arc<Self> {
        Self::with_reply(|cmd| EngineReply::ok(Some(format!("{} done", cmd.endpoint()))))
    }

    /// Fails every command the way an unreachable listener does.
    pub fn offline() -> Arc<Self> {
        Self::with_reply(|cmd| {
            EngineReply::failure(format!(
                "Failed to call engine endpoint '{}'. Is the engine in play mode?",
                cmd.endpoint()
            ))
        })
    }

    pub fn commands(&self) -> Vec<EngineCommand> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl EngineTransport for RecordingEngine {
    async fn send(&self, command: &EngineCommand) -> EngineReply {
        self.commands.lock().unwrap().push(command.clone());
        (self.reply)(command)
    }

    fn describe(&self) -> String {
        "recording".into()
    }
}

/// Provider double that replays a fixed script of responses.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<LlmResponse, ProviderError>>>,
    /// Returned once the script runs out.
    fallback: Option<LlmResponse>,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<LlmResponse, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback: None,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn replies(responses: Vec<LlmResponse>) -> Arc<Self> {
        Self::new(responses.into_iter().map(Ok).collect())
    }

    /// Answers every call with `response`, forever.
    pub fn always(response: LlmResponse) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(response),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Message lists passed to each call, in order.
    pub fn seen(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn chat(
        &self,
        messages: &[Message],
        _tools: Option<&[ToolDefinition]>,
        _model: &str,
        _config: &LlmRequestConfig,
    ) -> Result<LlmResponse, ProviderError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        self.fallback.clone().ok_or(ProviderError::NoChoices)
    }

    fn default_model(&self) -> &str {
        "scripted"
    }

    fn display_name(&self) -> &str {
        "Scripted"
    }
}
