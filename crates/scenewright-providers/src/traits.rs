//! LLM provider trait.
//!
//! The agent loop and the vision tool depend only on this trait; tests swap
//! in scripted providers.

use async_trait::async_trait;
use scenewright_core::types::{LlmResponse, Message, ToolDefinition};

use crate::error::ProviderError;

/// Sampling settings passed with each call.
#[derive(Clone, Debug)]
pub struct LlmRequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for LlmRequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request.
    ///
    /// # Arguments
    /// * `messages` — Conversation so far in OpenAI format.
    /// * `tools`    — Tool definitions the model may call; `None` for plain chat.
    /// * `model`    — Model identifier (e.g. `"gpt-4o"`).
    /// * `config`   — Temperature, max_tokens.
    async fn chat(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        model: &str,
        config: &LlmRequestConfig,
    ) -> Result<LlmResponse, ProviderError>;

    /// The default model for this provider instance.
    fn default_model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
