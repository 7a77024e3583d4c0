//! LLM provider layer for Scenewright.
//!
//! - [`traits::LlmProvider`]: the seam the agent loop and vision tool call through
//! - [`http_provider::HttpProvider`]: OpenAI-compatible `/chat/completions` client
//! - [`error::ProviderError`]: transport, status and decoding failures

pub mod error;
pub mod http_provider;
pub mod traits;

pub use error::ProviderError;
pub use http_provider::{create_provider, HttpProvider};
pub use traits::{LlmProvider, LlmRequestConfig};
