//! Scenewright Agent — core loop, tools, and verification.
//!
//! This crate contains:
//! - **tools**: Tool trait, registry, and the scene, vision, asset, script and GUI tools
//! - **conversation**: Message history with the tool-call ordering rule
//! - **verification**: Policies that judge a final answer
//! - **context**: System prompt construction
//! - **agent_loop**: The LLM ↔ tool-calling main loop

pub mod agent_loop;
pub mod context;
pub mod conversation;
pub mod error;
pub mod progress;
pub mod tools;
pub mod verification;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use scenewright_core::config::AgentConfig;

pub use agent_loop::{AgentLoop, AgentOutcome, LoopSettings};
pub use context::ContextBuilder;
pub use conversation::{Conversation, ToolRecord};
pub use error::{AgentError, ConversationError, ToolError};
pub use progress::{Progress, ProgressSink};
pub use tools::{build_registry, Tool, ToolRegistry};
pub use verification::{AlwaysPass, KeywordVerification, Verdict, VerificationPolicy};

/// The verification policy selected by `agent.verification`.
pub fn policy_from_config(config: &AgentConfig) -> Arc<dyn VerificationPolicy> {
    if config.verification {
        Arc::new(KeywordVerification::default())
    } else {
        Arc::new(AlwaysPass)
    }
}
