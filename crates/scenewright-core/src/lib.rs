//! Scenewright core — chat types, configuration, and shared helpers.
//!
//! - **types**: OpenAI-format messages, tool calls, tool definitions
//! - **config**: on-disk schema, loader, env overrides, validation
//! - **utils**: data-dir paths, filenames, truncation

pub mod config;
pub mod types;
pub mod utils;

pub use config::{Config, ConfigError};
pub use types::{LlmResponse, Message, ToolCall, ToolDefinition};
