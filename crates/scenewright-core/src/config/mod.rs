//! Configuration system — schema, loading, env var overrides, validation.
//!
//! # Usage
//! ```no_run
//! use scenewright_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Engine: {}", cfg.engine.url);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{get_config_path, load_config, save_config};
pub use schema::{
    default_catalog, AgentConfig, AssetsConfig, CatalogEntry, Config, EngineConfig, GuiConfig,
    ProviderConfig, ServerConfig, TransportKind, VisionConfig,
};

/// Configuration problems that stop a run before it starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no API key configured (set OPENAI_API_KEY or provider.apiKey in the config file)")]
    MissingApiKey,
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("failed to write config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}
