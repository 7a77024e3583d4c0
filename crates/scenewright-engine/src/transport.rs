//! The transport trait and strategy selection.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scenewright_core::config::{EngineConfig, TransportKind};

use crate::command::EngineCommand;
use crate::curl::CurlTransport;
use crate::http::HttpTransport;
use crate::reply::EngineReply;

/// Sends commands to the engine.
///
/// Implementations must not fail: unreachable engines, timeouts and error
/// statuses all come back as `EngineReply { success: false, .. }`.
#[async_trait]
pub trait EngineTransport: Send + Sync {
    async fn send(&self, command: &EngineCommand) -> EngineReply;

    /// Short description for logs and the status command.
    fn describe(&self) -> String;
}

/// Errors constructing a transport. Sending never errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("invalid engine URL '{0}'")]
    InvalidUrl(String),
}

/// Build the transport selected in the config.
pub fn build_transport(config: &EngineConfig) -> Result<Arc<dyn EngineTransport>, EngineError> {
    let base = config.url.trim_end_matches('/').to_string();
    if !base.starts_with("http://") && !base.starts_with("https://") {
        return Err(EngineError::InvalidUrl(config.url.clone()));
    }
    let timeout = Duration::from_secs(config.timeout_secs);

    Ok(match config.transport {
        TransportKind::Http => Arc::new(HttpTransport::new(base, timeout)?),
        TransportKind::Curl => Arc::new(CurlTransport::new(base, timeout, &config.curl_program)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_transport() {
        let transport = build_transport(&EngineConfig::default()).unwrap();
        assert!(transport.describe().starts_with("http"));
        assert!(transport.describe().contains("127.0.0.1:8080"));
    }

    #[test]
    fn test_build_curl_transport() {
        let config = EngineConfig {
            transport: TransportKind::Curl,
            url: "http://127.0.0.1:8080/".into(),
            ..Default::default()
        };
        let transport = build_transport(&config).unwrap();
        assert!(transport.describe().starts_with("curl"));
        assert!(!transport.describe().ends_with('/'));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = EngineConfig {
            url: "127.0.0.1:8080".into(),
            ..Default::default()
        };
        assert!(matches!(
            build_transport(&config),
            Err(EngineError::InvalidUrl(_))
        ));
    }
}
