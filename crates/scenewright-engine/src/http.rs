//! In-process HTTP strategy.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::command::EngineCommand;
use crate::reply::EngineReply;
use crate::transport::EngineTransport;

/// Posts each command as JSON to `<base>/<endpoint>` with `reqwest`.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    fn url_for(&self, command: &EngineCommand) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), command.endpoint())
    }
}

#[async_trait]
impl EngineTransport for HttpTransport {
    async fn send(&self, command: &EngineCommand) -> EngineReply {
        let endpoint = command.endpoint();
        let url = self.url_for(command);
        debug!(endpoint, url = %url, "engine request");

        let response = match self.client.post(&url).json(&command.payload()).send().await {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => {
                warn!(endpoint, "engine request timed out");
                return EngineReply::failure(format!(
                    "Engine call '{endpoint}' timed out after {}s",
                    self.timeout.as_secs()
                ));
            }
            Err(e) => {
                warn!(endpoint, error = %e, "engine unreachable");
                return EngineReply::failure(format!(
                    "Failed to call engine endpoint '{endpoint}'. Is the engine in play mode? Error: {e}"
                ));
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(endpoint, error = %e, "failed to read engine response");
                return EngineReply::failure(format!(
                    "Engine endpoint '{endpoint}' returned {status} with an unreadable body: {e}"
                ));
            }
        };

        let reply = EngineReply::from_status(status, &body);
        if reply.success {
            info!(endpoint, status, "engine call succeeded");
        } else {
            warn!(endpoint, status, "engine call failed");
        }
        reply
    }

    fn describe(&self) -> String {
        format!("http → {}", self.base_url)
    }
}
