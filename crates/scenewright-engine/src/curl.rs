//! External `curl` strategy.
//!
//! Spawns `curl -X POST <url> -H 'Content-Type: application/json' -d <json>
//! -s -w %{http_code}` and splits the trailing three-digit status off stdout.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::command::EngineCommand;
use crate::reply::EngineReply;
use crate::transport::EngineTransport;

#[derive(Debug, Clone)]
pub struct CurlTransport {
    base_url: String,
    timeout: Duration,
    program: String,
}

impl CurlTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration, program: &str) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            program: program.to_string(),
        }
    }
}

/// Split curl's stdout into `(status, body)`.
///
/// `-w %{http_code}` appends the status as the last three characters.
pub fn parse_curl_output(stdout: &str) -> Option<(u16, &str)> {
    let split = stdout.len().checked_sub(3)?;
    if !stdout.is_char_boundary(split) {
        return None;
    }
    let (body, code) = stdout.split_at(split);
    let status = code.parse::<u16>().ok()?;
    Some((status, body))
}

#[async_trait]
impl EngineTransport for CurlTransport {
    async fn send(&self, command: &EngineCommand) -> EngineReply {
        let endpoint = command.endpoint();
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);
        let payload = command.payload().to_string();
        debug!(endpoint, url = %url, program = %self.program, "engine request via curl");

        let mut cmd = Command::new(&self.program);
        cmd.args(["-X", "POST", &url])
            .args(["-H", "Content-Type: application/json"])
            .args(["-d", &payload])
            .args(["-s", "-w", "%{http_code}"])
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(endpoint, error = %e, "failed to spawn curl");
                return EngineReply::failure(format!(
                    "Failed to run '{}' for engine endpoint '{endpoint}': {e}",
                    self.program
                ));
            }
            Err(_) => {
                warn!(endpoint, "curl timed out");
                return EngineReply::failure(format!(
                    "Engine call '{endpoint}' timed out after {}s",
                    self.timeout.as_secs()
                ));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let Some((status, body)) = parse_curl_output(&stdout) else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(endpoint, code = ?output.status.code(), "curl produced no status");
            return EngineReply::failure(format!(
                "Failed to call engine endpoint '{endpoint}'. Is the engine in play mode? {}",
                stderr.trim()
            ));
        };

        // curl reports 000 when no connection was made.
        if status == 0 {
            warn!(endpoint, "engine unreachable via curl");
            return EngineReply::failure(format!(
                "Failed to call engine endpoint '{endpoint}'. Is the engine in play mode?"
            ));
        }

        let reply = EngineReply::from_status(status, body);
        if reply.success {
            info!(endpoint, status, "engine call succeeded");
        } else {
            warn!(endpoint, status, "engine call failed");
        }
        reply
    }

    fn describe(&self) -> String {
        format!("curl ({}) → {}", self.program, self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::LightingPreset;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Tests that exercise a real `curl` skip when it is not installed.
    fn curl_installed() -> bool {
        std::process::Command::new("curl")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn transport(base: impl Into<String>, timeout_secs: u64) -> CurlTransport {
        CurlTransport::new(base, Duration::from_secs(timeout_secs), "curl")
    }

    #[test]
    fn test_parse_status_and_body() {
        let (status, body) =
            parse_curl_output(r#"{"success":true,"message":"ok"}200"#).unwrap();
        assert_eq!(status, 200);
        assert_eq!(body, r#"{"success":true,"message":"ok"}"#);
    }

    #[test]
    fn test_parse_status_only() {
        assert_eq!(parse_curl_output("404"), Some((404, "")));
        assert_eq!(parse_curl_output("000"), Some((0, "")));
    }

    #[test]
    fn test_parse_rejects_short_or_garbage() {
        assert_eq!(parse_curl_output("20"), None);
        assert_eq!(parse_curl_output("body-abc"), None);
    }

    #[test]
    fn test_parse_multibyte_tail() {
        // Three bytes from the end lands inside a multi-byte character.
        assert_eq!(parse_curl_output("✓"), None);
    }

    #[tokio::test]
    async fn test_missing_program_is_failure() {
        let transport = CurlTransport::new(
            "http://127.0.0.1:8080",
            Duration::from_secs(2),
            "definitely-not-a-curl-binary",
        );
        let reply = transport.send(&EngineCommand::ClearScene).await;
        assert!(!reply.success);
        assert!(reply.error.unwrap().contains("clear_scene"));
    }

    #[tokio::test]
    async fn test_clear_scene_success() {
        if !curl_installed() {
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/clear_scene"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "message": "Scene cleared."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = transport(server.uri(), 5)
            .send(&EngineCommand::ClearScene)
            .await;
        assert!(reply.success, "{reply:?}");
        assert_eq!(reply.data.as_deref(), Some("Scene cleared."));
    }

    #[tokio::test]
    async fn test_error_status_is_failure() {
        if !curl_installed() {
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/set_lighting"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad"))
            .mount(&server)
            .await;

        let reply = transport(server.uri(), 5)
            .send(&EngineCommand::SetLighting(LightingPreset::Night))
            .await;
        assert!(!reply.success);
        assert_eq!(reply.error.as_deref(), Some("HTTP 400: bad"));
    }

    #[tokio::test]
    async fn test_timeout_is_failure() {
        if !curl_installed() {
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/capture_vision"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let reply = transport(server.uri(), 1)
            .send(&EngineCommand::CaptureVision)
            .await;
        assert!(!reply.success);
        assert!(reply.error.unwrap().contains("timed out after 1s"));
    }

    #[tokio::test]
    async fn test_offline_engine_is_failure() {
        if !curl_installed() {
            return;
        }
        let reply = transport("http://127.0.0.1:1", 5)
            .send(&EngineCommand::ListAllObjects)
            .await;
        assert!(!reply.success);
        let error = reply.error.unwrap();
        assert!(error.contains("list_all_objects"));
        assert!(error.contains("Is the engine in play mode?"));
    }
}
