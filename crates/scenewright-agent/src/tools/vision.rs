//! Vision tool — capture the engine camera and have a vision model describe it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use scenewright_core::config::VisionConfig;
use scenewright_core::types::{ContentPart, Message};
use scenewright_engine::{EngineCommand, EngineTransport};
use scenewright_providers::{LlmProvider, LlmRequestConfig};

use super::base::Tool;

pub struct CaptureAndAnalyzeTool {
    engine: Arc<dyn EngineTransport>,
    provider: Arc<dyn LlmProvider>,
    model: String,
    max_tokens: u32,
    /// Where the engine may have written the capture, in lookup order.
    candidates: Vec<PathBuf>,
}

impl CaptureAndAnalyzeTool {
    pub fn new(
        engine: Arc<dyn EngineTransport>,
        provider: Arc<dyn LlmProvider>,
        vision: &VisionConfig,
        candidates: Vec<PathBuf>,
    ) -> Self {
        Self {
            engine,
            provider,
            model: vision.model.clone(),
            max_tokens: vision.max_tokens,
            candidates,
        }
    }

    fn find_capture(&self) -> Option<&Path> {
        self.candidates
            .iter()
            .map(PathBuf::as_path)
            .find(|p| p.is_file())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzeArgs {
    pub analysis_prompt: String,
}

fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

#[async_trait]
impl Tool for CaptureAndAnalyzeTool {
    type Args = AnalyzeArgs;

    fn name(&self) -> &str {
        "capture_and_analyze_scene"
    }

    fn description(&self) -> &str {
        "Capture the current camera view and ask a vision model about it. Ask detailed \
         questions, e.g. 'Describe every object, its shape, color and position'."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "analysis_prompt": {
                    "type": "string",
                    "description": "The question to ask about the captured image"
                }
            },
            "required": ["analysis_prompt"]
        })
    }

    async fn execute(&self, args: AnalyzeArgs) -> anyhow::Result<Value> {
        let reply = self.engine.send(&EngineCommand::CaptureVision).await;
        if !reply.success {
            return Ok(reply.to_value());
        }

        let Some(path) = self.find_capture() else {
            warn!(candidates = ?self.candidates, "capture file not found");
            return Ok(json!({
                "success": false,
                "error": "Scene was captured but the image file was not found."
            }));
        };

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            anyhow::anyhow!("failed to read capture {}: {e}", path.display())
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "capture loaded");

        let message = Message::user_parts(vec![
            ContentPart::text(&args.analysis_prompt),
            ContentPart::image_data(image_mime(path), &BASE64.encode(&bytes)),
        ]);
        let request = LlmRequestConfig {
            max_tokens: self.max_tokens,
            temperature: 0.0,
        };

        info!(model = %self.model, "analyzing capture");
        match self
            .provider
            .chat(std::slice::from_ref(&message), None, &self.model, &request)
            .await
        {
            Ok(resp) => {
                let analysis = resp.content.unwrap_or_default();
                info!(analysis = %analysis, "vision analysis");
                Ok(json!({ "success": true, "vlm_analysis": analysis }))
            }
            Err(e) => {
                warn!(error = %e, "vision call failed");
                Ok(json!({
                    "success": false,
                    "error": format!("VISION ERROR: Could not analyze image - {e}")
                }))
            }
        }
    }
}
