//! GUI automation tools.
//!
//! Clicking the editor's Play button shells out to a configurable click
//! program (`xdotool` by default); element clicks are simulated only.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::process::Command;
use tracing::{info, warn};

use scenewright_core::config::GuiConfig;

use super::base::{NoArgs, Tool};

const CLICK_TIMEOUT: Duration = Duration::from_secs(10);

// ─────────────────────────────────────────────
// click_unity_play_button
// ─────────────────────────────────────────────

pub struct ClickPlayButtonTool {
    program: String,
    args: Vec<String>,
    coords: (i32, i32),
}

impl ClickPlayButtonTool {
    pub fn new(gui: &GuiConfig) -> Self {
        Self {
            program: gui.click_program.clone(),
            args: gui.click_args.clone(),
            coords: gui.play_button,
        }
    }

    /// Click arguments with `{x}` / `{y}` filled in.
    fn click_args(&self) -> Vec<String> {
        let (x, y) = self.coords;
        self.args
            .iter()
            .map(|a| a.replace("{x}", &x.to_string()).replace("{y}", &y.to_string()))
            .collect()
    }
}

#[async_trait]
impl Tool for ClickPlayButtonTool {
    type Args = NoArgs;

    fn name(&self) -> &str {
        "click_unity_play_button"
    }

    fn description(&self) -> &str {
        "Click the editor's Play button to enter play mode. Depends on screen layout."
    }

    fn parameters(&self) -> Value {
        json!({ "type": "object", "properties": {}, "required": [] })
    }

    async fn execute(&self, _args: NoArgs) -> anyhow::Result<Value> {
        let args = self.click_args();
        info!(program = %self.program, coords = ?self.coords, "clicking play button");

        let mut cmd = Command::new(&self.program);
        cmd.args(&args).kill_on_drop(true);

        let failure = |reason: String| {
            warn!(reason = %reason, "GUI automation failed");
            json!({
                "success": false,
                "error": format!(
                    "GUI automation failed: {reason}. Is '{}' installed and configured?",
                    self.program
                ),
            })
        };

        match tokio::time::timeout(CLICK_TIMEOUT, cmd.output()).await {
            Ok(Ok(output)) if output.status.success() => Ok(json!({
                "success": true,
                "message": format!("Clicked screen at ({}, {}).", self.coords.0, self.coords.1),
            })),
            Ok(Ok(output)) => Ok(failure(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
            Ok(Err(e)) => Ok(failure(e.to_string())),
            Err(_) => Ok(failure(format!("timed out after {}s", CLICK_TIMEOUT.as_secs()))),
        }
    }
}

// ─────────────────────────────────────────────
// click_gui_element
// ─────────────────────────────────────────────

/// Simulated click on a described element; reports what it would click.
pub struct ClickGuiElementTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClickElementArgs {
    pub element_description: String,
}

#[async_trait]
impl Tool for ClickGuiElementTool {
    type Args = ClickElementArgs;

    fn name(&self) -> &str {
        "click_gui_element"
    }

    fn description(&self) -> &str {
        "(Simulated) click an editor GUI element described in words."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "element_description": {
                    "type": "string",
                    "description": "e.g. 'the color swatch for the main material'"
                }
            },
            "required": ["element_description"]
        })
    }

    async fn execute(&self, args: ClickElementArgs) -> anyhow::Result<Value> {
        let message = format!(
            "GUI TOOL (MOCK): Clicking on element described as: '{}'",
            args.element_description
        );
        info!("{message}");
        Ok(json!({ "success": true, "message": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::base::DynTool;

    #[test]
    fn test_click_args_substituted() {
        let tool = ClickPlayButtonTool::new(&GuiConfig::default());
        assert_eq!(tool.click_args(), vec!["mousemove", "950", "60", "click", "1"]);
    }

    #[tokio::test]
    async fn test_missing_click_program_is_failure() {
        let gui = GuiConfig {
            click_program: "definitely-not-a-click-tool".into(),
            ..Default::default()
        };
        let out = ClickPlayButtonTool::new(&gui).call(json!({})).await.unwrap();
        assert_eq!(out["success"], false);
        assert!(out["error"].as_str().unwrap().starts_with("GUI automation failed"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_click_program_success() {
        let gui = GuiConfig {
            click_program: "true".into(),
            ..Default::default()
        };
        let out = ClickPlayButtonTool::new(&gui).call(json!({})).await.unwrap();
        assert_eq!(out["success"], true);
        assert_eq!(out["message"], "Clicked screen at (950, 60).");
    }

    #[tokio::test]
    async fn test_click_gui_element_mock() {
        let out = ClickGuiElementTool
            .call(json!({"element_description": "the Play button"}))
            .await
            .unwrap();
        assert_eq!(out["success"], true);
        assert!(out["message"].as_str().unwrap().contains("the Play button"));
    }
}
