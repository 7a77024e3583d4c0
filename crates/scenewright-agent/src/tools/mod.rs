//! Tool modules for the Scenewright agent.

pub mod assets;
pub mod base;
pub mod gui;
pub mod registry;
pub mod scene;
pub mod scripts;
pub mod vision;

use std::sync::Arc;
use std::time::Duration;

use scenewright_core::config::Config;
use scenewright_engine::EngineTransport;
use scenewright_providers::LlmProvider;

pub use base::{DynTool, NoArgs, Tool};
pub use registry::{ToolRegistry, ToolRegistryBuilder};

/// Build the full tool table from config.
///
/// `engine` is shared by every scene tool; `provider` also serves the vision
/// tool's image analysis.
pub fn build_registry(
    config: &Config,
    engine: Arc<dyn EngineTransport>,
    provider: Arc<dyn LlmProvider>,
) -> anyhow::Result<ToolRegistry> {
    let assets = &config.assets;
    let captures = config.vision.capture_candidates(assets);

    Ok(ToolRegistry::builder()
        .with(scene::SpawnObjectTool::new(engine.clone()))
        .with(scene::ClearSceneTool::new(engine.clone()))
        .with(scene::SetLightingTool::new(engine.clone()))
        .with(scene::AttachScriptTool::new(engine.clone()))
        .with(scene::RunSimulationTool::new(engine.clone()))
        .with(scene::GetObjectPositionTool::new(engine.clone()))
        .with(scene::ListAllObjectsTool::new(engine.clone()))
        .with(vision::CaptureAndAnalyzeTool::new(
            engine,
            provider,
            &config.vision,
            captures,
        ))
        .with(assets::SearchModelTool::new(config.catalog.clone()))
        .with(assets::DownloadModelTool::new(
            assets.models_path(),
            Duration::from_secs(assets.download_timeout_secs),
        )?)
        .with(scripts::WriteScriptTool::new(assets.scripts_path())?)
        .with(gui::ClickPlayButtonTool::new(&config.gui))
        .with(gui::ClickGuiElementTool)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingEngine, ScriptedProvider};

    #[test]
    fn test_build_registry_has_every_tool() {
        let registry = build_registry(
            &Config::default(),
            RecordingEngine::ok(),
            ScriptedProvider::replies(vec![]),
        )
        .unwrap();

        assert_eq!(
            registry.tool_names(),
            vec![
                "attach_script_to_object",
                "capture_and_analyze_scene",
                "clear_scene",
                "click_gui_element",
                "click_unity_play_button",
                "download_and_import_model",
                "get_object_position",
                "list_all_objects",
                "run_simulation_and_get_results",
                "search_web_for_3d_model",
                "set_lighting",
                "spawn_object",
                "write_new_unity_script",
            ]
        );
        for def in registry.get_definitions() {
            assert_eq!(def.function.parameters["type"], "object");
        }
    }
}
