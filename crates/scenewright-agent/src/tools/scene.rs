//! Scene tools — thin wrappers that forward one engine command each.
//!
//! Every tool here returns the engine's normalized reply unchanged, so the
//! model sees `{success, data}` or `{success: false, error}`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use scenewright_engine::{
    Color, EngineCommand, EngineTransport, LightingPreset, Scale, SpawnPayload, Vec3,
};

use super::base::{NoArgs, Tool};

/// Simulation length when the model does not ask for one.
const DEFAULT_SIMULATION_SECS: f64 = 10.0;

fn vec3_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "description": description,
        "properties": {
            "x": { "type": "number" },
            "y": { "type": "number" },
            "z": { "type": "number" }
        }
    })
}

fn require_name(field: &str, value: &str) -> anyhow::Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{field} must not be empty");
    }
    Ok(())
}

// ─────────────────────────────────────────────
// spawn_object
// ─────────────────────────────────────────────

pub struct SpawnObjectTool {
    engine: Arc<dyn EngineTransport>,
}

impl SpawnObjectTool {
    pub fn new(engine: Arc<dyn EngineTransport>) -> Self {
        Self { engine }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpawnObjectArgs {
    pub object_name: String,
    pub position: Vec3,
    #[serde(default)]
    pub scale: Scale,
    #[serde(default)]
    pub color: Option<Color>,
}

#[async_trait]
impl Tool for SpawnObjectTool {
    type Args = SpawnObjectArgs;

    fn name(&self) -> &str {
        "spawn_object"
    }

    fn description(&self) -> &str {
        "Spawn a primitive ('cube', 'sphere', 'cylinder', 'capsule', 'plane') or an imported \
         model file (use the full filename, e.g. 'low_poly_fox.glb') at a position, with \
         optional per-axis scale and RGB color (0-1)."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "object_name": {
                    "type": "string",
                    "description": "Primitive name or imported model filename with extension"
                },
                "position": vec3_schema("World position"),
                "scale": vec3_schema("Per-axis scale; omitted axes default to 1"),
                "color": {
                    "type": "object",
                    "description": "RGB color, each channel 0-1",
                    "properties": {
                        "r": { "type": "number" },
                        "g": { "type": "number" },
                        "b": { "type": "number" }
                    }
                }
            },
            "required": ["object_name", "position"]
        })
    }

    async fn execute(&self, args: SpawnObjectArgs) -> anyhow::Result<Value> {
        require_name("object_name", &args.object_name)?;
        info!(object = %args.object_name, "spawning object");
        let command = EngineCommand::Spawn(SpawnPayload {
            object_name: args.object_name,
            position: args.position,
            scale: args.scale,
            color: args.color.map(Color::clamped),
        });
        Ok(self.engine.send(&command).await.to_value())
    }
}

// ─────────────────────────────────────────────
// clear_scene
// ─────────────────────────────────────────────

pub struct ClearSceneTool {
    engine: Arc<dyn EngineTransport>,
}

impl ClearSceneTool {
    pub fn new(engine: Arc<dyn EngineTransport>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for ClearSceneTool {
    type Args = NoArgs;

    fn name(&self) -> &str {
        "clear_scene"
    }

    fn description(&self) -> &str {
        "Remove every object the agent has spawned from the scene."
    }

    fn parameters(&self) -> Value {
        json!({ "type": "object", "properties": {}, "required": [] })
    }

    async fn execute(&self, _args: NoArgs) -> anyhow::Result<Value> {
        Ok(self.engine.send(&EngineCommand::ClearScene).await.to_value())
    }
}

// ─────────────────────────────────────────────
// set_lighting
// ─────────────────────────────────────────────

pub struct SetLightingTool {
    engine: Arc<dyn EngineTransport>,
}

impl SetLightingTool {
    pub fn new(engine: Arc<dyn EngineTransport>) -> Self {
        Self { engine }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetLightingArgs {
    pub preset: LightingPreset,
}

#[async_trait]
impl Tool for SetLightingTool {
    type Args = SetLightingArgs;

    fn name(&self) -> &str {
        "set_lighting"
    }

    fn description(&self) -> &str {
        "Set the scene's lighting to one of the presets."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "preset": { "type": "string", "enum": ["day", "night", "sunset"] }
            },
            "required": ["preset"]
        })
    }

    async fn execute(&self, args: SetLightingArgs) -> anyhow::Result<Value> {
        Ok(self
            .engine
            .send(&EngineCommand::SetLighting(args.preset))
            .await
            .to_value())
    }
}

// ─────────────────────────────────────────────
// attach_script_to_object
// ─────────────────────────────────────────────

pub struct AttachScriptTool {
    engine: Arc<dyn EngineTransport>,
}

impl AttachScriptTool {
    pub fn new(engine: Arc<dyn EngineTransport>) -> Self {
        Self { engine }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttachScriptArgs {
    pub object_name: String,
    pub script_name: String,
}

#[async_trait]
impl Tool for AttachScriptTool {
    type Args = AttachScriptArgs;

    fn name(&self) -> &str {
        "attach_script_to_object"
    }

    fn description(&self) -> &str {
        "Attach a previously written C# script (by class name) to an object in the scene."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "object_name": { "type": "string" },
                "script_name": { "type": "string", "description": "Class name, without .cs" }
            },
            "required": ["object_name", "script_name"]
        })
    }

    async fn execute(&self, args: AttachScriptArgs) -> anyhow::Result<Value> {
        require_name("object_name", &args.object_name)?;
        require_name("script_name", &args.script_name)?;
        let script_name = args
            .script_name
            .strip_suffix(".cs")
            .unwrap_or(&args.script_name)
            .to_string();
        let command = EngineCommand::AttachScript {
            object_name: args.object_name,
            script_name,
        };
        Ok(self.engine.send(&command).await.to_value())
    }
}

// ─────────────────────────────────────────────
// run_simulation_and_get_results
// ─────────────────────────────────────────────

pub struct RunSimulationTool {
    engine: Arc<dyn EngineTransport>,
}

impl RunSimulationTool {
    pub fn new(engine: Arc<dyn EngineTransport>) -> Self {
        Self { engine }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSimulationArgs {
    pub robot_name: String,
    pub target_name: String,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[async_trait]
impl Tool for RunSimulationTool {
    type Args = RunSimulationArgs;

    fn name(&self) -> &str {
        "run_simulation_and_get_results"
    }

    fn description(&self) -> &str {
        "Run a physics simulation moving the robot object toward the target object and report the outcome."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "robot_name": { "type": "string" },
                "target_name": { "type": "string" },
                "duration": { "type": "number", "description": "Seconds to simulate (default 10)" }
            },
            "required": ["robot_name", "target_name"]
        })
    }

    async fn execute(&self, args: RunSimulationArgs) -> anyhow::Result<Value> {
        let duration = args.duration.unwrap_or(DEFAULT_SIMULATION_SECS);
        if !(duration.is_finite() && duration > 0.0) {
            anyhow::bail!("duration must be a positive number of seconds, got {duration}");
        }
        info!(robot = %args.robot_name, target = %args.target_name, duration, "running simulation");
        let command = EngineCommand::RunSimulation {
            robot_name: args.robot_name,
            target_name: args.target_name,
            duration,
        };
        Ok(self.engine.send(&command).await.to_value())
    }
}

// ─────────────────────────────────────────────
// get_object_position / list_all_objects
// ─────────────────────────────────────────────

pub struct GetObjectPositionTool {
    engine: Arc<dyn EngineTransport>,
}

impl GetObjectPositionTool {
    pub fn new(engine: Arc<dyn EngineTransport>) -> Self {
        Self { engine }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectNameArgs {
    pub object_name: String,
}

#[async_trait]
impl Tool for GetObjectPositionTool {
    type Args = ObjectNameArgs;

    fn name(&self) -> &str {
        "get_object_position"
    }

    fn description(&self) -> &str {
        "Get the current world coordinates of a named object."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "object_name": { "type": "string" } },
            "required": ["object_name"]
        })
    }

    async fn execute(&self, args: ObjectNameArgs) -> anyhow::Result<Value> {
        require_name("object_name", &args.object_name)?;
        let command = EngineCommand::GetObjectPosition {
            object_name: args.object_name,
        };
        Ok(self.engine.send(&command).await.to_value())
    }
}

pub struct ListAllObjectsTool {
    engine: Arc<dyn EngineTransport>,
}

impl ListAllObjectsTool {
    pub fn new(engine: Arc<dyn EngineTransport>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for ListAllObjectsTool {
    type Args = NoArgs;

    fn name(&self) -> &str {
        "list_all_objects"
    }

    fn description(&self) -> &str {
        "List the names of all objects currently in the scene."
    }

    fn parameters(&self) -> Value {
        json!({ "type": "object", "properties": {}, "required": [] })
    }

    async fn execute(&self, _args: NoArgs) -> anyhow::Result<Value> {
        Ok(self.engine.send(&EngineCommand::ListAllObjects).await.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingEngine;
    use crate::tools::base::DynTool;

    #[tokio::test]
    async fn test_spawn_defaults_scale_and_clamps_color() {
        let engine = RecordingEngine::ok();
        let tool = SpawnObjectTool::new(engine.clone());
        let out = tool
            .call(json!({
                "object_name": "cube",
                "position": {"x": 1, "y": 0, "z": 2},
                "color": {"r": 1.5, "g": 0.0}
            }))
            .await
            .unwrap();
        assert_eq!(out["success"], true);

        let sent = engine.commands();
        assert_eq!(sent.len(), 1);
        match &sent[0] {
            EngineCommand::Spawn(p) => {
                assert_eq!(p.position, Vec3::new(1.0, 0.0, 2.0));
                assert_eq!(p.scale, Scale::default());
                assert_eq!(p.color, Some(Color { r: 1.0, g: 0.0, b: 1.0 }));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_spawn_requires_position() {
        let engine = RecordingEngine::ok();
        let tool = SpawnObjectTool::new(engine.clone());
        assert!(tool.call(json!({"object_name": "cube"})).await.is_err());
        assert!(engine.commands().is_empty());
    }

    #[tokio::test]
    async fn test_lighting_rejects_unknown_preset() {
        let engine = RecordingEngine::ok();
        let tool = SetLightingTool::new(engine.clone());
        let err = tool.call(json!({"preset": "dusk"})).await.unwrap_err();
        assert!(err.to_string().contains("Invalid arguments"));
        assert!(engine.commands().is_empty());
    }

    #[tokio::test]
    async fn test_attach_strips_extension() {
        let engine = RecordingEngine::ok();
        let tool = AttachScriptTool::new(engine.clone());
        tool.call(json!({"object_name": "Cube", "script_name": "Wobble.cs"}))
            .await
            .unwrap();
        assert_eq!(
            engine.commands()[0],
            EngineCommand::AttachScript {
                object_name: "Cube".into(),
                script_name: "Wobble".into()
            }
        );
    }

    #[tokio::test]
    async fn test_simulation_default_duration() {
        let engine = RecordingEngine::ok();
        let tool = RunSimulationTool::new(engine.clone());
        tool.call(json!({"robot_name": "robot", "target_name": "target"}))
            .await
            .unwrap();
        match &engine.commands()[0] {
            EngineCommand::RunSimulation { duration, .. } => assert_eq!(*duration, 10.0),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_simulation_rejects_negative_duration() {
        let engine = RecordingEngine::ok();
        let tool = RunSimulationTool::new(engine.clone());
        let err = tool
            .call(json!({"robot_name": "r", "target_name": "t", "duration": -1.0}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("duration"));
        assert!(engine.commands().is_empty());
    }

    #[tokio::test]
    async fn test_engine_failure_passes_through() {
        let engine = RecordingEngine::offline();
        let tool = ClearSceneTool::new(engine);
        let out = tool.call(json!({})).await.unwrap();
        assert_eq!(out["success"], false);
        assert!(out["error"].as_str().unwrap().contains("clear_scene"));
    }

    #[tokio::test]
    async fn test_position_requires_name() {
        let tool = GetObjectPositionTool::new(RecordingEngine::ok());
        assert!(tool.call(json!({"object_name": "  "})).await.is_err());
    }

    #[tokio::test]
    async fn test_list_all_objects() {
        let engine = RecordingEngine::ok();
        let out = ListAllObjectsTool::new(engine.clone())
            .call(json!({}))
            .await
            .unwrap();
        assert_eq!(out["success"], true);
        assert_eq!(engine.commands(), vec![EngineCommand::ListAllObjects]);
    }
}
