//! Engine commands and their JSON payloads.
//!
//! Field names and defaults match what the engine's listener deserializes:
//! missing position components are `0`, missing scale and color components
//! are `1`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A world-space position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Per-axis scale; omitted axes stay at `1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0, z: 1.0 }
    }
}

/// RGB color with components in `0.0..=1.0`; omitted channels stay at `1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Default for Color {
    fn default() -> Self {
        Self { r: 1.0, g: 1.0, b: 1.0 }
    }
}

impl Color {
    /// Clamp every channel into `0.0..=1.0`.
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightingPreset {
    Day,
    Night,
    Sunset,
}

impl LightingPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            LightingPreset::Day => "day",
            LightingPreset::Night => "night",
            LightingPreset::Sunset => "sunset",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnPayload {
    /// A primitive (`cube`, `sphere`, …) or an imported model file (`fox.glb`).
    pub object_name: String,
    pub position: Vec3,
    pub scale: Scale,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

/// Every command the engine listener understands.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineCommand {
    Spawn(SpawnPayload),
    ClearScene,
    SetLighting(LightingPreset),
    AttachScript {
        object_name: String,
        script_name: String,
    },
    CaptureVision,
    RunSimulation {
        robot_name: String,
        target_name: String,
        duration: f64,
    },
    GetObjectPosition {
        object_name: String,
    },
    ListAllObjects,
}

impl EngineCommand {
    /// Path segment the command is posted to.
    pub fn endpoint(&self) -> &'static str {
        match self {
            EngineCommand::Spawn(_) => "spawn",
            EngineCommand::ClearScene => "clear_scene",
            EngineCommand::SetLighting(_) => "set_lighting",
            EngineCommand::AttachScript { .. } => "attach_script",
            EngineCommand::CaptureVision => "capture_vision",
            EngineCommand::RunSimulation { .. } => "run_simulation",
            EngineCommand::GetObjectPosition { .. } => "get_object_position",
            EngineCommand::ListAllObjects => "list_all_objects",
        }
    }

    /// JSON body sent with the command. Argument-less commands send `{}`.
    pub fn payload(&self) -> Value {
        match self {
            EngineCommand::Spawn(spawn) => json!(spawn),
            EngineCommand::ClearScene
            | EngineCommand::CaptureVision
            | EngineCommand::ListAllObjects => json!({}),
            EngineCommand::SetLighting(preset) => json!({ "preset": preset.as_str() }),
            EngineCommand::AttachScript {
                object_name,
                script_name,
            } => json!({ "object_name": object_name, "script_name": script_name }),
            EngineCommand::RunSimulation {
                robot_name,
                target_name,
                duration,
            } => json!({
                "robot_name": robot_name,
                "target_name": target_name,
                "duration": duration,
            }),
            EngineCommand::GetObjectPosition { object_name } => {
                json!({ "object_name": object_name })
            }
        }
    }
}
