//! Configuration schema.
//!
//! Hierarchy: `Config` → `AgentConfig`, `ProviderConfig`, `EngineConfig`,
//! `AssetsConfig`, `VisionConfig`, `GuiConfig`, `ServerConfig`, plus the mock
//! model `catalog`.
//!
//! JSON on disk uses **camelCase** keys; every section falls back to its
//! defaults when absent.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::utils::expand_home;

use super::ConfigError;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub agent: AgentConfig,
    pub provider: ProviderConfig,
    pub engine: EngineConfig,
    pub assets: AssetsConfig,
    pub vision: VisionConfig,
    pub gui: GuiConfig,
    pub server: ServerConfig,
    pub catalog: Vec<CatalogEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            provider: ProviderConfig::default(),
            engine: EngineConfig::default(),
            assets: AssetsConfig::default(),
            vision: VisionConfig::default(),
            gui: GuiConfig::default(),
            server: ServerConfig::default(),
            catalog: default_catalog(),
        }
    }
}

impl Config {
    /// Check settings that must hold before any goal is run.
    ///
    /// A missing API key is fatal; a missing assets root only produces a
    /// warning, since scene-only goals never touch it.
    pub fn validate(&self) -> Result<Vec<String>, ConfigError> {
        if !self.provider.is_configured() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.agent.max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "agent.maxIterations must be at least 1".into(),
            ));
        }

        let mut warnings = Vec::new();
        let root = self.assets.root_path();
        if !root.exists() {
            warnings.push(format!(
                "Assets root '{}' does not exist; model downloads and script generation will fail",
                root.display()
            ));
        }
        if self.catalog.is_empty() {
            warnings.push("Model catalog is empty; model search will never match".into());
        }
        Ok(warnings)
    }
}

// ─────────────────────────────────────────────
// Agent
// ─────────────────────────────────────────────

/// Loop behaviour and model sampling settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    /// Model used for planning and tool selection.
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Ceiling on model calls per goal.
    pub max_iterations: u32,
    /// Whether the keyword verification pass runs before accepting an answer.
    pub verification: bool,
    /// Ceiling on corrective re-prompts injected by verification.
    pub max_verification_retries: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            max_iterations: 10,
            verification: true,
            max_verification_retries: 2,
        }
    }
}

// ─────────────────────────────────────────────
// Provider
// ─────────────────────────────────────────────

/// Credentials and endpoint for the OpenAI-compatible chat API.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    pub api_key: String,
    pub api_base: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://api.openai.com/v1".to_string(),
            extra_headers: None,
            timeout_secs: 120,
        }
    }
}

impl ProviderConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

// ─────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────

/// How commands reach the engine's HTTP listener.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// In-process HTTP client.
    #[default]
    Http,
    /// Spawn the `curl` binary per command.
    Curl,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Base URL of the engine listener; commands are posted to `<url>/<endpoint>`.
    pub url: String,
    pub timeout_secs: u64,
    pub transport: TransportKind,
    /// Program used by the curl transport.
    pub curl_program: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 15,
            transport: TransportKind::Http,
            curl_program: "curl".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Assets
// ─────────────────────────────────────────────

/// Where downloaded models and generated scripts land.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetsConfig {
    /// The engine project's `Assets` directory.
    pub root: String,
    pub models_dir: String,
    pub scripts_dir: String,
    pub download_timeout_secs: u64,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: "~/UnityProject/Assets".to_string(),
            models_dir: "ImportedModels".to_string(),
            scripts_dir: "GeneratedScripts".to_string(),
            download_timeout_secs: 60,
        }
    }
}

impl AssetsConfig {
    pub fn root_path(&self) -> PathBuf {
        expand_home(&self.root)
    }

    pub fn models_path(&self) -> PathBuf {
        self.root_path().join(&self.models_dir)
    }

    pub fn scripts_path(&self) -> PathBuf {
        self.root_path().join(&self.scripts_dir)
    }
}

// ─────────────────────────────────────────────
// Vision
// ─────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisionConfig {
    /// Vision-capable model used to describe scene captures.
    pub model: String,
    pub max_tokens: u32,
    /// Name of the capture file the engine writes.
    pub capture_file: String,
    /// Extra locations to look for the capture, tried after the project root.
    pub capture_paths: Vec<String>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            max_tokens: 300,
            capture_file: "scene_capture.png".to_string(),
            capture_paths: vec!["scene_capture.png".to_string()],
        }
    }
}

impl VisionConfig {
    /// Candidate capture locations, in lookup order.
    ///
    /// The engine saves into its project directory (the parent of `Assets`),
    /// so that comes first.
    pub fn capture_candidates(&self, assets: &AssetsConfig) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(project) = assets.root_path().parent() {
            candidates.push(project.join(&self.capture_file));
        }
        candidates.extend(self.capture_paths.iter().map(|p| expand_home(p)));
        candidates
    }
}

// ─────────────────────────────────────────────
// GUI automation
// ─────────────────────────────────────────────

/// Screen-click automation. Coordinates are host specific.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuiConfig {
    /// Screen position of the editor's Play button.
    pub play_button: (i32, i32),
    /// Program that performs a click.
    pub click_program: String,
    /// Arguments; `{x}` and `{y}` are substituted.
    pub click_args: Vec<String>,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            play_button: (950, 60),
            click_program: "xdotool".to_string(),
            click_args: ["mousemove", "{x}", "{y}", "click", "1"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

// ─────────────────────────────────────────────
// Web server
// ─────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub host: String,
    /// First port tried.
    pub port: u16,
    /// Number of consecutive ports tried before giving up.
    pub port_attempts: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5004,
            port_attempts: 6,
        }
    }
}

// ─────────────────────────────────────────────
// Model catalog
// ─────────────────────────────────────────────

/// One searchable model. `keyword` is matched as a substring of the query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub keyword: String,
    pub name: String,
    pub uid: String,
    pub download_url: String,
}

const SAMPLE_MODELS: &str = "https://raw.githubusercontent.com/KhronosGroup/glTF-Sample-Models/main/2.0";

fn entry(keyword: &str, name: &str, uid: &str, sample: &str) -> CatalogEntry {
    CatalogEntry {
        keyword: keyword.to_string(),
        name: name.to_string(),
        uid: uid.to_string(),
        download_url: format!("{SAMPLE_MODELS}/{sample}/glTF-Binary/{sample}.glb"),
    }
}

/// Built-in catalog. Longer keywords precede their suffixes ("water bottle"
/// before "bottle") so the first match is the most specific.
pub fn default_catalog() -> Vec<CatalogEntry> {
    vec![
        entry("fox", "Low Poly Fox", "f23a1a3d387b42a78a6e39a65a719beb", "Fox"),
        entry("water bottle", "Water Bottle", "a1b2c3d4e5f67890a1b2c3d4e5f67890", "WaterBottle"),
        entry("bottle", "Water Bottle", "a1b2c3d4e5f67890a1b2c3d4e5f67890", "WaterBottle"),
        entry("desk lamp", "Lantern", "b2c3d4e5f67890a1b2c3d4e5f67890a1", "Lantern"),
        entry("lamp", "Lantern", "b2c3d4e5f67890a1b2c3d4e5f67890a1", "Lantern"),
    ]
}
