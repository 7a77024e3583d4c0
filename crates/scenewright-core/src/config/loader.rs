//! Config loader — reads `~/.scenewright/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.scenewright/config.json`
//! 3. Environment variables `SCENEWRIGHT_<SECTION>__<FIELD>` (override JSON)
//! 4. `OPENAI_API_KEY` / `UNITY_ASSETS_PATH`, only where still unset

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, TransportKind};
use super::ConfigError;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from `path` (or the default path) plus env vars.
///
/// Falls back to `Config::default()` if the file is missing or unparsable.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    apply_env_overrides(read_config_file(&config_path))
}

fn read_config_file(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str::<Config>(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Save configuration as pretty-printed camelCase JSON.
pub fn save_config(config: &Config, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(config_path)
}

/// Apply environment overrides on top of a loaded config.
///
/// Supported:
/// - `SCENEWRIGHT_AGENT__MODEL`, `SCENEWRIGHT_AGENT__MAX_ITERATIONS`,
///   `SCENEWRIGHT_AGENT__VERIFICATION`
/// - `SCENEWRIGHT_PROVIDER__API_KEY`, `SCENEWRIGHT_PROVIDER__API_BASE`
/// - `SCENEWRIGHT_ENGINE__URL`, `SCENEWRIGHT_ENGINE__TIMEOUT_SECS`,
///   `SCENEWRIGHT_ENGINE__TRANSPORT` (`http` | `curl`)
/// - `SCENEWRIGHT_ASSETS__ROOT`
/// - `SCENEWRIGHT_SERVER__HOST`, `SCENEWRIGHT_SERVER__PORT`
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("SCENEWRIGHT_AGENT__MODEL") {
        config.agent.model = val;
    }
    if let Some(n) = env_parse::<u32>("SCENEWRIGHT_AGENT__MAX_ITERATIONS") {
        config.agent.max_iterations = n;
    }
    if let Ok(val) = std::env::var("SCENEWRIGHT_AGENT__VERIFICATION") {
        config.agent.verification = val == "true" || val == "1";
    }

    if let Ok(val) = std::env::var("SCENEWRIGHT_PROVIDER__API_KEY") {
        config.provider.api_key = val;
    }
    if let Ok(val) = std::env::var("SCENEWRIGHT_PROVIDER__API_BASE") {
        config.provider.api_base = val;
    }

    if let Ok(val) = std::env::var("SCENEWRIGHT_ENGINE__URL") {
        config.engine.url = val;
    }
    if let Some(n) = env_parse::<u64>("SCENEWRIGHT_ENGINE__TIMEOUT_SECS") {
        config.engine.timeout_secs = n;
    }
    if let Ok(val) = std::env::var("SCENEWRIGHT_ENGINE__TRANSPORT") {
        match val.to_ascii_lowercase().as_str() {
            "http" => config.engine.transport = TransportKind::Http,
            "curl" => config.engine.transport = TransportKind::Curl,
            other => warn!("Ignoring unknown engine transport '{}'", other),
        }
    }

    if let Ok(val) = std::env::var("SCENEWRIGHT_ASSETS__ROOT") {
        config.assets.root = val;
    }

    if let Ok(val) = std::env::var("SCENEWRIGHT_SERVER__HOST") {
        config.server.host = val;
    }
    if let Some(p) = env_parse::<u16>("SCENEWRIGHT_SERVER__PORT") {
        config.server.port = p;
    }

    // Conventional variables, honoured only when nothing more specific is set.
    if !config.provider.is_configured() {
        if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            config.provider.api_key = val;
        }
    }
    if std::env::var("SCENEWRIGHT_ASSETS__ROOT").is_err() {
        if let Ok(val) = std::env::var("UNITY_ASSETS_PATH") {
            config.assets.root = val;
        }
    }

    config
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring unparsable value for {}: '{}'", key, raw);
            None
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = read_config_file(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config.agent.max_iterations, 10);
        assert_eq!(config.engine.timeout_secs, 15);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let file = write_temp_json(
            r#"{
                "engine": { "url": "http://10.0.0.5:9000", "transport": "curl" },
                "agent": { "maxIterations": 4 }
            }"#,
        );

        let config = read_config_file(file.path());
        assert_eq!(config.engine.url, "http://10.0.0.5:9000");
        assert_eq!(config.engine.transport, TransportKind::Curl);
        assert_eq!(config.engine.timeout_secs, 15);
        assert_eq!(config.agent.max_iterations, 4);
        assert_eq!(config.agent.model, "gpt-4o");
    }

    #[test]
    fn test_invalid_json_gives_defaults() {
        let file = write_temp_json("{ not json");
        let config = read_config_file(file.path());
        assert_eq!(config.server.port, 5004);
    }

    #[test]
    fn test_custom_catalog_replaces_default() {
        let file = write_temp_json(
            r#"{
                "catalog": [{
                    "keyword": "duck",
                    "name": "Rubber Duck",
                    "uid": "duck-1",
                    "downloadUrl": "https://example.com/Duck.glb"
                }]
            }"#,
        );
        let config = read_config_file(file.path());
        assert_eq!(config.catalog.len(), 1);
        assert_eq!(config.catalog[0].name, "Rubber Duck");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.engine.url = "http://engine:8080".into();
        config.assets.root = "/srv/Project/Assets".into();

        let written = save_config(&config, Some(&path)).unwrap();
        assert_eq!(written, path);

        let reloaded = read_config_file(&path);
        assert_eq!(reloaded.engine.url, "http://engine:8080");
        assert_eq!(reloaded.assets.root, "/srv/Project/Assets");
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        save_config(&Config::default(), Some(&path)).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw["agent"].get("maxIterations").is_some());
        assert!(raw["agent"].get("max_iterations").is_none());
        assert!(raw["engine"].get("timeoutSecs").is_some());
    }

    // Env tests each use a variable no other test touches.

    #[test]
    fn test_env_override_engine_url() {
        std::env::set_var("SCENEWRIGHT_ENGINE__URL", "http://override:1234");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.engine.url, "http://override:1234");
        std::env::remove_var("SCENEWRIGHT_ENGINE__URL");
    }

    #[test]
    fn test_env_override_transport() {
        std::env::set_var("SCENEWRIGHT_ENGINE__TRANSPORT", "CURL");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.engine.transport, TransportKind::Curl);
        std::env::remove_var("SCENEWRIGHT_ENGINE__TRANSPORT");
    }

    #[test]
    fn test_env_override_bad_number_ignored() {
        std::env::set_var("SCENEWRIGHT_SERVER__PORT", "not-a-port");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.server.port, 5004);
        std::env::remove_var("SCENEWRIGHT_SERVER__PORT");
    }
}
