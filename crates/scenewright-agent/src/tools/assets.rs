//! Model asset tools — catalog search and download into the project.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use scenewright_core::config::CatalogEntry;
use scenewright_core::utils::asset_stem;

use super::base::Tool;

const USER_AGENT: &str = concat!("scenewright/", env!("CARGO_PKG_VERSION"));

// ─────────────────────────────────────────────
// search_web_for_3d_model
// ─────────────────────────────────────────────

/// Looks queries up in a fixed catalog; the first entry whose keyword occurs
/// in the lowercased query wins.
pub struct SearchModelTool {
    catalog: Vec<CatalogEntry>,
}

impl SearchModelTool {
    pub fn new(catalog: Vec<CatalogEntry>) -> Self {
        Self { catalog }
    }

    fn lookup(&self, query: &str) -> Option<&CatalogEntry> {
        let query = query.to_lowercase();
        self.catalog
            .iter()
            .find(|entry| query.contains(&entry.keyword.to_lowercase()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchArgs {
    pub query: String,
}

#[async_trait]
impl Tool for SearchModelTool {
    type Args = SearchArgs;

    fn name(&self) -> &str {
        "search_web_for_3d_model"
    }

    fn description(&self) -> &str {
        "Search for a downloadable 3D model of a complex object (e.g. 'fox', 'desk lamp'). \
         Use this before download_and_import_model. Primitives need no search."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "What to search for" }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: SearchArgs) -> anyhow::Result<Value> {
        match self.lookup(&args.query) {
            Some(entry) => {
                info!(query = %args.query, model = %entry.name, "model found");
                Ok(json!({
                    "success": true,
                    "model_name": entry.name,
                    "download_url": entry.download_url,
                }))
            }
            None => {
                info!(query = %args.query, "no model found");
                Ok(json!({
                    "success": false,
                    "error": format!("No 3D model found for query: {}", args.query),
                }))
            }
        }
    }
}

// ─────────────────────────────────────────────
// download_and_import_model
// ─────────────────────────────────────────────

pub struct DownloadModelTool {
    client: reqwest::Client,
    models_dir: PathBuf,
}

impl DownloadModelTool {
    pub fn new(models_dir: PathBuf, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("failed to build download client")?;
        Ok(Self { client, models_dir })
    }

    async fn fetch(&self, url: &str, dest: &Path) -> anyhow::Result<u64> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()?;
        let bytes = resp.bytes().await.context("failed to read download body")?;
        tokio::fs::write(dest, &bytes)
            .await
            .with_context(|| format!("failed to write {}", dest.display()))?;
        Ok(bytes.len() as u64)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DownloadArgs {
    pub model_name: String,
    pub download_url: String,
}

/// File extension from the last path segment of `url`, ignoring any query.
fn url_extension(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next()?;
    let (_, ext) = file.rsplit_once('.')?;
    (!ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())).then_some(ext)
}

#[async_trait]
impl Tool for DownloadModelTool {
    type Args = DownloadArgs;

    fn name(&self) -> &str {
        "download_and_import_model"
    }

    fn description(&self) -> &str {
        "Download a model found by search_web_for_3d_model into the project. Spawn it afterwards \
         with the returned model_filename (including the extension)."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "model_name": { "type": "string", "description": "e.g. 'Low Poly Fox'" },
                "download_url": { "type": "string" }
            },
            "required": ["model_name", "download_url"]
        })
    }

    async fn execute(&self, args: DownloadArgs) -> anyhow::Result<Value> {
        let stem = asset_stem(&args.model_name);
        if stem.is_empty() || stem.starts_with('.') {
            anyhow::bail!("invalid model name '{}'", args.model_name);
        }
        let ext = url_extension(&args.download_url).unwrap_or("glb");
        let file_name = format!("{stem}.{ext}");

        tokio::fs::create_dir_all(&self.models_dir)
            .await
            .with_context(|| format!("failed to create {}", self.models_dir.display()))?;
        let file_path = self.models_dir.join(&file_name);

        // An empty file is a placeholder from an earlier failed download.
        let present = tokio::fs::metadata(&file_path)
            .await
            .map(|m| m.len() > 0)
            .unwrap_or(false);
        if present {
            info!(path = %file_path.display(), "model already present");
            return Ok(json!({
                "success": true,
                "file_path": file_path.display().to_string(),
                "model_filename": file_name,
                "unity_name": stem,
            }));
        }

        info!(model = %args.model_name, url = %args.download_url, "downloading model");
        match self.fetch(&args.download_url, &file_path).await {
            Ok(bytes) => {
                info!(path = %file_path.display(), bytes, "model downloaded");
                Ok(json!({
                    "success": true,
                    "file_path": file_path.display().to_string(),
                    "model_filename": file_name,
                    "unity_name": stem,
                }))
            }
            Err(e) => {
                warn!(error = %e, "model download failed");
                // Leave an empty placeholder so the engine import path exists.
                if let Err(touch) = tokio::fs::write(&file_path, b"").await {
                    warn!(error = %touch, "failed to write placeholder");
                }
                Ok(json!({
                    "success": false,
                    "error": format!("Download failed: {e:#}"),
                    "file_path": file_path.display().to_string(),
                    "model_filename": file_name,
                }))
            }
        }
    }
}
