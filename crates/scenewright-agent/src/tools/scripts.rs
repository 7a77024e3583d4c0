//! Script generation tool — writes C# behaviour scripts into the project.

use std::path::PathBuf;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::base::Tool;

/// A C# class name: letter or underscore, then word characters.
const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

pub struct WriteScriptTool {
    scripts_dir: PathBuf,
    identifier: Regex,
}

impl WriteScriptTool {
    pub fn new(scripts_dir: PathBuf) -> anyhow::Result<Self> {
        Ok(Self {
            scripts_dir,
            identifier: Regex::new(IDENTIFIER_PATTERN)?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriteScriptArgs {
    pub script_name: String,
    pub csharp_code: String,
}

#[async_trait]
impl Tool for WriteScriptTool {
    type Args = WriteScriptArgs;

    fn name(&self) -> &str {
        "write_new_unity_script"
    }

    fn description(&self) -> &str {
        "Write a new C# MonoBehaviour script into the project. Use only for behaviour the \
         other tools cannot express, then attach it with attach_script_to_object."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "script_name": {
                    "type": "string",
                    "description": "Class name, e.g. 'WobbleEffect' (no extension)"
                },
                "csharp_code": {
                    "type": "string",
                    "description": "Complete C# source for the script"
                }
            },
            "required": ["script_name", "csharp_code"]
        })
    }

    async fn execute(&self, args: WriteScriptArgs) -> anyhow::Result<Value> {
        let name = args.script_name.strip_suffix(".cs").unwrap_or(&args.script_name);
        if !self.identifier.is_match(name) {
            anyhow::bail!("'{}' is not a valid C# class name", args.script_name);
        }

        tokio::fs::create_dir_all(&self.scripts_dir)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", self.scripts_dir.display()))?;

        let path = self.scripts_dir.join(format!("{name}.cs"));
        tokio::fs::write(&path, &args.csharp_code)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;

        info!(path = %path.display(), bytes = args.csharp_code.len(), "script written");
        Ok(json!({ "success": true, "path": path.display().to_string() }))
    }
}
