//! Tool registry — an immutable name → tool table.
//!
//! Built once at startup with [`ToolRegistryBuilder`], then shared by `Arc`
//! between every run. Dispatch never fails the caller: unknown names and bad
//! arguments come back as [`ToolError`]s the loop turns into records.

use std::collections::HashMap;
use std::sync::Arc;

use scenewright_core::types::ToolDefinition;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::base::{DynTool, Tool};
use crate::error::ToolError;

// ─────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────

#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: HashMap<String, Arc<dyn DynTool>>,
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. A later tool with the same name replaces the earlier one.
    pub fn with<T: Tool>(mut self, tool: T) -> Self {
        let name = Tool::name(&tool).to_string();
        if self.tools.insert(name.clone(), Arc::new(tool)).is_some() {
            warn!(tool = %name, "tool registered twice, keeping the last");
        }
        self
    }

    pub fn build(self) -> ToolRegistry {
        info!(tools = self.tools.len(), "tool registry built");
        ToolRegistry { tools: self.tools }
    }
}

// ─────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────

pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn DynTool>>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DynTool>> {
        self.tools.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Names of all registered tools, sorted for determinism.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// LLM-facing definitions for all registered tools, sorted by name.
    pub fn get_definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.definition()).collect();
        defs.sort_by(|a, b| a.function.name.cmp(&b.function.name));
        defs
    }

    /// Look up `name`, decode `raw_arguments` and run the tool.
    pub async fn dispatch(&self, name: &str, raw_arguments: &str) -> Result<Value, ToolError> {
        let tool = self.tools.get(name).ok_or_else(|| {
            warn!(tool = name, "tool not found");
            ToolError::UnknownTool(name.to_string())
        })?;

        let arguments = parse_arguments(name, raw_arguments)?;
        debug!(tool = name, "dispatching tool call");

        let result = tool.call(arguments).await;
        if let Err(ref e) = result {
            warn!(tool = name, error = %e, "tool call failed");
        }
        result
    }

    /// Like [`dispatch`](Self::dispatch), folding errors into a record.
    pub async fn execute(&self, name: &str, raw_arguments: &str) -> Value {
        match self.dispatch(name, raw_arguments).await {
            Ok(output) => output,
            Err(e) => e.to_record(),
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Decode the model's JSON-encoded arguments. Empty means no arguments.
fn parse_arguments(tool: &str, raw: &str) -> Result<Value, ToolError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(Value::Null) => Ok(Value::Object(Map::new())),
        Ok(other) => Err(ToolError::InvalidArguments {
            tool: tool.to_string(),
            reason: format!("expected a JSON object, got {other}"),
        }),
        Err(e) => Err(ToolError::MalformedArguments {
            tool: tool.to_string(),
            reason: e.to_string(),
        }),
    }
}
