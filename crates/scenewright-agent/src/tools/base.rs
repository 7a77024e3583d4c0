//! Tool trait — the typed interface every agent tool implements.
//!
//! Tools declare their arguments as a `Deserialize` struct. The blanket
//! [`DynTool`] adapter turns any `Tool` into a registry entry that validates
//! the model's raw JSON into that struct before the tool ever runs, so
//! missing, unknown and mistyped fields are rejected with a typed error.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use scenewright_core::types::ToolDefinition;

use crate::error::ToolError;

// ─────────────────────────────────────────────
// Tool trait
// ─────────────────────────────────────────────

/// Every agent tool implements this trait.
#[async_trait]
pub trait Tool: Send + Sync + 'static {
    /// Typed arguments. Use `#[serde(deny_unknown_fields)]`.
    type Args: DeserializeOwned + Send + 'static;

    /// Unique name used by the LLM to call this tool (e.g. `"spawn_object"`).
    fn name(&self) -> &str;

    /// Human-readable description shown to the LLM.
    fn description(&self) -> &str;

    /// JSON Schema describing `Args`.
    ///
    /// Must be `{"type": "object", "properties": {...}, "required": [...]}`.
    fn parameters(&self) -> Value;

    /// Run the tool.
    ///
    /// Returns the flat `{success, ...}` record the model reads. Collaborator
    /// failures the model should see verbatim (engine replies, "not found")
    /// come back as `Ok` with `success: false`; an `Err` is reported as an
    /// execution error by the registry.
    async fn execute(&self, args: Self::Args) -> anyhow::Result<Value>;

    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.parameters())
    }
}

/// Argument type for tools that take none. Still rejects stray fields.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoArgs {}

// ─────────────────────────────────────────────
// Object-safe adapter
// ─────────────────────────────────────────────

/// Object-safe view of a [`Tool`], as stored in the registry.
#[async_trait]
pub trait DynTool: Send + Sync {
    fn tool_name(&self) -> &str;

    fn definition(&self) -> ToolDefinition;

    /// Validate `arguments` into the tool's `Args` and execute.
    async fn call(&self, arguments: Value) -> Result<Value, ToolError>;
}

#[async_trait]
impl<T: Tool> DynTool for T {
    fn tool_name(&self) -> &str {
        Tool::name(self)
    }

    fn definition(&self) -> ToolDefinition {
        Tool::to_definition(self)
    }

    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        let args = serde_json::from_value::<T::Args>(arguments).map_err(|e| {
            ToolError::InvalidArguments {
                tool: Tool::name(self).to_string(),
                reason: e.to_string(),
            }
        })?;

        Tool::execute(self, args)
            .await
            .map_err(|e| ToolError::Failed {
                tool: Tool::name(self).to_string(),
                message: format!("{e:#}"),
            })
    }
}
