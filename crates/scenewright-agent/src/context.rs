//! Context builder — assembles the fixed system instruction.

use std::path::PathBuf;

use chrono::Utc;

const PRINCIPLES: &str = "\
## Working method

Observe, orient, decide, act. Break the goal into small steps and verify each one.

- Report exactly what vision analysis says, word for word. Never invent results.
- Ask the vision tool detailed questions, e.g. \"Describe every object in this scene, \
including its shape, color and approximate position\".
- Never guess an object's position: use `get_object_position`.
- After building an arrangement, confirm it with `capture_and_analyze_scene` before \
running a simulation or declaring success.
- If vision shows something other than what was requested (a \"bird\" instead of a fox, a \
horizontal cylinder instead of a tree), say so, adjust the scene and verify again.

## Tool guidelines

- `spawn_object`: primitives are \"cube\", \"sphere\", \"cylinder\", \"capsule\", \"plane\"; never \
\"robot\" or \"target\". Always pass `color` for coloured objects, e.g. a blue robot is \
spawn_object(\"cube\", {\"x\": 0, \"y\": 0, \"z\": 0}, color={\"r\": 0, \"g\": 0, \"b\": 1}).
- Complex objects (a fox, a desk lamp): `search_web_for_3d_model` first, then \
`download_and_import_model`, then spawn the returned `model_filename` including its \
extension (\"low_poly_fox.glb\", not \"low_poly_fox\").
- A tree can be approximated with a brown cylinder (scale y around 5) and a green sphere on top.
- `write_new_unity_script` only for behaviour the other tools cannot express; attach it \
afterwards with `attach_script_to_object`.
- `click_unity_play_button` only when the engine reports it is not in play mode.
- When every step is done, answer in plain text summarising what the scene contains.";

/// Builds the system prompt seeded into every conversation.
pub struct ContextBuilder {
    assets_root: PathBuf,
    tool_names: Vec<String>,
}

impl ContextBuilder {
    pub fn new(assets_root: impl Into<PathBuf>, tool_names: Vec<String>) -> Self {
        Self {
            assets_root: assets_root.into(),
            tool_names,
        }
    }

    pub fn build_system_prompt(&self) -> String {
        let mut parts = vec![self.build_identity(), PRINCIPLES.to_string()];
        if !self.tool_names.is_empty() {
            parts.push(format!(
                "## Available tools\n\n{}",
                self.tool_names.join(", ")
            ));
        }
        parts.join("\n\n")
    }

    fn build_identity(&self) -> String {
        let now = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        format!(
            "# Identity\n\n\
             You are an autonomous scene synthesis agent controlling a running 3D engine \
             through tools. You create objects, set lighting, see the scene through a \
             vision model, run simulations and query scene state.\n\n\
             - **Date/time**: {now}\n\
             - **Project assets**: `{}`",
            self.assets_root.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_tools_and_assets() {
        let builder = ContextBuilder::new(
            "/srv/Project/Assets",
            vec!["clear_scene".into(), "spawn_object".into()],
        );
        let prompt = builder.build_system_prompt();
        assert!(prompt.starts_with("# Identity"));
        assert!(prompt.contains("/srv/Project/Assets"));
        assert!(prompt.contains("clear_scene, spawn_object"));
        assert!(prompt.contains("low_poly_fox.glb"));
    }

    #[test]
    fn test_prompt_without_tools() {
        let prompt = ContextBuilder::new("/a", vec![]).build_system_prompt();
        assert!(!prompt.contains("## Available tools"));
    }
}
