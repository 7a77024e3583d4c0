//! Shared CLI helpers — agent assembly, progress printing, banner.

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use tokio::sync::mpsc;
use tracing::warn;

use scenewright_agent::{
    build_registry, policy_from_config, AgentError, AgentLoop, AgentOutcome, ContextBuilder,
    LoopSettings, Progress, ProgressSink,
};
use scenewright_core::config::Config;
use scenewright_core::utils::clock_time;
use scenewright_engine::build_transport;
use scenewright_providers::{create_provider, LlmProvider};

/// Assemble the agent from config: provider, engine transport, tools, policy.
pub fn build_agent(config: &Config) -> Result<Arc<AgentLoop>> {
    for warning in config.validate().context("configuration is not usable")? {
        warn!("{warning}");
    }

    let provider: Arc<dyn LlmProvider> =
        Arc::new(create_provider(config).context("failed to create LLM provider")?);
    let engine = build_transport(&config.engine).context("failed to set up engine transport")?;
    let tools = Arc::new(
        build_registry(config, engine, provider.clone()).context("failed to build tools")?,
    );

    let system_prompt =
        ContextBuilder::new(config.assets.root_path(), tools.tool_names()).build_system_prompt();

    Ok(Arc::new(AgentLoop::new(
        provider,
        tools,
        policy_from_config(&config.agent),
        LoopSettings::from_config(&config.agent),
        system_prompt,
    )))
}

/// Run one goal, printing progress lines as they arrive.
pub async fn run_goal(agent: &AgentLoop, goal: &str) -> Result<AgentOutcome, AgentError> {
    let (tx, mut rx) = mpsc::channel::<Progress>(64);
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            print_progress(&event);
        }
    });

    let result = agent.run(goal, &ProgressSink::new(tx)).await;
    // The sink is gone once `run` returns, so the printer drains and exits.
    let _ = printer.await;
    result
}

/// Colour a progress line the way the web page does.
fn styled(event: &Progress) -> ColoredString {
    let line = event.to_string();
    match event {
        Progress::Llm(_) => line.blue(),
        Progress::ToolCall { .. } => line.truecolor(249, 115, 22),
        Progress::ToolResponse { .. } => line.yellow(),
        Progress::Error(_) => line.red().bold(),
        Progress::Verification(_) => line.magenta(),
        Progress::Final(_) => line.green().bold(),
        Progress::Status(_) => line.normal(),
    }
}

pub fn print_progress(event: &Progress) {
    println!("{} {}", clock_time().dimmed(), styled(event));
}

/// Print the banner shown at REPL start.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🎬 Scenewright".cyan().bold(), version.dimmed());
    println!(
        "{}",
        "Describe a scene goal, or \"exit\" to quit. The engine must be in play mode.".dimmed()
    );
    println!();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
