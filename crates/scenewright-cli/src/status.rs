//! `scenewright status` — show configuration, credentials and engine reachability.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use scenewright_core::config::Config;
use scenewright_engine::{build_transport, EngineCommand};

fn mark(ok: bool, missing: &str) -> String {
    if ok {
        "✓".green().to_string()
    } else {
        missing.red().to_string()
    }
}

fn path_line(label: &str, path: &Path) {
    println!(
        "  {:<18} {} {}",
        label.bold(),
        path.display(),
        mark(path.exists(), "(not found)")
    );
}

/// Run the status command.
pub async fn run(config: &Config, config_path: &Path) -> Result<()> {
    println!();
    println!("{}", "🎬 Scenewright Status".cyan().bold());
    println!();

    path_line("Config:", config_path);

    println!("  {:<18} {}", "Model:".bold(), config.agent.model);
    println!(
        "  {:<18} {}",
        "Parameters:".bold(),
        format!(
            "temp: {} | max_tokens: {} | max_iterations: {} | verification: {}",
            config.agent.temperature,
            config.agent.max_tokens,
            config.agent.max_iterations,
            config.agent.verification
        )
        .dimmed()
    );
    println!("  {:<18} {}", "Vision model:".bold(), config.vision.model);
    println!("  {:<18} {}", "API base:".bold(), config.provider.api_base);
    let key = if config.provider.is_configured() {
        format!("{} (key set)", "✓".green())
    } else {
        format!("{}", "· not configured".dimmed())
    };
    println!("  {:<18} {}", "API key:".bold(), key);

    // Assets
    println!();
    let assets = &config.assets;
    path_line("Assets root:", &assets.root_path());
    path_line("Models:", &assets.models_path());
    path_line("Scripts:", &assets.scripts_path());
    match config
        .vision
        .capture_candidates(assets)
        .into_iter()
        .find(|p| p.exists())
    {
        Some(found) => path_line("Last capture:", &found),
        None => println!("  {:<18} {}", "Last capture:".bold(), "· none yet".dimmed()),
    }

    // Engine
    println!();
    match build_transport(&config.engine) {
        Ok(engine) => {
            let reply = engine.send(&EngineCommand::ListAllObjects).await;
            let state = if reply.success {
                format!("{} reachable", "✓".green())
            } else {
                format!(
                    "{} {}",
                    "✗".red(),
                    reply.error.unwrap_or_else(|| "unreachable".into()).dimmed()
                )
            };
            println!("  {:<18} {}", "Engine:".bold(), engine.describe());
            println!("  {:<18} {}", "".bold(), state);
        }
        Err(e) => println!("  {:<18} {}", "Engine:".bold(), e.to_string().red()),
    }

    println!(
        "  {:<18} http://{}:{}",
        "Web server:".bold(),
        config.server.host,
        config.server.port
    );

    println!();
    for warning in config.validate().map_or_else(|e| vec![e.to_string()], |w| w) {
        println!("  {} {}", "!".yellow().bold(), warning.yellow());
    }
    println!();

    Ok(())
}
