//! `scenewright init` — write a default config and prepare asset folders.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use scenewright_core::config::{load_config, save_config, AssetsConfig, Config};
use scenewright_core::utils::get_data_path;

/// Run the init command.
pub fn run(config_path: &Path) -> Result<()> {
    println!();
    println!("{}", "🎬 Scenewright — Setup".cyan().bold());
    println!();

    // 1. Config file
    if write_default_config(config_path)? {
        println!("  {} created config at {}", "✓".green(), config_path.display());
    } else {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    }

    // 2. Asset folders, only inside an existing project
    let config = load_config(Some(config_path));
    match prepare_asset_dirs(&config.assets)? {
        true => {
            println!("  {} models dir at {}", "✓".green(), config.assets.models_path().display());
            println!("  {} scripts dir at {}", "✓".green(), config.assets.scripts_path().display());
        }
        false => println!(
            "  {} assets root {} not found; set assets.root (or UNITY_ASSETS_PATH) to your project's Assets folder",
            "!".yellow().bold(),
            config.assets.root_path().display()
        ),
    }

    // 3. History
    std::fs::create_dir_all(get_data_path().join("history"))?;

    println!();
    if config.provider.is_configured() {
        println!("{}", "  Setup complete! Run `scenewright serve` to open the web page.".green());
    } else {
        println!(
            "{}",
            "  Add your API key (provider.apiKey or OPENAI_API_KEY), then run `scenewright serve`."
                .yellow()
        );
    }
    println!();
    Ok(())
}

/// Write `Config::default()` unless a file already exists. Returns whether it wrote.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

/// Create the model and script folders under an existing assets root.
fn prepare_asset_dirs(assets: &AssetsConfig) -> Result<bool> {
    if !assets.root_path().is_dir() {
        return Ok(false);
    }
    for dir in [assets.models_path(), assets.scripts_path()] {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    Ok(true)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
