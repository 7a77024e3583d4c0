//! Scenewright CLI — entry point.
//!
//! # Commands
//!
//! - `scenewright run -m GOAL` — run one goal, printing progress
//! - `scenewright repl` — one goal per line
//! - `scenewright serve [--port N]` — web page with a streaming goal endpoint
//! - `scenewright status` — show configuration and engine reachability
//! - `scenewright init` — write a default config

mod helpers;
mod init;
mod repl;
mod server;
mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use scenewright_core::config::{get_config_path, load_config};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🎬 Scenewright — build 3D engine scenes from natural-language goals
#[derive(Parser)]
#[command(name = "scenewright", version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.scenewright/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single goal and exit
    Run {
        /// The scene goal, e.g. "Create a fox next to a tree"
        #[arg(short, long)]
        message: String,
    },

    /// Interactive prompt, one goal per line
    Repl,

    /// Serve the web page and the streaming goal endpoint
    Serve {
        /// First port to try (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show configuration and engine status
    Status,

    /// Write a default config and prepare asset folders
    Init,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(get_config_path);

    match cli.command {
        Commands::Run { message } => {
            init_logging(cli.logs, "warn");
            let config = load_config(Some(&config_path));
            let agent = helpers::build_agent(&config)?;
            info!(goal = %message, "running single goal");
            helpers::run_goal(&agent, &message)
                .await
                .context("goal did not finish")?;
            Ok(())
        }
        Commands::Repl => {
            init_logging(cli.logs, "warn");
            let config = load_config(Some(&config_path));
            let agent = helpers::build_agent(&config)?;
            repl::run(&agent).await
        }
        Commands::Serve { port } => {
            init_logging(cli.logs, "info");
            let mut config = load_config(Some(&config_path));
            if let Some(port) = port {
                config.server.port = port;
            }
            let agent = helpers::build_agent(&config)?;
            server::run(agent, &config.server).await
        }
        Commands::Status => {
            init_logging(cli.logs, "error");
            let config = load_config(Some(&config_path));
            status::run(&config, &config_path).await
        }
        Commands::Init => init::run(&config_path),
    }
}

/// Initialize tracing. `RUST_LOG` wins over both defaults.
fn init_logging(verbose: bool, quiet_level: &str) {
    use tracing_subscriber::EnvFilter;

    let fallback = if verbose {
        "scenewright=debug,info"
    } else {
        quiet_level
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
