//! `scenewright serve` — the browser front end.
//!
//! `GET /` serves a single page with a goal form. The form posts to
//! `POST /run_agent`, which streams the run's progress back as
//! newline-delimited `text/plain` while the agent works.

use std::convert::Infallible;
use std::sync::Arc;

use anyhow::{bail, Result};
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};

use scenewright_agent::{AgentLoop, Progress, ProgressSink};
use scenewright_core::config::ServerConfig;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Buffered progress events per request before the loop waits on the client.
const STREAM_BUFFER: usize = 64;

#[derive(Clone)]
struct AppState {
    agent: Arc<AgentLoop>,
}

#[derive(Debug, Default, Deserialize)]
struct RunRequest {
    #[serde(default)]
    prompt: String,
}

pub fn router(agent: Arc<AgentLoop>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/run_agent", post(run_agent))
        .with_state(AppState { agent })
}

/// Serve until the process is stopped.
pub async fn run(agent: Arc<AgentLoop>, config: &ServerConfig) -> Result<()> {
    let listener = bind_first_free(&config.host, config.port, config.port_attempts).await?;
    let addr = listener.local_addr()?;

    println!();
    println!("  Scenewright is running at http://{addr}");
    println!("  Keep the engine project open and in play mode.");
    println!();
    info!(%addr, "web server listening");

    axum::serve(listener, router(agent)).await?;
    Ok(())
}

/// Bind the first free port in `port..port + attempts`.
async fn bind_first_free(host: &str, port: u16, attempts: u16) -> Result<TcpListener> {
    let attempts = attempts.max(1);
    for offset in 0..attempts {
        let Some(candidate) = port.checked_add(offset) else {
            break;
        };
        match TcpListener::bind((host, candidate)).await {
            Ok(listener) => return Ok(listener),
            Err(e) => warn!(port = candidate, error = %e, "port unavailable, trying next"),
        }
    }
    bail!(
        "no free port in {port}..{} on {host}",
        port.saturating_add(attempts)
    )
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn run_agent(State(state): State<AppState>, body: Bytes) -> Response {
    let prompt = serde_json::from_slice::<RunRequest>(&body)
        .map(|r| r.prompt.trim().to_string())
        .unwrap_or_default();
    if prompt.is_empty() {
        return (StatusCode::BAD_REQUEST, "Error: Prompt is required.").into_response();
    }

    info!(prompt = %prompt, "goal received");
    let (tx, mut rx) = mpsc::channel::<Progress>(STREAM_BUFFER);
    let agent = state.agent.clone();
    tokio::spawn(async move {
        let sink = ProgressSink::new(tx);
        if let Err(e) = agent.run(&prompt, &sink).await {
            warn!(error = %e, "goal ended without an answer");
        }
    });

    let stream = async_stream::stream! {
        while let Some(event) = rx.recv().await {
            yield Ok::<String, Infallible>(format!("{event}\n"));
        }
    };

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
