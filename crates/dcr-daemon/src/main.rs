//! dcr-daemon entry point.
//!
//! Sets up tracing, loads config into the shared state, wires middleware,
//! and starts the HTTP server. Route handlers live in `routes.rs`; shared
//! state types live in `state.rs`.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use dcr_config::{ConfigMode, LoadedConfig, UnusedKeyPolicy};
use dcr_daemon::{routes, state};
use serde_json::Value;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

const ENV_ADDR: &str = "DCR_DAEMON_ADDR";
const ENV_CONFIG_PATHS: &str = "DCR_CONFIG";
const DEFAULT_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 8898);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env.local if present (dev convenience).
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let loaded = load_config()?;
    let shared = Arc::new(state::AppState::from_config(&loaded).context("invalid daemon config")?);
    info!(
        doctor_bps = shared.policy.doctor_bps,
        broker_bps = shared.policy.broker_bps,
        redirect = shared.policy.redirect_unused_doctor_share,
        config_hash = %shared.config_hash,
        "split policy loaded"
    );

    let app = routes::build_router(Arc::clone(&shared))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_localhost_only());

    let addr = match bind_addr_from_env() {
        Some(a) => a,
        None => bind_addr_from_config(&loaded.config_json)?
            .unwrap_or_else(|| SocketAddr::from(DEFAULT_ADDR)),
    };
    info!("dcr-daemon listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

/// Layered config from `DCR_CONFIG` (comma-separated, merge order).
fn load_config() -> anyhow::Result<LoadedConfig> {
    let paths: Vec<String> = std::env::var(ENV_CONFIG_PATHS)
        .ok()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    let loaded = dcr_config::load_layered_yaml(&path_refs)?;

    let unused =
        dcr_config::report_unused_keys(ConfigMode::Serve, &loaded.config_json, UnusedKeyPolicy::Warn)?;
    for ptr in &unused.unused_leaf_pointers {
        warn!(pointer = %ptr, "config key is not read by the daemon");
    }
    Ok(loaded)
}

fn bind_addr_from_env() -> Option<SocketAddr> {
    std::env::var(ENV_ADDR).ok()?.parse().ok()
}

fn bind_addr_from_config(config_json: &Value) -> anyhow::Result<Option<SocketAddr>> {
    match config_json.pointer("/daemon/bind_addr") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => s
            .parse::<SocketAddr>()
            .map(Some)
            .with_context(|| format!("CONFIG_TYPE /daemon/bind_addr is not a socket address: {s}")),
        Some(other) => anyhow::bail!("CONFIG_TYPE /daemon/bind_addr must be a string, got {other}"),
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

/// CORS: allow only localhost origins.
fn cors_localhost_only() -> CorsLayer {
    let allowed_origins = [
        "http://localhost",
        "http://127.0.0.1",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
    ];

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(tower_http::cors::Any)
}
