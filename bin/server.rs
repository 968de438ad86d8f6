// Attendance Tiers - Web Server
// REST API over the scoring pipeline with Axum

use anyhow::{Context, Result};
use attendance_tiers::server::{router, AppState};
use attendance_tiers::AppConfig;
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config_path = env::var("ATTENDANCE_CONFIG").ok().map(PathBuf::from);
    let mut config = AppConfig::load(config_path.as_deref())?;
    config.apply_env_overrides(|key| env::var(key).ok())?;

    let state = AppState::new(config.input.clone(), config.run_options()?);
    let app = router(state);

    let addr = env::var("ATTENDANCE_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(%addr, input = ?config.input, "server running");

    axum::serve(listener, app).await.context("Server stopped")?;
    Ok(())
}
