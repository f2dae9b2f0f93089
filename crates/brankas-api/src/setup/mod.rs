//! Application setup and initialization

pub mod database;
pub mod health;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use brankas_core::Config;
use std::sync::Arc;
use std::time::Duration;

/// Build shared state and the router. Telemetry must already be installed.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    if !config.has_token() {
        tracing::warn!("TOKEN is not set; every upload will be rejected");
    }

    let store = database::setup_store(&config).await?;
    let stager = storage::setup_stager(&config);

    let state = Arc::new(AppState::new(config.clone(), stager, store));

    health::spawn_store_monitor(
        state.gateway.clone(),
        state.health.clone(),
        Duration::from_secs(config.health_check_interval_secs),
    );

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
