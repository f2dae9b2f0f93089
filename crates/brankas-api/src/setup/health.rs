//! Health reporting
//!
//! `/live` only says the process is up. `/health` probes the store on demand.
//! `/ready` answers from [`HealthSignal`], which a background task refreshes
//! by probing the store on an interval.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use brankas_db::PersistenceGateway;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::constants::HEALTH_PROBE_TIMEOUT;
use crate::state::AppState;

const UNKNOWN: u8 = 0;
const READY: u8 = 1;
const NOT_READY: u8 = 2;

/// Outcome of the latest background store probe.
#[derive(Clone, Debug)]
pub struct HealthSignal {
    state: Arc<AtomicU8>,
}

impl Default for HealthSignal {
    fn default() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(UNKNOWN)),
        }
    }
}

impl HealthSignal {
    pub fn record(&self, ready: bool) {
        let value = if ready { READY } else { NOT_READY };
        self.state.store(value, Ordering::Relaxed);
    }

    /// `None` until the first probe has completed.
    pub fn last(&self) -> Option<bool> {
        match self.state.load(Ordering::Relaxed) {
            READY => Some(true),
            NOT_READY => Some(false),
            _ => None,
        }
    }
}

/// Probe the store every `interval` and record the result. Disabled when the
/// interval is zero.
pub fn spawn_store_monitor(
    gateway: PersistenceGateway,
    signal: HealthSignal,
    interval: Duration,
) -> Option<JoinHandle<()>> {
    if interval.is_zero() {
        tracing::info!("Background store health check disabled");
        return None;
    }

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let result = gateway.probe(HEALTH_PROBE_TIMEOUT).await;
            let ready = result.is_ok();

            if signal.last() != Some(ready) {
                match result {
                    Ok(()) => tracing::info!("Metadata store is reachable"),
                    Err(e) => tracing::warn!(error = %e, "Metadata store is unreachable"),
                }
            }
            signal.record(ready);
        }
    }))
}

/// Run an async check with timeout; returns "healthy", "timeout", or "{prefix}: {error}".
async fn run_check(gateway: &PersistenceGateway, error_prefix: &str) -> String {
    match gateway.probe(HEALTH_PROBE_TIMEOUT).await {
        Ok(()) => "healthy".to_string(),
        Err(brankas_db::PersistenceError::Timeout(_)) => "timeout".to_string(),
        Err(e) => format!("{}: {}", error_prefix, e),
    }
}

#[derive(serde::Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    database: String,
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "alive" })))
}

/// Readiness probe - answered from the background signal, or probed on the
/// spot before the first background check has run.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let ready = match state.health.last() {
        Some(ready) => ready,
        None => state.gateway.probe(HEALTH_PROBE_TIMEOUT).await.is_ok(),
    };

    let (status_code, status, database) = if ready {
        (StatusCode::OK, "ready", "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready", "not_ready")
    };

    (
        status_code,
        Json(serde_json::json!({ "status": status, "database": database })),
    )
}

/// Full health check against the metadata store.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = run_check(&state.gateway, "unhealthy").await;
    let healthy = database == "healthy";

    let response = HealthCheckResponse {
        status: if healthy { "healthy" } else { "unhealthy" },
        database,
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_starts_unknown() {
        let signal = HealthSignal::default();
        assert_eq!(signal.last(), None);

        signal.record(false);
        assert_eq!(signal.last(), Some(false));

        let shared = signal.clone();
        shared.record(true);
        assert_eq!(signal.last(), Some(true));
    }
}
