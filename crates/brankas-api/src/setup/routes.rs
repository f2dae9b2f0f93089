//! Route configuration and setup

use crate::constants::{
    FORM_OVERHEAD_ALLOWANCE, HTTP_CONCURRENCY_LIMIT, ROUTE_HEALTH, ROUTE_HOME, ROUTE_LIVE,
    ROUTE_READY, ROUTE_TOKEN, ROUTE_UPLOAD,
};
use crate::handlers;
use crate::setup::health;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use brankas_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    // Bodies larger than the ceiling plus framing fail inside the multipart reader.
    let upload_routes = Router::new()
        .route(ROUTE_UPLOAD, post(handlers::upload::upload_image))
        .layer(DefaultBodyLimit::max(
            config.max_upload_size.saturating_add(FORM_OVERHEAD_ALLOWANCE),
        ));

    let app = Router::new()
        .route(ROUTE_HOME, get(handlers::home::home_page))
        .route(ROUTE_TOKEN, get(handlers::token::get_token))
        .route(ROUTE_HEALTH, get(health::health_check))
        .route(ROUTE_LIVE, get(health::liveness_check))
        .route(ROUTE_READY, get(health::readiness_check))
        .merge(upload_routes)
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
