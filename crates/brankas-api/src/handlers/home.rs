use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::state::AppState;

/// Landing page
pub async fn home_page(State(state): State<Arc<AppState>>) -> Response {
    let path = &state.config.landing_page;
    match tokio::fs::read_to_string(path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "Landing page unavailable");
            (StatusCode::NOT_FOUND, "404 page not found").into_response()
        }
    }
}
