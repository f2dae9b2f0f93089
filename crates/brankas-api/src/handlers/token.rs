use std::sync::Arc;

use axum::{extract::State, response::Response};

use crate::response::encode_ok;
use crate::state::AppState;

/// Hand out the upload secret as a JSON string.
#[tracing::instrument(skip(state))]
pub async fn get_token(State(state): State<Arc<AppState>>) -> Response {
    tracing::info!(
        configured = state.secret.is_configured(),
        "Get token from environment variable"
    );
    encode_ok(state.secret.expose())
}
