//! JSON success responses

use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use brankas_core::AppError;
use serde::Serialize;

use crate::error::HttpAppError;

/// Serialize `value` into a 200 JSON response open to any origin.
///
/// Serialization happens before anything is written, so a failure yields
/// exactly one response: the 500 encoding error.
pub fn encode_ok<T: Serialize + ?Sized>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => (
            StatusCode::OK,
            [
                (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                (CONTENT_TYPE, "application/json"),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to marshal response");
            HttpAppError(AppError::from(e)).into_response()
        }
    }
}
