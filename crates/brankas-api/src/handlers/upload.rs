use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::Uri,
    response::Response,
};

use crate::error::HttpAppError;
use crate::response::encode_ok;
use crate::services::upload::UploadService;
use crate::state::AppState;
use crate::utils::provenance::RequestProvenance;
use crate::utils::upload::credential_from_query;

/// Upload image handler
///
/// Expects a multipart form with a `file` part and an `auth` field; `auth`
/// may instead be sent as a query parameter. Responds with the persisted
/// record as JSON.
///
/// # Errors
/// - 400 when the form is oversized or unreadable, or has no `file` part
/// - 403 when `auth` does not match the configured secret
/// - 415 when the declared content type is not allowed
/// - 500 when persisting fails or times out
/// - 503 when the metadata store cannot be reached
#[tracing::instrument(
    skip(state, uri, provenance, multipart),
    fields(operation = "upload_image", remote_addr = %provenance.remote_addr)
)]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    provenance: RequestProvenance,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpAppError> {
    tracing::info!("Upload received");

    let record = UploadService::new(&state)
        .upload(multipart, credential_from_query(&uri), provenance)
        .await?;

    tracing::info!(
        image_id = %record.id,
        filename = %record.filename,
        size = record.size,
        content_type = %record.content_type,
        "Record has been saved"
    );

    Ok(encode_ok(&record))
}
