//! Multipart form reading and upload validation
//!
//! [`read_form`] is the size gate: it buffers the whole form while counting
//! streamed file bytes against the ceiling, so a missing or forged
//! Content-Length cannot get a larger file through.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Query};
use axum::http::{StatusCode, Uri};
use brankas_core::constants::FILE_FIELD;
use brankas_core::AppError;
use bytes::{Bytes, BytesMut};
use serde::Deserialize;
use std::collections::HashMap;

/// The file part of an upload form.
#[derive(Debug, Clone)]
pub struct FormFile {
    /// Claimed filename, empty when the client sent none.
    pub filename: String,
    /// Declared content type of the part, empty when absent.
    pub content_type: String,
    pub data: Bytes,
}

/// A fully buffered multipart form.
#[derive(Debug, Default)]
pub struct ParsedForm {
    fields: HashMap<String, String>,
    file: Option<FormFile>,
}

impl ParsedForm {
    /// First value of a plain (non-file) field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn take_file(&mut self) -> Option<FormFile> {
        self.file.take()
    }
}

fn form_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::InputTooLarge { limit }
    } else {
        AppError::MalformedForm {
            limit,
            reason: err.body_text(),
        }
    }
}

/// Read the whole form into memory, failing once more than `limit` bytes of
/// file data have been streamed. Text fields are bounded only by the request
/// body limit.
///
/// Only a part named `file` that carries a filename counts as the upload; the
/// first one wins. Other parts without a filename are kept as text fields.
pub async fn read_form(
    multipart: Result<Multipart, MultipartRejection>,
    limit: usize,
) -> Result<ParsedForm, AppError> {
    let mut multipart = multipart.map_err(|rejection| AppError::MalformedForm {
        limit,
        reason: rejection.body_text(),
    })?;

    let mut form = ParsedForm::default();
    let mut total = 0usize;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error(e, limit))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| form_error(e, limit))? {
            if filename.is_some() {
                total = total.saturating_add(chunk.len());
                if total > limit {
                    return Err(AppError::InputTooLarge { limit });
                }
            }
            data.extend_from_slice(&chunk);
        }

        match filename {
            Some(filename) if name == FILE_FIELD => {
                if form.file.is_none() {
                    form.file = Some(FormFile {
                        filename,
                        content_type: content_type.unwrap_or_default(),
                        data: data.freeze(),
                    });
                }
            }
            Some(_) => {}
            None => {
                form.fields
                    .entry(name)
                    .or_insert_with(|| String::from_utf8_lossy(&data).into_owned());
            }
        }
    }

    Ok(form)
}

#[derive(Debug, Deserialize)]
struct CredentialQuery {
    auth: Option<String>,
}

/// The `auth` value from the request query string, if any. Used when the
/// form itself carries no `auth` field.
pub fn credential_from_query(uri: &Uri) -> Option<String> {
    Query::<CredentialQuery>::try_from_uri(uri)
        .ok()
        .and_then(|Query(query)| query.auth)
}

/// Normalize MIME type by stripping parameters (e.g. "image/png; q=1" -> "image/png").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Type gate: the declared content type must be on the allow-list.
/// Parameters and case are ignored; the payload bytes are not inspected.
pub fn validate_content_type(content_type: &str, allowed_types: &[String]) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type).to_lowercase();
    if normalized.is_empty() || !allowed_types.iter().any(|ct| normalized == ct.to_lowercase()) {
        tracing::debug!(content_type, "Content type is not allowed");
        return Err(AppError::UnsupportedType(content_type.to_string()));
    }
    tracing::debug!(content_type, "Content type is allowed");
    Ok(())
}
