use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use brankas_core::constants::{AUTH_FIELD, FILE_FIELD};
use brankas_core::{AppError, ImageMetadata};
use chrono::Utc;

use crate::state::AppState;
use crate::utils::provenance::RequestProvenance;
use crate::utils::upload::{read_form, validate_content_type, FormFile};

use super::metadata::build_metadata;

/// Runs one upload through the gates and into the metadata store.
pub struct UploadService {
    state: Arc<AppState>,
}

impl UploadService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Validate, stage and persist one upload. Every gate short-circuits with
    /// its own error; nothing is persisted unless all of them pass.
    ///
    /// The credential comes from the form's `auth` field, or from
    /// `query_credential` when the form has none.
    pub async fn upload(
        &self,
        multipart: Result<Multipart, MultipartRejection>,
        query_credential: Option<String>,
        provenance: RequestProvenance,
    ) -> Result<ImageMetadata, AppError> {
        let config = &self.state.config;

        let mut form = read_form(multipart, config.max_upload_size).await?;

        let credential = form
            .field(AUTH_FIELD)
            .or(query_credential.as_deref())
            .unwrap_or_default();
        self.state.secret.verify(credential)?;

        let file = form
            .take_file()
            .ok_or_else(|| AppError::MissingFile(FILE_FIELD.to_string()))?;

        tracing::debug!(
            filename = %file.filename,
            content_type = %file.content_type,
            size = file.data.len(),
            "File content header"
        );

        validate_content_type(&file.content_type, &config.allowed_content_types)?;

        self.stage(&file).await;

        let record = build_metadata(&file, provenance, Utc::now());
        let saved = self
            .state
            .gateway
            .save(record, self.state.persistence_deadline)
            .await?;

        Ok(saved)
    }

    /// Best effort: a staging failure is logged and the upload continues.
    async fn stage(&self, file: &FormFile) {
        match self.state.stager.stage(file.data.clone()).await {
            Ok(path) => {
                tracing::debug!(path = %path.display(), filename = %file.filename, "Temporary file created");
            }
            Err(e) => {
                tracing::error!(error = %e, filename = %file.filename, "Failed to stage upload");
            }
        }
    }
}
