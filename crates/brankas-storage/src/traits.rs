//! Staging abstraction

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Staging directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("Failed to create staging file: {0}")]
    CreateFailed(String),

    #[error("Failed to write staging file: {0}")]
    WriteFailed(String),
}

/// Result type for staging operations
pub type StagingResult<T> = Result<T, StagingError>;

/// Writes upload payloads somewhere durable enough to outlive the request.
#[async_trait]
pub trait Stager: Send + Sync {
    /// Write `data` to a fresh uniquely named file and return its path.
    /// Existing files are never overwritten.
    async fn stage(&self, data: Bytes) -> StagingResult<PathBuf>;
}
