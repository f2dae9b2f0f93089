//! Persistence errors

use brankas_core::AppError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    /// No connection could be obtained from the store.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The liveness probe on an open connection failed.
    #[error("Liveness probe failed: {0}")]
    Probe(String),

    #[error("Insert failed: {0}")]
    Insert(String),

    #[error("Deadline of {0:?} elapsed")]
    Timeout(Duration),

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl From<PersistenceError> for AppError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Connect(msg) => AppError::ConnectionSetupFailure(msg),
            PersistenceError::Probe(msg) | PersistenceError::Insert(msg) => {
                AppError::PersistenceFailure(msg)
            }
            PersistenceError::Timeout(deadline) => AppError::PersistenceTimeout(deadline.as_secs()),
            PersistenceError::Migration(msg) => AppError::Internal(msg),
        }
    }
}
