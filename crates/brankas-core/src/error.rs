//! Error types module
//!
//! Every failure the upload pipeline can produce is a variant of [`AppError`].
//! Variants self-describe how they are presented over HTTP through the
//! [`ErrorMetadata`] trait, so the HTTP crate only has to render them.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for rejected credentials and unavailable dependencies
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UNSUPPORTED_TYPE")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Request body exceeds {limit} bytes")]
    InputTooLarge { limit: usize },

    #[error("Malformed multipart form: {reason}")]
    MalformedForm { limit: usize, reason: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Missing form file field '{0}'")]
    MissingFile(String),

    #[error("Unsupported content type '{0}'")]
    UnsupportedType(String),

    #[error("Persistence timed out after {0} seconds")]
    PersistenceTimeout(u64),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Failed to encode response: {0}")]
    EncodingFailure(String),

    #[error("Could not connect to the metadata store: {0}")]
    ConnectionSetupFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::EncodingFailure(err.to_string())
    }
}

/// Static metadata for each variant: (http_status, error_code, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::InputTooLarge { .. } => (400, "INPUT_TOO_LARGE", LogLevel::Debug),
        AppError::MalformedForm { .. } => (400, "MALFORMED_FORM", LogLevel::Debug),
        AppError::Unauthorized(_) => (403, "UNAUTHORIZED", LogLevel::Warn),
        AppError::MissingFile(_) => (400, "MISSING_FILE", LogLevel::Debug),
        AppError::UnsupportedType(_) => (415, "UNSUPPORTED_TYPE", LogLevel::Debug),
        AppError::PersistenceTimeout(_) => (500, "PERSISTENCE_TIMEOUT", LogLevel::Error),
        AppError::PersistenceFailure(_) => (500, "PERSISTENCE_FAILURE", LogLevel::Error),
        AppError::EncodingFailure(_) => (500, "ENCODING_FAILURE", LogLevel::Error),
        AppError::ConnectionSetupFailure(_) => (503, "CONNECTION_SETUP_FAILURE", LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for log fields
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InputTooLarge { .. } => "InputTooLarge",
            AppError::MalformedForm { .. } => "MalformedForm",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::MissingFile(_) => "MissingFile",
            AppError::UnsupportedType(_) => "UnsupportedType",
            AppError::PersistenceTimeout(_) => "PersistenceTimeout",
            AppError::PersistenceFailure(_) => "PersistenceFailure",
            AppError::EncodingFailure(_) => "EncodingFailure",
            AppError::ConnectionSetupFailure(_) => "ConnectionSetupFailure",
            AppError::Internal(_) => "Internal",
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            // A form that cannot be parsed is reported exactly like an oversized one.
            AppError::InputTooLarge { limit } | AppError::MalformedForm { limit, .. } => format!(
                "File exceeded the size limit of {} megabytes",
                limit / 1024 / 1024
            ),
            AppError::Unauthorized(_) => "Access not allowed".to_string(),
            AppError::MissingFile(_) => "Error Retrieving the File".to_string(),
            AppError::UnsupportedType(_) => "Invalid File Type".to_string(),
            AppError::PersistenceTimeout(_) | AppError::PersistenceFailure(_) => {
                "Error occurred while uploading the file".to_string()
            }
            AppError::EncodingFailure(_) => "Failed to encode response.".to_string(),
            AppError::ConnectionSetupFailure(_) => "Storage backend unavailable".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}
