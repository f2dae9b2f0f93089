//! Shared constants

/// Upper bound on an upload request body (8 MiB).
pub const MAX_UPLOAD_SIZE: usize = 8_388_608;

/// Content types accepted by the upload endpoint unless overridden.
pub const DEFAULT_ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/gif"];

/// Deadline for a single persistence call, in seconds.
pub const PERSISTENCE_TIMEOUT_SECS: u64 = 30;

/// Multipart field carrying the uploaded payload.
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying the caller's credential.
pub const AUTH_FIELD: &str = "auth";
