//! API constants

use std::time::Duration;

/// Timeout for the on-demand store probe behind `/health`.
pub const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Room for multipart framing and text fields on top of the upload ceiling.
/// The ceiling itself is enforced on file data by the form reader.
pub const FORM_OVERHEAD_ALLOWANCE: usize = 64 * 1024;

/// Server-wide cap on in-flight requests.
pub const HTTP_CONCURRENCY_LIMIT: usize = 1_024;

pub const ROUTE_HOME: &str = "/";
pub const ROUTE_TOKEN: &str = "/token";
pub const ROUTE_UPLOAD: &str = "/upload";
pub const ROUTE_HEALTH: &str = "/health";
pub const ROUTE_LIVE: &str = "/live";
pub const ROUTE_READY: &str = "/ready";
