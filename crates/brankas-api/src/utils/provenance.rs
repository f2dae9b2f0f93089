//! Request provenance extraction

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::{HeaderName, ORIGIN, USER_AGENT};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::convert::Infallible;
use std::net::SocketAddr;

/// The parts of an incoming request recorded alongside an upload.
///
/// Absent headers are recorded as empty strings; the remote address is only
/// known when the server is run with connect info.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestProvenance {
    pub origin: String,
    pub path: String,
    pub method: String,
    pub user_agent: String,
    pub remote_addr: String,
}

impl RequestProvenance {
    pub fn from_parts(parts: &Parts) -> Self {
        let remote_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_default();

        Self {
            origin: joined_header(&parts.headers, &ORIGIN),
            path: parts.uri.path().to_string(),
            method: parts.method.to_string(),
            user_agent: joined_header(&parts.headers, &USER_AGENT),
            remote_addr,
        }
    }
}

/// All values of a header concatenated, or empty.
fn joined_header(headers: &HeaderMap, name: &HeaderName) -> String {
    headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect()
}

impl<S> FromRequestParts<S> for RequestProvenance
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}
