//! Brankas API Library
//!
//! HTTP surface of the upload ingestion service: the upload gates, the upload
//! pipeline, handlers, health reporting and application setup.

pub mod auth;
pub mod constants;
pub mod error;
mod handlers;
pub mod response;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use auth::SharedSecret;
pub use error::HttpAppError;
pub use state::AppState;
