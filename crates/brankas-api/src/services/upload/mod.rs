//! Upload pipeline
//!
//! size gate → auth gate → file extraction → type gate → staging →
//! metadata → persistence

mod metadata;
mod service;

pub use metadata::build_metadata;
pub use service::UploadService;
