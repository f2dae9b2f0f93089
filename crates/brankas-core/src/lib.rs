//! Brankas Core Library
//!
//! This crate provides the domain models, error types, and configuration
//! shared by the persistence, staging, and HTTP crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{HttpHistory, ImageMetadata, NewHttpHistory, NewImageMetadata};
