//! Persistence for upload metadata
//!
//! [`MetadataStore`] hands out one [`StoreSession`] (a single connection) per
//! persistence call. [`PersistenceGateway`] drives a session through probe and
//! insert under one deadline. [`PgMetadataStore`] is the Postgres backend.

pub mod error;
pub mod gateway;
pub mod postgres;
pub mod store;

pub use error::{PersistenceError, PersistenceResult};
pub use gateway::PersistenceGateway;
pub use postgres::{PgMetadataStore, MIGRATOR};
pub use store::{MetadataStore, StoreSession};
