//! Store abstraction
//!
//! A persistence call opens exactly one session, uses it, and drops it. Dropping
//! the session releases the underlying connection, so it is released on every
//! path, including early returns on error and cancellation.

use async_trait::async_trait;
use brankas_core::{ImageMetadata, NewImageMetadata};

use crate::error::PersistenceResult;

/// Durable store for upload metadata.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Obtain a connection for one persistence call.
    async fn open(&self) -> PersistenceResult<Box<dyn StoreSession>>;
}

/// One connection checked out of a [`MetadataStore`].
#[async_trait]
pub trait StoreSession: Send {
    /// Verify the store answers on this connection.
    async fn ping(&mut self) -> PersistenceResult<()>;

    /// Insert the image and its request history together and return the
    /// record with the identities the store assigned.
    async fn insert_image(&mut self, record: &NewImageMetadata) -> PersistenceResult<ImageMetadata>;
}
