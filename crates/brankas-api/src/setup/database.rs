//! Metadata store setup

use anyhow::{Context, Result};
use brankas_core::Config;
use brankas_db::{MetadataStore, PgMetadataStore};
use std::sync::Arc;
use std::time::Duration;

/// Build the Postgres pool and apply migrations.
///
/// The pool connects lazily and a failed migration only logs, so the service
/// starts even while the database is down. Uploads fail with 503 until it
/// comes back, and the first session that connects applies the schema.
pub async fn setup_store(config: &Config) -> Result<Arc<dyn MetadataStore>> {
    tracing::info!(
        max_connections = config.db_max_connections,
        acquire_timeout_secs = config.db_connect_timeout_secs,
        "Preparing database pool"
    );

    let store = PgMetadataStore::connect_lazy(
        &config.database_url,
        config.db_max_connections,
        Duration::from_secs(config.db_connect_timeout_secs),
    )
    .context("Failed to configure database pool")?;

    match store.run_migrations().await {
        Ok(()) => tracing::info!("Database migrations applied"),
        Err(e) => tracing::error!(
            error = %e,
            "Could not apply database migrations; retrying on first connection"
        ),
    }

    Ok(Arc::new(store))
}
