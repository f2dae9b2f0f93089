//! Staging setup

use brankas_core::Config;
use brankas_storage::{LocalStager, Stager};
use std::sync::Arc;

pub fn setup_stager(config: &Config) -> Arc<dyn Stager> {
    tracing::info!(dir = %config.staging_dir.display(), "Staging uploads locally");
    Arc::new(LocalStager::new(&config.staging_dir))
}
