//! Application state shared by every handler.

use brankas_core::Config;
use brankas_db::{MetadataStore, PersistenceGateway};
use brankas_storage::Stager;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::SharedSecret;
use crate::setup::health::HealthSignal;

/// Read-only after startup; handlers receive it as `State<Arc<AppState>>`.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub secret: SharedSecret,
    pub stager: Arc<dyn Stager>,
    pub gateway: PersistenceGateway,
    /// Deadline for one persistence call.
    pub persistence_deadline: Duration,
    pub health: HealthSignal,
}

impl AppState {
    pub fn new(config: Config, stager: Arc<dyn Stager>, store: Arc<dyn MetadataStore>) -> Self {
        Self {
            secret: SharedSecret::new(config.token.clone()),
            persistence_deadline: Duration::from_secs(config.persistence_timeout_secs),
            gateway: PersistenceGateway::new(store),
            health: HealthSignal::default(),
            stager,
            config,
        }
    }

    pub fn with_persistence_deadline(mut self, deadline: Duration) -> Self {
        self.persistence_deadline = deadline;
        self
    }
}
