//! Test helpers: build AppState and router for integration tests.
//!
//! The metadata store is replaced with [`store::InMemoryStore`] so the HTTP
//! surface can be exercised without Postgres. Staging goes to a temp dir.

#![allow(dead_code)]

pub mod fixtures;
pub mod store;

use axum_test::TestServer;
use brankas_api::setup::routes;
use brankas_api::AppState;
use brankas_core::Config;
use brankas_storage::LocalStager;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use store::InMemoryStore;

/// Secret configured on the test app.
pub const TEST_TOKEN: &str = "test-upload-secret";

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub store: InMemoryStore,
    pub staging: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Files currently in the staging directory.
    pub fn staged_files(&self) -> Vec<std::path::PathBuf> {
        std::fs::read_dir(self.staging.path())
            .expect("Failed to read staging dir")
            .map(|entry| entry.expect("dir entry").path())
            .collect()
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {})
}

/// Setup test app after letting the caller adjust the configuration.
pub fn setup_test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let staging = tempfile::tempdir().expect("Failed to create temp directory");

    let mut config = Config::for_tests(TEST_TOKEN);
    config.staging_dir = staging.path().to_path_buf();
    configure(&mut config);

    let store = InMemoryStore::new();
    let stager = Arc::new(LocalStager::new(&config.staging_dir));
    let state = AppState::new(config.clone(), stager, Arc::new(store.clone()))
        .with_persistence_deadline(Duration::from_millis(300));

    let router = routes::setup_routes(&config, Arc::new(state)).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        store,
        staging,
    }
}
