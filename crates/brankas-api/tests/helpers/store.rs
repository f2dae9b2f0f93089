//! In-memory metadata store with switchable failure modes.

#![allow(dead_code)]

use async_trait::async_trait;
use brankas_core::{ImageMetadata, NewImageMetadata};
use brankas_db::{MetadataStore, PersistenceError, PersistenceResult, StoreSession};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Failure {
    None,
    /// No connection can be obtained.
    RefuseOpen,
    /// The liveness probe fails.
    FailPing,
    /// The insert fails after a successful probe.
    FailInsert,
    /// The insert never completes.
    Hang,
}

struct Inner {
    records: Mutex<Vec<ImageMetadata>>,
    failure: Mutex<Failure>,
    open_sessions: AtomicUsize,
    sessions_opened: AtomicUsize,
}

#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                records: Mutex::new(Vec::new()),
                failure: Mutex::new(Failure::None),
                open_sessions: AtomicUsize::new(0),
                sessions_opened: AtomicUsize::new(0),
            }),
        }
    }

    pub fn set_failure(&self, failure: Failure) {
        *self.inner.failure.lock().unwrap() = failure;
    }

    pub fn records(&self) -> Vec<ImageMetadata> {
        self.inner.records.lock().unwrap().clone()
    }

    /// Sessions checked out and not yet released.
    pub fn open_sessions(&self) -> usize {
        self.inner.open_sessions.load(Ordering::SeqCst)
    }

    /// Sessions handed out since creation.
    pub fn sessions_opened(&self) -> usize {
        self.inner.sessions_opened.load(Ordering::SeqCst)
    }

    fn failure(&self) -> Failure {
        *self.inner.failure.lock().unwrap()
    }
}

#[async_trait]
impl MetadataStore for InMemoryStore {
    async fn open(&self) -> PersistenceResult<Box<dyn StoreSession>> {
        let failure = self.failure();
        if failure == Failure::RefuseOpen {
            return Err(PersistenceError::Connect("connection refused".to_string()));
        }

        self.inner.open_sessions.fetch_add(1, Ordering::SeqCst);
        self.inner.sessions_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemorySession {
            inner: self.inner.clone(),
            failure,
        }))
    }
}

struct InMemorySession {
    inner: Arc<Inner>,
    failure: Failure,
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        self.inner.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StoreSession for InMemorySession {
    async fn ping(&mut self) -> PersistenceResult<()> {
        match self.failure {
            Failure::FailPing => Err(PersistenceError::Probe("server selection error".to_string())),
            _ => Ok(()),
        }
    }

    async fn insert_image(&mut self, record: &NewImageMetadata) -> PersistenceResult<ImageMetadata> {
        match self.failure {
            Failure::FailInsert => Err(PersistenceError::Insert("write conflict".to_string())),
            Failure::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(PersistenceError::Insert("unreachable".to_string()))
            }
            _ => {
                let saved = record.clone().into_persisted(Uuid::new_v4(), Uuid::new_v4());
                self.inner.records.lock().unwrap().push(saved.clone());
                Ok(saved)
            }
        }
    }
}
