//! Deadline-bounded persistence
//!
//! One [`PersistenceGateway::save`] call opens one session, probes it, inserts
//! the record and releases the session, all under a single deadline. When the
//! deadline elapses the in-flight future is dropped, which drops the session
//! and returns its connection.

use brankas_core::{ImageMetadata, NewImageMetadata};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{PersistenceError, PersistenceResult};
use crate::store::MetadataStore;

#[derive(Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn MetadataStore>,
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn MetadataStore>) -> Self {
        Self { store }
    }

    /// Persist `record` within `deadline`.
    #[tracing::instrument(skip(self, record), fields(deadline_secs = deadline.as_secs()))]
    pub async fn save(
        &self,
        record: NewImageMetadata,
        deadline: Duration,
    ) -> PersistenceResult<ImageMetadata> {
        match tokio::time::timeout(deadline, self.save_inner(&record)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(filename = %record.filename, "Persistence deadline elapsed");
                Err(PersistenceError::Timeout(deadline))
            }
        }
    }

    async fn save_inner(&self, record: &NewImageMetadata) -> PersistenceResult<ImageMetadata> {
        let mut session = self.store.open().await?;
        session.ping().await?;
        session.insert_image(record).await
    }

    /// Open a session and probe it within `deadline`. Used by health checks.
    pub async fn probe(&self, deadline: Duration) -> PersistenceResult<()> {
        let check = async {
            let mut session = self.store.open().await?;
            session.ping().await
        };

        tokio::time::timeout(deadline, check)
            .await
            .map_err(|_| PersistenceError::Timeout(deadline))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreSession;
    use async_trait::async_trait;
    use brankas_core::NewHttpHistory;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    #[derive(Clone, Copy, PartialEq)]
    enum Mode {
        Ok,
        RefuseOpen,
        FailPing,
        FailInsert,
        Hang,
    }

    struct FakeStore {
        mode: Mode,
        open_sessions: Arc<AtomicUsize>,
    }

    impl FakeStore {
        fn new(mode: Mode) -> Self {
            Self {
                mode,
                open_sessions: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    struct FakeSession {
        mode: Mode,
        open_sessions: Arc<AtomicUsize>,
    }

    impl Drop for FakeSession {
        fn drop(&mut self) {
            self.open_sessions.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl MetadataStore for FakeStore {
        async fn open(&self) -> PersistenceResult<Box<dyn StoreSession>> {
            if self.mode == Mode::RefuseOpen {
                return Err(PersistenceError::Connect("connection refused".to_string()));
            }
            self.open_sessions.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeSession {
                mode: self.mode,
                open_sessions: self.open_sessions.clone(),
            }))
        }
    }

    #[async_trait]
    impl StoreSession for FakeSession {
        async fn ping(&mut self) -> PersistenceResult<()> {
            match self.mode {
                Mode::FailPing => Err(PersistenceError::Probe("no primary".to_string())),
                _ => Ok(()),
            }
        }

        async fn insert_image(
            &mut self,
            record: &NewImageMetadata,
        ) -> PersistenceResult<ImageMetadata> {
            match self.mode {
                Mode::FailInsert => Err(PersistenceError::Insert("disk full".to_string())),
                Mode::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    unreachable!("deadline should cancel the insert")
                }
                _ => Ok(record.clone().into_persisted(Uuid::new_v4(), Uuid::new_v4())),
            }
        }
    }

    fn record() -> NewImageMetadata {
        NewImageMetadata {
            filename: "a.png".to_string(),
            size: 10,
            content_type: "image/png".to_string(),
            http_history: NewHttpHistory {
                origin: String::new(),
                path: "/upload".to_string(),
                method: "POST".to_string(),
                user_agent: String::new(),
                remote_addr: "127.0.0.1:40000".to_string(),
                date_time: Utc::now(),
            },
        }
    }

    fn gateway(store: FakeStore) -> (PersistenceGateway, Arc<AtomicUsize>) {
        let counter = store.open_sessions.clone();
        (PersistenceGateway::new(Arc::new(store)), counter)
    }

    #[tokio::test]
    async fn test_save_assigns_ids_and_releases_session() {
        let (gateway, open) = gateway(FakeStore::new(Mode::Ok));
        let saved = gateway
            .save(record(), Duration::from_secs(5))
            .await
            .expect("save");
        assert_eq!(saved.filename, "a.png");
        assert_ne!(saved.id, saved.http_history.id);
        assert_eq!(open.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_open_failure_is_connect_error() {
        let (gateway, _) = gateway(FakeStore::new(Mode::RefuseOpen));
        let err = gateway
            .save(record(), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Connect(_)));
    }

    #[tokio::test]
    async fn test_ping_failure_releases_session() {
        let (gateway, open) = gateway(FakeStore::new(Mode::FailPing));
        let err = gateway
            .save(record(), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Probe(_)));
        assert_eq!(open.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_insert_failure_releases_session() {
        let (gateway, open) = gateway(FakeStore::new(Mode::FailInsert));
        let err = gateway
            .save(record(), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Insert(_)));
        assert_eq!(open.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_cancels_and_releases_session() {
        let (gateway, open) = gateway(FakeStore::new(Mode::Hang));
        let err = gateway
            .save(record(), Duration::from_secs(30))
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Timeout(d) if d == Duration::from_secs(30)));
        assert_eq!(open.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_probe() {
        let (healthy, _) = gateway(FakeStore::new(Mode::Ok));
        assert!(healthy.probe(Duration::from_secs(1)).await.is_ok());

        let (down, _) = gateway(FakeStore::new(Mode::RefuseOpen));
        assert!(down.probe(Duration::from_secs(1)).await.is_err());
    }
}
