//! Postgres metadata store
//!
//! Images live in `image_metadata`, request provenance in `http_history`. The
//! two rows of one upload are written in a single transaction so neither can
//! exist without the other.

use async_trait::async_trait;
use brankas_core::{ImageMetadata, NewImageMetadata};
use sqlx::migrate::Migrator;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgConnection, PgPool, Postgres};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::error::{PersistenceError, PersistenceResult};
use crate::store::{MetadataStore, StoreSession};

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// [`MetadataStore`] backed by a Postgres pool.
///
/// The schema is applied once per process: at startup when the database is
/// reachable, otherwise by the first session that manages to connect.
#[derive(Clone)]
pub struct PgMetadataStore {
    pool: PgPool,
    migrated: Arc<OnceCell<()>>,
}

impl PgMetadataStore {
    /// Build a pool without connecting. Connections are made on first use, so
    /// an unreachable database surfaces per request instead of at startup.
    pub fn connect_lazy(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> PersistenceResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(database_url)
            .map_err(|e| PersistenceError::Connect(e.to_string()))?;

        Ok(Self {
            pool,
            migrated: Arc::new(OnceCell::new()),
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Whether the schema has been applied by this process.
    pub fn is_migrated(&self) -> bool {
        self.migrated.initialized()
    }

    pub async fn run_migrations(&self) -> PersistenceResult<()> {
        self.migrated
            .get_or_try_init(|| async { MIGRATOR.run(&self.pool).await })
            .await
            .map_err(|e| PersistenceError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Apply the schema over an already acquired connection. A no-op once any
    /// caller has succeeded.
    async fn ensure_migrated(&self, conn: &mut PgConnection) -> PersistenceResult<()> {
        if self.migrated.initialized() {
            return Ok(());
        }
        self.migrated
            .get_or_try_init(|| async move { MIGRATOR.run_direct(conn).await })
            .await
            .map_err(|e| PersistenceError::Migration(e.to_string()))?;
        tracing::info!("Database migrations applied on first connection");
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    async fn open(&self) -> PersistenceResult<Box<dyn StoreSession>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| PersistenceError::Connect(e.to_string()))?;

        self.ensure_migrated(&mut conn).await?;

        Ok(Box::new(PgSession { conn }))
    }
}

/// A pooled connection. Returned to the pool on drop.
struct PgSession {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl StoreSession for PgSession {
    async fn ping(&mut self) -> PersistenceResult<()> {
        sqlx::query("SELECT 1")
            .execute(&mut *self.conn)
            .await
            .map_err(|e| PersistenceError::Probe(e.to_string()))?;
        Ok(())
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "image_metadata", filename = %record.filename))]
    async fn insert_image(&mut self, record: &NewImageMetadata) -> PersistenceResult<ImageMetadata> {
        let insert_err = |e: sqlx::Error| PersistenceError::Insert(e.to_string());

        let mut tx = self.conn.begin().await.map_err(insert_err)?;

        let image_id: Uuid = sqlx::query_scalar::<Postgres, Uuid>(
            r#"
            INSERT INTO image_metadata (filename, size, content_type)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&record.filename)
        .bind(record.size)
        .bind(&record.content_type)
        .fetch_one(&mut *tx)
        .await
        .map_err(insert_err)?;

        let history = &record.http_history;
        let history_id: Uuid = sqlx::query_scalar::<Postgres, Uuid>(
            r#"
            INSERT INTO http_history (image_id, origin, path, method, user_agent, remote_addr, date_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(image_id)
        .bind(&history.origin)
        .bind(&history.path)
        .bind(&history.method)
        .bind(&history.user_agent)
        .bind(&history.remote_addr)
        .bind(history.date_time)
        .fetch_one(&mut *tx)
        .await
        .map_err(insert_err)?;

        tx.commit().await.map_err(insert_err)?;

        tracing::debug!(image_id = %image_id, history_id = %history_id, "Image metadata stored");

        Ok(record.clone().into_persisted(image_id, history_id))
    }
}
