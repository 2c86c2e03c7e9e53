//! # SQLite Store
//!
//! The persistent [`DocumentStore`]: one `documents` table, pooled
//! connections, embedded migrations.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SQLite Document Store                            │
//! │                                                                         │
//! │  SqliteConfig::new(path) ← Configure pool settings                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteStore::connect(config).await ← Create pool + run migrations     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ├── reads: run concurrently on any connection                    │
//! │       └── commit(batch): one transaction, serialized by write_lock     │
//! │                                                                         │
//! │  documents(collection, id, data JSON, created_at, updated_at)          │
//! │  field queries: json_extract(data, '$.<field>') = json_extract(?, '$') │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! Readers don't block the writer and the writer doesn't block readers,
//! so discovery keeps running while bookings are written.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::batch::{WriteBatch, WriteOp};
use crate::document::{
    ensure_object, field_state_matches, merge_shallow, validate_field_name, Document,
};
use crate::error::{StoreError, StoreResult};
use crate::migrations;
use crate::store::DocumentStore;

// =============================================================================
// Configuration
// =============================================================================

/// SQLite store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = SqliteConfig::new("/path/to/ridehub.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl SqliteConfig {
    /// Configuration for a database file, created if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SqliteConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// An isolated in-memory database (for tests).
    pub fn in_memory() -> Self {
        SqliteConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(FromRow)]
struct DocumentRow {
    id: String,
    data: String,
}

impl DocumentRow {
    fn into_document(self) -> StoreResult<Document> {
        let data: Value = serde_json::from_str(&self.data)?;
        Ok(Document::new(self.id, data))
    }
}

/// Document store backed by SQLite.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    /// Serializes batches so read-check-write inside a transaction cannot
    /// interleave with another batch.
    write_lock: Arc<Mutex<()>>,
}

impl SqliteStore {
    /// Opens the pool and (by default) applies pending migrations.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Enables WAL mode, NORMAL synchronous, foreign keys
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn connect(config: SqliteConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing document store"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Document store pool created"
        );

        let store = SqliteStore {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        };

        if config.run_migrations {
            store.run_migrations().await?;
        }

        Ok(store)
    }

    /// Applies pending migrations. Idempotent.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        info!("Running store migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the pool; every later call fails with `Unavailable`.
    pub async fn close(&self) {
        info!("Closing document store pool");
        self.pool.close().await;
    }

    /// True if the database answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn fetch_in_tx(
        tx: &mut Transaction<'_, Sqlite>,
        collection: &str,
        id: &str,
    ) -> StoreResult<Option<Value>> {
        let row: Option<DocumentRow> = sqlx::query_as(
            "SELECT id, data FROM documents WHERE collection = ?1 AND id = ?2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        row.map(|r| r.into_document().map(|d| d.data)).transpose()
    }

    async fn apply_in_tx(tx: &mut Transaction<'_, Sqlite>, op: &WriteOp) -> StoreResult<()> {
        let now = Utc::now();
        match op {
            WriteOp::Create {
                collection,
                id,
                data,
            } => {
                ensure_object(data)?;
                let result = sqlx::query(
                    r#"
                    INSERT INTO documents (collection, id, data, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?4)
                    ON CONFLICT (collection, id) DO NOTHING
                    "#,
                )
                .bind(collection)
                .bind(id)
                .bind(data.to_string())
                .bind(now)
                .execute(&mut **tx)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(StoreError::conflict(collection.as_str(), id.as_str()));
                }
            }

            WriteOp::Set {
                collection,
                id,
                data,
            } => {
                ensure_object(data)?;
                sqlx::query(
                    r#"
                    INSERT INTO documents (collection, id, data, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?4)
                    ON CONFLICT (collection, id) DO UPDATE SET
                        data = excluded.data,
                        updated_at = excluded.updated_at
                    "#,
                )
                .bind(collection)
                .bind(id)
                .bind(data.to_string())
                .bind(now)
                .execute(&mut **tx)
                .await?;
            }

            WriteOp::Update {
                collection,
                id,
                patch,
            } => {
                let mut current = Self::fetch_in_tx(tx, collection, id)
                    .await?
                    .ok_or_else(|| StoreError::not_found(collection.as_str(), id.as_str()))?;
                merge_shallow(&mut current, patch)?;

                sqlx::query(
                    "UPDATE documents SET data = ?3, updated_at = ?4 WHERE collection = ?1 AND id = ?2",
                )
                .bind(collection)
                .bind(id)
                .bind(current.to_string())
                .bind(now)
                .execute(&mut **tx)
                .await?;
            }

            WriteOp::Delete { collection, id } => {
                sqlx::query("DELETE FROM documents WHERE collection = ?1 AND id = ?2")
                    .bind(collection)
                    .bind(id)
                    .execute(&mut **tx)
                    .await?;
            }

            WriteOp::Expect {
                collection,
                id,
                field,
                value,
            } => {
                validate_field_name(field)?;
                let current = Self::fetch_in_tx(tx, collection, id)
                    .await?
                    .ok_or_else(|| StoreError::not_found(collection.as_str(), id.as_str()))?;
                if !field_state_matches(&current, field, value.as_ref()) {
                    return Err(StoreError::PreconditionFailed {
                        collection: collection.clone(),
                        id: id.clone(),
                        field: field.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let row: Option<DocumentRow> = sqlx::query_as(
            "SELECT id, data FROM documents WHERE collection = ?1 AND id = ?2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(DocumentRow::into_document).transpose()
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>> {
        validate_field_name(field)?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        debug!(collection, field, "Querying documents by field");

        // The field name is validated above, so the path is a plain literal
        // and the expression indexes from the migrations apply.
        let sql = format!(
            "SELECT id, data FROM documents \
             WHERE collection = ?1 AND json_extract(data, '$.{}') = json_extract(?2, '$') \
             ORDER BY id",
            field
        );

        let rows: Vec<DocumentRow> = sqlx::query_as(&sql)
            .bind(collection)
            .bind(value.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(DocumentRow::into_document).collect()
    }

    async fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let rows: Vec<DocumentRow> =
            sqlx::query_as("SELECT id, data FROM documents WHERE collection = ?1 ORDER BY id")
                .bind(collection)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(DocumentRow::into_document).collect()
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        debug!(ops = batch.len(), "Committing batch (sqlite)");

        let mut tx = self.pool.begin().await?;
        for op in batch.ops() {
            // Returning early drops `tx`, which rolls back.
            Self::apply_in_tx(&mut tx, op).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
