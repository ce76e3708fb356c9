//! SQLite storage backend implementation
//!
//! Feedback lives in a single `feedback` table. Connections come from a
//! deadpool-sqlite pool shared by all request handlers; each checked-out
//! connection waits on SQLite's lock instead of failing with `SQLITE_BUSY`,
//! so concurrent writers are serialized by the database itself.

use crate::config::StoreConfig;
use crate::error::{FeedbackError, Result};
use crate::storage::FeedbackStore;
use crate::types::{FeedbackId, FeedbackRecord, NewFeedback};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use deadpool_sqlite::{Config, Object, Pool, PoolConfig, Runtime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};

/// Default connection pool size
const DEFAULT_POOL_SIZE: usize = 8;

/// How long a connection waits for a competing writer
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Format produced by the `created_at` column default
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS feedback (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user TEXT,
    text TEXT NOT NULL,
    category TEXT,
    created_at DATETIME DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_feedback_created_at ON feedback(created_at);
"#;

/// SQLite feedback store with connection pooling
pub struct SqliteFeedbackStore {
    pool: Pool,
    path: PathBuf,
}

impl SqliteFeedbackStore {
    /// Create a store backed by the SQLite file at `db_path`
    ///
    /// The file is created on first use. Call [`FeedbackStore::ensure_schema`]
    /// before inserting.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        Self::with_pool_size(db_path, DEFAULT_POOL_SIZE)
    }

    /// Create a store with a custom pool size
    pub fn with_pool_size<P: AsRef<Path>>(db_path: P, pool_size: usize) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();
        info!(
            "Creating feedback store pool at: {} (pool_size: {})",
            path.display(),
            pool_size
        );

        let mut config = Config::new(path.clone());
        config.pool = Some(PoolConfig::new(pool_size.max(1)));

        let pool = config.create_pool(Runtime::Tokio1).map_err(|e| {
            FeedbackError::Database(format!("Failed to create connection pool: {}", e))
        })?;

        Ok(Self { pool, path })
    }

    /// Open the configured store and create its schema
    ///
    /// A schema failure is logged and the store is still returned; requests
    /// then report their own storage errors.
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        let store = Self::with_pool_size(&config.path, config.pool_size)?;
        if let Err(e) = store.ensure_schema().await {
            error!("DB create error: {}", e);
        }
        Ok(store)
    }

    /// Database file backing this store
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connection(&self) -> Result<Object> {
        self.pool.get().await.map_err(|e| {
            FeedbackError::Database(format!("Failed to get connection from pool: {}", e))
        })
    }

    /// Run `f` on a pooled connection
    async fn interact<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = self.connection().await?;

        conn.interact(move |conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            f(conn)
        })
        .await
        .map_err(|e| FeedbackError::Database(format!("Pool interaction failed: {}", e)))?
        .map_err(FeedbackError::from)
    }
}

fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map(|naive| naive.and_utc())
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<FeedbackRecord> {
    let created_at: String = row.get(4)?;
    let created_at = parse_timestamp(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(FeedbackRecord {
        id: row.get(0)?,
        user: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        text: row.get(2)?,
        category: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        created_at,
    })
}

#[async_trait]
impl FeedbackStore for SqliteFeedbackStore {
    async fn ensure_schema(&self) -> Result<()> {
        info!("Ensuring feedback schema");

        self.interact(|conn| {
            let mode: String =
                conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
            debug!("SQLite journal mode: {}", mode);
            conn.execute_batch(SCHEMA)
        })
        .await
    }

    async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackId> {
        debug!("Storing feedback (category: {})", feedback.category);

        let id = self
            .interact(move |conn| {
                conn.execute(
                    "INSERT INTO feedback (user, text, category) VALUES (?1, ?2, ?3)",
                    params![feedback.user, feedback.text, feedback.category],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        debug!("Stored feedback {}", id);
        Ok(id)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<FeedbackRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.interact(move |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT id, user, text, category, created_at FROM feedback
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?1",
            )?;
            let records = stmt
                .query_map(params![limit], row_to_record)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
        .await
    }
}
