use std::{str::FromStr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteLockingMode, SqlitePoolOptions},
    Pool, Row, Sqlite,
};

use crate::domain::store::{KeyValueStore, StoreError};

const LOCK_WAIT: Duration = Duration::from_millis(250);

/// Durable key-value storage in a single SQLite table.
///
/// A file-backed store holds an exclusive lock on its database for as long
/// as it is open, so only one process can own the stored lists at a time.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Arc<Pool<Sqlite>>,
    exclusive: bool,
}

impl SqliteStore {
    /// Prepares the file, connects and claims the database.
    pub async fn open(database_url: &str) -> Result<Self> {
        prepare_sqlite_file(database_url)?;
        let store = Self::connect(database_url).await?;
        store.init().await?;
        Ok(store)
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        // One connection that never idles out: it is either the whole
        // in-memory database or the holder of the file lock.
        let pool_options = SqlitePoolOptions::new().max_connections(1).idle_timeout(None).max_lifetime(None);
        if database_url.starts_with("sqlite::memory:") {
            let pool = pool_options.connect(database_url).await?;
            return Ok(Self { pool: Arc::new(pool), exclusive: false });
        }
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete)
            .locking_mode(SqliteLockingMode::Exclusive)
            .busy_timeout(LOCK_WAIT);
        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("{database_url} is in use by another process"))?;
        Ok(Self { pool: Arc::new(pool), exclusive: true })
    }

    pub async fn init(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        if self.exclusive {
            // In exclusive locking mode the lock outlives the transaction.
            sqlx::query("BEGIN EXCLUSIVE")
                .execute(&mut *conn)
                .await
                .context("database is in use by another process")?;
            sqlx::query("COMMIT").execute(&mut *conn).await?;
        }
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Releases the connection, and with it the file lock.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn backend_err(err: sqlx::Error) -> StoreError {
    StoreError::Backend { reason: err.to_string() }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?1")
            .bind(key)
            .fetch_optional(&*self.pool)
            .await
            .map_err(backend_err)?;
        Ok(row.map(|row| row.get("value")))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&*self.pool)
        .await
        .map_err(backend_err)?;
        Ok(())
    }
}

/// Creates the database file (and its directory) for file-backed URLs.
pub fn prepare_sqlite_file(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_file_path(database_url) else { return Ok(()) };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new().create(true).append(true).open(path)?;
    }
    Ok(())
}

fn sqlite_file_path(database_url: &str) -> Option<&std::path::Path> {
    if database_url.starts_with("sqlite::memory:") { return None; }
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    // Windows absolute paths arrive as /C:/dir; drop the leading slash
    let bytes = path.as_bytes();
    let path = if cfg!(windows) && bytes.len() >= 3 && bytes[0] == b'/' && bytes[2] == b':' { &path[1..] } else { path };
    Some(std::path::Path::new(path))
}
