//! Database module for filedrop.
//!
//! This module provides SQLite database connectivity and schema management.

mod files;

pub use files::{
    allowed_file, sanitize_filename, FileMetadata, FileRepository, StoredFile,
    ALLOWED_EXTENSIONS, MAX_FILE_SIZE,
};

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::{FiledropError, Result};

/// Connection pool type used by the repositories.
pub type DbPool = SqlitePool;

/// Schema for uploaded files.
///
/// Applied on every startup; `IF NOT EXISTS` makes the migration
/// idempotent. Concurrent first-time startups may race here, which
/// SQLite resolves by serializing the writers.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS files (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    filename          TEXT NOT NULL,       -- sanitized storage name
    original_filename TEXT NOT NULL,       -- name shown to users and on download
    upload_date       TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    file_size         INTEGER NOT NULL,    -- size in bytes
    file_data         BLOB NOT NULL        -- file content
);
"#;

/// Database wrapper for managing the connection pool and migrations.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a database from a connection string such as `sqlite:filedrop.db`.
    ///
    /// If the database file doesn't exist, it will be created.
    /// The schema is automatically applied.
    pub async fn open(url: &str) -> Result<Self> {
        info!("Opening database {}", url);

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| FiledropError::Config(format!("invalid DATABASE_URL: {}", e)))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        // SQLite allows one writer at a time; a single connection avoids
        // locked-database errors under concurrent requests.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory database");

        // A single connection keeps every handle on the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply the schema.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        debug!("Database schema is up to date");
        Ok(())
    }

    /// Check if a table exists in the database.
    pub async fn table_exists(&self, name: &str) -> Result<bool> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0 > 0)
    }
}
