//! Markdown document store
//!
//! Uploaded Markdown files live in one SQLite table:
//!
//! ```sql
//! CREATE TABLE markdown_files (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     filename TEXT NOT NULL,
//!     content TEXT NOT NULL
//! )
//! ```
//!
//! `AUTOINCREMENT` keeps ids monotonic and never reused, even after the
//! highest row is deleted. SQLite serializes writers, and a committed delete
//! is visible to every later read.

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::{Result, StoreError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS markdown_files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    content TEXT NOT NULL
)";

/// Listing entry for a stored file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Store-assigned id
    pub id: i64,
    /// Name the file was uploaded under
    pub filename: String,
}

/// Durable store of uploaded Markdown files
#[derive(Debug, Clone)]
pub struct MarkdownStore {
    pool: SqlitePool,
}

impl MarkdownStore {
    /// Open the database at `path`, creating the file and schema if missing
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        tracing::debug!(path = %path.as_ref().display(), "opened markdown store");
        Self::with_pool(pool).await
    }

    /// Open a private in-memory database
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        // One connection that never expires, so the database lives as long as the pool
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Store a file and return its new id
    pub async fn create(&self, filename: &str, content: &str) -> Result<i64> {
        let id = sqlx::query("INSERT INTO markdown_files (filename, content) VALUES (?, ?)")
            .bind(filename)
            .bind(content)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        tracing::info!(id, filename, bytes = content.len(), "stored markdown file");
        Ok(id)
    }

    /// All stored files, ordered by id
    pub async fn list(&self) -> Result<Vec<StoredFile>> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, filename FROM markdown_files ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, filename)| StoredFile { id, filename })
            .collect())
    }

    /// Content of a stored file
    pub async fn read(&self, id: i64) -> Result<String> {
        sqlx::query_scalar("SELECT content FROM markdown_files WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    /// Filename and content of a stored file
    pub async fn get(&self, id: i64) -> Result<(StoredFile, String)> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT filename, content FROM markdown_files WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let (filename, content) = row.ok_or(StoreError::NotFound(id))?;
        Ok((StoredFile { id, filename }, content))
    }

    /// Delete a stored file
    pub async fn delete(&self, id: i64) -> Result<()> {
        let affected = sqlx::query("DELETE FROM markdown_files WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        tracing::info!(id, "deleted markdown file");
        Ok(())
    }

    /// Close all connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
