//! SwitchLang Storage Layer
//!
//! Implements the `HistoryStore` trait on SQLite, plus an in-memory variant
//! for tests and ephemeral sessions.
//!
//! # Examples
//!
//! ```no_run
//! use switchlang_store::SqliteHistoryStore;
//!
//! let store = SqliteHistoryStore::new("switchlang.db").unwrap();
//! // Store is now ready to record practice results
//! ```

#![warn(missing_docs)]

mod memory;

use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use switchlang_domain::traits::HistoryStore;
use switchlang_domain::{HistoryRecord, NewHistoryRecord};
use thiserror::Error;

pub use memory::InMemoryHistoryStore;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS study_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp INTEGER NOT NULL,
    src_lang TEXT NOT NULL,
    tgt_lang TEXT NOT NULL,
    source_text TEXT NOT NULL,
    user_input TEXT NOT NULL,
    feedback TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_study_history_timestamp ON study_history (timestamp);
";

const SELECT_COLUMNS: &str =
    "SELECT id, timestamp, src_lang, tgt_lang, source_text, user_input, feedback FROM study_history";

/// SQLite-based implementation of HistoryStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// store instance.
pub struct SqliteHistoryStore {
    conn: Connection,
}

impl SqliteHistoryStore {
    /// Open (or create) the history database at `path`
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```
    /// use switchlang_store::SqliteHistoryStore;
    ///
    /// let store = SqliteHistoryStore::new(":memory:").unwrap();
    /// assert_eq!(store.count().unwrap(), 0);
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Append a record with an explicit timestamp
    pub fn append_at(&mut self, record: NewHistoryRecord, timestamp: u64) -> Result<i64, StoreError> {
        let timestamp = i64::try_from(timestamp)
            .map_err(|_| StoreError::InvalidData(format!("Timestamp out of range: {}", timestamp)))?;

        self.conn.execute(
            "INSERT INTO study_history (timestamp, src_lang, tgt_lang, source_text, user_input, feedback)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                timestamp,
                &record.source_language,
                &record.target_language,
                &record.source_text,
                &record.user_input,
                &record.feedback,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// The `limit` most recent records, most recent first
    pub fn query_recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        let sql = format!("{} ORDER BY timestamp DESC, id DESC LIMIT ?1", SELECT_COLUMNS);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![limit], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM study_history", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Delete every record
    pub fn clear(&mut self) -> Result<usize, StoreError> {
        Ok(self.conn.execute("DELETE FROM study_history", [])?)
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<HistoryRecord> {
        Ok(HistoryRecord {
            id: row.get(0)?,
            timestamp: row.get::<_, i64>(1)?.max(0) as u64,
            source_language: row.get(2)?,
            target_language: row.get(3)?,
            source_text: row.get(4)?,
            user_input: row.get(5)?,
            feedback: row.get(6)?,
        })
    }
}

impl HistoryStore for SqliteHistoryStore {
    type Error = StoreError;

    fn append(&mut self, record: NewHistoryRecord) -> Result<i64, Self::Error> {
        self.append_at(record, now_secs())
    }

    fn query_all(&self) -> Result<Vec<HistoryRecord>, Self::Error> {
        let sql = format!("{} ORDER BY timestamp DESC, id DESC", SELECT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

/// Current unix time in seconds
pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
