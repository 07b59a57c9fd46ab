//! In-memory history store

use crate::{now_secs, StoreError};
use switchlang_domain::traits::HistoryStore;
use switchlang_domain::{HistoryRecord, NewHistoryRecord};

/// History store backed by a `Vec`, with the same ordering as SQLite
#[derive(Debug, Default, Clone)]
pub struct InMemoryHistoryStore {
    records: Vec<HistoryRecord>,
}

impl InMemoryHistoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    type Error = StoreError;

    fn append(&mut self, record: NewHistoryRecord) -> Result<i64, Self::Error> {
        let id = self.records.len() as i64 + 1;
        self.records.push(HistoryRecord {
            id,
            timestamp: now_secs(),
            source_language: record.source_language,
            target_language: record.target_language,
            source_text: record.source_text,
            user_input: record.user_input,
            feedback: record.feedback,
        });
        Ok(id)
    }

    fn query_all(&self) -> Result<Vec<HistoryRecord>, Self::Error> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(records)
    }
}
