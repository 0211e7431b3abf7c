//! In-memory store implementations for testing
//!
//! These mocks let controller tests exercise the full upload pipeline
//! without a database.

use async_trait::async_trait;
use hearth_core::models::MediaRecord;
use hearth_core::AppError;
use hearth_db::{LastAccessStore, MediaStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory media store backed by a `Vec` in insertion order.
#[derive(Clone, Default)]
pub struct MockMediaStore {
    records: Arc<Mutex<Vec<MediaRecord>>>,
    /// When set, the next insert fails with a database error.
    fail_next_insert: Arc<Mutex<bool>>,
}

impl MockMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<MediaRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn fail_next_insert(&self) {
        *self.fail_next_insert.lock().unwrap() = true;
    }
}

#[async_trait]
impl MediaStore for MockMediaStore {
    async fn get_by_hash(&self, sha256_hash: &str) -> Result<Vec<MediaRecord>, AppError> {
        let mut matches: Vec<MediaRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.sha256_hash == sha256_hash)
            .cloned()
            .collect();
        matches.sort_by_key(|r| r.creation_ts);
        Ok(matches)
    }

    async fn insert(&self, record: &MediaRecord) -> Result<(), AppError> {
        if std::mem::take(&mut *self.fail_next_insert.lock().unwrap()) {
            return Err(AppError::Internal("simulated insert failure".to_string()));
        }
        let mut records = self.records.lock().unwrap();
        if records
            .iter()
            .any(|r| r.origin == record.origin && r.media_id == record.media_id)
        {
            return Err(AppError::InvalidInput(format!(
                "duplicate media identity ({}, {})",
                record.origin, record.media_id
            )));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn get_by_id(
        &self,
        origin: &str,
        media_id: &str,
    ) -> Result<Option<MediaRecord>, AppError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.origin == origin && r.media_id == media_id)
            .cloned())
    }
}

/// In-memory last-access store.
#[derive(Clone, Default)]
pub struct MockLastAccessStore {
    entries: Arc<Mutex<HashMap<String, i64>>>,
}

impl MockLastAccessStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LastAccessStore for MockLastAccessStore {
    async fn upsert_last_access(&self, sha256_hash: &str, ts_ms: i64) -> Result<(), AppError> {
        self.entries
            .lock()
            .unwrap()
            .insert(sha256_hash.to_string(), ts_ms);
        Ok(())
    }

    async fn get_last_access(&self, sha256_hash: &str) -> Result<Option<i64>, AppError> {
        Ok(self.entries.lock().unwrap().get(sha256_hash).copied())
    }
}
