use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;

use crate::document::model::Document;
use crate::document::validate::ensure_storable;
use crate::error::{FormError, FormResult};

use super::model::{Record, RecordId, RecordListEntry, RecordStats};
use super::store::RecordStore;

/// Process-local record store.
///
/// Backs the API when no database is configured and the test suites.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: RecordId,
    records: BTreeMap<RecordId, Record>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first: `created_at` descending, then `id` descending.
fn newest_first(mut entries: Vec<RecordListEntry>) -> Vec<RecordListEntry> {
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    entries
}

/// A timestamp strictly after `previous`, normally "now".
pub(crate) fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    let floor = previous + TimeDelta::microseconds(1);
    now.max(floor)
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(&self, original_filename: &str, document: &Document) -> FormResult<Record> {
        ensure_storable(document)?;
        let mut inner = self.inner.lock().await;
        inner.last_id += 1;
        let now = Utc::now();
        let record = Record {
            id: inner.last_id,
            original_filename: original_filename.to_string(),
            extracted_json: document.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list(&self) -> FormResult<Vec<RecordListEntry>> {
        let inner = self.inner.lock().await;
        Ok(newest_first(inner.records.values().map(Record::entry).collect()))
    }

    async fn search(&self, query: &str) -> FormResult<Vec<RecordListEntry>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let needle = query.to_lowercase();
        let inner = self.inner.lock().await;
        Ok(newest_first(
            inner
                .records
                .values()
                .filter(|r| r.original_filename.to_lowercase().contains(&needle))
                .map(Record::entry)
                .collect(),
        ))
    }

    async fn get(&self, id: RecordId) -> FormResult<Record> {
        let inner = self.inner.lock().await;
        inner.records.get(&id).cloned().ok_or(FormError::NotFound(id))
    }

    async fn update(&self, id: RecordId, document: &Document) -> FormResult<Record> {
        ensure_storable(document)?;
        let mut inner = self.inner.lock().await;
        let record = inner.records.get_mut(&id).ok_or(FormError::NotFound(id))?;
        record.extracted_json = document.clone();
        record.updated_at = next_timestamp(record.updated_at);
        Ok(record.clone())
    }

    async fn delete(&self, id: RecordId) -> FormResult<()> {
        let mut inner = self.inner.lock().await;
        inner
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(FormError::NotFound(id))
    }

    async fn stats(&self) -> FormResult<RecordStats> {
        let inner = self.inner.lock().await;
        Ok(RecordStats {
            total_forms: inner.records.len() as i64,
        })
    }
}
