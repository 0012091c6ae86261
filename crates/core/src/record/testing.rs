use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::document::model::Document;
use crate::error::{FormError, FormResult};

use super::memory::MemoryRecordStore;
use super::model::{Record, RecordId, RecordListEntry, RecordStats};
use super::store::RecordStore;

/// Memory store that counts mutating calls and can be told to reject writes.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryRecordStore,
    pub fail_writes: AtomicBool,
    pub fail_reads: AtomicBool,
    pub stall_updates: AtomicBool,
    pub updates: AtomicUsize,
}

impl FlakyStore {
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make `update` wait forever, as if the store never answered.
    pub fn set_stall_updates(&self, stall: bool) {
        self.stall_updates.store(stall, Ordering::SeqCst);
    }

    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    fn check_write(&self) -> FormResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(FormError::Persistence("store unavailable".into()));
        }
        Ok(())
    }

    fn check_read(&self) -> FormResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(FormError::Retrieval("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn create(&self, original_filename: &str, document: &Document) -> FormResult<Record> {
        self.check_write()?;
        self.inner.create(original_filename, document).await
    }

    async fn list(&self) -> FormResult<Vec<RecordListEntry>> {
        self.check_read()?;
        self.inner.list().await
    }

    async fn search(&self, query: &str) -> FormResult<Vec<RecordListEntry>> {
        self.check_read()?;
        self.inner.search(query).await
    }

    async fn get(&self, id: RecordId) -> FormResult<Record> {
        self.check_read()?;
        self.inner.get(id).await
    }

    async fn update(&self, id: RecordId, document: &Document) -> FormResult<Record> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.stall_updates.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.check_write()?;
        self.inner.update(id, document).await
    }

    async fn delete(&self, id: RecordId) -> FormResult<()> {
        self.check_write()?;
        self.inner.delete(id).await
    }

    async fn stats(&self) -> FormResult<RecordStats> {
        self.check_read()?;
        self.inner.stats().await
    }
}
