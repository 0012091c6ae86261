use async_trait::async_trait;

use crate::document::model::Document;
use crate::error::FormResult;

use super::model::{Record, RecordId, RecordListEntry, RecordStats};

/// The record store collaborator.
///
/// Every method is one atomic call from the caller's point of view: no
/// retries, batching or partial application happen on this side.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record. Fails with `Persistence` if the write is rejected.
    async fn create(&self, original_filename: &str, document: &Document) -> FormResult<Record>;

    /// All records, newest first. An empty store is an empty list.
    async fn list(&self) -> FormResult<Vec<RecordListEntry>>;

    /// Records whose filename contains `query`, case-insensitively.
    async fn search(&self, query: &str) -> FormResult<Vec<RecordListEntry>>;

    async fn get(&self, id: RecordId) -> FormResult<Record>;

    /// Replace the document of `id` and refresh `updated_at`.
    async fn update(&self, id: RecordId, document: &Document) -> FormResult<Record>;

    async fn delete(&self, id: RecordId) -> FormResult<()>;

    async fn stats(&self) -> FormResult<RecordStats>;

    /// Connectivity check used by health endpoints.
    async fn ping(&self) -> FormResult<()> {
        Ok(())
    }
}
