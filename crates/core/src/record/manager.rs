use crate::document::model::Document;
use crate::error::FormResult;

use super::model::{Record, RecordId, RecordListEntry, RecordStats};
use super::session::EditSession;
use super::store::RecordStore;

/// Drives the record store and keeps a local list view in step with it.
///
/// The list only changes after the store has confirmed a call; nothing is
/// applied optimistically.
pub struct RecordManager<S: RecordStore> {
    store: S,
    entries: Vec<RecordListEntry>,
}

impl<S: RecordStore> RecordManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            entries: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The list view as of the last refresh and confirmed mutations.
    pub fn entries(&self) -> &[RecordListEntry] {
        &self.entries
    }

    /// Reload the list view from the store. On failure the view is cleared.
    pub async fn refresh(&mut self) -> FormResult<&[RecordListEntry]> {
        match self.store.list().await {
            Ok(entries) => {
                tracing::debug!(count = entries.len(), "record list refreshed");
                self.entries = entries;
                Ok(self.entries.as_slice())
            }
            Err(e) => {
                self.entries.clear();
                Err(e)
            }
        }
    }

    pub async fn search(&self, query: &str) -> FormResult<Vec<RecordListEntry>> {
        self.store.search(query).await
    }

    pub async fn create(&mut self, original_filename: &str, document: &Document) -> FormResult<Record> {
        let record = self.store.create(original_filename, document).await?;
        tracing::info!(id = record.id, filename = %record.original_filename, "extraction saved");
        self.entries.insert(0, record.entry());
        Ok(record)
    }

    /// Save a reviewed extraction under its `source_filename` or the default name.
    pub async fn save_extraction(&mut self, document: &Document) -> FormResult<Record> {
        let filename = document.save_filename().to_string();
        self.create(&filename, document).await
    }

    pub async fn get(&self, id: RecordId) -> FormResult<Record> {
        self.store.get(id).await
    }

    pub async fn update(&mut self, id: RecordId, document: &Document) -> FormResult<Record> {
        let record = self.store.update(id, document).await?;
        self.note_updated(&record);
        Ok(record)
    }

    /// Delete `id` in the store, then drop exactly that entry from the view.
    pub async fn delete(&mut self, id: RecordId) -> FormResult<()> {
        self.store.delete(id).await?;
        self.entries.retain(|entry| entry.id != id);
        tracing::info!(id, "record deleted");
        Ok(())
    }

    pub async fn stats(&self) -> FormResult<RecordStats> {
        self.store.stats().await
    }

    /// Start editing record `id`.
    pub async fn edit(&self, id: RecordId) -> FormResult<EditSession<'_, S>> {
        EditSession::open(&self.store, id).await
    }

    /// Fold a record committed elsewhere (e.g. by an edit session) into the view.
    pub fn note_updated(&mut self, record: &Record) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == record.id) {
            *entry = record.entry();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormError;
    use crate::record::testing::FlakyStore;
    use serde_json::json;

    async fn manager_with(names: &[&str]) -> RecordManager<FlakyStore> {
        let store = FlakyStore::default();
        for name in names {
            store.create(name, &Document::new(json!({}))).await.unwrap();
        }
        let mut manager = RecordManager::new(store);
        manager.refresh().await.unwrap();
        manager
    }

    fn ids(manager: &RecordManager<FlakyStore>) -> Vec<RecordId> {
        manager.entries().iter().map(|e| e.id).collect()
    }

    #[tokio::test]
    async fn delete_removes_only_that_entry_in_order() {
        let mut manager = manager_with(&["1.png", "2.png", "3.png"]).await;
        assert_eq!(ids(&manager), vec![3, 2, 1]);

        manager.delete(2).await.unwrap();
        assert_eq!(ids(&manager), vec![3, 1]);
        assert!(manager.get(2).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn failed_delete_leaves_list_unchanged() {
        let mut manager = manager_with(&["1.png", "2.png", "3.png"]).await;
        manager.store().set_fail_writes(true);

        let err = manager.delete(2).await.unwrap_err();
        assert!(matches!(err, FormError::Persistence(_)));
        assert_eq!(ids(&manager), vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn delete_of_missing_id_is_not_found() {
        let mut manager = manager_with(&["1.png"]).await;
        assert!(matches!(manager.delete(99).await, Err(FormError::NotFound(99))));
        assert_eq!(ids(&manager), vec![1]);
    }

    #[tokio::test]
    async fn create_prepends_entry() {
        let mut manager = manager_with(&["1.png"]).await;
        let record = manager.create("2.png", &Document::new(json!({"a": 1}))).await.unwrap();
        assert_eq!(record.id, 2);
        assert_eq!(ids(&manager), vec![2, 1]);
    }

    #[tokio::test]
    async fn rejected_create_is_persistence_error() {
        let mut manager = manager_with(&[]).await;
        manager.store().set_fail_writes(true);
        let err = manager.create("x.png", &Document::new(json!({}))).await.unwrap_err();
        assert!(matches!(err, FormError::Persistence(_)));
        assert!(manager.entries().is_empty());
    }

    #[tokio::test]
    async fn save_extraction_uses_source_filename() {
        let mut manager = manager_with(&[]).await;
        let named = manager
            .save_extraction(&Document::new(json!({"source_filename": "intake.jpg"})))
            .await
            .unwrap();
        assert_eq!(named.original_filename, "intake.jpg");
        let unnamed = manager.save_extraction(&Document::new(json!({"a": 1}))).await.unwrap();
        assert_eq!(unnamed.original_filename, "extracted_form.json");
    }

    #[tokio::test]
    async fn update_keeps_id_and_refreshes_entry() {
        let mut manager = manager_with(&["1.png"]).await;
        let before = manager.get(1).await.unwrap();
        let after = manager.update(1, &Document::new(json!({"new": true}))).await.unwrap();
        assert_eq!(after.id, 1);
        assert_eq!(after.extracted_json, Document::new(json!({"new": true})));
        assert!(after.updated_at > before.updated_at);
        assert_eq!(manager.entries()[0].updated_at, after.updated_at);
    }

    #[tokio::test]
    async fn refresh_failure_is_retrieval_error() {
        let mut manager = manager_with(&["1.png"]).await;
        manager.store().set_fail_reads(true);
        let err = manager.refresh().await.unwrap_err();
        assert!(matches!(err, FormError::Retrieval(_)));
        assert!(manager.entries().is_empty());
    }

    #[tokio::test]
    async fn edit_session_commit_flows_back_into_list() {
        let mut manager = manager_with(&["1.png"]).await;
        let committed = {
            let mut session = manager.edit(1).await.unwrap();
            session.set_buffer(r#"{"edited": 1}"#);
            session.save().await.unwrap().clone()
        };
        manager.note_updated(&committed);
        assert_eq!(manager.entries()[0].updated_at, committed.updated_at);
        assert_eq!(manager.stats().await.unwrap().total_forms, 1);
    }
}
