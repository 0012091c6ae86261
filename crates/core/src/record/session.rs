//! Hand-editing of one record's document.
//!
//! The session keeps the user's text separate from the committed record.
//! A save parses the text first and only a valid document reaches the
//! store; any failure leaves the text untouched for another attempt.
//! `save` takes `&mut self`, so a session can never have two saves in flight.

use similar::TextDiff;

use crate::document::validate::parse_document;
use crate::document::view::canonical_text;
use crate::error::{FormError, FormResult};

use super::model::{Record, RecordId};
use super::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    /// Buffer equals the canonical text of the committed document.
    Loaded,
    /// Buffer differs from the committed text, or the last save failed.
    Dirty,
    /// A save is in progress.
    Validating,
}

pub struct EditSession<'s, S: RecordStore + ?Sized> {
    store: &'s S,
    record: Record,
    committed_text: String,
    buffer: String,
    state: EditState,
    error: Option<String>,
}

impl<'s, S: RecordStore + ?Sized> EditSession<'s, S> {
    /// Fetch record `id` and load its document into the buffer.
    pub async fn open(store: &'s S, id: RecordId) -> FormResult<Self> {
        let record = store.get(id).await?;
        Ok(Self::from_record(store, record))
    }

    pub fn from_record(store: &'s S, record: Record) -> Self {
        let committed_text = canonical_text(&record.extracted_json);
        Self {
            store,
            buffer: committed_text.clone(),
            committed_text,
            record,
            state: EditState::Loaded,
            error: None,
        }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Message from the last rejected save, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Replace the buffer with the user's text.
    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.state = if self.buffer == self.committed_text {
            EditState::Loaded
        } else {
            EditState::Dirty
        };
    }

    /// Unified diff from the committed text to the buffer. Empty when unchanged.
    pub fn diff(&self) -> String {
        if self.buffer == self.committed_text {
            return String::new();
        }
        TextDiff::from_lines(&self.committed_text, &self.buffer)
            .unified_diff()
            .context_radius(2)
            .header("committed", "edited")
            .to_string()
    }

    /// Validate the buffer and replace the stored document with it.
    ///
    /// On success the session returns to `Loaded` with the store's record.
    /// On failure it stays `Dirty`, the buffer is kept, and the error is
    /// both returned and remembered for display.
    pub async fn save(&mut self) -> FormResult<&Record> {
        let validating = ValidatingGuard::enter(&mut self.state);

        let document = match parse_document(&self.buffer) {
            Ok(document) => document,
            Err(e) => {
                drop(validating);
                return Err(self.reject(e.into()));
            }
        };

        let result = self.store.update(self.record.id, &document).await;
        drop(validating);

        match result {
            Ok(record) => {
                tracing::info!(id = record.id, "edit committed");
                self.committed_text = canonical_text(&record.extracted_json);
                self.buffer = self.committed_text.clone();
                self.record = record;
                self.state = EditState::Loaded;
                self.error = None;
                Ok(&self.record)
            }
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Abandon the session without writing. Returns the last committed record.
    pub fn cancel(self) -> Record {
        tracing::debug!(id = self.record.id, "edit cancelled");
        self.record
    }

    fn reject(&mut self, err: FormError) -> FormError {
        tracing::warn!(id = self.record.id, error = %err, "edit rejected");
        self.state = EditState::Dirty;
        self.error = Some(err.to_string());
        err
    }
}

/// Holds the session in `Validating` while a save runs. Dropping it, including
/// when the save future itself is dropped mid-call, leaves the session `Dirty`.
struct ValidatingGuard<'a> {
    state: &'a mut EditState,
}

impl<'a> ValidatingGuard<'a> {
    fn enter(state: &'a mut EditState) -> Self {
        *state = EditState::Validating;
        Self { state }
    }
}

impl Drop for ValidatingGuard<'_> {
    fn drop(&mut self) {
        *self.state = EditState::Dirty;
    }
}
