//! Extraction record lifecycle and review pipeline.
//!
//! A scanned form comes back from the extraction service as an arbitrary
//! JSON [`Document`]. This crate projects it into text and table views,
//! exports it, and manages the stored [`Record`] around it through a
//! [`RecordStore`].

pub mod document;
pub mod error;
pub mod export;
pub mod record;

pub use document::model::{Document, Field};
pub use document::validate::ValidationError;
pub use error::{FormError, FormResult};
pub use record::manager::RecordManager;
pub use record::model::{Record, RecordId, RecordListEntry, RecordStats};
pub use record::session::{EditSession, EditState};
pub use record::store::RecordStore;
