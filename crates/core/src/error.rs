use thiserror::Error;

use crate::document::validate::ValidationError;
use crate::record::model::RecordId;

/// Failures surfaced to the user for an upload, edit or store operation.
///
/// None of these are fatal to a session: callers show the message and let
/// the user retry or dismiss it.
#[derive(Debug, Error)]
pub enum FormError {
    /// The extraction call failed or returned a non-success status.
    #[error("{message}")]
    Upload { status: Option<u16>, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store rejected a create, update or delete.
    #[error("failed to save record: {0}")]
    Persistence(String),

    #[error("record {0} not found")]
    NotFound(RecordId),

    /// Transport or store failure while reading.
    #[error("failed to fetch records: {0}")]
    Retrieval(String),
}

impl FormError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FormError::NotFound(_))
    }
}

pub type FormResult<T> = Result<T, FormError>;
