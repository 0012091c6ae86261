//! Downloadable artifacts and clipboard text built from a [`Document`].
//!
//! Everything here is a pure function of the document: the same input
//! always produces byte-identical output.

use crate::document::model::Document;
use crate::document::view::{canonical_text, cell_text};
use crate::record::model::RecordId;

pub const JSON_FILENAME: &str = "extracted.json";
pub const CSV_FILENAME: &str = "extracted.csv";

/// A file ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

/// Canonical JSON text as a file. Stored records export as `form_<id>.json`.
pub fn to_json_file(doc: &Document, record_id: Option<RecordId>) -> Artifact {
    let filename = match record_id {
        Some(id) => format!("form_{id}.json"),
        None => JSON_FILENAME.to_string(),
    };
    Artifact {
        filename,
        content_type: "application/json",
        bytes: canonical_text(doc).into_bytes(),
    }
}

/// Two-line CSV: bare field names, then every value double-quoted.
pub fn to_csv_file(doc: &Document) -> Artifact {
    Artifact {
        filename: CSV_FILENAME.to_string(),
        content_type: "text/csv",
        bytes: csv_text(doc).into_bytes(),
    }
}

fn csv_text(doc: &Document) -> String {
    let fields = doc.top_level_fields();
    let header: Vec<&str> = fields.iter().map(|f| f.key).collect();
    let values: Vec<String> = fields.iter().map(|f| quote(&cell_text(f.value))).collect();
    format!("{}\n{}", header.join(","), values.join(","))
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Text placed on the clipboard: identical to the canonical view.
pub fn to_clipboard_text(doc: &Document) -> String {
    canonical_text(doc)
}

/// A destination for clipboard text.
pub trait Clipboard {
    type Error: std::fmt::Display;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error>;
}

/// What happened to a copy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// The clipboard refused; the caller must deliver this file instead.
    Download(Artifact),
}

/// Copy the canonical text, falling back to a JSON download when the
/// clipboard is unavailable or denies access.
pub fn copy_or_download<C: Clipboard>(
    doc: &Document,
    record_id: Option<RecordId>,
    clipboard: Option<&mut C>,
) -> CopyOutcome {
    let text = to_clipboard_text(doc);
    let Some(clipboard) = clipboard else {
        tracing::warn!("clipboard unavailable, falling back to download");
        return CopyOutcome::Download(to_json_file(doc, record_id));
    };
    match clipboard.write_text(&text) {
        Ok(()) => CopyOutcome::Copied,
        Err(e) => {
            tracing::warn!(error = %e, "clipboard write failed, falling back to download");
            CopyOutcome::Download(to_json_file(doc, record_id))
        }
    }
}
