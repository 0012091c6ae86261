//! Text and table projections of a [`Document`].
//!
//! Both projections borrow the document; switching between them never
//! touches the underlying value.

use serde_json::Value;

use super::model::Document;
use super::validate::{parse_document, ValidationError};

/// Which projection is currently shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Text,
    Table,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Text => ViewMode::Table,
            ViewMode::Table => ViewMode::Text,
        }
    }
}

/// One field/value row of the flattened table view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub field: String,
    pub value: String,
}

/// A rendered projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Text(String),
    Table(Vec<TableRow>),
}

/// Render `doc` in the given mode.
pub fn render(doc: &Document, mode: ViewMode) -> Rendered {
    match mode {
        ViewMode::Text => Rendered::Text(canonical_text(doc)),
        ViewMode::Table => Rendered::Table(table_rows(doc)),
    }
}

/// Two-space indented JSON, keys in insertion order.
pub fn canonical_text(doc: &Document) -> String {
    pretty(doc.as_value())
}

/// Inverse of [`canonical_text`] for edit round-trips.
pub fn parse_canonical(text: &str) -> Result<Document, ValidationError> {
    parse_document(text)
}

/// One row per top-level field, one level deep.
pub fn table_rows(doc: &Document) -> Vec<TableRow> {
    doc.top_level_fields()
        .into_iter()
        .map(|field| TableRow {
            field: field.key.to_string(),
            value: cell_text(field.value),
        })
        .collect()
}

/// Cell text shared by the table view and CSV export.
///
/// Objects and arrays collapse to compact JSON, strings are verbatim,
/// numbers and booleans use their JSON spelling, null is empty.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => compact(value),
    }
}

fn pretty(value: &Value) -> String {
    // Serializing a Value cannot fail: keys are always strings.
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn compact(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
