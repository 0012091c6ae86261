use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Key used when a non-object document is presented as a single field.
pub const SYNTHETIC_FIELD: &str = "data";

/// Reason given when `null` is offered as a whole document.
pub const NULL_DOCUMENT: &str = "document must not be null";

/// Filename used when saving an extraction that does not name its source.
pub const DEFAULT_SAVE_FILENAME: &str = "extracted_form.json";

/// Schema-agnostic extracted form.
///
/// Wraps a JSON value tree. Object keys keep their insertion order
/// (`serde_json` is built with `preserve_order`), which every view and
/// export relies on.
///
/// Deserializing rejects a bare `null`: a stored record always carries a
/// value, so text or request bodies that decode to `null` never become one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document(Value);

/// One top-level field of a document, as seen by the table and CSV views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field<'a> {
    pub key: &'a str,
    pub value: &'a Value,
}

impl Document {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// True iff the document is an object. Arrays and null are not containers.
    pub fn is_container(&self) -> bool {
        self.0.is_object()
    }

    /// True for strings, numbers, booleans and null.
    pub fn is_scalar(&self) -> bool {
        !matches!(self.0, Value::Object(_) | Value::Array(_))
    }

    /// Top-level fields in insertion order.
    ///
    /// A non-object document yields exactly one synthetic `data` field
    /// holding the whole value, so every document has at least one row.
    pub fn top_level_fields(&self) -> Vec<Field<'_>> {
        match &self.0 {
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| Field { key, value })
                .collect(),
            other => vec![Field {
                key: SYNTHETIC_FIELD,
                value: other,
            }],
        }
    }

    /// Filename to store a fresh extraction under.
    pub fn save_filename(&self) -> &str {
        self.0
            .get("source_filename")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_SAVE_FILENAME)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Err(de::Error::custom(NULL_DOCUMENT)),
            value => Ok(Self(value)),
        }
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        doc.0
    }
}
