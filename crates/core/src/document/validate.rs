/// Validation of hand-edited document text.
use thiserror::Error;

use super::model::{Document, NULL_DOCUMENT};

/// Edited text that does not parse as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid JSON: {message} at line {line} column {column}")]
pub struct ValidationError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        // serde_json appends " at line X column Y" to Display; keep only the cause.
        let full = err.to_string();
        let message = match full.rfind(" at line ") {
            Some(idx) => full[..idx].to_string(),
            None => full,
        };
        Self {
            message,
            line: err.line(),
            column: err.column(),
        }
    }
}

/// Parse editor text into a document. Any JSON value except a bare `null` is accepted.
pub fn parse_document(text: &str) -> Result<Document, ValidationError> {
    Ok(serde_json::from_str(text)?)
}

/// Stores refuse documents that could not have come out of [`parse_document`].
pub fn ensure_storable(document: &Document) -> Result<(), ValidationError> {
    if document.is_null() {
        return Err(ValidationError {
            message: NULL_DOCUMENT.to_string(),
            line: 0,
            column: 0,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_any_json_shape() {
        assert_eq!(parse_document("42").unwrap(), Document::new(json!(42)));
        assert_eq!(parse_document(" [1, \"a\"] ").unwrap(), Document::new(json!([1, "a"])));
        assert_eq!(parse_document(r#"{"npi": null}"#).unwrap(), Document::new(json!({"npi": null})));
    }

    #[test]
    fn rejects_null_document() {
        let err = parse_document(" null ").unwrap_err();
        assert!(err.message.contains("must not be null"), "{}", err.message);
    }

    #[test]
    fn rejects_missing_value() {
        let err = parse_document(r#"{"a":}"#).unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 6);
        assert!(!err.message.contains(" at line "));
        assert!(err.to_string().starts_with("Invalid JSON: "));
    }

    #[test]
    fn rejects_empty_text() {
        let err = parse_document("   ").unwrap_err();
        assert!(err.message.contains("EOF"), "{}", err.message);
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse_document(r#"{"a": 1} x"#).is_err());
    }
}
