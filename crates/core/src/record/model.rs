use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::model::Document;

/// Store-assigned record identifier. Never reused.
pub type RecordId = i64;

/// A stored extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub original_filename: String,
    pub extracted_json: Document,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A record without its document, as returned by list and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordListEntry {
    pub id: RecordId,
    pub original_filename: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordStats {
    pub total_forms: i64,
}

impl Record {
    pub fn entry(&self) -> RecordListEntry {
        RecordListEntry {
            id: self.id,
            original_filename: self.original_filename.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Body of a create request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecord {
    pub original_filename: String,
    pub extracted_json: Document,
}

/// Body of an update request. The document is replaced wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordUpdate {
    pub extracted_json: Document,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_wire_shape() {
        let at = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let record = Record {
            id: 3,
            original_filename: "scan.png".into(),
            extracted_json: Document::new(json!({"name": "Jane"})),
            created_at: at,
            updated_at: at,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], json!(3));
        assert_eq!(value["extracted_json"], json!({"name": "Jane"}));
        assert_eq!(value["created_at"], json!("2026-01-02T03:04:05Z"));

        let entry = serde_json::to_value(record.entry()).unwrap();
        assert!(entry.get("extracted_json").is_none());
        assert_eq!(entry["original_filename"], json!("scan.png"));
    }
}
