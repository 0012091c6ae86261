use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::document::model::Document;
use crate::document::validate::ensure_storable;
use crate::error::{FormError, FormResult};

use super::model::{Record, RecordId, RecordListEntry, RecordStats};
use super::store::RecordStore;

/// Database row of the `extracted_forms` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FormRow {
    pub id: i64,
    pub original_filename: String,
    pub extracted_json: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct EntryRow {
    id: i64,
    original_filename: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<FormRow> for Record {
    type Error = FormError;

    fn try_from(row: FormRow) -> Result<Self, Self::Error> {
        let extracted_json: Document = serde_json::from_str(&row.extracted_json).map_err(|e| {
            FormError::Retrieval(format!("record {} holds malformed JSON: {e}", row.id))
        })?;
        Ok(Record {
            id: row.id,
            original_filename: row.original_filename,
            extracted_json,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<EntryRow> for RecordListEntry {
    fn from(row: EntryRow) -> Self {
        RecordListEntry {
            id: row.id,
            original_filename: row.original_filename,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const RECORD_COLUMNS: &str = "id, original_filename, extracted_json, created_at, updated_at";
const ENTRY_COLUMNS: &str = "id, original_filename, created_at, updated_at";

/// PostgreSQL-backed record store.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }
}

/// Escape LIKE metacharacters so the query matches literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn encode(document: &Document) -> FormResult<String> {
    serde_json::to_string(document).map_err(|e| FormError::Persistence(e.to_string()))
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn create(&self, original_filename: &str, document: &Document) -> FormResult<Record> {
        ensure_storable(document)?;
        let sql = format!(
            "INSERT INTO extracted_forms (original_filename, extracted_json) \
             VALUES ($1, $2) RETURNING {RECORD_COLUMNS}"
        );
        let row: FormRow = sqlx::query_as(&sql)
            .bind(original_filename)
            .bind(encode(document)?)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| FormError::Persistence(e.to_string()))?;
        tracing::info!(id = row.id, filename = %row.original_filename, "record created");
        row.try_into()
    }

    async fn list(&self) -> FormResult<Vec<RecordListEntry>> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM extracted_forms ORDER BY created_at DESC, id DESC"
        );
        let rows: Vec<EntryRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| FormError::Retrieval(e.to_string()))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn search(&self, query: &str) -> FormResult<Vec<RecordListEntry>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM extracted_forms \
             WHERE original_filename ILIKE $1 ORDER BY created_at DESC, id DESC"
        );
        let rows: Vec<EntryRow> = sqlx::query_as(&sql)
            .bind(like_pattern(query))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| FormError::Retrieval(e.to_string()))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: RecordId) -> FormResult<Record> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM extracted_forms WHERE id = $1");
        let row: Option<FormRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| FormError::Retrieval(e.to_string()))?;
        row.ok_or(FormError::NotFound(id))?.try_into()
    }

    async fn update(&self, id: RecordId, document: &Document) -> FormResult<Record> {
        ensure_storable(document)?;
        // updated_at must move forward even if the clock has not.
        let sql = format!(
            "UPDATE extracted_forms SET extracted_json = $2, \
             updated_at = GREATEST(now(), updated_at + interval '1 microsecond') \
             WHERE id = $1 RETURNING {RECORD_COLUMNS}"
        );
        let row: Option<FormRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(encode(document)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| FormError::Persistence(e.to_string()))?;
        let row = row.ok_or(FormError::NotFound(id))?;
        tracing::info!(id, "record updated");
        row.try_into()
    }

    async fn delete(&self, id: RecordId) -> FormResult<()> {
        let result = sqlx::query("DELETE FROM extracted_forms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| FormError::Persistence(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(FormError::NotFound(id));
        }
        tracing::info!(id, "record deleted");
        Ok(())
    }

    async fn stats(&self) -> FormResult<RecordStats> {
        let total_forms: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM extracted_forms")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| FormError::Retrieval(e.to_string()))?;
        Ok(RecordStats { total_forms })
    }

    async fn ping(&self) -> FormResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| FormError::Retrieval(format!("database health check failed: {e}")))?;
        Ok(())
    }
}
