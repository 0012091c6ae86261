//! Record store client for the formscan REST service.

use async_trait::async_trait;
use formscan_core::{
    Document, FormError, FormResult, Record, RecordId, RecordListEntry, RecordStats, RecordStore,
};
use reqwest::{Response, StatusCode};
use serde_json::json;
use tracing::info;

/// Talks to `/api/forms` and `/api/stats` on a formscan API server.
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecordStore {
    /// `base_url` should be like `http://localhost:5000` (no trailing slash needed).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn form_url(&self, id: RecordId) -> String {
        self.url(&format!("/api/forms/{id}"))
    }
}

/// Pass successful responses through; map 404 to `NotFound` when an id is
/// involved and everything else through `fail`.
async fn check(
    resp: Response,
    id: Option<RecordId>,
    fail: fn(String) -> FormError,
) -> FormResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
        return Err(FormError::NotFound(id));
    }
    let body = resp.text().await.unwrap_or_default();
    Err(fail(format!("server returned {}: {}", status.as_u16(), body)))
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn create(&self, original_filename: &str, document: &Document) -> FormResult<Record> {
        let resp = self
            .client
            .post(self.url("/api/forms"))
            .json(&json!({
                "original_filename": original_filename,
                "extracted_json": document,
            }))
            .send()
            .await
            .map_err(|e| FormError::Persistence(e.to_string()))?;
        let record: Record = check(resp, None, FormError::Persistence)
            .await?
            .json()
            .await
            .map_err(|e| FormError::Persistence(e.to_string()))?;
        info!(id = record.id, "record created");
        Ok(record)
    }

    async fn list(&self) -> FormResult<Vec<RecordListEntry>> {
        let resp = self
            .client
            .get(self.url("/api/forms"))
            .send()
            .await
            .map_err(|e| FormError::Retrieval(e.to_string()))?;
        check(resp, None, FormError::Retrieval)
            .await?
            .json()
            .await
            .map_err(|e| FormError::Retrieval(e.to_string()))
    }

    async fn search(&self, query: &str) -> FormResult<Vec<RecordListEntry>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let resp = self
            .client
            .get(self.url("/api/forms/search"))
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| FormError::Retrieval(e.to_string()))?;
        check(resp, None, FormError::Retrieval)
            .await?
            .json()
            .await
            .map_err(|e| FormError::Retrieval(e.to_string()))
    }

    async fn get(&self, id: RecordId) -> FormResult<Record> {
        let resp = self
            .client
            .get(self.form_url(id))
            .send()
            .await
            .map_err(|e| FormError::Retrieval(e.to_string()))?;
        check(resp, Some(id), FormError::Retrieval)
            .await?
            .json()
            .await
            .map_err(|e| FormError::Retrieval(e.to_string()))
    }

    async fn update(&self, id: RecordId, document: &Document) -> FormResult<Record> {
        let resp = self
            .client
            .put(self.form_url(id))
            .json(&json!({ "extracted_json": document }))
            .send()
            .await
            .map_err(|e| FormError::Persistence(e.to_string()))?;
        let record: Record = check(resp, Some(id), FormError::Persistence)
            .await?
            .json()
            .await
            .map_err(|e| FormError::Persistence(e.to_string()))?;
        info!(id, "record updated");
        Ok(record)
    }

    async fn delete(&self, id: RecordId) -> FormResult<()> {
        let resp = self
            .client
            .delete(self.form_url(id))
            .send()
            .await
            .map_err(|e| FormError::Persistence(e.to_string()))?;
        check(resp, Some(id), FormError::Persistence).await?;
        info!(id, "record deleted");
        Ok(())
    }

    async fn stats(&self) -> FormResult<RecordStats> {
        let resp = self
            .client
            .get(self.url("/api/stats"))
            .send()
            .await
            .map_err(|e| FormError::Retrieval(e.to_string()))?;
        check(resp, None, FormError::Retrieval)
            .await?
            .json()
            .await
            .map_err(|e| FormError::Retrieval(e.to_string()))
    }

    async fn ping(&self) -> FormResult<()> {
        let resp = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| FormError::Retrieval(e.to_string()))?;
        check(resp, None, FormError::Retrieval).await?;
        Ok(())
    }
}
