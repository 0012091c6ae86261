use std::path::Path;

use formscan_core::{Document, FormError, FormResult};
use reqwest::multipart::{Form, Part};
use tracing::info;

/// Client for the OCR extraction endpoint.
///
/// The endpoint accepts a multipart upload with a `file` field and answers
/// with an arbitrary JSON document.
#[derive(Debug, Clone)]
pub struct ExtractionClient {
    client: reqwest::Client,
    endpoint: String,
}

fn upload_error(status: Option<u16>, message: impl Into<String>) -> FormError {
    FormError::Upload {
        status,
        message: message.into(),
    }
}

impl ExtractionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Upload the image at `path`.
    pub async fn extract_file(&self, path: &Path) -> FormResult<Document> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| upload_error(None, "No file selected"))?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| upload_error(None, format!("failed to read {}: {e}", path.display())))?;
        self.extract_bytes(filename, bytes).await
    }

    pub async fn extract_bytes(&self, filename: &str, bytes: Vec<u8>) -> FormResult<Document> {
        info!(filename, size = bytes.len(), endpoint = %self.endpoint, "uploading for extraction");
        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.to_string()));
        let resp = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| upload_error(None, e.to_string()))?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(upload_error(Some(status), format!("Server error {status}: {text}")));
        }
        resp.json()
            .await
            .map_err(|e| upload_error(Some(status), format!("extraction returned invalid JSON: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn path_without_filename_is_rejected() {
        let client = ExtractionClient::new("http://127.0.0.1:9/extract");
        let err = client.extract_file(Path::new("/")).await.unwrap_err();
        assert!(matches!(err, FormError::Upload { status: None, .. }));
        assert_eq!(err.to_string(), "No file selected");
    }

    #[tokio::test]
    async fn unreadable_file_is_upload_error() {
        let dir = tempfile::tempdir().unwrap();
        let client = ExtractionClient::new("http://127.0.0.1:9/extract");
        let err = client
            .extract_file(&dir.path().join("missing.png"))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to read"), "{err}");
    }
}
