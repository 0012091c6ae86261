pub mod forms;
pub mod health;
pub mod stats;

use axum::Router;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(forms::routes())
        .merge(stats::routes())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use formscan_core::record::memory::MemoryRecordStore;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        let state = AppState::new(Arc::new(MemoryRecordStore::new()));
        build_router(state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        send_raw(app, method, uri, body.map(|value| value.to_string())).await
    }

    async fn send_raw(app: &Router, method: Method, uri: &str, body: Option<String>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(text) => {
                builder = builder.header("content-type", "application/json");
                Body::from(text)
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn create(app: &Router, filename: &str, doc: Value) -> Value {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/forms",
            Some(json!({ "original_filename": filename, "extracted_json": doc })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn create_then_get_round_trips_document() {
        let app = app();
        let created = create(&app, "scan.png", json!({ "name": "Jane", "age": 30 })).await;
        assert_eq!(created["id"], json!(1));

        let (status, fetched) = send(&app, Method::GET, "/api/forms/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["original_filename"], json!("scan.png"));
        assert_eq!(fetched["extracted_json"], json!({ "name": "Jane", "age": 30 }));
    }

    #[tokio::test]
    async fn create_without_fields_is_bad_request() {
        let (status, body) = send(&app(), Method::POST, "/api/forms", Some(json!({ "original_filename": "x" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], json!("badRequest"));
        assert_eq!(body["error"]["statusCode"], json!(400));
    }

    #[tokio::test]
    async fn null_documents_are_bad_requests() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/forms",
            Some(json!({ "original_filename": "x.png", "extracted_json": null })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], json!("badRequest"));

        create(&app, "a.png", json!({ "keep": true })).await;
        let (status, body) = send(&app, Method::PUT, "/api/forms/1", Some(json!({ "extracted_json": null }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], json!("badRequest"));

        let (_, fetched) = send(&app, Method::GET, "/api/forms/1", None).await;
        assert_eq!(fetched["extracted_json"], json!({ "keep": true }));
        let (_, stats) = send(&app, Method::GET, "/api/stats", None).await;
        assert_eq!(stats, json!({ "total_forms": 1 }));
    }

    #[tokio::test]
    async fn malformed_body_gets_json_error() {
        let app = app();
        let (status, body) = send_raw(&app, Method::POST, "/api/forms", Some("{not json".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], json!("badRequest"));
        assert_eq!(body["error"]["statusCode"], json!(400));

        create(&app, "a.png", json!({})).await;
        let (status, body) = send_raw(&app, Method::PUT, "/api/forms/1", Some("{not json".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], json!("badRequest"));
    }

    #[tokio::test]
    async fn non_integer_id_gets_json_error() {
        let app = app();
        for method in [Method::GET, Method::DELETE] {
            let (status, body) = send(&app, method, "/api/forms/abc", None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"]["type"], json!("badRequest"));
            assert_eq!(body["error"]["statusCode"], json!(400));
        }
    }

    #[tokio::test]
    async fn list_omits_documents_and_is_newest_first() {
        let app = app();
        create(&app, "a.png", json!({})).await;
        create(&app, "b.png", json!({})).await;

        let (status, body) = send(&app, Method::GET, "/api/forms", None).await;
        assert_eq!(status, StatusCode::OK);
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["original_filename"], json!("b.png"));
        assert!(entries[0].get("extracted_json").is_none());
    }

    #[tokio::test]
    async fn update_replaces_document() {
        let app = app();
        let created = create(&app, "a.png", json!({ "old": 1 })).await;

        let (status, updated) = send(
            &app,
            Method::PUT,
            "/api/forms/1",
            Some(json!({ "extracted_json": { "new": 2 } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], json!(1));
        assert_eq!(updated["extracted_json"], json!({ "new": 2 }));
        assert_eq!(updated["created_at"], created["created_at"]);
        assert_ne!(updated["updated_at"], created["updated_at"]);
    }

    #[tokio::test]
    async fn missing_ids_are_404() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/forms/5", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], json!("Form not found"));

        let (status, _) = send(&app, Method::PUT, "/api/forms/5", Some(json!({ "extracted_json": {} }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, "/api/forms/5", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_then_get_is_404() {
        let app = app();
        create(&app, "a.png", json!({})).await;
        let (status, body) = send(&app, Method::DELETE, "/api/forms/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("Form deleted successfully"));

        let (status, _) = send(&app, Method::GET, "/api/forms/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_and_stats() {
        let app = app();
        create(&app, "Intake-Form.png", json!({})).await;
        create(&app, "receipt.png", json!({})).await;

        let (status, body) = send(&app, Method::GET, "/api/forms/search?q=form", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = send(&app, Method::GET, "/api/forms/search", None).await;
        assert_eq!(body, json!([]));

        // Padding is part of the query.
        create(&app, "tax form.png", json!({})).await;
        let (_, body) = send(&app, Method::GET, "/api/forms/search?q=%20form", None).await;
        let hits = body.as_array().unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["original_filename"], json!("tax form.png"));

        let (status, body) = send(&app, Method::GET, "/api/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "total_forms": 3 }));
    }
}
