//! CRUD routes over stored form records.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use formscan_core::record::model::{NewRecord, RecordUpdate};
use formscan_core::{Record, RecordId, RecordListEntry};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/forms", get(list_forms).post(create_form))
        .route("/api/forms/search", get(search_forms))
        .route(
            "/api/forms/{id}",
            get(get_form).put(update_form).delete(delete_form),
        )
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn list_forms(State(state): State<AppState>) -> ApiResult<Json<Vec<RecordListEntry>>> {
    Ok(Json(state.store().list().await?))
}

async fn search_forms(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<RecordListEntry>>> {
    Ok(Json(state.store().search(&params.q).await?))
}

async fn get_form(State(state): State<AppState>, ApiPath(id): ApiPath<RecordId>) -> ApiResult<Json<Record>> {
    Ok(Json(state.store().get(id).await?))
}

async fn create_form(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewRecord>,
) -> ApiResult<(StatusCode, Json<Record>)> {
    let record = state
        .store()
        .create(&new.original_filename, &new.extracted_json)
        .await?;
    tracing::info!(id = record.id, "form stored");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_form(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<RecordId>,
    ApiJson(update): ApiJson<RecordUpdate>,
) -> ApiResult<Json<Record>> {
    let record = state.store().update(id, &update.extracted_json).await?;
    tracing::info!(id, "form updated");
    Ok(Json(record))
}

async fn delete_form(State(state): State<AppState>, ApiPath(id): ApiPath<RecordId>) -> ApiResult<Json<Value>> {
    state.store().delete(id).await?;
    tracing::info!(id, "form deleted");
    Ok(Json(json!({ "message": "Form deleted successfully" })))
}
