use axum::{extract::State, routing::get, Json, Router};
use formscan_core::RecordStats;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/stats", get(stats))
}

async fn stats(State(state): State<AppState>) -> ApiResult<Json<RecordStats>> {
    Ok(Json(state.store().stats().await?))
}
