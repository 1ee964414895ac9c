use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let generation_reachable = state.answers.generation_reachable().await;
    Json(json!({
        "status": "ok",
        "corpus_entries": state.corpus.len(),
        "generation": state.answers.generation_enabled(),
        "generation_reachable": generation_reachable,
    }))
}
