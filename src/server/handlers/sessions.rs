use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// `GET /api/sessions/:session_id/messages`
pub async fn get_session_messages(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let messages = state.history.turns(&session_id).await;
    Json(json!({ "session_id": session_id, "messages": messages }))
}

/// `DELETE /api/sessions/:session_id/messages`
pub async fn clear_session_messages(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let removed = state.history.clear(&session_id).await;
    Json(json!({ "session_id": session_id, "removed": removed }))
}
