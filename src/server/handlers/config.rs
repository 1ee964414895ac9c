use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::state::AppState;

/// `GET /api/config` — the merged configuration with secret values masked.
pub async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.config.load_config();
    Json(state.config.redact_sensitive_values(&config))
}
