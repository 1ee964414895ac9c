use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::config::settings::SearchSettings;
use crate::core::errors::ApiError;
use crate::search::perform_search;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// `GET /api/search?q=...` — web results for questions outside the corpus.
pub async fn web_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("q must not be empty".to_string()));
    }

    let settings = SearchSettings::from_config(&state.config.load_config());
    let results = perform_search(&settings, query).await?;

    Ok(Json(json!({ "results": results })))
}
