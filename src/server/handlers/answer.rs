use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;
use crate::history::{ChatTurn, SourceRef};
use crate::rag::AnswerMethod;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub query: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub method: AnswerMethod,
    pub confidence: f64,
    pub sources: Vec<SourceRef>,
}

/// `POST /api/answer` — the whole caller-facing query surface.
///
/// Rejecting blank input happens here, before the retriever is invoked;
/// past that point the pipeline cannot fail.
pub async fn answer(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnswerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }

    let answer = state.answers.answer(query).await;
    let sources: Vec<SourceRef> = answer.matches.iter().map(SourceRef::from).collect();

    if let Some(session_id) = request.session_id.as_deref() {
        state.history.append(session_id, ChatTurn::user(query)).await;
        state
            .history
            .append(
                session_id,
                ChatTurn::assistant(answer.text.clone(), sources.clone()),
            )
            .await;
    }

    Ok(Json(AnswerResponse {
        answer: answer.text,
        method: answer.method,
        confidence: answer.confidence,
        sources,
    }))
}
