//! In-memory session history.
//!
//! Conversation state is caller-side: the answer pipeline itself carries no
//! state between requests. This store keeps an ordered log of turns per
//! session id for the HTTP shell to replay to clients.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::rag::ScoredMatch;

/// A cited source rendered for the client: filename, page, score.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRef {
    pub filename: String,
    pub page: Option<u32>,
    pub score: f64,
}

impl From<&ScoredMatch<'_>> for SourceRef {
    fn from(m: &ScoredMatch<'_>) -> Self {
        Self {
            filename: m.entry.source_label.clone(),
            page: m.entry.page,
            score: m.score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub id: String,
    pub role: String,
    pub content: String,
    pub sources: Vec<SourceRef>,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content.into(), Vec::new())
    }

    pub fn assistant(content: impl Into<String>, sources: Vec<SourceRef>) -> Self {
        Self::new("assistant", content.into(), sources)
    }

    fn new(role: &str, content: String, sources: Vec<SourceRef>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: role.to_string(),
            content,
            sources,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Default)]
pub struct HistoryStore {
    sessions: Arc<RwLock<HashMap<String, Vec<ChatTurn>>>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, session_id: &str, turn: ChatTurn) {
        let mut sessions = self.sessions.write().await;
        sessions.entry(session_id.to_string()).or_default().push(turn);
    }

    pub async fn turns(&self, session_id: &str) -> Vec<ChatTurn> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned().unwrap_or_default()
    }

    /// Remove a session's history, returning how many turns were dropped.
    pub async fn clear(&self, session_id: &str) -> usize {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id).map(|t| t.len()).unwrap_or(0)
    }

    pub async fn message_count(&self, session_id: &str) -> usize {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).map(|t| t.len()).unwrap_or(0)
    }
}
