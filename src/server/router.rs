use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::handlers::{answer, config, health, search, sessions};
use crate::state::AppState;

/// Creates the application router: health check, the answer endpoint, the
/// redacted config view, web search, and session history, behind CORS and
/// request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    let cors_layer = build_cors_layer(&state);
    Router::new()
        .route("/health", get(health::health))
        .route("/api/answer", post(answer::answer))
        .route("/api/config", get(config::get_config))
        .route("/api/search", get(search::web_search))
        .route(
            "/api/sessions/:session_id/messages",
            get(sessions::get_session_messages).delete(sessions::clear_session_messages),
        )
        .with_state(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
}

fn build_cors_layer(state: &Arc<AppState>) -> CorsLayer {
    let config = state.config.load_config();
    let allowed_origins = resolve_allowed_origins(&config)
        .into_iter()
        .filter_map(|origin| HeaderValue::from_str(&origin).ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
}

fn resolve_allowed_origins(config: &Value) -> Vec<String> {
    let origins = config
        .get("server")
        .and_then(|v| v.get("cors_allowed_origins"))
        .and_then(|value| value.as_array())
        .map(|list| {
            list.iter()
                .filter_map(|item| item.as_str())
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| item.to_string())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if origins.is_empty() {
        return default_local_origins();
    }

    origins
}

fn default_local_origins() -> Vec<String> {
    vec![
        "http://localhost".to_string(),
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
        "http://127.0.0.1".to_string(),
        "http://127.0.0.1:3000".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn configured_origins_override_defaults() {
        let config = json!({
            "server": { "cors_allowed_origins": ["https://bot.example.com", "  "] }
        });

        let origins = resolve_allowed_origins(&config);
        assert_eq!(origins, vec!["https://bot.example.com".to_string()]);
    }

    #[test]
    fn missing_origins_fall_back_to_local_defaults() {
        let origins = resolve_allowed_origins(&json!({}));
        assert!(origins.contains(&"http://localhost:3000".to_string()));
    }
}
