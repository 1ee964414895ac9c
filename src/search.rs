//! Web search, for questions the curated corpus cannot cover.
//!
//! Google Custom Search when keys are configured, DuckDuckGo's instant
//! answer API as the keyless fallback.

use serde::Serialize;
use serde_json::Value;

use crate::core::config::settings::SearchSettings;
use crate::core::errors::ApiError;

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

pub async fn perform_search(
    settings: &SearchSettings,
    query: &str,
) -> Result<Vec<SearchResult>, ApiError> {
    if settings.google_configured() {
        if let Ok(results) = google_search(
            query,
            &settings.google_api_key,
            &settings.google_engine_id,
        )
        .await
        {
            if !results.is_empty() {
                return Ok(results);
            }
        }
    }

    duckduckgo_search(query).await
}

async fn google_search(
    query: &str,
    api_key: &str,
    engine_id: &str,
) -> Result<Vec<SearchResult>, ApiError> {
    let url = format!(
        "https://www.googleapis.com/customsearch/v1?key={}&cx={}&q={}",
        api_key,
        engine_id,
        urlencoding::encode(query)
    );

    let response = reqwest::Client::new()
        .get(url)
        .send()
        .await
        .map_err(ApiError::internal)?;

    if !response.status().is_success() {
        return Err(ApiError::Internal(format!(
            "Google search failed: {}",
            response.status()
        )));
    }

    let payload: Value = response.json().await.map_err(ApiError::internal)?;
    Ok(parse_google_results(&payload))
}

fn parse_google_results(payload: &Value) -> Vec<SearchResult> {
    let items = payload
        .get("items")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    let mut results = Vec::new();
    for item in items {
        let field = |key: &str| {
            item.get(key)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let title = field("title");
        let url = field("link");
        let snippet = field("snippet");
        if !title.is_empty() && !url.is_empty() {
            results.push(SearchResult {
                title,
                url,
                snippet,
            });
        }
    }

    results
}

async fn duckduckgo_search(query: &str) -> Result<Vec<SearchResult>, ApiError> {
    let url = format!(
        "https://api.duckduckgo.com/?q={}&format=json&no_redirect=1&no_html=1",
        urlencoding::encode(query)
    );

    let response = reqwest::Client::new()
        .get(url)
        .send()
        .await
        .map_err(ApiError::internal)?;

    if !response.status().is_success() {
        return Err(ApiError::Internal(format!(
            "DuckDuckGo search failed: {}",
            response.status()
        )));
    }

    let payload: Value = response.json().await.map_err(ApiError::internal)?;
    Ok(parse_duckduckgo_results(&payload))
}

fn parse_duckduckgo_results(payload: &Value) -> Vec<SearchResult> {
    let mut results = Vec::new();

    if let Some(abstract_text) = payload.get("AbstractText").and_then(|v| v.as_str()) {
        if let Some(url) = payload.get("AbstractURL").and_then(|v| v.as_str()) {
            if !abstract_text.is_empty() && !url.is_empty() {
                results.push(SearchResult {
                    title: abstract_text
                        .split(" - ")
                        .next()
                        .unwrap_or(abstract_text)
                        .to_string(),
                    url: url.to_string(),
                    snippet: abstract_text.to_string(),
                });
            }
        }
    }

    if let Some(items) = payload.get("RelatedTopics").and_then(|v| v.as_array()) {
        extract_ddg_topics(items, &mut results);
    }

    results
}

fn extract_ddg_topics(items: &[Value], results: &mut Vec<SearchResult>) {
    for item in items {
        if let Some(topics) = item.get("Topics").and_then(|v| v.as_array()) {
            extract_ddg_topics(topics, results);
            continue;
        }
        let text = item.get("Text").and_then(|v| v.as_str()).unwrap_or("");
        let url = item.get("FirstURL").and_then(|v| v.as_str()).unwrap_or("");
        if text.is_empty() || url.is_empty() {
            continue;
        }
        results.push(SearchResult {
            title: text.split(" - ").next().unwrap_or(text).to_string(),
            url: url.to_string(),
            snippet: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_google_items_and_skips_incomplete_ones() {
        let payload = json!({
            "items": [
                {
                    "title": "Attention Is All You Need",
                    "link": "https://arxiv.org/abs/1706.03762",
                    "snippet": "The dominant sequence transduction models..."
                },
                { "title": "No link, dropped" }
            ]
        });

        let results = parse_google_results(&payload);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Attention Is All You Need");
        assert_eq!(results[0].url, "https://arxiv.org/abs/1706.03762");
    }

    #[test]
    fn parses_duckduckgo_abstract_and_related_topics() {
        let payload = json!({
            "AbstractText": "Transformer - a deep learning architecture",
            "AbstractURL": "https://en.wikipedia.org/wiki/Transformer_(deep_learning)",
            "RelatedTopics": [
                {
                    "Text": "BERT - language representation model",
                    "FirstURL": "https://en.wikipedia.org/wiki/BERT"
                },
                {
                    "Topics": [
                        {
                            "Text": "GPT - generative model",
                            "FirstURL": "https://en.wikipedia.org/wiki/GPT"
                        }
                    ]
                }
            ]
        });

        let results = parse_duckduckgo_results(&payload);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].title, "Transformer");
        assert_eq!(results[1].url, "https://en.wikipedia.org/wiki/BERT");
        assert_eq!(results[2].title, "GPT");
    }

    #[test]
    fn empty_payloads_produce_no_results() {
        assert!(parse_google_results(&json!({})).is_empty());
        assert!(parse_duckduckgo_results(&json!({})).is_empty());
    }
}
