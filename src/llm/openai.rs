//! OpenAI-compatible chat-completions provider.
//!
//! Works against api.openai.com or any local server speaking the same wire
//! shape (LM Studio, llama.cpp server, vLLM). Every request carries the
//! configured timeout; a request that does not return within it is a failure
//! the composer degrades from.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::GenerationProvider;
use super::types::GenerationRequest;
use crate::core::config::settings::GenerationSettings;
use crate::core::errors::ApiError;

#[derive(Clone)]
pub struct OpenAiCompatProvider {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: Client,
}

impl OpenAiCompatProvider {
    pub fn new(settings: &GenerationSettings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(ApiError::internal)?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
            client,
        })
    }

    fn request_builder(&self, url: &str, body: &Value) -> reqwest::RequestBuilder {
        let mut builder = self.client.post(url).json(body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }
}

#[async_trait]
impl GenerationProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn health_check(&self) -> Result<bool, ApiError> {
        let url = format!("{}/v1/models", self.base_url);
        let mut builder = self.client.get(&url);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        match builder.send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, ApiError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut body = json!({
            "model": self.model,
            "messages": request.messages,
            "stream": false,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(t) = request.temperature {
                obj.insert("temperature".to_string(), json!(t));
            }
            if let Some(t) = request.max_tokens {
                obj.insert("max_tokens".to_string(), json!(t));
            }
        }

        let res = self
            .request_builder(&url, &body)
            .send()
            .await
            .map_err(ApiError::internal)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Internal(format!(
                "generation request failed ({}): {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(ApiError::internal)?;

        extract_message_content(&payload).ok_or_else(|| {
            ApiError::Internal("generation response missing message content".to_string())
        })
    }
}

/// Pull the assistant text out of a chat-completions payload. `None` means
/// the payload is malformed and the caller must treat the call as failed.
fn extract_message_content(payload: &Value) -> Option<String> {
    let content = payload
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()?;

    if content.is_empty() {
        return None;
    }
    Some(content.to_string())
}
