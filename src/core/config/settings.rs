use std::path::PathBuf;

use serde_json::Value;

/// Settings for the external generation service.
///
/// When `enabled` is false the composer never attempts an external call and
/// every answer takes the template path. The flag is resolved once at
/// startup; it defaults to "an API key is configured".
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.3,
            max_tokens: 600,
            timeout_secs: 30,
        }
    }
}

impl GenerationSettings {
    pub fn from_config(config: &Value) -> Self {
        let section = config.get("generation");
        let defaults = Self::default();

        let api_key = section
            .and_then(|v| v.get("api_key"))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let enabled = section
            .and_then(|v| v.get("enabled"))
            .and_then(|v| v.as_bool())
            .unwrap_or(api_key.is_some());

        Self {
            enabled,
            base_url: section
                .and_then(|v| v.get("base_url"))
                .and_then(|v| v.as_str())
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            api_key,
            model: section
                .and_then(|v| v.get("model"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or(defaults.model),
            temperature: section
                .and_then(|v| v.get("temperature"))
                .and_then(|v| v.as_f64())
                .unwrap_or(defaults.temperature),
            max_tokens: section
                .and_then(|v| v.get("max_tokens"))
                .and_then(|v| v.as_u64())
                .map(|v| v as u32)
                .unwrap_or(defaults.max_tokens),
            timeout_secs: section
                .and_then(|v| v.get("timeout_secs"))
                .and_then(|v| v.as_u64())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

/// Settings for the web-search endpoint.
#[derive(Debug, Clone, Default)]
pub struct SearchSettings {
    pub google_api_key: String,
    pub google_engine_id: String,
}

impl SearchSettings {
    pub fn from_config(config: &Value) -> Self {
        let section = config.get("search");

        let get = |key: &str| {
            section
                .and_then(|v| v.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };

        Self {
            google_api_key: get("google_api_key"),
            google_engine_id: get("google_engine_id"),
        }
    }

    pub fn google_configured(&self) -> bool {
        !self.google_api_key.is_empty() && !self.google_engine_id.is_empty()
    }
}

/// Corpus loading settings. Without a configured path the built-in
/// research-paper excerpts are used.
#[derive(Debug, Clone, Default)]
pub struct CorpusSettings {
    pub path: Option<PathBuf>,
}

impl CorpusSettings {
    pub fn from_config(config: &Value) -> Self {
        let path = config
            .get("corpus")
            .and_then(|v| v.get("path"))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Self { path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generation_defaults_to_disabled_without_key() {
        let settings = GenerationSettings::from_config(&json!({}));
        assert!(!settings.enabled);
        assert_eq!(settings.model, "gpt-3.5-turbo");
        assert_eq!(settings.max_tokens, 600);
    }

    #[test]
    fn generation_enabled_when_api_key_present() {
        let settings = GenerationSettings::from_config(&json!({
            "generation": { "api_key": "sk-test" }
        }));
        assert!(settings.enabled);
        assert_eq!(settings.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn generation_explicit_disable_wins_over_key() {
        let settings = GenerationSettings::from_config(&json!({
            "generation": { "api_key": "sk-test", "enabled": false }
        }));
        assert!(!settings.enabled);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let settings = GenerationSettings::from_config(&json!({
            "generation": { "base_url": "http://localhost:1234/" }
        }));
        assert_eq!(settings.base_url, "http://localhost:1234");
    }

    #[test]
    fn search_requires_both_google_values() {
        let partial = SearchSettings::from_config(&json!({
            "search": { "google_api_key": "key" }
        }));
        assert!(!partial.google_configured());

        let full = SearchSettings::from_config(&json!({
            "search": { "google_api_key": "key", "google_engine_id": "cx" }
        }));
        assert!(full.google_configured());
    }
}
