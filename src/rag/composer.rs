//! Answer composition.
//!
//! Turns a query and its retrieved matches into an [`Answer`], preferring
//! the external generation service when one is configured and quietly
//! degrading to a deterministic template when it is not or when it fails.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::retriever::ScoredMatch;
use crate::llm::{ChatMessage, GenerationProvider, GenerationRequest};

/// Coarse UI hint when at least one match was found. Not calibrated.
const CONFIDENCE_MATCHED: f64 = 0.87;
/// Coarse UI hint when retrieval found nothing.
const CONFIDENCE_NO_MATCH: f64 = 0.65;

const SYSTEM_PROMPT: &str = "You are an expert AI researcher. Answer questions based on the \
provided research paper excerpts. Be detailed and cite sources appropriately.";

/// Which path produced the answer text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerMethod {
    ExternalGeneration,
    TemplateFallback,
}

impl std::fmt::Display for AnswerMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerMethod::ExternalGeneration => write!(f, "external-generation"),
            AnswerMethod::TemplateFallback => write!(f, "template-fallback"),
        }
    }
}

/// The structured result returned to the caller. Created per request and
/// discarded after the response is rendered.
#[derive(Debug, Clone, Serialize)]
pub struct Answer<'a> {
    pub text: String,
    /// The matches actually cited, ordered by score (0 to 3 entries).
    pub matches: Vec<ScoredMatch<'a>>,
    pub confidence: f64,
    pub method: AnswerMethod,
}

/// Composes answers from retrieved matches.
///
/// Whether a generation service is used is decided once at construction;
/// per-request failures of that service degrade to the template path and
/// never surface to the caller.
pub struct Composer {
    generation: Option<Arc<dyn GenerationProvider>>,
    topics: Vec<String>,
    temperature: f64,
    max_tokens: u32,
}

impl Composer {
    pub fn new(generation: Option<Arc<dyn GenerationProvider>>, topics: Vec<String>) -> Self {
        Self {
            generation,
            topics,
            temperature: 0.3,
            max_tokens: 600,
        }
    }

    pub fn with_sampling(mut self, temperature: f64, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn generation_enabled(&self) -> bool {
        self.generation.is_some()
    }

    /// `None` when no generation service is configured, otherwise whether it
    /// currently answers its health check.
    pub async fn generation_reachable(&self) -> Option<bool> {
        match &self.generation {
            Some(provider) => Some(provider.health_check().await.unwrap_or(false)),
            None => None,
        }
    }

    pub async fn compose<'a>(&self, query: &str, matches: Vec<ScoredMatch<'a>>) -> Answer<'a> {
        if let Some(provider) = &self.generation {
            let request = build_generation_request(query, &matches)
                .with_temperature(self.temperature)
                .with_max_tokens(self.max_tokens);

            match provider.generate(request).await {
                Ok(text) => {
                    let confidence = if matches.is_empty() {
                        CONFIDENCE_NO_MATCH
                    } else {
                        CONFIDENCE_MATCHED
                    };
                    return Answer {
                        text,
                        matches,
                        confidence,
                        method: AnswerMethod::ExternalGeneration,
                    };
                }
                Err(err) => {
                    tracing::warn!(
                        "Generation via {} failed, falling back to template: {}",
                        provider.name(),
                        err
                    );
                }
            }
        }

        self.template_answer(query, matches)
    }

    fn template_answer<'a>(&self, query: &str, matches: Vec<ScoredMatch<'a>>) -> Answer<'a> {
        match matches.first() {
            Some(best) => {
                let text = format!(
                    "Based on the research paper \"{}\" (Page {}), here's what I found about \
your question:\n\n{}\n\nThis information directly addresses your query about \"{}\" and \
provides insights from current AI/ML research literature.",
                    best.entry.source_label,
                    page_ref(best.entry.page),
                    best.entry.content,
                    query
                );
                Answer {
                    text,
                    matches,
                    confidence: CONFIDENCE_MATCHED,
                    method: AnswerMethod::TemplateFallback,
                }
            }
            None => {
                let topic_list = self
                    .topics
                    .iter()
                    .map(|topic| format!("- {}", topic))
                    .collect::<Vec<_>>()
                    .join("\n");
                let text = format!(
                    "I'd be happy to help with your question about \"{}\".\n\nBased on my \
knowledge of AI/ML research, I can assist with topics like:\n{}\n\nCould you try asking \
about one of these specific areas for a more detailed response?",
                    query, topic_list
                );
                Answer {
                    text,
                    matches,
                    confidence: CONFIDENCE_NO_MATCH,
                    method: AnswerMethod::TemplateFallback,
                }
            }
        }
    }
}

/// Build the single structured request sent to the generation service:
/// system instruction, one context block per match, then the user query.
fn build_generation_request(query: &str, matches: &[ScoredMatch<'_>]) -> GenerationRequest {
    let context = matches
        .iter()
        .map(|m| {
            format!(
                "Source: {} (Page {})\n{}",
                m.entry.source_label,
                page_ref(m.entry.page),
                m.entry.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let user_prompt = format!(
        "Research Context:\n{}\n\nQuestion: {}\n\nPlease provide a comprehensive answer based \
on the research papers.",
        context, query
    );

    GenerationRequest::new(vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(user_prompt),
    ])
}

fn page_ref(page: Option<u32>) -> String {
    match page {
        Some(page) => page.to_string(),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ApiError;
    use crate::rag::corpus::{Corpus, CorpusEntry};
    use crate::rag::retriever::Retriever;
    use async_trait::async_trait;

    struct FixedProvider(&'static str);

    #[async_trait]
    impl GenerationProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn health_check(&self) -> Result<bool, ApiError> {
            Ok(true)
        }

        async fn generate(&self, _request: GenerationRequest) -> Result<String, ApiError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl GenerationProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn health_check(&self) -> Result<bool, ApiError> {
            Ok(false)
        }

        async fn generate(&self, _request: GenerationRequest) -> Result<String, ApiError> {
            Err(ApiError::Internal(
                "generation request failed (500): upstream error".to_string(),
            ))
        }
    }

    struct CapturingProvider(tokio::sync::Mutex<Vec<GenerationRequest>>);

    #[async_trait]
    impl GenerationProvider for CapturingProvider {
        fn name(&self) -> &str {
            "capturing"
        }

        async fn health_check(&self) -> Result<bool, ApiError> {
            Ok(true)
        }

        async fn generate(&self, request: GenerationRequest) -> Result<String, ApiError> {
            self.0.lock().await.push(request);
            Ok("captured".to_string())
        }
    }

    fn sample_entry() -> CorpusEntry {
        CorpusEntry {
            id: "attn".to_string(),
            keywords: vec!["transformer".to_string(), "attention".to_string()],
            content: "Self-attention relates sequence positions.".to_string(),
            source_label: "attention_is_all_you_need.pdf".to_string(),
            page: Some(3),
            base_weight: 0.95,
        }
    }

    fn topics() -> Vec<String> {
        vec![
            "Transformer architectures and attention mechanisms".to_string(),
            "BERT, GPT, and other language models".to_string(),
        ]
    }

    #[tokio::test]
    async fn external_generation_returns_service_text_verbatim() {
        let composer = Composer::new(
            Some(Arc::new(FixedProvider("Attention weighs token pairs."))),
            topics(),
        );
        let entry = sample_entry();
        let matches = vec![ScoredMatch {
            entry: &entry,
            score: 0.66,
        }];

        let answer = composer.compose("What is attention?", matches).await;

        assert_eq!(answer.method, AnswerMethod::ExternalGeneration);
        assert_eq!(answer.text, "Attention weighs token pairs.");
        assert!((answer.confidence - 0.87).abs() < 1e-9);
        assert_eq!(answer.matches.len(), 1);
    }

    #[tokio::test]
    async fn failed_generation_degrades_to_template_without_error() {
        let composer = Composer::new(Some(Arc::new(FailingProvider)), topics());
        let entry = sample_entry();
        let matches = vec![ScoredMatch {
            entry: &entry,
            score: 0.66,
        }];

        let answer = composer.compose("What is attention?", matches).await;

        assert_eq!(answer.method, AnswerMethod::TemplateFallback);
        assert!(answer.text.contains("attention_is_all_you_need.pdf"));
        assert!(answer.text.contains("Self-attention relates sequence positions."));
    }

    #[tokio::test]
    async fn template_answer_cites_best_match_verbatim() {
        let composer = Composer::new(None, topics());
        let entry = sample_entry();
        let matches = vec![ScoredMatch {
            entry: &entry,
            score: 0.66,
        }];

        let answer = composer.compose("What is attention?", matches).await;

        assert_eq!(answer.method, AnswerMethod::TemplateFallback);
        assert!(answer
            .text
            .starts_with("Based on the research paper \"attention_is_all_you_need.pdf\" (Page 3)"));
        assert!(answer.text.contains("Self-attention relates sequence positions."));
        assert!(answer.text.contains("What is attention?"));
        assert!((answer.confidence - 0.87).abs() < 1e-9);
    }

    #[tokio::test]
    async fn no_match_answer_restates_query_and_lists_topics() {
        let composer = Composer::new(None, topics());

        let answer = composer.compose("banana bread recipe", Vec::new()).await;

        assert_eq!(answer.method, AnswerMethod::TemplateFallback);
        assert!((answer.confidence - 0.65).abs() < 1e-9);
        assert!(answer.matches.is_empty());
        assert!(answer.text.contains("banana bread recipe"));
        assert!(answer
            .text
            .contains("- Transformer architectures and attention mechanisms"));
        assert!(answer.text.contains("Could you try asking"));
    }

    #[tokio::test]
    async fn template_answer_is_deterministic() {
        let composer = Composer::new(Some(Arc::new(FailingProvider)), topics());
        let entry = sample_entry();

        let first = composer
            .compose(
                "What is attention?",
                vec![ScoredMatch {
                    entry: &entry,
                    score: 0.66,
                }],
            )
            .await;
        let second = composer
            .compose(
                "What is attention?",
                vec![ScoredMatch {
                    entry: &entry,
                    score: 0.66,
                }],
            )
            .await;

        assert_eq!(first.text, second.text);
        assert_eq!(first.method, AnswerMethod::TemplateFallback);
        assert_eq!(second.method, AnswerMethod::TemplateFallback);
    }

    #[tokio::test]
    async fn prompt_contains_context_and_question() {
        let provider = Arc::new(CapturingProvider(tokio::sync::Mutex::new(Vec::new())));
        let composer = Composer::new(Some(provider.clone()), topics());
        let entry = sample_entry();

        composer
            .compose(
                "What is attention?",
                vec![ScoredMatch {
                    entry: &entry,
                    score: 0.66,
                }],
            )
            .await;

        let captured = provider.0.lock().await;
        assert_eq!(captured.len(), 1);
        let request = &captured[0];
        assert_eq!(request.messages[0].role, "system");
        assert!(request.messages[0].content.contains("expert AI researcher"));
        assert_eq!(request.messages[1].role, "user");
        assert!(request.messages[1]
            .content
            .contains("Source: attention_is_all_you_need.pdf (Page 3)"));
        assert!(request.messages[1].content.contains("Question: What is attention?"));
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.max_tokens, Some(600));
    }

    #[tokio::test]
    async fn reachability_reflects_provider_health() {
        let composer = Composer::new(Some(Arc::new(FixedProvider("ok"))), topics());
        assert_eq!(composer.generation_reachable().await, Some(true));

        let template_only = Composer::new(None, topics());
        assert_eq!(template_only.generation_reachable().await, None);
    }

    #[tokio::test]
    async fn missing_page_renders_as_na() {
        let composer = Composer::new(None, topics());
        let mut entry = sample_entry();
        entry.page = None;
        let matches = vec![ScoredMatch {
            entry: &entry,
            score: 0.5,
        }];

        let answer = composer.compose("attention?", matches).await;
        assert!(answer.text.contains("(Page N/A)"));
    }

    #[tokio::test]
    async fn no_match_with_builtin_topics_mentions_all_categories() {
        let corpus = Corpus::builtin();
        let composer = Composer::new(None, corpus.topics().to_vec());
        let matches = Retriever::new().search(&corpus, "quantum chromodynamics");

        let answer = composer.compose("quantum chromodynamics", matches).await;

        assert_eq!(answer.method, AnswerMethod::TemplateFallback);
        for topic in corpus.topics() {
            assert!(answer.text.contains(topic.as_str()));
        }
    }
}
