//! The single caller-facing operation: `answer(query) -> Answer`.

use std::sync::Arc;

use super::composer::{Answer, Composer};
use super::corpus::Corpus;
use super::retriever::Retriever;
use crate::core::config::settings::GenerationSettings;
use crate::llm::{GenerationProvider, OpenAiCompatProvider};
use crate::state::error::InitializationError;

/// Ties the retriever and composer to one corpus.
///
/// Stateless between requests; the corpus is read-only, so concurrent
/// `answer` calls share it without synchronization.
#[derive(Clone)]
pub struct AnswerService {
    corpus: Arc<Corpus>,
    retriever: Retriever,
    composer: Arc<Composer>,
}

impl AnswerService {
    pub fn new(corpus: Arc<Corpus>, generation: Option<Arc<dyn GenerationProvider>>) -> Self {
        let composer = Composer::new(generation, corpus.topics().to_vec());
        Self {
            corpus,
            retriever: Retriever::new(),
            composer: Arc::new(composer),
        }
    }

    /// Resolve the generation capability from configuration and build the
    /// service. Whether generation is attempted per request is fixed here,
    /// at startup.
    pub fn from_settings(
        corpus: Arc<Corpus>,
        settings: &GenerationSettings,
    ) -> Result<Self, InitializationError> {
        let generation: Option<Arc<dyn GenerationProvider>> = if settings.enabled {
            let provider =
                OpenAiCompatProvider::new(settings).map_err(InitializationError::Generation)?;
            Some(Arc::new(provider))
        } else {
            None
        };

        let composer = Composer::new(generation, corpus.topics().to_vec())
            .with_sampling(settings.temperature, settings.max_tokens);

        Ok(Self {
            corpus,
            retriever: Retriever::new(),
            composer: Arc::new(composer),
        })
    }

    /// Answer a question against the corpus.
    ///
    /// `query` must be non-empty; the HTTP shell rejects blank input before
    /// this is invoked. Never fails: external-service problems degrade to
    /// the template path inside the composer.
    pub async fn answer(&self, query: &str) -> Answer<'_> {
        let matches = self.retriever.search(&self.corpus, query);
        self.composer.compose(query, matches).await
    }

    pub fn generation_enabled(&self) -> bool {
        self.composer.generation_enabled()
    }

    /// Whether the configured generation service currently answers its
    /// health check; `None` when generation is disabled.
    pub async fn generation_reachable(&self) -> Option<bool> {
        self.composer.generation_reachable().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ApiError;
    use crate::llm::GenerationRequest;
    use crate::rag::composer::AnswerMethod;
    use async_trait::async_trait;

    struct UnreachableProvider;

    #[async_trait]
    impl GenerationProvider for UnreachableProvider {
        fn name(&self) -> &str {
            "unreachable"
        }

        async fn health_check(&self) -> Result<bool, ApiError> {
            Ok(false)
        }

        async fn generate(&self, _request: GenerationRequest) -> Result<String, ApiError> {
            Err(ApiError::Internal("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn empty_corpus_always_falls_back_with_low_confidence() {
        let corpus = Arc::new(Corpus::new(vec![], vec![]).expect("empty corpus"));
        let service = AnswerService::new(corpus, None);

        let answer = service.answer("What is the transformer architecture?").await;

        assert_eq!(answer.method, AnswerMethod::TemplateFallback);
        assert!((answer.confidence - 0.65).abs() < 1e-9);
        assert!(answer.matches.is_empty());
    }

    #[tokio::test]
    async fn answer_is_idempotent_with_unreachable_generation() {
        let corpus = Arc::new(Corpus::builtin());
        let service = AnswerService::new(corpus, Some(Arc::new(UnreachableProvider)));

        let first = service.answer("Explain attention mechanisms").await;
        let second = service.answer("Explain attention mechanisms").await;

        assert_eq!(first.method, AnswerMethod::TemplateFallback);
        assert_eq!(second.method, AnswerMethod::TemplateFallback);
        assert_eq!(first.text, second.text);
    }

    #[tokio::test]
    async fn matched_answer_cites_at_most_three_sources() {
        let corpus = Arc::new(Corpus::builtin());
        let service = AnswerService::new(corpus, None);

        let answer = service
            .answer("How do transformer language models use attention?")
            .await;

        assert!(!answer.matches.is_empty());
        assert!(answer.matches.len() <= 3);
        assert!((answer.confidence - 0.87).abs() < 1e-9);
    }

    #[tokio::test]
    async fn reachability_reports_provider_state() {
        let corpus = Arc::new(Corpus::builtin());

        let template_only = AnswerService::new(corpus.clone(), None);
        assert_eq!(template_only.generation_reachable().await, None);

        let unreachable = AnswerService::new(corpus, Some(Arc::new(UnreachableProvider)));
        assert_eq!(unreachable.generation_reachable().await, Some(false));
    }

    #[tokio::test]
    async fn disabled_settings_produce_template_only_service() {
        let corpus = Arc::new(Corpus::builtin());
        let settings = GenerationSettings::default();
        let service = AnswerService::from_settings(corpus, &settings).expect("service");

        assert!(!service.generation_enabled());
        let answer = service.answer("How does BERT work?").await;
        assert_eq!(answer.method, AnswerMethod::TemplateFallback);
    }
}
