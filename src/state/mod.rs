use std::sync::Arc;

use crate::core::config::settings::{CorpusSettings, GenerationSettings};
use crate::core::config::{AppPaths, ConfigService};
use crate::history::HistoryStore;
use crate::rag::{AnswerService, Corpus};

pub mod error;

use error::InitializationError;

/// Global application state shared across all routes.
///
/// The corpus and answer service are read-only after initialization; the
/// session history store is the only mutable piece, and it lives in the
/// shell, not in the retrieval/composition core.
#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: ConfigService,
    pub corpus: Arc<Corpus>,
    pub answers: AnswerService,
    pub history: HistoryStore,
}

impl AppState {
    /// Initializes the application state:
    ///
    /// 1. Resolve paths and load configuration
    /// 2. Load the corpus (configured YAML file or the built-in set)
    /// 3. Resolve the generation capability and build the answer pipeline
    pub async fn initialize() -> Result<Arc<Self>, InitializationError> {
        let paths = Arc::new(AppPaths::new());
        let config = ConfigService::new(paths.clone());
        let config_value = config.load_config();

        let corpus_settings = CorpusSettings::from_config(&config_value);
        let corpus = Arc::new(match &corpus_settings.path {
            Some(path) => {
                let resolved = if path.is_absolute() {
                    path.clone()
                } else {
                    paths.project_root.join(path)
                };
                Corpus::from_yaml_file(&resolved)?
            }
            None => Corpus::builtin(),
        });

        let generation_settings = GenerationSettings::from_config(&config_value);
        let answers = AnswerService::from_settings(corpus.clone(), &generation_settings)?;

        if generation_settings.enabled {
            tracing::info!(
                "Generation service enabled ({} via {})",
                generation_settings.model,
                generation_settings.base_url
            );
        } else {
            tracing::info!("No generation service configured; using template answers");
        }

        let history = HistoryStore::new();

        Ok(Arc::new(AppState {
            paths,
            config,
            corpus,
            answers,
            history,
        }))
    }
}
