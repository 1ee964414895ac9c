use thiserror::Error;

use crate::core::errors::ApiError;
use crate::rag::CorpusError;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("failed to load corpus: {0}")]
    Corpus(#[from] CorpusError),
    #[error("failed to initialize generation provider: {0}")]
    Generation(ApiError),
}
