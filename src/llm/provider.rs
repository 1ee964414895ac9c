use async_trait::async_trait;

use super::types::GenerationRequest;
use crate::core::errors::ApiError;

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// return the provider name (e.g. "openai")
    fn name(&self) -> &str;

    /// check if the provider is healthy/reachable
    async fn health_check(&self) -> Result<bool, ApiError>;

    /// single-shot text generation (non-streaming)
    async fn generate(&self, request: GenerationRequest) -> Result<String, ApiError>;
}
