pub mod openai;
pub mod provider;
pub mod types;

pub use openai::OpenAiCompatProvider;
pub use provider::GenerationProvider;
pub use types::{ChatMessage, GenerationRequest};
