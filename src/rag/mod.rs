//! Retrieval and answer composition.
//!
//! The pipeline has three stages: a read-only [`corpus::Corpus`] of curated
//! excerpts, a lexical [`retriever::Retriever`] that ranks entries against a
//! query, and a [`composer::Composer`] that turns the ranked matches into an
//! [`composer::Answer`] via an external generation service or a
//! deterministic template.

pub mod composer;
pub mod corpus;
pub mod pipeline;
pub mod retriever;

pub use composer::{Answer, AnswerMethod, Composer};
pub use corpus::{Corpus, CorpusEntry, CorpusError};
pub use pipeline::AnswerService;
pub use retriever::{Retriever, ScoredMatch};
