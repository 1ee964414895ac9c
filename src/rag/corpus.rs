//! Static corpus of research-paper excerpts.
//!
//! The corpus is loaded once at startup, either from a YAML file or from the
//! built-in excerpt set, and is read-only for the lifetime of the process.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single indexed excerpt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusEntry {
    /// Stable identifier, unique across the corpus.
    pub id: String,
    /// Curated lower-case terms used for coarse matching.
    pub keywords: Vec<String>,
    /// The excerpt text.
    pub content: String,
    /// Display name of the originating document.
    pub source_label: String,
    /// Page reference within the source document, if known.
    #[serde(default)]
    pub page: Option<u32>,
    /// Prior confidence assigned when the corpus was curated, in [0, 1].
    pub base_weight: f64,
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("duplicate corpus entry id: {0}")]
    DuplicateId(String),
    #[error("entry {id} has base_weight {weight} outside [0, 1]")]
    InvalidWeight { id: String, weight: f64 },
    #[error("failed to read corpus file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse corpus file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Deserialize)]
struct CorpusFile {
    #[serde(default)]
    topics: Vec<String>,
    entries: Vec<CorpusEntry>,
}

/// The full excerpt set plus the topical categories it covers.
///
/// No mutation API is exposed; concurrent readers need no synchronization.
#[derive(Debug, Clone)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
    topics: Vec<String>,
}

impl Corpus {
    pub fn new(entries: Vec<CorpusEntry>, topics: Vec<String>) -> Result<Self, CorpusError> {
        validate(&entries)?;
        Ok(Self { entries, topics })
    }

    /// Load a corpus from a YAML file with `topics` and `entries` keys.
    pub fn from_yaml_file(path: &Path) -> Result<Self, CorpusError> {
        let contents = std::fs::read_to_string(path)?;
        let file: CorpusFile = serde_yaml::from_str(&contents)?;
        Self::new(file.entries, file.topics)
    }

    /// The built-in excerpt set: four curated passages on transformer-era
    /// NLP research, mirroring the documents the bot was originally
    /// deployed with.
    pub fn builtin() -> Self {
        let entries = builtin_entries();
        let topics = builtin_topics();
        Self { entries, topics }
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate(entries: &[CorpusEntry]) -> Result<(), CorpusError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.id.as_str()) {
            return Err(CorpusError::DuplicateId(entry.id.clone()));
        }
        if !(0.0..=1.0).contains(&entry.base_weight) {
            return Err(CorpusError::InvalidWeight {
                id: entry.id.clone(),
                weight: entry.base_weight,
            });
        }
    }
    Ok(())
}

fn builtin_topics() -> Vec<String> {
    vec![
        "Transformer architectures and attention mechanisms".to_string(),
        "BERT, GPT, and other language models".to_string(),
        "Deep learning fundamentals".to_string(),
        "Natural language processing techniques".to_string(),
    ]
}

fn builtin_entries() -> Vec<CorpusEntry> {
    vec![
        CorpusEntry {
            id: "transformer-architecture".to_string(),
            keywords: vec![
                "transformer".to_string(),
                "architecture".to_string(),
                "attention".to_string(),
                "mechanism".to_string(),
            ],
            content: "The Transformer architecture, introduced in 'Attention Is All You Need' \
by Vaswani et al. (2017), revolutionized natural language processing by using self-attention \
mechanisms instead of recurrence.\n\nKey components include:\n- Multi-head attention: Allows \
the model to attend to different positions simultaneously\n- Positional encoding: Provides \
information about token positions since there's no recurrence\n- Feed-forward networks: \
Process information in each layer independently\n- Layer normalization: Stabilizes training \
and improves convergence\n\nThe architecture has become the foundation for modern language \
models like GPT, BERT, and T5, enabling better handling of long-range dependencies and \
parallel processing."
                .to_string(),
            source_label: "attention_is_all_you_need.pdf".to_string(),
            page: Some(3),
            base_weight: 0.95,
        },
        CorpusEntry {
            id: "bert".to_string(),
            keywords: vec![
                "bert".to_string(),
                "bidirectional".to_string(),
                "encoder".to_string(),
                "representations".to_string(),
                "transformers".to_string(),
            ],
            content: "BERT (Bidirectional Encoder Representations from Transformers) introduced \
by Devlin et al. (2018) pre-trains deep bidirectional representations by jointly conditioning \
on both left and right context in all layers.\n\nKey innovations:\n- Bidirectional training: \
Unlike traditional left-to-right models, BERT reads the entire sequence at once\n- Masked \
Language Model (MLM): Randomly masks tokens and predicts them based on context\n- Next \
Sentence Prediction (NSP): Learns relationships between sentence pairs\n- Fine-tuning \
approach: Pre-trained representations can be fine-tuned for specific tasks\n\nBERT achieved \
state-of-the-art results on eleven natural language processing tasks, demonstrating the power \
of bidirectional pre-training."
                .to_string(),
            source_label: "bert_paper.pdf".to_string(),
            page: Some(1),
            base_weight: 0.92,
        },
        CorpusEntry {
            id: "gpt".to_string(),
            keywords: vec![
                "gpt".to_string(),
                "generative".to_string(),
                "pre-trained".to_string(),
                "transformer".to_string(),
                "language".to_string(),
                "model".to_string(),
            ],
            content: "GPT (Generative Pre-trained Transformer) models, starting with GPT-1 by \
Radford et al., demonstrated that large-scale unsupervised pre-training on diverse text \
corpora could significantly improve performance on downstream NLP tasks.\n\nEvolution:\n- \
GPT-1 (2018): 117M parameters, demonstrated unsupervised pre-training effectiveness\n- GPT-2 \
(2019): 1.5B parameters, showed emergent capabilities and improved text generation\n- GPT-3 \
(2020): 175B parameters, exhibited few-shot learning capabilities\n- GPT-4 (2023): Multimodal \
capabilities, improved reasoning and safety\n\nThe autoregressive approach of predicting the \
next token has proven remarkably effective for both understanding and generation tasks."
                .to_string(),
            source_label: "gpt_papers_collection.pdf".to_string(),
            page: Some(2),
            base_weight: 0.89,
        },
        CorpusEntry {
            id: "attention-mechanisms".to_string(),
            keywords: vec![
                "attention".to_string(),
                "mechanism".to_string(),
                "self-attention".to_string(),
                "neural".to_string(),
                "networks".to_string(),
            ],
            content: "Attention mechanisms allow neural networks to focus on relevant parts of \
the input when making predictions. Self-attention, the key innovation in Transformers, \
computes attention weights by:\n\n1. Computing Query (Q), Key (K), and Value (V) matrices \
from input embeddings\n2. Calculating attention scores through dot product of queries and \
keys\n3. Applying softmax to normalize attention weights\n4. Computing weighted sum of values \
based on attention weights\n\nMathematical formulation: Attention(Q,K,V) = \
softmax(QK^T/\u{221a}d_k)V\n\nThis mechanism enables the model to capture long-range \
dependencies more effectively than RNNs or CNNs, leading to better performance on sequence \
modeling tasks."
                .to_string(),
            source_label: "attention_mechanisms_survey.pdf".to_string(),
            page: Some(4),
            base_weight: 0.88,
        },
    ]
}
