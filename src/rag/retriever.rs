//! Lexical retrieval over the corpus.
//!
//! Scoring is deliberately simple: curated keyword hits are weighted 3x the
//! noisier in-content substring hits, scaled by the entry's base weight. The
//! constants are fixed so scores stay reproducible across runs.

use std::collections::HashSet;

use serde::Serialize;

use super::corpus::{Corpus, CorpusEntry};

/// Weight applied per query term matching a curated keyword.
const KEYWORD_WEIGHT: f64 = 0.3;
/// Weight applied per query term appearing as a substring of the content.
const CONTENT_WEIGHT: f64 = 0.1;
/// Entries at or below this raw score are unrelated noise, not weak matches.
const RELEVANCE_FLOOR: f64 = 0.1;
/// No single lexical match may present as near-certain.
const SCORE_CAP: f64 = 0.95;
/// Maximum number of matches returned per query.
const TOP_K: usize = 3;

/// A corpus entry matched against one query. Ephemeral; borrows the entry
/// for the lifetime of the request.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMatch<'a> {
    pub entry: &'a CorpusEntry,
    /// Relevance score, clamped to [0, 0.95].
    pub score: f64,
}

/// Maps a free-text query to a ranked subset of the corpus.
///
/// Pure function of the query and the immutable corpus; no side effects.
#[derive(Debug, Clone, Default)]
pub struct Retriever;

impl Retriever {
    pub fn new() -> Self {
        Self
    }

    /// Score every corpus entry against `query` and return the top matches,
    /// ordered by score descending with ties broken by insertion order.
    ///
    /// An empty result is the defined "no knowledge found" signal, not an
    /// error.
    pub fn search<'a>(&self, corpus: &'a Corpus, query: &str) -> Vec<ScoredMatch<'a>> {
        let terms = normalize_query(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<ScoredMatch<'a>> = corpus
            .entries()
            .iter()
            .filter_map(|entry| {
                let raw = raw_score(entry, &terms);
                if raw > RELEVANCE_FLOOR {
                    Some(ScoredMatch {
                        entry,
                        score: raw.min(SCORE_CAP),
                    })
                } else {
                    None
                }
            })
            .collect();

        // Vec::sort_by is stable, so equal scores keep corpus order.
        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(TOP_K);
        matches
    }
}

fn raw_score(entry: &CorpusEntry, terms: &[String]) -> f64 {
    let content_lower = entry.content.to_lowercase();

    let keyword_hits = terms
        .iter()
        .filter(|term| {
            entry
                .keywords
                .iter()
                .any(|keyword| term_matches_keyword(term, keyword))
        })
        .count();

    let content_hits = terms
        .iter()
        .filter(|term| content_lower.contains(term.as_str()))
        .count();

    (keyword_hits as f64 * KEYWORD_WEIGHT + content_hits as f64 * CONTENT_WEIGHT)
        * entry.base_weight
}

/// Lower-case the query and split it into punctuation-trimmed terms,
/// deduplicated in first-occurrence order. A repeated query word must not
/// count more than once toward an entry's hits.
fn normalize_query(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    query
        .to_lowercase()
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|token| !token.is_empty())
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// Exact token match against a curated keyword, with a trailing-`s` rule so
/// a plural query term still hits its singular keyword ("transformers" →
/// "transformer").
fn term_matches_keyword(term: &str, keyword: &str) -> bool {
    if term.eq_ignore_ascii_case(keyword) {
        return true;
    }
    term.strip_suffix('s')
        .map(|stem| stem.eq_ignore_ascii_case(keyword))
        .unwrap_or(false)
}
