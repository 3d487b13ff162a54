//! Scoring strategies and shared ranking machinery.
//!
//! Each strategy owns an [`InvertedIndex`](crate::index::InvertedIndex) built
//! from the same shared pass, derives its own per-document statistics at
//! construction, and implements [`Searcher`]. Ranking and truncation are
//! shared: [`finalize_results`] imposes one deterministic total order on the
//! full per-document result list regardless of strategy.

pub mod bm25;
pub mod jaccard;
pub mod tfidf;

use std::cmp::Ordering;

use crate::corpus::DocId;
use crate::error::Result;

/// The score a strategy assigned to one document for one query.
///
/// `Undefined` marks documents outside the query's candidate set (or a
/// degenerate cosine denominator) for the vector-space and probabilistic
/// strategies. It is a ranking marker, not a failure: undefined scores sort
/// below every real value, including zero and negative ones. Jaccard never
/// produces it — a document with no overlap legitimately scores `Value(0.0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    /// A computed relevance value.
    Value(f64),
    /// No relevance value exists for this document under this query.
    Undefined,
}

impl Score {
    /// The numeric value, or NaN for [`Score::Undefined`].
    pub fn value(self) -> f64 {
        match self {
            Score::Value(v) => v,
            Score::Undefined => f64::NAN,
        }
    }

    /// Whether this score is [`Score::Undefined`].
    pub fn is_undefined(self) -> bool {
        matches!(self, Score::Undefined)
    }
}

/// One entry of a ranked result list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// Id of the scored document.
    pub doc_id: DocId,
    /// The strategy's score for it.
    pub score: Score,
}

impl SearchResult {
    /// Create a new search result.
    pub fn new(doc_id: DocId, score: Score) -> Self {
        SearchResult { doc_id, score }
    }
}

/// A ranking strategy over a fixed corpus.
///
/// Implementations are immutable after construction, so a single instance can
/// serve concurrent `search` calls without locking.
pub trait Searcher: Send + Sync {
    /// Stable display name of the strategy.
    fn name(&self) -> &str;

    /// Rank the corpus against `query` and return the top `k` results.
    ///
    /// Every corpus document is scored (candidates with the strategy formula,
    /// the rest with its sentinel) before ranking, so the pre-truncation pool
    /// always covers the whole corpus.
    fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>>;
}

/// Sort the full result list into the shared deterministic order and truncate
/// to the top `k`.
///
/// Order: descending score, with [`Score::Undefined`] below every real value;
/// equal scores tie-break ascending by document id. `k = 0` yields an empty
/// list; `k` beyond the corpus size yields every document.
pub fn finalize_results(mut results: Vec<SearchResult>, k: usize) -> Vec<SearchResult> {
    results.sort_by(compare_results);
    results.truncate(k);
    results
}

fn compare_results(a: &SearchResult, b: &SearchResult) -> Ordering {
    match (a.score, b.score) {
        (Score::Value(x), Score::Value(y)) => y
            .total_cmp(&x)
            .then_with(|| a.doc_id.cmp(&b.doc_id)),
        (Score::Value(_), Score::Undefined) => Ordering::Less,
        (Score::Undefined, Score::Value(_)) => Ordering::Greater,
        (Score::Undefined, Score::Undefined) => a.doc_id.cmp(&b.doc_id),
    }
}
