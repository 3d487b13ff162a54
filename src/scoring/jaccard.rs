//! Jaccard set-overlap scoring.

use std::sync::Arc;

use ahash::AHashSet;

use crate::analysis::StandardAnalyzer;
use crate::corpus::{Corpus, DocId};
use crate::error::Result;
use crate::index::InvertedIndex;
use crate::scoring::{Score, SearchResult, Searcher, finalize_results};

/// Ranks documents by the Jaccard coefficient between the query's token set
/// and each document's token set.
pub struct JaccardSearcher {
    corpus: Arc<Corpus>,
    analyzer: Arc<StandardAnalyzer>,
    index: InvertedIndex,
}

impl JaccardSearcher {
    /// Build the searcher, indexing the corpus.
    pub fn new(corpus: Arc<Corpus>, analyzer: Arc<StandardAnalyzer>) -> Self {
        let index = InvertedIndex::build(corpus.documents());
        JaccardSearcher {
            corpus,
            analyzer,
            index,
        }
    }

    /// The underlying shared index.
    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }
}

impl Searcher for JaccardSearcher {
    fn name(&self) -> &str {
        "jaccard"
    }

    fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let tokens = self.analyzer.analyze(query);
        let query_set: AHashSet<&str> = tokens.iter().map(String::as_str).collect();

        // Candidate selection runs over term ids; the scores themselves are
        // computed from the raw token sets below.
        let mut candidates: AHashSet<DocId> = AHashSet::new();
        for token in &query_set {
            if let Some(term_id) = self.index.term_id(token) {
                if let Some(postings) = self.index.postings(term_id) {
                    candidates.extend(postings);
                }
            }
        }

        let mut results = Vec::with_capacity(self.corpus.len());
        for document in self.corpus.documents() {
            let score = if candidates.contains(&document.id) {
                let document_set: AHashSet<&str> =
                    document.tokens.iter().map(String::as_str).collect();
                Score::Value(jaccard_similarity(&query_set, &document_set))
            } else {
                // Correct without touching the document's tokens: a
                // non-candidate shares no term with the query, so its true
                // overlap is exactly zero.
                Score::Value(0.0)
            };
            results.push(SearchResult::new(document.id, score));
        }

        Ok(finalize_results(results, k))
    }
}

/// The Jaccard coefficient `|a ∩ b| / |a ∪ b|` of two token sets.
///
/// Returns 0 if either set is empty.
pub fn jaccard_similarity(a: &AHashSet<&str>, b: &AHashSet<&str>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;

    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&'static str]) -> AHashSet<&'static str> {
        words.iter().copied().collect()
    }

    #[test]
    fn test_similarity_is_bounded() {
        let a = set(&["cat", "sat"]);
        let b = set(&["the", "cat", "sat"]);

        let score = jaccard_similarity(&a, &b);
        assert!(score > 0.0 && score <= 1.0);
        assert_eq!(score, 2.0 / 3.0);
    }

    #[test]
    fn test_identical_sets_score_one() {
        let a = set(&["cat", "sat"]);
        assert_eq!(jaccard_similarity(&a, &a), 1.0);
    }

    #[test]
    fn test_empty_set_scores_zero() {
        let empty = set(&[]);
        let full = set(&["cat"]);

        assert_eq!(jaccard_similarity(&empty, &full), 0.0);
        assert_eq!(jaccard_similarity(&full, &empty), 0.0);
        assert_eq!(jaccard_similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn test_disjoint_sets_score_zero() {
        let a = set(&["cat"]);
        let b = set(&["dog"]);
        assert_eq!(jaccard_similarity(&a, &b), 0.0);
    }
}
