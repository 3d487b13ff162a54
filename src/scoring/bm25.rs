//! BM25 probabilistic ranking.
//!
//! The index pass is shared with the other strategies; this module keeps the
//! raw integer term counts, measures each document's raw-text length, and
//! precomputes the per-term IDF table. The IDF is [`idf_weight`]
//! (`log10(1 + N/df)`), not the 0.5-smoothed BM25 variant, and the raw term
//! frequency sits inside the `k1` factor of the denominator.

use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::StandardAnalyzer;
use crate::corpus::{Corpus, DocId};
use crate::error::Result;
use crate::index::InvertedIndex;
use crate::scoring::tfidf::idf_weight;
use crate::scoring::{Score, SearchResult, Searcher, finalize_results};

/// Tuning parameters for BM25, fixed at searcher construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f64,

    /// Document-length normalization.
    pub b: f64,

    /// Query term-frequency saturation.
    pub k3: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Bm25Params {
            k1: 1.2,
            b: 0.75,
            k3: 2.0,
        }
    }
}

/// Ranks documents by the BM25 retrieval status value.
pub struct Bm25Searcher {
    corpus: Arc<Corpus>,
    analyzer: Arc<StandardAnalyzer>,
    index: InvertedIndex,
    params: Bm25Params,
    /// doc id -> raw text length in characters (stop words included).
    doc_lengths: AHashMap<DocId, u64>,
    avg_doc_length: f64,
    /// term id - 1 -> IDF.
    idf: Vec<f64>,
}

impl Bm25Searcher {
    /// Build the searcher with default parameters.
    pub fn new(corpus: Arc<Corpus>, analyzer: Arc<StandardAnalyzer>) -> Self {
        Self::with_params(corpus, analyzer, Bm25Params::default())
    }

    /// Build the searcher with explicit parameters.
    pub fn with_params(
        corpus: Arc<Corpus>,
        analyzer: Arc<StandardAnalyzer>,
        params: Bm25Params,
    ) -> Self {
        let index = InvertedIndex::build(corpus.documents());

        // Length is measured on the raw text, not the analyzed tokens, so
        // duplications and stop words still count toward normalization.
        let mut doc_lengths = AHashMap::with_capacity(corpus.len());
        let mut total_length = 0u64;
        for document in corpus.documents() {
            let length = document.raw_text.chars().count() as u64;
            total_length += length;
            doc_lengths.insert(document.id, length);
        }
        let avg_doc_length = if corpus.is_empty() {
            0.0
        } else {
            total_length as f64 / corpus.len() as f64
        };

        let total_docs = index.doc_count();
        let idf = (1..=index.term_dict_len() as u32)
            .map(|term_id| idf_weight(total_docs, index.doc_frequency(term_id)))
            .collect();

        Bm25Searcher {
            corpus,
            analyzer,
            index,
            params,
            doc_lengths,
            avg_doc_length,
            idf,
        }
    }

    /// The tuning parameters in effect.
    pub fn params(&self) -> &Bm25Params {
        &self.params
    }

    /// The underlying shared index.
    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Corpus average raw document length.
    pub fn avg_doc_length(&self) -> f64 {
        self.avg_doc_length
    }
}

impl Searcher for Bm25Searcher {
    fn name(&self) -> &str {
        "bm25"
    }

    fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let tokens = self.analyzer.analyze(query);
        let (query_counts, candidates) = self.index.query_term_counts(&tokens);

        let Bm25Params { k1, b, k3 } = self.params;

        let mut results = Vec::with_capacity(self.corpus.len());
        for document in self.corpus.documents() {
            if !candidates.contains(&document.id) {
                results.push(SearchResult::new(document.id, Score::Undefined));
                continue;
            }

            let doc_length = self.doc_lengths[&document.id] as f64;
            let mut rsv = 0.0;
            for &(term_id, query_frequency) in &query_counts {
                let doc_frequency = self.index.term_count(document.id, term_id);
                if doc_frequency == 0 {
                    // Candidacy is a union over query terms; this term just
                    // isn't one the document contains.
                    continue;
                }

                let tf_doc = doc_frequency as f64;
                let tf_query = query_frequency as f64;
                let idf = self.idf[(term_id - 1) as usize];

                let doc_part = ((k1 + 1.0) * tf_doc)
                    / (k1 * ((1.0 - b) + b * (doc_length / self.avg_doc_length) + tf_doc));
                let query_part = ((k3 + 1.0) * tf_query) / (k3 + tf_query);

                rsv += idf * doc_part * query_part;
            }

            results.push(SearchResult::new(document.id, Score::Value(rsv)));
        }

        Ok(finalize_results(results, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = Bm25Params::default();
        assert_eq!(params.k1, 1.2);
        assert_eq!(params.b, 0.75);
        assert_eq!(params.k3, 2.0);
    }

    #[test]
    fn test_doc_part_monotone_in_term_frequency() {
        let Bm25Params { k1, b, .. } = Bm25Params::default();
        let doc_length = 100.0;
        let avg_doc_length = 120.0;

        let contribution = |tf_doc: f64| {
            ((k1 + 1.0) * tf_doc) / (k1 * ((1.0 - b) + b * (doc_length / avg_doc_length) + tf_doc))
        };

        let mut previous = 0.0;
        for tf in 1..50 {
            let current = contribution(tf as f64);
            assert!(current >= previous, "tf={tf} decreased the contribution");
            previous = current;
        }
    }

    #[test]
    fn test_query_part_saturates() {
        let Bm25Params { k3, .. } = Bm25Params::default();
        let query_part = |tf_query: f64| ((k3 + 1.0) * tf_query) / (k3 + tf_query);

        assert!(query_part(2.0) > query_part(1.0));
        // Bounded by k3 + 1.
        assert!(query_part(1000.0) < k3 + 1.0);
    }
}
