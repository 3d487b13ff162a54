//! TF-IDF weighting with cosine-similarity ranking.
//!
//! At construction every document's raw term counts are converted into a
//! sparse weighted vector (`tf × idf`) with its Euclidean norm. At query time
//! the query gets a transient vector built with the same formulas and the
//! corpus-derived IDF table, and candidates are ranked by cosine similarity.

use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::StandardAnalyzer;
use crate::corpus::{Corpus, DocId};
use crate::error::Result;
use crate::index::{InvertedIndex, TermId};
use crate::scoring::{Score, SearchResult, Searcher, finalize_results};

/// Log-scaled term-frequency weight: 0 for an absent term, `1 + log10(f)`
/// otherwise.
pub fn tf_weight(frequency: u32) -> f64 {
    if frequency == 0 {
        return 0.0;
    }
    1.0 + (frequency as f64).log10()
}

/// Inverse-document-frequency weight: `log10(1 + N/df)`.
///
/// Callers only pass terms present in the dictionary, so `doc_frequency` is
/// at least 1.
pub fn idf_weight(total_docs: usize, doc_frequency: u32) -> f64 {
    (1.0 + total_docs as f64 / doc_frequency as f64).log10()
}

/// Euclidean norm of a sparse weight vector.
pub fn vector_norm(weights: &AHashMap<TermId, f64>) -> f64 {
    weights.values().map(|w| w * w).sum::<f64>().sqrt()
}

/// A document's sparse TF-IDF vector and its precomputed norm.
#[derive(Debug, Clone)]
pub struct WeightedVector {
    /// term id -> TF-IDF weight, terms absent from the document omitted.
    pub weights: AHashMap<TermId, f64>,
    /// Euclidean norm of the weights.
    pub norm: f64,
}

/// Ranks documents by cosine similarity of TF-IDF vectors.
pub struct TfIdfSearcher {
    corpus: Arc<Corpus>,
    analyzer: Arc<StandardAnalyzer>,
    index: InvertedIndex,
    vectors: AHashMap<DocId, WeightedVector>,
}

impl TfIdfSearcher {
    /// Build the searcher: index the corpus, then weigh every document
    /// vector.
    pub fn new(corpus: Arc<Corpus>, analyzer: Arc<StandardAnalyzer>) -> Self {
        let index = InvertedIndex::build(corpus.documents());

        let total_docs = index.doc_count();
        let mut vectors = AHashMap::with_capacity(total_docs);
        for (doc_id, counts) in index.all_term_counts() {
            let weights: AHashMap<TermId, f64> = counts
                .iter()
                .map(|(&term_id, &frequency)| {
                    let weight =
                        tf_weight(frequency) * idf_weight(total_docs, index.doc_frequency(term_id));
                    (term_id, weight)
                })
                .collect();
            let norm = vector_norm(&weights);
            vectors.insert(doc_id, WeightedVector { weights, norm });
        }

        TfIdfSearcher {
            corpus,
            analyzer,
            index,
            vectors,
        }
    }

    /// The underlying shared index.
    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// The weighted vector of one document.
    pub fn document_vector(&self, doc_id: DocId) -> Option<&WeightedVector> {
        self.vectors.get(&doc_id)
    }

    /// Iterate over every document's weighted vector.
    pub fn document_vectors(&self) -> impl Iterator<Item = (DocId, &WeightedVector)> {
        self.vectors.iter().map(|(&id, vector)| (id, vector))
    }
}

impl Searcher for TfIdfSearcher {
    fn name(&self) -> &str {
        "tfidf"
    }

    fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let tokens = self.analyzer.analyze(query);
        let (query_counts, candidates) = self.index.query_term_counts(&tokens);

        // Transient query vector, weighed exactly like a document. Kept as a
        // term-id-sorted vec so the dot product accumulates in a fixed order.
        let total_docs = self.index.doc_count();
        let query_weights: Vec<(TermId, f64)> = query_counts
            .iter()
            .map(|&(term_id, frequency)| {
                let weight =
                    tf_weight(frequency) * idf_weight(total_docs, self.index.doc_frequency(term_id));
                (term_id, weight)
            })
            .collect();
        let query_norm = query_weights
            .iter()
            .map(|(_, w)| w * w)
            .sum::<f64>()
            .sqrt();

        let mut results = Vec::with_capacity(self.corpus.len());
        for document in self.corpus.documents() {
            let score = if candidates.contains(&document.id) {
                let vector = &self.vectors[&document.id];
                match cosine_similarity(&query_weights, query_norm, vector) {
                    Some(similarity) => Score::Value(similarity),
                    None => Score::Undefined,
                }
            } else {
                Score::Undefined
            };
            results.push(SearchResult::new(document.id, score));
        }

        Ok(finalize_results(results, k))
    }
}

/// Cosine similarity between the query vector and a document vector.
///
/// Returns `None` when the denominator is zero (an empty query or an empty
/// document vector), which callers rank as [`Score::Undefined`].
fn cosine_similarity(
    query_weights: &[(TermId, f64)],
    query_norm: f64,
    document: &WeightedVector,
) -> Option<f64> {
    let denominator = query_norm * document.norm;
    if denominator == 0.0 {
        return None;
    }

    let mut dot = 0.0;
    for &(term_id, query_weight) in query_weights {
        if let Some(document_weight) = document.weights.get(&term_id) {
            dot += query_weight * document_weight;
        }
    }

    Some(dot / denominator)
}
