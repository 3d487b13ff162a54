//! Retrieval evaluation: precision, recall, and F1 against relevance
//! judgments.
//!
//! Queries are parsed as documents (`id<TAB>text`) and judged against a
//! `query id -> relevant doc ids` mapping. Per-query evaluation is
//! independent, so [`Evaluator::per_query_prf`] runs queries in parallel;
//! results always come back in the caller's query order.

use std::path::Path;

use ahash::AHashSet;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::analysis::StandardAnalyzer;
use crate::corpus::{
    DocId, Document, RelevanceJudgments, parse_documents_from_file,
    parse_relevance_judgments_from_file,
};
use crate::error::{Result, TrawlError};
use crate::scoring::Searcher;

/// The precision/recall/F1 triple for one query or averaged over a query set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrfMetrics {
    /// Fraction of retrieved documents that are relevant.
    pub precision: f64,
    /// Fraction of relevant documents that were retrieved.
    pub recall: f64,
    /// Harmonic mean of precision and recall; 0 when both are 0.
    pub f1: f64,
}

/// Evaluates a [`Searcher`] against a fixed query set and its relevance
/// judgments.
pub struct Evaluator {
    queries: Vec<Document>,
    judgments: RelevanceJudgments,
}

impl Evaluator {
    /// Create an evaluator from already-loaded queries and judgments.
    pub fn new(queries: Vec<Document>, judgments: RelevanceJudgments) -> Self {
        Evaluator { queries, judgments }
    }

    /// Load queries and judgments from their files.
    pub fn from_files<P: AsRef<Path>>(
        queries_path: P,
        relevance_path: P,
        analyzer: &StandardAnalyzer,
    ) -> Result<Self> {
        let queries = parse_documents_from_file(&queries_path, analyzer)?;
        let judgments = parse_relevance_judgments_from_file(&relevance_path)?;
        info!(
            queries = queries.len(),
            judged = judgments.len(),
            "loaded evaluation data"
        );
        Ok(Evaluator { queries, judgments })
    }

    /// The loaded queries, in file order.
    pub fn queries(&self) -> &[Document] {
        &self.queries
    }

    /// The judged-relevant set for one query id.
    pub fn judgments(&self, query_id: DocId) -> Option<&AHashSet<DocId>> {
        self.judgments.get(&query_id)
    }

    /// Precision, recall, and F1 of the top-`k` results for one query.
    ///
    /// A query id with no judgments, an empty judged-relevant set, and an
    /// empty retrieval are all data-integrity errors, never silently scored.
    pub fn query_prf(
        &self,
        query: &Document,
        searcher: &dyn Searcher,
        k: usize,
    ) -> Result<PrfMetrics> {
        let results = searcher.search(&query.raw_text, k)?;
        let retrieved: AHashSet<DocId> = results.iter().map(|result| result.doc_id).collect();
        if retrieved.is_empty() {
            return Err(TrawlError::evaluation(format!(
                "query {} retrieved no documents (k = {k})",
                query.id
            )));
        }

        let relevant = self.judgments.get(&query.id).ok_or_else(|| {
            TrawlError::evaluation(format!("no relevance judgments for query {}", query.id))
        })?;
        if relevant.is_empty() {
            return Err(TrawlError::evaluation(format!(
                "empty relevance judgments for query {}",
                query.id
            )));
        }

        let hits = retrieved.intersection(relevant).count() as f64;
        let precision = hits / retrieved.len() as f64;
        let recall = hits / relevant.len() as f64;

        Ok(PrfMetrics {
            precision,
            recall,
            f1: f1_score(precision, recall),
        })
    }

    /// Evaluate every loaded query, in parallel, preserving query order.
    pub fn per_query_prf(
        &self,
        searcher: &dyn Searcher,
        k: usize,
    ) -> Result<Vec<(DocId, PrfMetrics)>> {
        self.queries
            .par_iter()
            .map(|query| {
                self.query_prf(query, searcher, k)
                    .map(|metrics| (query.id, metrics))
            })
            .collect()
    }

    /// Macro-averaged precision, recall, and F1 over every loaded query.
    ///
    /// Each metric is averaged independently across queries; counts are never
    /// pooled.
    pub fn average_prf(&self, searcher: &dyn Searcher, k: usize) -> Result<PrfMetrics> {
        if self.queries.is_empty() {
            return Err(TrawlError::evaluation("no queries loaded"));
        }

        let per_query = self.per_query_prf(searcher, k)?;
        let count = per_query.len() as f64;
        let (precision, recall, f1) = per_query.iter().fold(
            (0.0, 0.0, 0.0),
            |(precision, recall, f1), (_, metrics)| {
                (
                    precision + metrics.precision,
                    recall + metrics.recall,
                    f1 + metrics.f1,
                )
            },
        );

        Ok(PrfMetrics {
            precision: precision / count,
            recall: recall / count,
            f1: f1 / count,
        })
    }
}

/// F1 as the harmonic mean of precision and recall, 0 when both are 0.
fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        return 0.0;
    }
    2.0 * precision * recall / (precision + recall)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ahash::AHashMap;

    use super::*;
    use crate::corpus::Corpus;
    use crate::scoring::jaccard::JaccardSearcher;

    fn fixture() -> (Arc<Corpus>, Arc<StandardAnalyzer>) {
        let analyzer = Arc::new(StandardAnalyzer::new().unwrap());
        let corpus = Arc::new(Corpus::from_documents(vec![
            Document::new(1, "rust borrow checker", &analyzer),
            Document::new(2, "rust async runtime", &analyzer),
            Document::new(3, "gardening for beginners", &analyzer),
        ]));
        (corpus, analyzer)
    }

    fn judgments(entries: &[(DocId, &[DocId])]) -> RelevanceJudgments {
        entries
            .iter()
            .map(|&(query_id, docs)| (query_id, docs.iter().copied().collect()))
            .collect()
    }

    #[test]
    fn test_query_prf_values() {
        let (corpus, analyzer) = fixture();
        let searcher = JaccardSearcher::new(corpus, Arc::clone(&analyzer));

        let query = Document::new(100, "rust borrow checker", &analyzer);
        let evaluator = Evaluator::new(vec![query.clone()], judgments(&[(100, &[1, 3])]));

        // Top-2 retrieval is {1, 2}; one of the two judged-relevant docs hit.
        let metrics = evaluator.query_prf(&query, &searcher, 2).unwrap();
        assert_eq!(metrics.precision, 0.5);
        assert_eq!(metrics.recall, 0.5);
        assert!((metrics.f1 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_prf_bounds() {
        let (corpus, analyzer) = fixture();
        let searcher = JaccardSearcher::new(corpus, Arc::clone(&analyzer));

        let query = Document::new(100, "rust runtime", &analyzer);
        let evaluator = Evaluator::new(vec![query.clone()], judgments(&[(100, &[2])]));

        let metrics = evaluator.query_prf(&query, &searcher, 3).unwrap();
        for value in [metrics.precision, metrics.recall, metrics.f1] {
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_f1_zero_when_no_hits() {
        let (corpus, analyzer) = fixture();
        let searcher = JaccardSearcher::new(corpus, Arc::clone(&analyzer));

        // Judged-relevant set is disjoint from everything retrievable.
        let query = Document::new(100, "rust", &analyzer);
        let evaluator = Evaluator::new(vec![query.clone()], judgments(&[(100, &[99])]));

        let metrics = evaluator.query_prf(&query, &searcher, 3).unwrap();
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1, 0.0);
    }

    #[test]
    fn test_missing_judgments_is_fatal() {
        let (corpus, analyzer) = fixture();
        let searcher = JaccardSearcher::new(corpus, Arc::clone(&analyzer));

        let query = Document::new(100, "rust", &analyzer);
        let evaluator = Evaluator::new(vec![query.clone()], AHashMap::new());

        let result = evaluator.query_prf(&query, &searcher, 3);
        assert!(matches!(result, Err(TrawlError::Evaluation(_))));
    }

    #[test]
    fn test_empty_judgment_set_is_fatal() {
        let (corpus, analyzer) = fixture();
        let searcher = JaccardSearcher::new(corpus, Arc::clone(&analyzer));

        let query = Document::new(100, "rust", &analyzer);
        let evaluator = Evaluator::new(vec![query.clone()], judgments(&[(100, &[])]));

        let result = evaluator.query_prf(&query, &searcher, 3);
        assert!(matches!(result, Err(TrawlError::Evaluation(_))));
    }

    #[test]
    fn test_empty_retrieval_is_fatal() {
        let (corpus, analyzer) = fixture();
        let searcher = JaccardSearcher::new(corpus, Arc::clone(&analyzer));

        let query = Document::new(100, "rust", &analyzer);
        let evaluator = Evaluator::new(vec![query.clone()], judgments(&[(100, &[1])]));

        let result = evaluator.query_prf(&query, &searcher, 0);
        assert!(matches!(result, Err(TrawlError::Evaluation(_))));
    }

    #[test]
    fn test_average_is_macro_averaged_and_ordered() {
        let (corpus, analyzer) = fixture();
        let searcher = JaccardSearcher::new(corpus, Arc::clone(&analyzer));

        let queries = vec![
            Document::new(100, "rust borrow checker", &analyzer),
            Document::new(200, "gardening for beginners", &analyzer),
        ];
        let evaluator = Evaluator::new(
            queries,
            judgments(&[(100, &[1]), (200, &[3])]),
        );

        let per_query = evaluator.per_query_prf(&searcher, 1).unwrap();
        assert_eq!(per_query.len(), 2);
        // Caller query order survives the parallel evaluation.
        assert_eq!(per_query[0].0, 100);
        assert_eq!(per_query[1].0, 200);

        let average = evaluator.average_prf(&searcher, 1).unwrap();
        let expected_precision =
            (per_query[0].1.precision + per_query[1].1.precision) / 2.0;
        assert!((average.precision - expected_precision).abs() < 1e-12);
    }

    #[test]
    fn test_average_with_no_queries_is_fatal() {
        let (corpus, analyzer) = fixture();
        let searcher = JaccardSearcher::new(corpus, analyzer);

        let evaluator = Evaluator::new(Vec::new(), RelevanceJudgments::new());
        assert!(matches!(
            evaluator.average_prf(&searcher, 3),
            Err(TrawlError::Evaluation(_))
        ));
    }
}
