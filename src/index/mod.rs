//! The shared inverted-index builder.
//!
//! Every scoring strategy starts from the same single-pass index: a
//! bidirectional term dictionary, per-term posting sets, per-document raw
//! term counts, and per-term document frequencies. Strategy-specific
//! statistics (TF-IDF weights, BM25 lengths and IDF tables) are derived from
//! this snapshot at scorer construction; the snapshot itself is immutable.

use ahash::{AHashMap, AHashSet};
use tracing::debug;

use crate::corpus::{DocId, Document};

/// Identifier of a term in the dictionary. Ids are dense, 1-based, and
/// assigned in first-seen order during the indexing pass.
pub type TermId = u32;

/// Immutable inverted index over a fixed document collection.
#[derive(Debug)]
pub struct InvertedIndex {
    /// term string -> term id.
    term_ids: AHashMap<String, TermId>,
    /// term id - 1 -> term string (the other direction of the dictionary).
    terms: Vec<String>,
    /// term id - 1 -> ids of the documents containing the term.
    postings: Vec<AHashSet<DocId>>,
    /// term id - 1 -> number of documents containing the term.
    doc_frequency: Vec<u32>,
    /// doc id -> raw occurrence count per term. Every indexed document has an
    /// entry, including empty documents (with an empty map).
    term_counts: AHashMap<DocId, AHashMap<TermId, u32>>,
    doc_count: usize,
    total_term_count: u64,
}

impl InvertedIndex {
    /// Build the index in one linear pass over `documents`.
    ///
    /// Document tokens are expected to be already analyzed (normalized and
    /// stop-filtered). Duplicate occurrences within a document increment its
    /// raw count but add the document to a posting set only once, and
    /// document frequency is incremented once per (term, document) pair.
    pub fn build(documents: &[Document]) -> Self {
        let mut index = InvertedIndex {
            term_ids: AHashMap::new(),
            terms: Vec::new(),
            postings: Vec::new(),
            doc_frequency: Vec::new(),
            term_counts: AHashMap::with_capacity(documents.len()),
            doc_count: documents.len(),
            total_term_count: 0,
        };

        for document in documents {
            let mut seen = AHashSet::new();
            let mut counts: AHashMap<TermId, u32> = AHashMap::new();

            for token in &document.tokens {
                index.total_term_count += 1;

                let term_id = match index.term_ids.get(token).copied() {
                    Some(id) => id,
                    None => {
                        let id = index.terms.len() as TermId + 1;
                        index.term_ids.insert(token.clone(), id);
                        index.terms.push(token.clone());
                        index.postings.push(AHashSet::new());
                        index.doc_frequency.push(0);
                        id
                    }
                };

                index.postings[(term_id - 1) as usize].insert(document.id);
                *counts.entry(term_id).or_insert(0) += 1;
                seen.insert(term_id);
            }

            for term_id in seen {
                index.doc_frequency[(term_id - 1) as usize] += 1;
            }
            index.term_counts.insert(document.id, counts);
        }

        debug!(
            documents = index.doc_count,
            terms = index.terms.len(),
            tokens = index.total_term_count,
            "built inverted index"
        );

        index
    }

    /// Resolve a term string to its id.
    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.term_ids.get(term).copied()
    }

    /// Resolve a term id back to its string.
    pub fn term(&self, id: TermId) -> Option<&str> {
        self.terms
            .get(id.checked_sub(1)? as usize)
            .map(String::as_str)
    }

    /// The posting set of a term: ids of every document containing it.
    pub fn postings(&self, id: TermId) -> Option<&AHashSet<DocId>> {
        self.postings.get(id.checked_sub(1)? as usize)
    }

    /// Number of documents containing the term, or 0 for an unknown id.
    pub fn doc_frequency(&self, id: TermId) -> u32 {
        id.checked_sub(1)
            .and_then(|i| self.doc_frequency.get(i as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Raw occurrence count of a term within a document, or 0 if absent.
    pub fn term_count(&self, doc: DocId, term: TermId) -> u32 {
        self.term_counts
            .get(&doc)
            .and_then(|counts| counts.get(&term))
            .copied()
            .unwrap_or(0)
    }

    /// The raw term-count map of a document.
    pub fn term_counts(&self, doc: DocId) -> Option<&AHashMap<TermId, u32>> {
        self.term_counts.get(&doc)
    }

    /// Iterate over every document's raw term-count map.
    pub fn all_term_counts(&self) -> impl Iterator<Item = (DocId, &AHashMap<TermId, u32>)> {
        self.term_counts.iter().map(|(&id, counts)| (id, counts))
    }

    /// Number of indexed documents.
    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    /// Number of distinct terms in the dictionary.
    pub fn term_dict_len(&self) -> usize {
        self.terms.len()
    }

    /// Corpus-wide token occurrence count.
    pub fn total_term_count(&self) -> u64 {
        self.total_term_count
    }

    /// Resolve query tokens against the dictionary.
    ///
    /// Unknown tokens are silently dropped. Returns the in-query term
    /// frequencies in ascending term-id order (so downstream floating-point
    /// accumulation is reproducible) together with the candidate set: the
    /// union of the matched terms' posting sets.
    pub fn query_term_counts(&self, tokens: &[String]) -> (Vec<(TermId, u32)>, AHashSet<DocId>) {
        let mut frequencies: AHashMap<TermId, u32> = AHashMap::new();
        let mut candidates = AHashSet::new();

        for token in tokens {
            let Some(term_id) = self.term_id(token) else {
                continue;
            };
            let count = frequencies.entry(term_id).or_insert(0);
            *count += 1;
            if *count == 1 {
                candidates.extend(&self.postings[(term_id - 1) as usize]);
            }
        }

        let mut frequencies: Vec<(TermId, u32)> = frequencies.into_iter().collect();
        frequencies.sort_unstable_by_key(|&(term_id, _)| term_id);

        (frequencies, candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::StandardAnalyzer;

    fn documents(texts: &[(DocId, &str)]) -> Vec<Document> {
        let analyzer = StandardAnalyzer::with_stop_words(AHashSet::new()).unwrap();
        texts
            .iter()
            .map(|&(id, text)| Document::new(id, text, &analyzer))
            .collect()
    }

    #[test]
    fn test_term_ids_are_dense_and_first_seen() {
        let docs = documents(&[(1, "cat sat cat"), (2, "dog sat")]);
        let index = InvertedIndex::build(&docs);

        assert_eq!(index.term_id("cat"), Some(1));
        assert_eq!(index.term_id("sat"), Some(2));
        assert_eq!(index.term_id("dog"), Some(3));
        assert_eq!(index.term_id("bird"), None);
        assert_eq!(index.term_dict_len(), 3);
        // The dictionary is bidirectional.
        assert_eq!(index.term(3), Some("dog"));
        assert_eq!(index.term(0), None);
        assert_eq!(index.term(4), None);
    }

    #[test]
    fn test_postings_deduplicate_occurrences() {
        let docs = documents(&[(1, "cat sat cat"), (2, "dog sat")]);
        let index = InvertedIndex::build(&docs);

        let cat = index.postings(index.term_id("cat").unwrap()).unwrap();
        assert_eq!(cat.len(), 1);
        assert!(cat.contains(&1));

        let sat = index.postings(index.term_id("sat").unwrap()).unwrap();
        assert_eq!(sat.len(), 2);
    }

    #[test]
    fn test_doc_frequency_counts_documents_not_occurrences() {
        let docs = documents(&[(1, "cat sat cat"), (2, "dog sat")]);
        let index = InvertedIndex::build(&docs);

        assert_eq!(index.doc_frequency(index.term_id("cat").unwrap()), 1);
        assert_eq!(index.doc_frequency(index.term_id("sat").unwrap()), 2);
    }

    #[test]
    fn test_raw_term_counts() {
        let docs = documents(&[(1, "cat sat cat"), (2, "dog sat")]);
        let index = InvertedIndex::build(&docs);
        let cat = index.term_id("cat").unwrap();

        assert_eq!(index.term_count(1, cat), 2);
        assert_eq!(index.term_count(2, cat), 0);
        assert_eq!(index.total_term_count(), 5);
    }

    #[test]
    fn test_empty_document_contributes_no_postings() {
        let docs = documents(&[(1, ""), (2, "dog")]);
        let index = InvertedIndex::build(&docs);

        assert_eq!(index.doc_count(), 2);
        assert_eq!(index.term_dict_len(), 1);
        assert!(index.term_counts(1).unwrap().is_empty());
    }

    #[test]
    fn test_query_term_counts_sorted_and_unknowns_dropped() {
        let docs = documents(&[(1, "cat sat"), (2, "dog sat")]);
        let index = InvertedIndex::build(&docs);

        let tokens: Vec<String> = ["sat", "unknown", "cat", "sat"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (frequencies, candidates) = index.query_term_counts(&tokens);

        assert_eq!(
            frequencies,
            vec![
                (index.term_id("cat").unwrap(), 1),
                (index.term_id("sat").unwrap(), 2)
            ]
        );
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_empty_query_has_no_candidates() {
        let docs = documents(&[(1, "cat sat")]);
        let index = InvertedIndex::build(&docs);

        let (frequencies, candidates) = index.query_term_counts(&[]);
        assert!(frequencies.is_empty());
        assert!(candidates.is_empty());
    }
}
