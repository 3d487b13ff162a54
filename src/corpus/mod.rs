//! Document model and corpus loading.
//!
//! A [`Corpus`] is a fixed, ordered collection of [`Document`]s, loaded once
//! and immutable afterward. Scorers reference the corpus through an
//! [`Arc`](std::sync::Arc) rather than copying it.
//!
//! Two line-oriented file formats are parsed here and nowhere else, so the
//! scoring core never sees partially parsed data:
//!
//! - documents/queries: `id<TAB>text`, one document per line
//! - relevance judgments: `query_id<TAB>doc_id doc_id ...`, one query per line

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::{AHashMap, AHashSet};
use tracing::info;

use crate::analysis::StandardAnalyzer;
use crate::error::{Result, TrawlError};

/// Identifier of a document (and of a query, which is parsed as a document).
pub type DocId = u32;

/// Mapping from query id to the set of judged-relevant document ids.
pub type RelevanceJudgments = AHashMap<DocId, AHashSet<DocId>>;

/// A single document: its id, the raw text it was loaded from, and the
/// analyzed token sequence.
///
/// Tokens are already normalized and stop-filtered; the index never
/// re-analyzes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Document id, unique within a corpus.
    pub id: DocId,
    /// The original unanalyzed text.
    pub raw_text: String,
    /// Analyzed tokens, in order of appearance.
    pub tokens: Vec<String>,
}

impl Document {
    /// Create a document by analyzing `raw_text`.
    pub fn new(id: DocId, raw_text: impl Into<String>, analyzer: &StandardAnalyzer) -> Self {
        let raw_text = raw_text.into();
        let tokens = analyzer.analyze(&raw_text);
        Document {
            id,
            raw_text,
            tokens,
        }
    }
}

/// A fixed, ordered, in-memory document collection.
#[derive(Debug)]
pub struct Corpus {
    documents: Vec<Document>,
    positions: AHashMap<DocId, usize>,
}

impl Corpus {
    /// Build a corpus from already-analyzed documents, preserving their order.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        let positions = documents
            .iter()
            .enumerate()
            .map(|(pos, doc)| (doc.id, pos))
            .collect();
        Corpus {
            documents,
            positions,
        }
    }

    /// Load a corpus from an `id<TAB>text` file.
    pub fn from_file<P: AsRef<Path>>(path: P, analyzer: &StandardAnalyzer) -> Result<Self> {
        let documents = parse_documents_from_file(&path, analyzer)?;
        info!(
            documents = documents.len(),
            path = %path.as_ref().display(),
            "loaded corpus"
        );
        Ok(Self::from_documents(documents))
    }

    /// All documents in load order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Look up a document by id.
    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.positions.get(&id).map(|&pos| &self.documents[pos])
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the corpus holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Parse `id<TAB>text` lines into documents, analyzing each text.
///
/// Blank lines are skipped; anything else that does not match the grammar is
/// a [`TrawlError::Corpus`].
pub fn parse_documents<R: BufRead>(
    reader: R,
    analyzer: &StandardAnalyzer,
) -> Result<Vec<Document>> {
    let mut documents = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (id, text) = line.split_once('\t').ok_or_else(|| {
            TrawlError::corpus(format!("line {}: expected `id<TAB>text`", number + 1))
        })?;
        let id: DocId = id.trim().parse().map_err(|_| {
            TrawlError::corpus(format!("line {}: invalid document id `{id}`", number + 1))
        })?;

        documents.push(Document::new(id, text, analyzer));
    }

    Ok(documents)
}

/// Parse documents from a file path. See [`parse_documents`].
pub fn parse_documents_from_file<P: AsRef<Path>>(
    path: P,
    analyzer: &StandardAnalyzer,
) -> Result<Vec<Document>> {
    let reader = BufReader::new(File::open(path)?);
    parse_documents(reader, analyzer)
}

/// Parse `query_id<TAB>doc_id doc_id ...` lines into relevance judgments.
pub fn parse_relevance_judgments<R: BufRead>(reader: R) -> Result<RelevanceJudgments> {
    let mut judgments = RelevanceJudgments::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (query_id, doc_ids) = line.split_once('\t').ok_or_else(|| {
            TrawlError::corpus(format!(
                "line {}: expected `query_id<TAB>doc_id ...`",
                number + 1
            ))
        })?;
        let query_id: DocId = query_id.trim().parse().map_err(|_| {
            TrawlError::corpus(format!("line {}: invalid query id `{query_id}`", number + 1))
        })?;

        let mut relevant = AHashSet::new();
        for doc_id in doc_ids.split_whitespace() {
            let doc_id: DocId = doc_id.parse().map_err(|_| {
                TrawlError::corpus(format!(
                    "line {}: invalid document id `{doc_id}`",
                    number + 1
                ))
            })?;
            relevant.insert(doc_id);
        }

        judgments.insert(query_id, relevant);
    }

    Ok(judgments)
}

/// Parse relevance judgments from a file path. See
/// [`parse_relevance_judgments`].
pub fn parse_relevance_judgments_from_file<P: AsRef<Path>>(path: P) -> Result<RelevanceJudgments> {
    let reader = BufReader::new(File::open(path)?);
    parse_relevance_judgments(reader)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn analyzer() -> StandardAnalyzer {
        StandardAnalyzer::new().unwrap()
    }

    #[test]
    fn test_parse_documents() {
        let input = "1\tThe cat sat on the mat.\n\n2\tBirds fly south.\n";
        let documents = parse_documents(Cursor::new(input), &analyzer()).unwrap();

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].id, 1);
        assert_eq!(documents[0].raw_text, "The cat sat on the mat.");
        assert_eq!(documents[0].tokens, vec!["cat", "sat", "mat"]);
        assert_eq!(documents[1].id, 2);
    }

    #[test]
    fn test_parse_documents_rejects_missing_tab() {
        let result = parse_documents(Cursor::new("1 no tab here"), &analyzer());
        assert!(matches!(result, Err(TrawlError::Corpus(_))));
    }

    #[test]
    fn test_parse_documents_rejects_bad_id() {
        let result = parse_documents(Cursor::new("one\ttext"), &analyzer());
        assert!(matches!(result, Err(TrawlError::Corpus(_))));
    }

    #[test]
    fn test_parse_relevance_judgments() {
        let input = "1\t10 11 12\n2\t20\n";
        let judgments = parse_relevance_judgments(Cursor::new(input)).unwrap();

        assert_eq!(judgments.len(), 2);
        assert_eq!(judgments[&1].len(), 3);
        assert!(judgments[&1].contains(&11));
        assert!(judgments[&2].contains(&20));
    }

    #[test]
    fn test_parse_relevance_judgments_rejects_bad_doc_id() {
        let result = parse_relevance_judgments(Cursor::new("1\t10 x 12"));
        assert!(matches!(result, Err(TrawlError::Corpus(_))));
    }

    #[test]
    fn test_corpus_lookup_by_id() {
        let analyzer = analyzer();
        let corpus = Corpus::from_documents(vec![
            Document::new(7, "seven", &analyzer),
            Document::new(3, "three", &analyzer),
        ]);

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(3).unwrap().raw_text, "three");
        assert!(corpus.get(99).is_none());
        // Load order is preserved.
        assert_eq!(corpus.documents()[0].id, 7);
    }
}
