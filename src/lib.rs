//! # Trawl
//!
//! A small in-memory document retrieval and ranking library for Rust.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - One shared inverted-index pass feeding all ranking strategies
//! - Jaccard, TF-IDF cosine, and BM25 scoring
//! - Precision/recall/F1 evaluation against relevance judgments
//! - Binary on-disk document-vector index

pub mod analysis;
pub mod cli;
pub mod corpus;
pub mod error;
pub mod eval;
pub mod index;
pub mod scoring;
pub mod storage;

pub mod prelude {
    //! Convenience re-exports of the most commonly used types.

    pub use crate::analysis::StandardAnalyzer;
    pub use crate::corpus::{Corpus, DocId, Document};
    pub use crate::error::{Result, TrawlError};
    pub use crate::eval::{Evaluator, PrfMetrics};
    pub use crate::index::{InvertedIndex, TermId};
    pub use crate::scoring::bm25::{Bm25Params, Bm25Searcher};
    pub use crate::scoring::jaccard::JaccardSearcher;
    pub use crate::scoring::tfidf::TfIdfSearcher;
    pub use crate::scoring::{Score, SearchResult, Searcher};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
