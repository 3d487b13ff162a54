//! Error types for the Trawl library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`TrawlError`] enum. Variants are grouped by the part of the pipeline that
//! failed (analysis, corpus loading, indexing, evaluation, storage).

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Trawl operations.
#[derive(Error, Debug)]
pub enum TrawlError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (tokenization, stop-word loading)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Corpus or relevance-judgment parsing errors
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Index-related errors
    #[error("Index error: {0}")]
    Index(String),

    /// Evaluation errors (missing judgments, empty retrievals)
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Storage errors for the persisted vector index
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with [`TrawlError`].
pub type Result<T> = std::result::Result<T, TrawlError>;

impl TrawlError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        TrawlError::Analysis(msg.into())
    }

    /// Create a new corpus error.
    pub fn corpus<S: Into<String>>(msg: S) -> Self {
        TrawlError::Corpus(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        TrawlError::Index(msg.into())
    }

    /// Create a new evaluation error.
    pub fn evaluation<S: Into<String>>(msg: S) -> Self {
        TrawlError::Evaluation(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        TrawlError::Storage(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        TrawlError::Other(msg.into())
    }
}
