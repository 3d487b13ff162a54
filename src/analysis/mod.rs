//! Text analysis for indexing and querying.
//!
//! Documents and queries pass through the same pipeline before they reach the
//! index: regex word extraction, lowercasing, and stop-word removal. The
//! scoring core never re-normalizes tokens; whatever comes out of
//! [`StandardAnalyzer::analyze`] is what gets indexed and matched.

pub mod analyzer;
pub mod stop_words;
pub mod tokenizer;

pub use analyzer::StandardAnalyzer;
pub use stop_words::{DEFAULT_ENGLISH_STOP_WORDS, default_stop_words, load_stop_words};
pub use tokenizer::RegexTokenizer;
