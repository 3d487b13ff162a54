//! The standard analysis pipeline: tokenize, lowercase, drop stop words.

use ahash::AHashSet;

use crate::analysis::stop_words::default_stop_words;
use crate::analysis::tokenizer::RegexTokenizer;
use crate::error::Result;

/// The standard analyzer used for both documents and queries.
///
/// Text is lowercased, split into word tokens, and filtered against a
/// stop-word set. An index and every query against it must share one analyzer
/// so that tokens resolve to the same terms on both sides.
#[derive(Clone, Debug)]
pub struct StandardAnalyzer {
    tokenizer: RegexTokenizer,
    stop_words: AHashSet<String>,
}

impl StandardAnalyzer {
    /// Create an analyzer with the default English stop words.
    pub fn new() -> Result<Self> {
        Ok(StandardAnalyzer {
            tokenizer: RegexTokenizer::new()?,
            stop_words: default_stop_words(),
        })
    }

    /// Create an analyzer with a custom stop-word set.
    ///
    /// An empty set disables stop-word removal entirely.
    pub fn with_stop_words(stop_words: AHashSet<String>) -> Result<Self> {
        Ok(StandardAnalyzer {
            tokenizer: RegexTokenizer::new()?,
            stop_words,
        })
    }

    /// Get the stop-word set used by this analyzer.
    pub fn stop_words(&self) -> &AHashSet<String> {
        &self.stop_words
    }

    /// Analyze `text` into normalized tokens, in order of appearance.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.tokenizer
            .tokenize(&lowered)
            .into_iter()
            .filter(|token| !self.stop_words.contains(token))
            .collect()
    }
}
