//! Stop-word lists and loading.
//!
//! Provides the default English stop-word set used by
//! [`StandardAnalyzer`](crate::analysis::StandardAnalyzer) and a loader for
//! custom word lists (one word per line).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use ahash::AHashSet;

use crate::error::Result;

/// Default English stop words list.
///
/// Common English words that are typically filtered out during indexing.
pub const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

static DEFAULT_STOP_WORD_SET: LazyLock<AHashSet<String>> = LazyLock::new(|| {
    DEFAULT_ENGLISH_STOP_WORDS
        .iter()
        .map(|word| word.to_string())
        .collect()
});

/// Get a copy of the default English stop-word set.
pub fn default_stop_words() -> AHashSet<String> {
    DEFAULT_STOP_WORD_SET.clone()
}

/// Load a stop-word set from a file with one word per line.
///
/// Words are lowercased; blank lines are skipped.
pub fn load_stop_words<P: AsRef<Path>>(path: P) -> Result<AHashSet<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut words = AHashSet::new();

    for line in reader.lines() {
        let line = line?;
        let word = line.trim();
        if word.is_empty() {
            continue;
        }
        words.insert(word.to_lowercase());
    }

    Ok(words)
}
