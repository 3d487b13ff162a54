//! Regex-based tokenizer implementation.

use regex::Regex;

use crate::error::{Result, TrawlError};

/// A regex-based tokenizer that extracts word tokens from raw text.
///
/// The default pattern `\w+` matches runs of word characters, so punctuation
/// and whitespace never produce tokens.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    /// The regex pattern used to extract tokens
    pattern: Regex,
}

impl RegexTokenizer {
    /// Create a new regex tokenizer with the default pattern.
    pub fn new() -> Result<Self> {
        Self::with_pattern(r"\w+")
    }

    /// Create a new regex tokenizer with a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| TrawlError::analysis(format!("Invalid regex pattern: {e}")))?;

        Ok(RegexTokenizer { pattern: regex })
    }

    /// Get the regex pattern used by this tokenizer.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Extract tokens from `text` in order of appearance.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pattern_splits_on_punctuation() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let tokens = tokenizer.tokenize("hello, world! it's 2024");

        assert_eq!(tokens, vec!["hello", "world", "it", "s", "2024"]);
    }

    #[test]
    fn test_empty_text_yields_no_tokens() {
        let tokenizer = RegexTokenizer::new().unwrap();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("...!?").is_empty());
    }

    #[test]
    fn test_custom_pattern() {
        let tokenizer = RegexTokenizer::with_pattern(r"[a-z]+").unwrap();
        let tokens = tokenizer.tokenize("abc123def");

        assert_eq!(tokens, vec!["abc", "def"]);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(RegexTokenizer::with_pattern("(unclosed").is_err());
    }
}
