// Word tokenization and stemming.
//
// The same tokenizer feeds all three detectors, and the same stemmer is
// applied to lexicon words at index-build time and to message tokens at
// classification time. Stemming on only one side would silently break
// lexicon matching.

use rust_stemmers::{Algorithm, Stemmer};

/// Splits raw text into normalized word tokens and stems them.
pub struct Tokenizer {
    stemmer: Stemmer,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Lowercase the input and split it into word tokens.
    ///
    /// Anything that is not alphanumeric acts as a separator, which keeps
    /// this Unicode-safe and punctuation-aware without a language model.
    /// Empty or punctuation-only input yields an empty sequence; this never
    /// fails.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Reduce a token to its Porter stem ("running" -> "run").
    pub fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token).to_string()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_on_punctuation() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("Hello, world! It's me.");
        assert_eq!(tokens, vec!["hello", "world", "it", "s", "me"]);
    }

    #[test]
    fn test_tokenize_lowercases() {
        let tokenizer = Tokenizer::new();
        assert_eq!(tokenizer.tokenize("SHOUTING Words"), vec!["shouting", "words"]);
    }

    #[test]
    fn test_tokenize_empty_and_punctuation_only() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("?!... --- ,,,").is_empty());
    }

    #[test]
    fn test_tokenize_is_unicode_safe() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("héllo wörld 日本語!");
        assert_eq!(tokens, vec!["héllo", "wörld", "日本語"]);
    }

    #[test]
    fn test_stemming() {
        let tokenizer = Tokenizer::new();
        assert_eq!(tokenizer.stem("running"), "run");
        assert_eq!(tokenizer.stem("connections"), "connect");
        // Already-stemmed words pass through unchanged
        assert_eq!(tokenizer.stem("run"), "run");
    }
}
