//! Review text normalization
//!
//! Turns one raw review into the ordered list of stemmed feature tokens:
//!
//! 1. drop `http(s)://` links up to the end of their line
//! 2. drop `#` hashtag markers, keeping the word
//! 3. tokenize (lower-case, strip handles, shorten elongations)
//! 4. drop stopwords and punctuation-only tokens
//! 5. stem what is left

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::stemmer::{SnowballStemmer, Stem};
use crate::stopwords::{stopwords, Language, StopwordSet};
use crate::tokenizer::{Tokenizer, TokenizerOptions};

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://.*[\r\n]*").expect("url pattern is valid"));

// Punctuation plus math, currency and modifier symbols; emoji and other
// symbols (So) still count as content.
static PUNCT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{P}\p{Sm}\p{Sc}\p{Sk}]+$").expect("punctuation pattern is valid")
});

static SHARED: Lazy<TextNormalizer> = Lazy::new(TextNormalizer::default);

/// Normalizer configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub tokenizer: TokenizerOptions,
    pub language: Language,
}

/// Converts raw review text into cleaned, stemmed tokens
pub struct TextNormalizer {
    tokenizer: Tokenizer,
    stopwords: &'static StopwordSet,
    stemmer: Box<dyn Stem>,
}

impl TextNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(config.tokenizer),
            stopwords: stopwords(config.language),
            stemmer: Box::new(SnowballStemmer::new(config.language)),
        }
    }

    /// Replace the stemmer, keeping tokenizer and stopwords
    pub fn with_stemmer(mut self, stemmer: Box<dyn Stem>) -> Self {
        self.stemmer = stemmer;
        self
    }

    /// Normalize a document into its feature tokens.
    ///
    /// Order and duplicates are preserved. Never fails; text without any
    /// usable content yields an empty vector.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let text = URL_RE.replace_all(text, "");
        let text = text.replace('#', "");

        self.tokenizer
            .tokenize(&text)
            .into_iter()
            .filter(|token| !self.stopwords.contains(token) && !is_punctuation(token))
            .map(|token| self.stemmer.stem(&token))
            .collect()
    }

    pub fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token)
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

impl std::fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNormalizer")
            .field("tokenizer", &self.tokenizer)
            .field("stopwords", &self.stopwords.len())
            .finish_non_exhaustive()
    }
}

/// Process-wide normalizer with the default configuration
pub fn shared() -> &'static TextNormalizer {
    &SHARED
}

/// Normalize text with the shared default normalizer
pub fn normalize(text: &str) -> Vec<String> {
    SHARED.normalize(text)
}

/// True if the token is made only of punctuation, ASCII or Unicode
pub fn is_punctuation(token: &str) -> bool {
    PUNCT_RE.is_match(token)
}
