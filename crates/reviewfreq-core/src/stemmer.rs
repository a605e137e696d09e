//! Stemming
//!
//! The normalizer only depends on the [`Stem`] trait, so any rule-based
//! stemmer can be swapped in. The default is the Snowball English
//! (Porter2) algorithm from `rust-stemmers`, not classic Porter, so a few
//! stems differ from NLTK's `PorterStemmer` (e.g. "generously").

use rust_stemmers::{Algorithm, Stemmer};

use crate::stopwords::Language;

/// Maps an inflected word form to its root
pub trait Stem: Send + Sync {
    fn stem(&self, token: &str) -> String;
}

/// Snowball stemmer for a single language
pub struct SnowballStemmer {
    stemmer: Stemmer,
    language: Language,
}

impl SnowballStemmer {
    pub fn new(language: Language) -> Self {
        let algorithm = match language {
            Language::English => Algorithm::English,
        };
        Self {
            stemmer: Stemmer::create(algorithm),
            language,
        }
    }

    pub fn english() -> Self {
        Self::new(Language::English)
    }
}

impl Clone for SnowballStemmer {
    fn clone(&self) -> Self {
        // rust_stemmers::Stemmer is not Clone
        Self::new(self.language)
    }
}

impl std::fmt::Debug for SnowballStemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowballStemmer")
            .field("language", &self.language)
            .finish()
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::english()
    }
}

impl Stem for SnowballStemmer {
    fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_stripping() {
        let stemmer = SnowballStemmer::english();
        assert_eq!(stemmer.stem("running"), "run");
        assert_eq!(stemmer.stem("happiness"), "happi");
        assert_eq!(stemmer.stem("reviews"), "review");
    }

    #[test]
    fn test_root_forms_unchanged() {
        let stemmer = SnowballStemmer::english();
        for word in ["good", "great", "day"] {
            assert_eq!(stemmer.stem(word), word);
        }
    }

    #[test]
    fn test_restem_is_stable() {
        let stemmer = SnowballStemmer::english();
        for word in ["loved", "watching", "products", "quickly"] {
            let once = stemmer.stem(word);
            assert_eq!(stemmer.stem(&once), once);
        }
    }

    #[test]
    fn test_clone_keeps_language() {
        let stemmer = SnowballStemmer::english().clone();
        assert_eq!(stemmer.stem("cats"), "cat");
    }
}
