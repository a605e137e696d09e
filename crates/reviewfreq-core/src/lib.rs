//! reviewfreq Core - review preprocessing and label frequency counts
//!
//! Cleans short reviews into stemmed feature tokens and folds a labeled
//! corpus into a (token, label) -> count table for naive-Bayes style
//! classifiers.

pub mod corpus;
pub mod error;
pub mod freqs;
pub mod normalizer;
pub mod stemmer;
pub mod stopwords;
pub mod tokenizer;

pub use error::{Error, Result};
pub use freqs::{build_freqs, Document, FrequencyAggregator, FrequencyTable, LabeledText};
pub use normalizer::{normalize, NormalizerConfig, TextNormalizer};
pub use stemmer::{SnowballStemmer, Stem};
pub use stopwords::{stopwords, Language, StopwordSet};
pub use tokenizer::{Tokenizer, TokenizerOptions};
