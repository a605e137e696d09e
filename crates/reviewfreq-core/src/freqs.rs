//! Per-token, per-label frequency counts over a labeled corpus

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use tracing::{debug, trace};

use crate::error::Result;
use crate::normalizer::{self, TextNormalizer};

/// A record that carries review text and a class label
pub trait LabeledText {
    type Label: Eq + Hash + Clone;

    fn text(&self) -> &str;
    fn label(&self) -> Self::Label;
}

/// A labeled review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document<L> {
    pub text: String,
    pub label: L,
}

impl<L> Document<L> {
    pub fn new(text: impl Into<String>, label: L) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

impl<L: Eq + Hash + Clone> LabeledText for Document<L> {
    type Label = L;

    fn text(&self) -> &str {
        &self.text
    }

    fn label(&self) -> L {
        self.label.clone()
    }
}

impl<S: AsRef<str>, L: Eq + Hash + Clone> LabeledText for (S, L) {
    type Label = L;

    fn text(&self) -> &str {
        self.0.as_ref()
    }

    fn label(&self) -> L {
        self.1.clone()
    }
}

impl<T: LabeledText + ?Sized> LabeledText for &T {
    type Label = T::Label;

    fn text(&self) -> &str {
        (**self).text()
    }

    fn label(&self) -> T::Label {
        (**self).label()
    }
}

/// Mapping from (token, label) to occurrence count
#[derive(Debug, Clone)]
pub struct FrequencyTable<L> {
    // token -> {label: count}
    counts: AHashMap<String, AHashMap<L, u64>>,
    num_keys: usize,
}

impl<L: Eq + Hash + Clone> FrequencyTable<L> {
    fn new() -> Self {
        Self {
            counts: AHashMap::new(),
            num_keys: 0,
        }
    }

    fn add(&mut self, token: String, label: L, count: u64) {
        let slot = self.counts.entry(token).or_default().entry(label).or_insert(0);
        if *slot == 0 {
            self.num_keys += 1;
        }
        *slot += count;
    }

    /// Count for a (token, label) pair, 0 if never seen
    pub fn get(&self, token: &str, label: &L) -> u64 {
        self.counts
            .get(token)
            .and_then(|labels| labels.get(label))
            .copied()
            .unwrap_or(0)
    }

    /// Counts of one token across all labels
    pub fn token_counts(&self, token: &str) -> Option<&AHashMap<L, u64>> {
        self.counts.get(token)
    }

    /// Number of distinct (token, label) keys
    pub fn len(&self) -> usize {
        self.num_keys
    }

    pub fn is_empty(&self) -> bool {
        self.num_keys == 0
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().flat_map(|labels| labels.values()).sum()
    }

    /// Distinct tokens, in no particular order
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Iterate over `((token, label), count)` entries
    pub fn iter(&self) -> impl Iterator<Item = ((&str, &L), u64)> {
        self.counts.iter().flat_map(|(token, labels)| {
            labels
                .iter()
                .map(move |(label, &count)| ((token.as_str(), label), count))
        })
    }

    /// Flatten into a map keyed by `(token, label)`
    pub fn into_inner(self) -> AHashMap<(String, L), u64> {
        self.counts
            .into_iter()
            .flat_map(|(token, labels)| {
                labels
                    .into_iter()
                    .map(move |(label, count)| ((token.clone(), label), count))
            })
            .collect()
    }

    /// Add the counts of a table built over another partition
    pub fn merge(&mut self, other: FrequencyTable<L>) {
        for (token, labels) in other.counts {
            for (label, count) in labels {
                self.add(token.clone(), label, count);
            }
        }
    }

    /// Get table statistics
    pub fn stats(&self) -> TableStats {
        TableStats {
            num_keys: self.num_keys,
            num_tokens: self.counts.len(),
            total_count: self.total(),
        }
    }
}

impl<L: Eq + Hash + Clone> Default for FrequencyTable<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Eq + Hash> PartialEq for FrequencyTable<L> {
    fn eq(&self, other: &Self) -> bool {
        self.num_keys == other.num_keys && self.counts == other.counts
    }
}

impl<L: Eq + Hash> Eq for FrequencyTable<L> {}

/// Table statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    /// Distinct (token, label) pairs
    pub num_keys: usize,
    /// Distinct tokens
    pub num_tokens: usize,
    /// Sum of all counts
    pub total_count: u64,
}

/// Folds a labeled corpus into a [`FrequencyTable`]
#[derive(Debug, Clone, Copy)]
pub struct FrequencyAggregator<'a> {
    normalizer: &'a TextNormalizer,
}

impl<'a> FrequencyAggregator<'a> {
    pub fn new(normalizer: &'a TextNormalizer) -> Self {
        Self { normalizer }
    }

    /// Build a fresh table from every document in the corpus
    pub fn build<I>(&self, corpus: I) -> FrequencyTable<<I::Item as LabeledText>::Label>
    where
        I: IntoIterator,
        I::Item: LabeledText,
    {
        let (table, docs) = corpus
            .into_iter()
            .fold((FrequencyTable::new(), 0usize), |(mut table, docs), doc| {
                self.count_document(&mut table, &doc);
                (table, docs + 1)
            });

        debug!(documents = docs, keys = table.len(), "built frequency table");
        table
    }

    /// Like [`build`](Self::build), but stops at the first failed record
    pub fn try_build<I, T>(&self, corpus: I) -> Result<FrequencyTable<T::Label>>
    where
        I: IntoIterator<Item = Result<T>>,
        T: LabeledText,
    {
        let (table, docs) = corpus.into_iter().try_fold(
            (FrequencyTable::new(), 0usize),
            |(mut table, docs), doc| {
                self.count_document(&mut table, &doc?);
                Ok::<_, crate::error::Error>((table, docs + 1))
            },
        )?;

        debug!(documents = docs, keys = table.len(), "built frequency table");
        Ok(table)
    }

    fn count_document<T: LabeledText>(&self, table: &mut FrequencyTable<T::Label>, doc: &T) {
        let tokens = self.normalizer.normalize(doc.text());
        trace!(tokens = tokens.len(), "normalized document");

        let label = doc.label();
        for token in tokens {
            table.add(token, label.clone(), 1);
        }
    }
}

impl Default for FrequencyAggregator<'static> {
    fn default() -> Self {
        Self::new(normalizer::shared())
    }
}

/// Build a frequency table with the shared default normalizer
pub fn build_freqs<I>(corpus: I) -> FrequencyTable<<I::Item as LabeledText>::Label>
where
    I: IntoIterator,
    I::Item: LabeledText,
{
    FrequencyAggregator::default().build(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::normalizer::normalize;
    use crate::stemmer::{SnowballStemmer, Stem};

    fn corpus() -> Vec<Document<i64>> {
        vec![
            Document::new("Great product, works great!", 1),
            Document::new("Terrible. Broke after a day", 0),
            Document::new("#great value @shop http://shop.example/item", 1),
            Document::new("", 0),
        ]
    }

    #[test]
    fn test_empty_corpus() {
        let table = build_freqs(Vec::<Document<i64>>::new());
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn test_duplicates_counted() {
        let table = build_freqs([("good good", 1)]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("good", &1), 2);
        assert_eq!(table.get("good", &0), 0);
    }

    #[test]
    fn test_labels_kept_apart() {
        let table = build_freqs(&corpus());
        assert_eq!(table.get("great", &1), 3);
        assert_eq!(table.get("great", &0), 0);
        assert_eq!(table.get("day", &0), 1);
        assert_eq!(table.get("shop", &1), 0);

        let great = table.token_counts("great").unwrap();
        assert_eq!(great.len(), 1);
        assert!(table.token_counts("shop").is_none());
    }

    #[test]
    fn test_total_matches_token_count() {
        let docs = corpus();
        let table = build_freqs(&docs);
        let expected: usize = docs.iter().map(|d| normalize(&d.text).len()).sum();
        assert_eq!(table.total(), expected as u64);
        assert_eq!(table.stats().total_count, expected as u64);
    }

    #[test]
    fn test_deterministic() {
        let docs = corpus();
        assert_eq!(build_freqs(&docs), build_freqs(&docs));
    }

    #[test]
    fn test_order_independent() {
        let docs = corpus();
        let reversed: Vec<_> = docs.iter().rev().cloned().collect();
        assert_eq!(build_freqs(&docs), build_freqs(&reversed));
    }

    #[test]
    fn test_merge_equals_single_pass() {
        let docs = corpus();
        let (left, right) = docs.split_at(2);
        let mut merged = build_freqs(left);
        merged.merge(build_freqs(right));
        assert_eq!(merged, build_freqs(&docs));
    }

    #[test]
    fn test_iter_and_into_inner() {
        let table = build_freqs([("good movie", "pos"), ("bad movie", "neg")]);
        assert_eq!(table.iter().count(), table.len());
        assert_eq!(table.stats().num_tokens, 3);

        let movie = SnowballStemmer::english().stem("movie");
        let flat = table.into_inner();
        assert_eq!(flat.len(), 4);
        assert_eq!(flat.get(&(movie, "pos")), Some(&1));
    }

    #[test]
    fn test_custom_normalizer() {
        let normalizer = TextNormalizer::default();
        let aggregator = FrequencyAggregator::new(&normalizer);
        let table = aggregator.build([("Sooo good", true)]);
        assert_eq!(table.get("soo", &true), 1);
        assert_eq!(table.vocabulary().count(), 2);
    }

    #[test]
    fn test_try_build_fails_fast() {
        let records: Vec<Result<Document<i64>>> = vec![
            Ok(Document::new("fine", 1)),
            Err(Error::malformed(1, "missing field `sentiment`")),
            Ok(Document::new("never reached", 0)),
        ];
        let err = FrequencyAggregator::default().try_build(records).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { index: 1, .. }));
    }

    #[test]
    fn test_try_build_ok() {
        let records = vec![Ok(Document::new("good good", 1i64))];
        let table = FrequencyAggregator::default().try_build(records).unwrap();
        assert_eq!(table.get("good", &1), 2);
    }
}
