use std::sync::LazyLock;

use fxhash::FxHashMap;
use regex::Regex;

use crate::pattern::Pattern;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]+").expect("hardcoded regex"));

/// A distinct word and the number of times it occurs in a text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// A reference word paired with its log-count, as stored under its pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredWord {
    pub log_count: f64,
    pub word: String,
}

/// Counts the words of a text.
///
/// A word is a maximal run of ASCII letters, folded to lowercase. The result is ordered by count
/// descending; equal counts are ordered by word descending so the order is total.
pub fn count_words(text: &str) -> Vec<WordCount> {
    let mut counts: FxHashMap<String, usize> = FxHashMap::default();
    for token in WORD.find_iter(text) {
        *counts.entry(token.as_str().to_ascii_lowercase()).or_default() += 1;
    }

    counter_order(counts)
}

fn counter_order(counts: FxHashMap<String, usize>) -> Vec<WordCount> {
    let mut counts: Vec<_> = counts
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect();
    counts.sort_by(|a, b| (b.count, &b.word).cmp(&(a.count, &a.word)));
    counts
}

fn log_count(count: usize) -> f64 {
    (count as f64 + 1.0).ln()
}

/// Word and pattern frequency tables for a body of text.
#[derive(Clone, Debug, Default)]
pub struct FrequencyIndex {
    counts: Vec<WordCount>,
    word_dict: FxHashMap<String, f64>,
    pattern_index: FxHashMap<Pattern, Vec<ScoredWord>>,
}

impl FrequencyIndex {
    pub fn from_text(text: &str) -> Self {
        Self::from_counts(count_words(text))
    }

    /// Builds the index from precomputed counts.
    ///
    /// Counts are re-sorted into counter order, so callers may supply them in any order.
    /// Duplicate words are summed.
    pub fn from_counts(counts: impl IntoIterator<Item = WordCount>) -> Self {
        let mut merged: FxHashMap<String, usize> = FxHashMap::default();
        for WordCount { word, count } in counts {
            *merged.entry(word).or_default() += count;
        }

        let counts = counter_order(merged);

        let mut word_dict = FxHashMap::default();
        let mut pattern_index: FxHashMap<Pattern, Vec<ScoredWord>> = FxHashMap::default();

        for entry in &counts {
            let log_count = log_count(entry.count);
            word_dict.insert(entry.word.clone(), log_count);
            pattern_index
                .entry(Pattern::of(&entry.word))
                .or_default()
                .push(ScoredWord {
                    log_count,
                    word: entry.word.clone(),
                });
        }

        FrequencyIndex {
            counts,
            word_dict,
            pattern_index,
        }
    }

    /// `ln(count + 1)` for a known word.
    pub fn log_count(&self, word: &str) -> Option<f64> {
        self.word_dict.get(word).copied()
    }

    /// The stored copy of a known word together with its log-count.
    pub fn lookup(&self, word: &str) -> Option<(&str, f64)> {
        self.word_dict
            .get_key_value(word)
            .map(|(word, &log_count)| (word.as_str(), log_count))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.word_dict.contains_key(word)
    }

    /// Words sharing `pattern`, most frequent first.
    pub fn candidates(&self, pattern: &Pattern) -> Option<&[ScoredWord]> {
        self.pattern_index.get(pattern).map(Vec::as_slice)
    }

    /// Distinct words in counter order.
    pub fn words(&self) -> &[WordCount] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_index.len()
    }
}
