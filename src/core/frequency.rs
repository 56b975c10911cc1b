// File: src/core/frequency.rs
use crate::config::FrequencyConfig;
use crate::core::dictionary::bare_word;
use crate::core::inflection::InflectionMap;
use crate::core::types::{EntryTable, Headword};
use crate::error::{PredicateError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Occurrence counts of every word used in the dictionary's definitions.
///
/// `cutoff` is the count of the calibration word. Words at or above it are
/// too common to say anything about a headword, and words seen once say
/// nothing either; `frequency_of` reports both as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFrequency {
    counts: HashMap<Headword, u64>,
    total: u64,
    cutoff: u64,
}

fn is_numeric(word: &str) -> bool {
    word.chars().all(char::is_numeric) || word.parse::<f64>().is_ok()
}

impl WordFrequency {
    /// Counts every definition token across the dictionary. Tokens that are
    /// inflected forms of a headword are counted under that headword.
    pub fn build(
        entries: &EntryTable,
        inflections: &InflectionMap,
        config: &FrequencyConfig,
    ) -> Result<Self> {
        if entries.is_empty() {
            return Err(PredicateError::precondition(
                "word frequency update requires the dictionary to be loaded beforehand",
            ));
        }
        if inflections.is_empty() {
            return Err(PredicateError::precondition(
                "word frequency update requires the inflection map beforehand",
            ));
        }

        let mut counts: HashMap<Headword, u64> = HashMap::new();
        let mut total = 0u64;
        for entry in entries.values() {
            for definitions in entry.values() {
                for definition in definitions {
                    for token in definition.split_whitespace() {
                        let mut word = bare_word(token);
                        if !entries.contains_key(&word) {
                            if let Some(base) = inflections.first_base(&word) {
                                word = base.to_string();
                            }
                        }
                        if word.is_empty() || is_numeric(&word) {
                            continue;
                        }
                        total += 1;
                        *counts.entry(word).or_insert(0) += 1;
                    }
                }
            }
        }

        let table = Self::with_total(counts, total, &config.calibration_word)?;
        debug!(top = ?table.top_words(config.report_top), "most frequent definition words");
        info!(
            words = table.counts.len(),
            total = table.total,
            cutoff = table.cutoff,
            calibration = %config.calibration_word,
            "built word frequency table"
        );
        Ok(table)
    }

    /// Wraps precomputed counts. The total is the sum of all counts.
    pub fn from_counts(counts: HashMap<Headword, u64>, calibration_word: &str) -> Result<Self> {
        let total = counts.values().sum();
        Self::with_total(counts, total, calibration_word)
    }

    fn with_total(counts: HashMap<Headword, u64>, total: u64, calibration_word: &str) -> Result<Self> {
        let cutoff = *counts.get(calibration_word).ok_or_else(|| {
            PredicateError::precondition(format!(
                "calibration word {} does not occur in any definition, the frequency cutoff is undefined",
                calibration_word
            ))
        })?;
        Ok(Self { counts, total, cutoff })
    }

    /// Informative frequency of a normalized word, or 0 when it is unknown,
    /// at or above the cutoff, or seen at most once.
    pub fn frequency_of(&self, word: &str) -> u64 {
        match self.counts.get(word) {
            Some(&count) if count < self.cutoff && count > 1 => count,
            _ => 0,
        }
    }

    /// Raw stored count, without the cutoff rule.
    pub fn count(&self, word: &str) -> Option<u64> {
        self.counts.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn cutoff(&self) -> u64 {
        self.cutoff
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `n` most frequent words, ties broken alphabetically.
    pub fn top_words(&self, n: usize) -> Vec<(&str, u64)> {
        let mut words: Vec<(&str, u64)> =
            self.counts.iter().map(|(w, &c)| (w.as_str(), c)).collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        words.truncate(n);
        words
    }
}
