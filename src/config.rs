// File: src/config.rs
use crate::error::{PredicateError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Version tag written into every cached table. Bump it whenever the shape or
/// the derivation of a table changes; older caches are then rebuilt.
pub const CACHE_VERSION: u32 = 3;

/// A high-frequency word whose count anchors the noise cutoff. Review the top
/// words logged during the frequency build before changing it.
pub const CALIBRATION_WORD: &str = "ZOÖL";

pub const DEFAULT_DICTIONARY_PATH: &str = "dict/pg29765.txt";
pub const DEFAULT_CACHE_DIR: &str = "dict/cache";
pub const DEFAULT_WORDNET_DIR: &str = "wordnet_db/dbfiles";

/// The four cutoffs used by the finder. They are empirically tuned, not learned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// A definition of a candidate word only counts when at least this many of
    /// its words were seen in the headword's definitions.
    pub minimum_unigram_match_per_definition: usize,
    /// A candidate's score within one headword definition must reach this to
    /// enter the master candidate table.
    pub minimum_definition_predict_weight: usize,
    /// A word recurring at least this often across the headword's definitions
    /// gets its occurrence count added to its master score.
    pub minimum_unigram_word_shares: usize,
    /// Final master score a candidate needs to be returned.
    pub minimum_output_predicate_weight: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            minimum_unigram_match_per_definition: 2,
            minimum_definition_predict_weight: 2,
            minimum_unigram_word_shares: 2,
            minimum_output_predicate_weight: 3,
        }
    }
}

impl Thresholds {
    /// Every threshold set to the same value. Mostly useful for small corpora.
    pub fn uniform(value: usize) -> Self {
        Self {
            minimum_unigram_match_per_definition: value,
            minimum_definition_predict_weight: value,
            minimum_unigram_word_shares: value,
            minimum_output_predicate_weight: value,
        }
    }

    /// Loads overrides from a JSON object. Fields left out keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            PredicateError::Config(format!("cannot open {}: {}", path.display(), e))
        })?;
        let thresholds = serde_json::from_reader(BufReader::new(file))?;
        Ok(thresholds)
    }
}

/// Controls how the frequency table derives its cutoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyConfig {
    pub calibration_word: String,
    /// How many of the most frequent words are logged after a build.
    pub report_top: usize,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            calibration_word: CALIBRATION_WORD.to_string(),
            report_top: 100,
        }
    }
}
