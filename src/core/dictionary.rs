// File: src/core/dictionary.rs
use crate::config::FrequencyConfig;
use crate::core::frequency::WordFrequency;
use crate::core::inflection::InflectionMap;
use crate::core::morphology::MorphologyProvider;
use crate::core::pos::classify_pos;
use crate::core::types::{DictionaryEntry, EntryTable, Headword, PosSet};
use crate::error::{PredicateError, Result};

/// Characters trimmed from both ends of a token before it is compared with
/// headwords.
pub const DECORATIONS: &[char] = &[
    '.', ',', '!', '?', ';', ':', '\'', '"', ' ', '\t', '\n', '#', '(', ')', '&', '@', '+', '=',
    '-', '*', '/', '$', '[', ']', '{', '}', '|', '£', '§',
];

/// Strips decoration characters from both ends and uppercases. Diacritics are
/// kept, so `zoöl.` becomes `ZOÖL`.
pub fn bare_word(word: &str) -> Headword {
    word.trim_matches(DECORATIONS).to_uppercase()
}

/// The dictionary store: parsed entries plus the two tables derived from them.
///
/// A `Dictionary` can only be constructed with all three tables populated, so
/// every query on it is infallible. It is never mutated after construction and
/// is shared between finders behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: EntryTable,
    inflections: InflectionMap,
    frequency: WordFrequency,
}

impl Dictionary {
    /// Publishes fully built tables. Any empty table is a precondition failure.
    pub fn from_tables(
        entries: EntryTable,
        inflections: InflectionMap,
        frequency: WordFrequency,
    ) -> Result<Self> {
        if entries.is_empty() {
            return Err(PredicateError::precondition("dictionary is still empty"));
        }
        if inflections.is_empty() {
            return Err(PredicateError::precondition(
                "dictionary word inflection map is still empty",
            ));
        }
        if frequency.is_empty() {
            return Err(PredicateError::precondition(
                "dictionary word frequency is still empty",
            ));
        }
        Ok(Self { entries, inflections, frequency })
    }

    /// Derives the inflection map and frequency table in memory, without any
    /// caching. See `loader::DictionaryLoader` for the cached path.
    pub fn build(
        entries: EntryTable,
        morphology: &dyn MorphologyProvider,
        config: &FrequencyConfig,
    ) -> Result<Self> {
        if entries.is_empty() {
            return Err(PredicateError::precondition(
                "word inflection update requires the dictionary to be loaded",
            ));
        }
        let inflections = InflectionMap::build(&entries, morphology);
        let frequency = WordFrequency::build(&entries, &inflections, config)?;
        Self::from_tables(entries, inflections, frequency)
    }

    /// Normalizes a raw token to a headword key.
    ///
    /// A stripped form unknown to the frequency table but listed as an
    /// inflected form resolves to the first base word of its first POS bucket.
    /// That picks one sense arbitrarily when forms collide.
    pub fn normalize(&self, word: &str) -> Headword {
        let bare = bare_word(word);
        if !self.frequency.contains(&bare) {
            if let Some(base) = self.inflections.first_base(&bare) {
                return base.to_string();
            }
        }
        bare
    }

    /// Entry for an already normalized headword.
    pub fn get_word(&self, word: &str) -> Option<&DictionaryEntry> {
        self.entries.get(word)
    }

    /// Informative frequency of an already normalized word. See
    /// `WordFrequency::frequency_of`.
    pub fn get_word_frequency(&self, word: &str) -> u64 {
        self.frequency.frequency_of(word)
    }

    /// True when any variation of `word` shares a tag with `pos`.
    pub fn has_pos(&self, word: &str, pos: &PosSet) -> bool {
        self.get_word(word).map_or(false, |entry| {
            entry.keys().any(|variation| classify_pos(variation).intersects(pos))
        })
    }

    pub fn entries(&self) -> &EntryTable {
        &self.entries
    }

    pub fn inflections(&self) -> &InflectionMap {
        &self.inflections
    }

    pub fn frequency(&self) -> &WordFrequency {
        &self.frequency
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_words(&self) -> u64 {
        self.frequency.total()
    }

    pub fn cutoff(&self) -> u64 {
        self.frequency.cutoff()
    }
}
