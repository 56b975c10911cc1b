// File: src/loader.rs
use crate::config::{FrequencyConfig, CACHE_VERSION};
use crate::core::dictionary::Dictionary;
use crate::core::frequency::WordFrequency;
use crate::core::inflection::InflectionMap;
use crate::core::ingest::parse_gutenberg_file;
use crate::core::morphology::MorphologyProvider;
use crate::core::types::EntryTable;
use crate::error::{PredicateError, Result};
use crate::persistence::TableCache;
use std::path::Path;
use tracing::info;

/// Builds a `Dictionary` from the raw lexicon, going through the cache for
/// each of the three tables.
///
/// Phases run in order (entries, inflections, frequencies) into local values;
/// the dictionary is only handed out once all of them succeeded.
pub struct DictionaryLoader<C: TableCache> {
    cache: C,
    version: u32,
    frequency: FrequencyConfig,
}

impl<C: TableCache> DictionaryLoader<C> {
    pub fn new(cache: C) -> Self {
        Self {
            cache,
            version: CACHE_VERSION,
            frequency: FrequencyConfig::default(),
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn with_frequency_config(mut self, config: FrequencyConfig) -> Self {
        self.frequency = config;
        self
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn load(&self, source: &Path, morphology: &dyn MorphologyProvider) -> Result<Dictionary> {
        let stem = cache_stem(source)?;
        let entries = self.load_entries(source, &stem)?;
        let inflections = self.load_inflections(&stem, &entries, morphology)?;
        let frequency = self.load_frequency(&stem, &entries, &inflections)?;
        let dictionary = Dictionary::from_tables(entries, inflections, frequency)?;
        info!(
            headwords = dictionary.len(),
            total_words = dictionary.total_words(),
            cutoff = dictionary.cutoff(),
            "dictionary ready"
        );
        Ok(dictionary)
    }

    fn load_entries(&self, source: &Path, stem: &str) -> Result<EntryTable> {
        if let Some(entries) = self.cache.load::<EntryTable>(stem, self.version) {
            if !entries.is_empty() {
                return Ok(entries);
            }
        }
        let entries = parse_gutenberg_file(source)?;
        if entries.is_empty() {
            return Err(PredicateError::precondition(format!(
                "no dictionary entries could be parsed from {}",
                source.display()
            )));
        }
        self.cache.save(stem, &entries, self.version)?;
        Ok(entries)
    }

    fn load_inflections(
        &self,
        stem: &str,
        entries: &EntryTable,
        morphology: &dyn MorphologyProvider,
    ) -> Result<InflectionMap> {
        let key = format!("{}_word_infl", stem);
        if let Some(map) = self.cache.load::<InflectionMap>(&key, self.version) {
            if !map.is_empty() {
                return Ok(map);
            }
        }
        info!(key = %key, "writing word inflection map");
        let map = InflectionMap::build(entries, morphology);
        self.cache.save(&key, &map, self.version)?;
        Ok(map)
    }

    fn load_frequency(
        &self,
        stem: &str,
        entries: &EntryTable,
        inflections: &InflectionMap,
    ) -> Result<WordFrequency> {
        let key = format!("{}_word_freq", stem);
        if let Some(table) = self.cache.load::<WordFrequency>(&key, self.version) {
            if !table.is_empty() {
                return Ok(table);
            }
        }
        info!(key = %key, "writing word frequency table");
        let table = WordFrequency::build(entries, inflections, &self.frequency)?;
        self.cache.save(&key, &table, self.version)?;
        Ok(table)
    }
}

fn cache_stem(source: &Path) -> Result<String> {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| {
            PredicateError::Config(format!("{} does not name a file", source.display()))
        })
}
