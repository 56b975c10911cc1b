// File: src/core/inflection.rs
use crate::core::morphology::MorphologyProvider;
use crate::core::pos::classify_pos;
use crate::core::types::{EntryTable, Headword, Pos};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// Base headwords producing one surface form, bucketed by POS.
/// Buckets and the bases inside them keep first-insertion order.
pub type InflectionBuckets = Vec<(Pos, Vec<Headword>)>;

/// Inflected surface form (plural, present participle) -> base headwords.
///
/// A surface form shared by unrelated senses resolves to the first base of the
/// first bucket. Forms that are themselves headwords ("SAW") are never looked
/// up here, so their other readings are missed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflectionMap {
    forms: HashMap<String, InflectionBuckets>,
}

impl InflectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `base` as producing `form` under `pos`.
    pub fn insert(&mut self, form: &str, pos: Pos, base: &str) {
        let buckets = self.forms.entry(form.to_string()).or_default();
        let idx = match buckets.iter().position(|(p, _)| *p == pos) {
            Some(idx) => idx,
            None => {
                buckets.push((pos, Vec::new()));
                buckets.len() - 1
            }
        };
        let bases = &mut buckets[idx].1;
        if !bases.iter().any(|b| b == base) {
            bases.push(base.to_string());
        }
    }

    /// Derives the map from every entry: noun plurals go under `N`, verb
    /// present participles under `VT`. Headwords are visited in sorted order so
    /// rebuilding yields the same first-base choices.
    pub fn build(entries: &EntryTable, morphology: &dyn MorphologyProvider) -> Self {
        let mut map = Self::new();
        let mut headwords: Vec<&Headword> = entries.keys().collect();
        headwords.sort();

        for word in headwords {
            let lower = word.to_lowercase();
            for variation in entries[word].keys() {
                let pos = classify_pos(variation);
                if pos.contains(Pos::N) {
                    let plural = morphology.plural_of(&lower).to_uppercase();
                    map.insert(&plural, Pos::N, word);
                } else if pos.contains(Pos::Vt) || pos.contains(Pos::Vi) {
                    // Past tenses and past participles are not derived yet.
                    let participle = morphology.present_participle_of(&lower).to_uppercase();
                    map.insert(&participle, Pos::Vt, word);
                }
            }
        }
        info!(forms = map.len(), "built inflection map");
        map
    }

    pub fn buckets(&self, form: &str) -> Option<&InflectionBuckets> {
        self.forms.get(form)
    }

    pub fn contains(&self, form: &str) -> bool {
        self.forms.contains_key(form)
    }

    /// First base word listed under the first POS bucket for `form`.
    pub fn first_base(&self, form: &str) -> Option<&str> {
        self.forms
            .get(form)
            .and_then(|buckets| buckets.first())
            .and_then(|(_, bases)| bases.first())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}
