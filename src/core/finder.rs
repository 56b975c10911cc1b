// File: src/core/finder.rs
//! Predicate discovery.
//!
//! For a headword and one of its POS groups the finder:
//!
//! 1. collects the informative words of each definition (the unigram map and
//!    a first-occurrence sequence),
//! 2. scores every sequence word by how many of the collected words its own
//!    best definition repeats,
//! 3. sums qualifying scores across definitions, boosts words shared between
//!    definitions, and filters by the final weight.
//!
//! Earlier words in a definition tend to be the central ones ("The fleshy
//! pome or fruit of a rosaceous tree ..." is about fruit before zones), so the
//! sequence order is kept all the way to the output.

use crate::config::Thresholds;
use crate::core::dictionary::Dictionary;
use crate::core::pos::classify_pos;
use crate::core::types::{Headword, PosSet};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Normalized token that opens an obsolete-usage note.
const OBSOLETE_MARKER: &str = "OBS";

/// Which definitions of the headword to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionSelector {
    /// Score every definition of every variation.
    All,
    /// List definitions for manual selection, no scoring.
    Enumerate,
    /// Score only the Nth definition (1-based, numbered across variations).
    Selected(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub word: Headword,
    /// Master score after cross-definition reinforcement.
    pub weight: usize,
    /// Unigram occurrence count added during reinforcement, if any.
    pub shared: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateGroup {
    pub pos: PosSet,
    pub predicates: Vec<Predicate>,
}

impl PredicateGroup {
    pub fn key(&self) -> String {
        self.pos.key()
    }

    pub fn words(&self) -> Vec<&str> {
        self.predicates.iter().map(|p| p.word.as_str()).collect()
    }
}

/// Ranked candidates per POS group, in variation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredicateSet {
    groups: Vec<PredicateGroup>,
    selected: Option<NumberedDefinition>,
}

impl PredicateSet {
    /// Group for a comma-joined tag key such as `"N"` or `"N,A"`.
    pub fn get(&self, key: &str) -> Option<&PredicateGroup> {
        self.groups.iter().find(|g| g.key() == key)
    }

    pub fn words(&self, key: &str) -> Option<Vec<&str>> {
        self.get(key).map(PredicateGroup::words)
    }

    pub fn keys(&self) -> Vec<String> {
        self.groups.iter().map(PredicateGroup::key).collect()
    }

    pub fn groups(&self) -> &[PredicateGroup] {
        &self.groups
    }

    /// The cleaned definition that was scored, when one was selected by number.
    pub fn selected_definition(&self) -> Option<&NumberedDefinition> {
        self.selected.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedDefinition {
    pub number: usize,
    pub text: String,
}

/// One variation as shown in enumerate mode. Variations without any POS tag
/// are listed with no selectable definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationListing {
    pub variation: String,
    pub pos: PosSet,
    pub definitions: Vec<NumberedDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Predicates(PredicateSet),
    Definitions(Vec<VariationListing>),
}

impl Lookup {
    pub fn into_predicates(self) -> Option<PredicateSet> {
        match self {
            Lookup::Predicates(set) => Some(set),
            Lookup::Definitions(_) => None,
        }
    }
}

type UnigramMap = HashMap<Headword, usize>;

fn is_taxonomy(token: &str) -> bool {
    // e.g. (Bot.) or (Hort.)
    token.starts_with('(') && token.ends_with(".)")
}

/// Drops a leading enumeration such as `"2. "` from a definition.
pub fn cleanup_definition(definition: &str) -> &str {
    match definition.chars().next() {
        Some(c) if c.is_ascii_digit() => match definition.find(' ') {
            Some(space) => &definition[space + 1..],
            None => definition,
        },
        _ => definition,
    }
}

/// Finds likely predicates of a headword. Holds no state between calls, so a
/// single finder (or many sharing one dictionary) can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Finder {
    dictionary: Arc<Dictionary>,
    thresholds: Thresholds,
}

impl Finder {
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        Self::with_thresholds(dictionary, Thresholds::default())
    }

    pub fn with_thresholds(dictionary: Arc<Dictionary>, thresholds: Thresholds) -> Self {
        Self { dictionary, thresholds }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Looks up `word` and analyzes the definitions chosen by `selector`.
    ///
    /// Returns `None` when the headword is not in the dictionary. Variations
    /// are visited in lexicographic order; a variation whose tags were all
    /// claimed by an earlier one is not scored.
    pub fn find(&self, word: &str, selector: DefinitionSelector) -> Option<Lookup> {
        let headword = self.dictionary.normalize(word);
        let entry = self.dictionary.get_word(&headword)?;

        if selector == DefinitionSelector::Enumerate {
            return Some(Lookup::Definitions(self.enumerate(entry.iter())));
        }

        let mut groups = Vec::new();
        let mut selected = None;
        let mut claimed = HashSet::new();
        let mut numbered = 0usize;
        for (variation, definitions) in entry {
            let pos = classify_pos(variation);
            if pos.iter().all(|tag| claimed.contains(&tag)) {
                continue;
            }
            match selector {
                DefinitionSelector::Selected(wanted) => {
                    if wanted <= numbered || wanted > numbered + definitions.len() {
                        numbered += definitions.len();
                        continue;
                    }
                    let definition = cleanup_definition(&definitions[wanted - numbered - 1]);
                    debug!(headword = %headword, number = wanted, definition, "selected definition");
                    let predicates =
                        self.candidates_from_definitions(&headword, &pos, &[definition]);
                    groups.push(PredicateGroup { pos, predicates });
                    selected =
                        Some(NumberedDefinition { number: wanted, text: definition.to_string() });
                    break;
                }
                _ => {
                    let predicates =
                        self.candidates_from_definitions(&headword, &pos, definitions);
                    claimed.extend(pos.iter());
                    groups.push(PredicateGroup { pos, predicates });
                }
            }
        }
        Some(Lookup::Predicates(PredicateSet { groups, selected }))
    }

    fn enumerate<'a>(
        &self,
        variations: impl Iterator<Item = (&'a String, &'a Vec<String>)>,
    ) -> Vec<VariationListing> {
        let mut number = 0;
        variations
            .map(|(variation, definitions)| {
                let pos = classify_pos(variation);
                let definitions = if pos.is_empty() {
                    Vec::new()
                } else {
                    definitions
                        .iter()
                        .map(|d| {
                            number += 1;
                            NumberedDefinition { number, text: cleanup_definition(d).to_string() }
                        })
                        .collect()
                };
                VariationListing { variation: variation.clone(), pos, definitions }
            })
            .collect()
    }

    /// Adds one definition's accepted words to `unigram` and returns the
    /// informative ones seen for the first time, in order of appearance.
    ///
    /// Extraction stops at a usage example (`{`), at the headword itself and
    /// at an obsolete-usage note. Taxonomy glosses are skipped, and so are
    /// words that are not headwords or share no tag with `pos`.
    fn definition_unigrams(
        &self,
        headword: &str,
        pos: &PosSet,
        definition: &str,
        unigram: &mut UnigramMap,
    ) -> Vec<Headword> {
        unigram.insert(headword.to_string(), 1);
        let mut sequence = Vec::new();
        for token in definition.split_whitespace() {
            if is_taxonomy(token) {
                continue;
            }
            if token.starts_with('{') {
                break;
            }
            let word = self.dictionary.normalize(token);
            if word == headword || word == OBSOLETE_MARKER {
                break;
            }
            if !self.dictionary.has_pos(&word, pos) {
                continue;
            }
            let count = unigram.entry(word.clone()).or_insert(0);
            *count += 1;
            if *count == 1 && self.dictionary.get_word_frequency(&word) > 0 {
                sequence.push(word);
            }
        }
        sequence
    }

    /// The largest set of `unigram` words found in a single definition of
    /// `candidate` under a matching POS. Definitions with fewer matches than
    /// the per-definition minimum are ignored; ties keep the first found.
    fn best_match_set(&self, candidate: &str, pos: &PosSet, unigram: &UnigramMap) -> Vec<Headword> {
        let Some(entry) = self.dictionary.get_word(candidate) else {
            return Vec::new();
        };
        let minimum = self.thresholds.minimum_unigram_match_per_definition;
        let mut best: Vec<Headword> = Vec::new();
        for (variation, definitions) in entry {
            if !classify_pos(variation).intersects(pos) {
                continue;
            }
            for definition in definitions {
                let matches: Vec<Headword> = definition
                    .split_whitespace()
                    .filter(|token| !is_taxonomy(token))
                    .map(|token| self.dictionary.normalize(token))
                    .filter(|word| word != candidate && unigram.contains_key(word))
                    .collect();
                if matches.len() >= minimum && matches.len() > best.len() {
                    best = matches;
                }
            }
        }
        best
    }

    fn candidates_from_definitions<S: AsRef<str>>(
        &self,
        headword: &str,
        pos: &PosSet,
        definitions: &[S],
    ) -> Vec<Predicate> {
        let t = &self.thresholds;
        let mut unigram = UnigramMap::new();
        let mut master: HashMap<Headword, usize> = HashMap::new();
        let mut order: Vec<Headword> = Vec::new();

        for definition in definitions {
            let sequence = self.definition_unigrams(headword, pos, definition.as_ref(), &mut unigram);
            let mut scored: Vec<(Headword, usize)> = sequence
                .into_iter()
                .map(|word| {
                    let weight = self.best_match_set(&word, pos, &unigram).len();
                    (word, weight)
                })
                .collect();
            // Stable: equal weights keep their sequence order.
            scored.sort_by(|a, b| b.1.cmp(&a.1));

            for (word, weight) in scored {
                if weight < t.minimum_definition_predict_weight {
                    continue;
                }
                *master.entry(word.clone()).or_insert(0) += weight;
                if !order.contains(&word) {
                    order.push(word);
                }
            }
        }

        // Words recurring across the definitions are likely central to the headword.
        let mut shared: HashMap<&str, usize> = HashMap::new();
        for (word, &count) in &unigram {
            if count < t.minimum_unigram_word_shares {
                continue;
            }
            if let Some(score) = master.get_mut(word) {
                *score += count;
                shared.insert(word.as_str(), count);
            }
        }

        let predicates: Vec<Predicate> = order
            .iter()
            .filter_map(|word| {
                let weight = master.get(word).copied().unwrap_or(0);
                (weight >= t.minimum_output_predicate_weight).then(|| Predicate {
                    word: word.clone(),
                    weight,
                    shared: shared.get(word.as_str()).copied(),
                })
            })
            .collect();

        debug!(
            headword,
            pos = %pos,
            unigrams = unigram.len(),
            scored = order.len(),
            kept = predicates.len(),
            "scored definitions"
        );
        predicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frequency::WordFrequency;
    use crate::core::inflection::InflectionMap;
    use crate::core::morphology::EnglishMorphology;
    use crate::core::types::{DictionaryEntry, EntryTable, Pos};

    const ENTRIES: &[(&str, &str, &[&str])] = &[
        ("APPLE", "Ap\"ple, n.", &["The fleshy fruit of a rosaceous tree cultivated in orchards."]),
        ("APPLE", "Ap\"ple, v.i.", &["To grow like an apple."]),
        ("FRUIT", "Fruit, n.", &["The fleshy pome of a cultivated tree."]),
        ("FLESHY", "Flesh\"y, a. Also used as a noun.", &["Full of flesh; plump, as a fruit."]),
        ("TREE", "Tree, n.", &["A woody plant bearing fruit in an orchard."]),
        ("CULTIVATED", "Cul\"ti*va`ted, a. Also used as a noun.", &["Tilled; raised in an orchard, as a tree."]),
        ("ORCHARD", "Or\"chard, n.", &["An inclosure of fruit trees."]),
        ("CULTIVATE", "Cul\"ti*vate, v.t.", &["To till; to raise by tillage, as fruit."]),
        ("BOT", "Bot, n.", &["The larva of a botfly."]),
        ("NATIVE", "Na\"tive, a. Also used as a noun.", &["Belonging to the place of birth."]),
        ("NATIVE", "Na\"tive, n.", &["One born in a place."]),
        ("NATIVE", "Na\"tive, [Obs.]", &["Natural."]),
    ];

    const COUNTS: &[(&str, u64)] = &[
        ("THE", 100),
        ("FRUIT", 6),
        ("FLESHY", 4),
        ("TREE", 8),
        ("CULTIVATED", 3),
        ("ORCHARD", 2),
        ("APPLE", 5),
        ("BOT", 3),
        ("PLACE", 1),
    ];

    fn dictionary() -> Arc<Dictionary> {
        dictionary_from(ENTRIES)
    }

    fn dictionary_from(rows: &[(&str, &str, &[&str])]) -> Arc<Dictionary> {
        let mut entries = EntryTable::new();
        for (word, variation, definitions) in rows {
            let entry: &mut DictionaryEntry = entries.entry(word.to_string()).or_default();
            entry.insert(
                variation.to_string(),
                definitions.iter().map(|d| d.to_string()).collect(),
            );
        }
        let inflections = InflectionMap::build(&entries, &EnglishMorphology);
        let counts = COUNTS.iter().map(|(w, c)| (w.to_string(), *c)).collect();
        let frequency = WordFrequency::from_counts(counts, "THE").unwrap();
        Arc::new(Dictionary::from_tables(entries, inflections, frequency).unwrap())
    }

    fn noun() -> PosSet {
        PosSet::from_tags(&[Pos::N])
    }

    #[test]
    fn test_unigrams_follow_definition_order() {
        let finder = Finder::new(dictionary());
        let mut unigram = UnigramMap::new();
        let sequence = finder.definition_unigrams(
            "APPLE",
            &noun(),
            "The fleshy fruit of a rosaceous tree cultivated in orchards.",
            &mut unigram,
        );
        assert_eq!(sequence, vec!["FLESHY", "FRUIT", "TREE", "CULTIVATED", "ORCHARD"]);
        assert_eq!(unigram.get("APPLE"), Some(&1));
        assert_eq!(unigram.get("ORCHARD"), Some(&1));
        assert!(!unigram.contains_key("ROSACEOUS"));
        assert!(!unigram.contains_key("THE"));
    }

    #[test]
    fn test_taxonomy_gloss_is_skipped() {
        let finder = Finder::new(dictionary());
        let mut unigram = UnigramMap::new();
        finder.definition_unigrams("APPLE", &noun(), "(Bot.) A fleshy fruit.", &mut unigram);
        assert!(!unigram.contains_key("BOT"));
        assert!(unigram.contains_key("FLESHY"));

        // Without the gloss shape the same word is counted.
        let mut unigram = UnigramMap::new();
        finder.definition_unigrams("APPLE", &noun(), "Bot. fleshy fruit.", &mut unigram);
        assert!(unigram.contains_key("BOT"));
    }

    #[test]
    fn test_extraction_stops_at_boundaries() {
        let finder = Finder::new(dictionary());

        let mut unigram = UnigramMap::new();
        let sequence =
            finder.definition_unigrams("APPLE", &noun(), "A fleshy fruit. [Obs.] A tree.", &mut unigram);
        assert_eq!(sequence, vec!["FLESHY", "FRUIT"]);
        assert!(!unigram.contains_key("TREE"));

        let mut unigram = UnigramMap::new();
        let sequence =
            finder.definition_unigrams("APPLE", &noun(), "A fleshy {tree of fruit}", &mut unigram);
        assert_eq!(sequence, vec!["FLESHY"]);

        let mut unigram = UnigramMap::new();
        let sequence =
            finder.definition_unigrams("APPLE", &noun(), "A fleshy apple, or tree.", &mut unigram);
        assert_eq!(sequence, vec!["FLESHY"]);
    }

    #[test]
    fn test_pos_and_frequency_filters() {
        let finder = Finder::new(dictionary());
        let mut unigram = UnigramMap::new();
        // CULTIVATE is only a verb; PLACE is no headword; ORCHARD counts but
        // NATIVE has no informative frequency and stays out of the sequence.
        let sequence = finder.definition_unigrams(
            "APPLE",
            &noun(),
            "To cultivate a native orchard in place.",
            &mut unigram,
        );
        assert_eq!(sequence, vec!["ORCHARD"]);
        assert!(!unigram.contains_key("CULTIVATE"));
        assert_eq!(unigram.get("NATIVE"), Some(&1));
    }

    #[test]
    fn test_unigram_map_accumulates_across_definitions() {
        let finder = Finder::new(dictionary());
        let mut unigram = UnigramMap::new();
        let first = finder.definition_unigrams("APPLE", &noun(), "A fleshy fruit.", &mut unigram);
        let second = finder.definition_unigrams("APPLE", &noun(), "A fruit tree.", &mut unigram);
        assert_eq!(first, vec!["FLESHY", "FRUIT"]);
        assert_eq!(second, vec!["TREE"]);
        assert_eq!(unigram.get("FRUIT"), Some(&2));
    }

    #[test]
    fn test_best_match_set_respects_minimum() {
        let finder = Finder::with_thresholds(dictionary(), Thresholds::uniform(2));
        let unigram: UnigramMap = ["APPLE", "FLESHY", "FRUIT", "TREE", "CULTIVATED", "ORCHARD"]
            .iter()
            .map(|w| (w.to_string(), 1))
            .collect();
        assert_eq!(
            finder.best_match_set("FRUIT", &noun(), &unigram),
            vec!["FLESHY", "CULTIVATED", "TREE"]
        );
        // FLESHY's only definition repeats a single word, below the minimum.
        assert!(finder.best_match_set("FLESHY", &noun(), &unigram).is_empty());
        // The verb-only entry never matches a noun group.
        assert!(finder
            .best_match_set("CULTIVATE", &noun(), &unigram)
            .is_empty());
    }

    #[test]
    fn test_candidate_definitions_are_scanned_whole() {
        // Glosses are skipped and the candidate never matches itself, but
        // none of the extraction stops apply to a candidate's definitions.
        const ROWS: &[(&str, &str, &[&str])] =
            &[("FRUIT", "Fruit, n.", &["(Bot.) A fruit [Obs.] {tree} apple orchard fleshy."])];
        let finder = Finder::with_thresholds(dictionary_from(ROWS), Thresholds::uniform(1));
        let unigram: UnigramMap = ["BOT", "FRUIT", "TREE", "APPLE", "ORCHARD", "FLESHY"]
            .iter()
            .map(|w| (w.to_string(), 1))
            .collect();
        assert_eq!(
            finder.best_match_set("FRUIT", &noun(), &unigram),
            vec!["TREE", "APPLE", "ORCHARD", "FLESHY"]
        );
    }

    #[test]
    fn test_find_with_unit_thresholds() {
        let finder = Finder::with_thresholds(dictionary(), Thresholds::uniform(1));
        let set = finder.find("apple", DefinitionSelector::All).unwrap().into_predicates().unwrap();

        assert_eq!(set.keys(), vec!["N", "VI"]);
        let nouns = set.get("N").unwrap();
        assert_eq!(nouns.words(), vec!["FRUIT", "TREE", "CULTIVATED", "ORCHARD", "FLESHY"]);
        let weights: Vec<usize> = nouns.predicates.iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![4, 3, 3, 3, 2]);
        assert!(nouns.predicates.iter().all(|p| p.shared == Some(1)));

        // The verb definition stops at the headword before finding anything.
        assert!(set.get("VI").unwrap().predicates.is_empty());
    }

    #[test]
    fn test_find_with_default_thresholds() {
        let finder = Finder::new(dictionary());
        let set = finder.find("APPLE", DefinitionSelector::All).unwrap().into_predicates().unwrap();
        let nouns = set.get("N").unwrap();
        assert_eq!(nouns.words(), vec!["FRUIT"]);
        assert_eq!(nouns.predicates[0].weight, 3);
        assert_eq!(nouns.predicates[0].shared, None);
    }

    #[test]
    fn test_absent_headword_is_no_result() {
        let finder = Finder::new(dictionary());
        assert_eq!(finder.find("zzzz", DefinitionSelector::All), None);
        assert_eq!(finder.find("zzzz", DefinitionSelector::Enumerate), None);
    }

    #[test]
    fn test_claimed_tags_skip_later_variations() {
        let finder = Finder::with_thresholds(dictionary(), Thresholds::uniform(1));
        let set = finder.find("native", DefinitionSelector::All).unwrap().into_predicates().unwrap();
        // "a. Also used as a noun." sorts first and claims both N and A.
        assert_eq!(set.keys(), vec!["N,A"]);
    }

    #[test]
    fn test_enumerate_numbers_classified_definitions() {
        let finder = Finder::new(dictionary());
        let Some(Lookup::Definitions(listing)) = finder.find("native", DefinitionSelector::Enumerate)
        else {
            panic!("expected a definition listing");
        };
        assert_eq!(listing.len(), 3);
        // "[Obs.]" sorts first; it has no POS, so it is shown with nothing to select.
        assert!(listing[0].pos.is_empty());
        assert!(listing[0].definitions.is_empty());
        assert_eq!(listing[1].pos.key(), "N,A");
        assert_eq!(listing[1].definitions[0].number, 1);
        // The later noun variation is still listed and selectable.
        assert_eq!(listing[2].pos.key(), "N");
        assert_eq!(listing[2].definitions[0].number, 2);
        assert_eq!(listing[2].definitions[0].text, "One born in a place.");
    }

    #[test]
    fn test_selected_definition() {
        let finder = Finder::with_thresholds(dictionary(), Thresholds::uniform(1));

        let set = finder.find("apple", DefinitionSelector::Selected(1)).unwrap().into_predicates().unwrap();
        assert_eq!(set.keys(), vec!["N"]);
        assert_eq!(set.words("N").unwrap()[0], "FRUIT");
        assert_eq!(
            set.selected_definition(),
            Some(&NumberedDefinition {
                number: 1,
                text: "The fleshy fruit of a rosaceous tree cultivated in orchards.".to_string(),
            })
        );

        let set = finder.find("apple", DefinitionSelector::Selected(2)).unwrap().into_predicates().unwrap();
        assert_eq!(set.keys(), vec!["VI"]);
        assert_eq!(set.selected_definition().map(|d| d.text.as_str()), Some("To grow like an apple."));

        let set = finder.find("apple", DefinitionSelector::Selected(9)).unwrap().into_predicates().unwrap();
        assert!(set.is_empty());
        assert_eq!(set.selected_definition(), None);
        let set = finder.find("apple", DefinitionSelector::Selected(0)).unwrap().into_predicates().unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_cleanup_definition() {
        assert_eq!(cleanup_definition("2. (Bot.) Any tree."), "(Bot.) Any tree.");
        assert_eq!(cleanup_definition("Any tree."), "Any tree.");
        assert_eq!(cleanup_definition("3"), "3");
        assert_eq!(cleanup_definition(""), "");
    }
}
