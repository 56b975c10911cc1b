//! Toy Webster-style dictionary shared by the integration scenarios.

use predicate_core::config::Thresholds;
use predicate_core::core::frequency::WordFrequency;
use predicate_core::core::inflection::InflectionMap;
use predicate_core::core::ingest::parse_gutenberg;
use predicate_core::core::morphology::EnglishMorphology;
use predicate_core::core::types::EntryTable;
use predicate_core::{Dictionary, Finder};
use std::sync::Arc;

pub const WEBSTER: &str = "\
*** START OF THIS PROJECT GUTENBERG EBOOK WEBSTER'S UNABRIDGED DICTIONARY ***

APPLE
Ap\"ple, n.

Defn: The fleshy fruit of a rosaceous tree cultivated in orchards.

APPLE
Ap\"ple, v.i.

Defn: To grow like an apple.

FRUIT
Fruit, n.

Defn: The fleshy pome of a cultivated tree.

FLESHY
Flesh\"y, a. Also used as a noun.

Defn: Full of flesh; plump, as a fruit.

TREE
Tree, n.

Defn: A woody plant bearing fruit in an orchard.

CULTIVATED
Cul\"ti*va`ted, a. Also used as a noun.

Defn: Tilled; raised in an orchard, as a tree.

ORCHARD
Or\"chard, n.

Defn: An inclosure of fruit trees.

CULTIVATE
Cul\"ti*vate, v.t.

Defn: To till; to raise by tillage, as fruit.

BOT
Bot, n.

Defn: The larva of a botfly.

POME
Pome, n.

Defn: (Bot.) A fleshy fruit, as of the orchard tree. [Obs.] Cultivated.

*** END OF THIS PROJECT GUTENBERG EBOOK ***
";

/// Hand-picked counts. THE is the calibration word, so anything at or above
/// 100 is noise and anything at 1 is too rare to be informative.
pub const COUNTS: &[(&str, u64)] = &[
    ("THE", 100),
    ("FRUIT", 6),
    ("FLESHY", 4),
    ("TREE", 8),
    ("CULTIVATED", 3),
    ("ORCHARD", 2),
    ("APPLE", 5),
    ("BOT", 3),
];

pub fn entries() -> EntryTable {
    parse_gutenberg(WEBSTER.as_bytes()).expect("toy dictionary parses")
}

pub fn dictionary() -> Arc<Dictionary> {
    let entries = entries();
    let inflections = InflectionMap::build(&entries, &EnglishMorphology);
    let counts = COUNTS.iter().map(|(w, c)| (w.to_string(), *c)).collect();
    let frequency = WordFrequency::from_counts(counts, "THE").expect("calibration word present");
    Arc::new(Dictionary::from_tables(entries, inflections, frequency).expect("tables populated"))
}

pub fn finder(thresholds: Thresholds) -> Finder {
    Finder::with_thresholds(dictionary(), thresholds)
}
