// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A normalized headword: stripped of surrounding punctuation and uppercased.
pub type Headword = String;

/// Variation text (POS and etymology descriptor) -> definitions in dictionary
/// order. Variations iterate lexicographically, which is the order the finder
/// relies on for determinism.
pub type DictionaryEntry = BTreeMap<String, Vec<String>>;

/// Every parsed entry keyed by headword.
pub type EntryTable = HashMap<Headword, DictionaryEntry>;

/// Part-of-speech tags recognized in variation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pos {
    N,
    A,
    Adv,
    Prep,
    Vi,
    Vt,
    Pp,
}

impl Pos {
    pub fn tag(self) -> &'static str {
        match self {
            Pos::N => "N",
            Pos::A => "A",
            Pos::Adv => "ADV",
            Pos::Prep => "PREP",
            Pos::Vi => "VI",
            Pos::Vt => "VT",
            Pos::Pp => "PP",
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The tags a single variation maps to, in classification order.
/// At most two tags in practice (`N,A` for adjectives used as nouns).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PosSet(Vec<Pos>);

impl PosSet {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn from_tags(tags: &[Pos]) -> Self {
        let mut set = Self::empty();
        for &tag in tags {
            set.insert(tag);
        }
        set
    }

    pub fn insert(&mut self, tag: Pos) {
        if !self.0.contains(&tag) {
            self.0.push(tag);
        }
    }

    pub fn contains(&self, tag: Pos) -> bool {
        self.0.contains(&tag)
    }

    pub fn intersects(&self, other: &PosSet) -> bool {
        self.0.iter().any(|tag| other.contains(*tag))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.0.iter().copied()
    }

    /// Comma-joined tags, e.g. `"N,A"`. Used as the result key per variation.
    pub fn key(&self) -> String {
        self.0.iter().map(|t| t.tag()).collect::<Vec<_>>().join(",")
    }

    /// Lowercased, dotted label for display, e.g. `"n,a."`.
    pub fn label(&self) -> String {
        format!("{}.", self.key().to_lowercase())
    }
}

impl fmt::Display for PosSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
