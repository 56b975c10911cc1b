// File: src/core/pos.rs
use crate::core::types::{Pos, PosSet};

/// One row of the classification table. The first row whose marker appears in
/// the variation text decides the tags.
pub struct PosRule {
    pub markers: &'static [&'static str],
    pub tags: &'static [Pos],
    /// Extra phrase that widens the tags when present alongside a marker.
    pub widened_by: Option<(&'static str, &'static [Pos])>,
}

/// Marker priority: noun, adjective, adverb, preposition, intransitive verb,
/// transitive verb, past participle.
pub const POS_RULES: &[PosRule] = &[
    PosRule { markers: &[" n."], tags: &[Pos::N], widened_by: None },
    PosRule {
        markers: &[" a."],
        tags: &[Pos::A],
        widened_by: Some(("as a noun", &[Pos::N, Pos::A])),
    },
    PosRule { markers: &[" adv."], tags: &[Pos::Adv], widened_by: None },
    PosRule { markers: &[" prep."], tags: &[Pos::Prep], widened_by: None },
    PosRule { markers: &[" v.i.", " v. i."], tags: &[Pos::Vi], widened_by: None },
    PosRule { markers: &[" v.t.", " v. t."], tags: &[Pos::Vt], widened_by: None },
    PosRule { markers: &[" p.p.", " p. p."], tags: &[Pos::Pp], widened_by: None },
];

// Variation lines open with the headword itself, so a marker at offset zero is
// never a POS marker.
fn mentions(text: &str, marker: &str) -> bool {
    matches!(text.find(marker), Some(offset) if offset > 0)
}

/// Derives the POS tags of a variation line. Text matching no rule yields an
/// empty set, which excludes the variation from scoring.
pub fn classify_pos(variation: &str) -> PosSet {
    for rule in POS_RULES {
        if !rule.markers.iter().any(|m| mentions(variation, m)) {
            continue;
        }
        if let Some((phrase, widened)) = rule.widened_by {
            if mentions(variation, phrase) {
                return PosSet::from_tags(widened);
            }
        }
        return PosSet::from_tags(rule.tags);
    }
    PosSet::empty()
}
