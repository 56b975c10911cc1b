// File: src/core/morphology.rs

/// Produces inflected surface forms for dictionary headwords.
/// Input is lowercase; output casing follows the input.
pub trait MorphologyProvider: Send + Sync {
    fn plural_of(&self, word: &str) -> String;
    fn present_participle_of(&self, word: &str) -> String;
}

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("louse", "lice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("die", "dice"),
    ("criterion", "criteria"),
    ("phenomenon", "phenomena"),
    ("genus", "genera"),
];

const NOT_MAN_COMPOUNDS: &[&str] = &[
    "human", "german", "roman", "norman", "shaman", "talisman", "caiman", "cayman", "ottoman",
    "dolman", "firman", "brahman", "dragoman", "desman", "musselman",
];

const UNINFLECTED: &[&str] = &[
    "sheep", "deer", "fish", "swine", "series", "species", "moose", "trout", "salmon",
    "bison", "aircraft", "news",
];

// Nouns in -f/-fe that take -ves. Everything else in -f just adds -s (roof, chief).
const F_TO_VES: &[&str] = &[
    "leaf", "loaf", "thief", "sheaf", "half", "calf", "elf", "self", "shelf", "wolf",
    "knife", "life", "wife",
];

// Nouns in -is that keep the ending and add -es instead of becoming -es.
const IS_TO_ISES: &[&str] = &[
    "iris", "trellis", "pelvis", "penis", "clematis", "metropolis", "proboscis", "epidermis",
    "marquis", "portcullis",
];

// Stems stressed on the last syllable; they double like one-syllable stems.
const STRESSED_FINAL: &[&str] = &[
    "begin", "forget", "occur", "prefer", "refer", "admit", "commit", "permit", "omit",
    "regret", "control", "compel", "expel", "propel", "equip", "transfer", "submit", "upset",
    "forbid", "acquit", "abet", "rebel", "patrol", "deter",
];

// Nouns in -o that take -es.
const O_TO_OES: &[&str] = &["potato", "tomato", "hero", "echo", "veto", "torpedo", "volcano"];

/// Rule-based English inflection, good enough to map the dictionary's noun
/// plurals and verb participles back to their headwords.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishMorphology;

impl EnglishMorphology {
    pub fn new() -> Self {
        Self
    }

    fn pluralize_word(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }
        let lower = word.to_lowercase();
        if UNINFLECTED.contains(&lower.as_str()) {
            return word.to_string();
        }
        if let Some(&(_, plural)) = IRREGULAR_PLURALS.iter().find(|(s, _)| *s == lower) {
            return plural.to_string();
        }
        // Compounds like "workman" inflect through their last part.
        if lower.len() > 3 && lower.ends_with("man") && !NOT_MAN_COMPOUNDS.contains(&lower.as_str()) {
            return format!("{}men", &word[..word.len() - 3]);
        }
        if F_TO_VES.contains(&lower.as_str()) {
            let stem = word
                .strip_suffix("fe")
                .or_else(|| word.strip_suffix('f'))
                .unwrap_or(word);
            return format!("{}ves", stem);
        }
        if O_TO_OES.contains(&lower.as_str()) {
            return format!("{}es", word);
        }
        if lower.ends_with("is") && lower.len() > 3 && !IS_TO_ISES.contains(&lower.as_str()) {
            return format!("{}es", &word[..word.len() - 2]);
        }
        if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
            return format!("{}es", word);
        }
        if lower.ends_with('y') && !ends_with_vowel_then(&lower, 'y') {
            return format!("{}ies", &word[..word.len() - 1]);
        }
        format!("{}s", word)
    }

    fn participle_word(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if lower.is_empty() {
            return String::new();
        }
        if let Some(stem) = word.strip_suffix("ie") {
            return format!("{}ying", stem);
        }
        if lower.ends_with('e')
            && !["ee", "ye", "oe"].iter().any(|s| lower.ends_with(s))
            && lower.len() > 2
        {
            return format!("{}ing", &word[..word.len() - 1]);
        }
        if doubles_final_consonant(&lower) {
            let last = &word[word.len() - 1..];
            return format!("{}{}ing", word, last);
        }
        format!("{}ing", word)
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn ends_with_vowel_then(word: &str, last: char) -> bool {
    let mut chars = word.chars().rev();
    chars.next() == Some(last) && chars.next().map_or(false, is_vowel)
}

// Short consonant-vowel-consonant stems double the final consonant: run -> running.
fn doubles_final_consonant(word: &str) -> bool {
    if STRESSED_FINAL.contains(&word) {
        return true;
    }
    let chars: Vec<char> = word.chars().collect();
    if chars.len() < 3 || chars.len() > 4 || !chars.iter().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    let n = chars.len();
    let (c1, v, c2) = (chars[n - 3], chars[n - 2], chars[n - 1]);
    !is_vowel(c1) && is_vowel(v) && !is_vowel(c2) && !matches!(c2, 'w' | 'x' | 'y')
        && (n == 3 || !is_vowel(chars[0]) || chars[0] == c1)
}

// Multi-word headwords ("apple tree") inflect their last word only.
fn inflect_last_word(word: &str, inflect: impl Fn(&str) -> String) -> String {
    match word.rsplit_once(' ') {
        Some((head, last)) => format!("{} {}", head, inflect(last)),
        None => inflect(word),
    }
}

impl MorphologyProvider for EnglishMorphology {
    fn plural_of(&self, word: &str) -> String {
        inflect_last_word(word, |w| self.pluralize_word(w))
    }

    fn present_participle_of(&self, word: &str) -> String {
        inflect_last_word(word, |w| self.participle_word(w))
    }
}
