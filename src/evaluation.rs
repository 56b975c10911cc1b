// File: src/evaluation.rs
//! Offline precision/coverage check against WordNet hypernyms.
//!
//! Only noun lexicographer files are read. Hypernyms are the closest thing
//! WordNet has to "concepts a word is close to", which is what the finder is
//! trying to recover from the dictionary alone.

use crate::core::finder::{DefinitionSelector, Finder};
use crate::core::types::Pos;
use crate::error::{PredicateError, Result};
use crate::persistence::TableCache;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

const CACHE_KEY: &str = "wordnet";
const PROGRESS_INTERVAL: Duration = Duration::from_secs(15);

// Pointer suffixes marking a related synset: hypernyms (,@), domain
// categories/regions/usages (;c ;r ;u) and antonyms (,~).
const POINTERS: &[&str] = &[",@", ";c", ";r", ";u", ",~"];
// Instance pointers.
const INSTANCE_POINTERS: &[&str] = &[",@i", ",~i"];

fn trim_sense(element: &str) -> &str {
    element.trim_matches(|c: char| c == ',' || c.is_ascii_digit())
}

/// Parses one synset line of a lexicographer file into its subject and the
/// targets of its pointers, both uppercased. Returns `None` for anything that
/// is not a `{ ... }` synset or whose subject is itself a pointer.
pub fn parse_wordnet_line(line: &str) -> Option<(String, Vec<String>)> {
    let line = line.trim();
    if !(line.starts_with('{') && line.ends_with('}')) {
        return None;
    }
    // The gloss starts at the first parenthesis.
    let gloss_start = line.find('(')?;
    let words = &line[1..gloss_start];

    // Bracketed segments are usage context, not synset members.
    let mut outside = String::with_capacity(words.len());
    let mut in_bracket = false;
    for c in words.chars() {
        match c {
            '[' => in_bracket = true,
            ']' => in_bracket = false,
            _ if !in_bracket => outside.push(c),
            _ => {}
        }
    }

    let elements: Vec<&str> = outside
        .trim()
        .split(' ')
        .filter(|e| !e.trim_matches(',').is_empty())
        .map(|e| {
            let e = trim_sense(e);
            // noun.plant:pome style cross-file references
            match e.rfind(':') {
                Some(colon) if colon > 0 && e.contains('.') => &e[colon + 1..],
                _ => e,
            }
        })
        .collect();

    let subject = *elements.first()?;
    if subject.ends_with(",@") {
        return None;
    }
    let mut targets = Vec::new();
    for element in &elements[1..] {
        let target = if let Some(s) = POINTERS.iter().find_map(|p| element.strip_suffix(p)) {
            s
        } else if let Some(s) = INSTANCE_POINTERS.iter().find_map(|p| element.strip_suffix(p)) {
            s
        } else {
            continue;
        };
        targets.push(trim_sense(target).to_uppercase());
    }
    Some((subject.to_uppercase(), targets))
}

/// Subject -> related words, from every `noun.*` file of a WordNet `dbfiles`
/// directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HypernymIndex {
    entries: BTreeMap<String, Vec<String>>,
}

impl HypernymIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one parsed synset. Subjects without any target are not kept.
    pub fn add(&mut self, subject: String, targets: Vec<String>) {
        if targets.is_empty() && !self.entries.contains_key(&subject) {
            return;
        }
        let known = self.entries.entry(subject).or_default();
        for target in targets {
            if !known.contains(&target) {
                known.push(target);
            }
        }
    }

    pub fn parse_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for line in reader.lines() {
            if let Some((subject, targets)) = parse_wordnet_line(&line?) {
                self.add(subject, targets);
            }
        }
        Ok(())
    }

    pub fn parse_dir(dir: &Path) -> Result<Self> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .map_or(false, |n| n.starts_with("noun."))
            })
            .collect();
        files.sort();

        let mut index = Self::new();
        for path in files {
            info!(path = %path.display(), "parsing WordNet file");
            index.parse_reader(BufReader::new(File::open(&path)?))?;
        }
        Ok(index)
    }

    /// Loads the index from cache, or parses `dir` and caches the result.
    pub fn load<C: TableCache>(dir: &Path, cache: &C, version: u32) -> Result<Self> {
        if let Some(index) = cache.load::<HypernymIndex>(CACHE_KEY, version) {
            if !index.is_empty() {
                return Ok(index);
            }
        }
        let index = if dir.is_dir() { Self::parse_dir(dir)? } else { Self::new() };
        if index.is_empty() {
            return Err(PredicateError::Config(format!(
                "no WordNet noun files found in {}; download \
                 http://wordnetcode.princeton.edu/wn3.1.dict.tar.gz and point \
                 --wordnet-dir at its dbfiles directory",
                dir.display()
            )));
        }
        cache.save(CACHE_KEY, &index, version)?;
        Ok(index)
    }

    pub fn get(&self, subject: &str) -> Option<&[String]> {
        self.entries.get(subject).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvaluationReport {
    /// Subjects the finder produced noun predicates for.
    pub counted: usize,
    pub precision_total: f64,
    pub coverage_total: f64,
}

impl EvaluationReport {
    pub fn precision(&self) -> f64 {
        if self.counted == 0 { 0.0 } else { self.precision_total / self.counted as f64 }
    }

    pub fn coverage(&self) -> f64 {
        if self.counted == 0 { 0.0 } else { self.coverage_total / self.counted as f64 }
    }

    /// Scores one subject: a predicate matches a target when the target
    /// contains it. Targets are split on `_` first.
    pub fn record(&mut self, predicates: &[&str], related: &[String]) {
        if predicates.is_empty() {
            return;
        }
        let targets: Vec<&str> = related.iter().flat_map(|r| r.split('_')).collect();
        if targets.is_empty() {
            return;
        }
        let correct = predicates
            .iter()
            .map(|p| targets.iter().filter(|t| t.contains(p)).count())
            .sum::<usize>() as f64;
        self.counted += 1;
        self.precision_total += correct / predicates.len() as f64;
        self.coverage_total += correct / targets.len() as f64;
    }
}

/// Runs the finder in automatic mode on every subject (or the first `limit`)
/// and compares its noun predicates with the subject's WordNet relations.
pub fn evaluate(finder: &Finder, index: &HypernymIndex, limit: Option<usize>) -> EvaluationReport {
    let mut report = EvaluationReport::default();
    let total = limit.map_or(index.len(), |l| l.min(index.len()));
    let mut last_checkpoint = Instant::now();
    let noun = Pos::N.tag();

    for (idx, (subject, related)) in index.iter().take(total).enumerate() {
        let Some(set) = finder
            .find(subject, DefinitionSelector::All)
            .and_then(|lookup| lookup.into_predicates())
        else {
            continue;
        };
        if let Some(words) = set.words(noun) {
            report.record(&words, related);
        }

        if last_checkpoint.elapsed() >= PROGRESS_INTERVAL {
            info!(
                precision = report.precision(),
                coverage = report.coverage(),
                percent_done = 100 * (idx + 1) / total.max(1),
                "evaluation checkpoint"
            );
            last_checkpoint = Instant::now();
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hypernym_pointers() {
        let line = "{ apple, edible_fruit,@ pome,@ noun.plant:apple_tree,#p (fruit with red or yellow or green skin) }";
        let (subject, targets) = parse_wordnet_line(line).unwrap();
        assert_eq!(subject, "APPLE");
        assert_eq!(targets, vec!["EDIBLE_FRUIT", "POME"]);
    }

    #[test]
    fn test_parse_ignores_brackets_and_senses() {
        let line = "{ [ orchard1, noun.artifact:grove,+ ] fruit_tree, noun.plant:tree2,@ (garden planted with fruit trees) }";
        let (subject, targets) = parse_wordnet_line(line).unwrap();
        assert_eq!(subject, "FRUIT_TREE");
        assert_eq!(targets, vec!["TREE"]);

        let line = "{ Paris, national_capital,@i France,#p (the capital of France) }";
        let (subject, targets) = parse_wordnet_line(line).unwrap();
        assert_eq!(subject, "PARIS");
        assert_eq!(targets, vec!["NATIONAL_CAPITAL"]);
    }

    #[test]
    fn test_parse_rejects_non_synsets() {
        assert_eq!(parse_wordnet_line("(comment line)"), None);
        assert_eq!(parse_wordnet_line("{ no gloss here }"), None);
        assert_eq!(parse_wordnet_line("{ pome,@ fruit,@ (a pointer subject) }"), None);
    }

    #[test]
    fn test_index_merges_and_drops_pointerless() {
        let text = "\
{ apple, edible_fruit,@ (fruit) }
{ apple, pome,@ edible_fruit,@ (fruit again) }
{ lonely, (no pointers) }
";
        let mut index = HypernymIndex::new();
        index.parse_reader(text.as_bytes()).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(
            index.get("APPLE").unwrap(),
            &["EDIBLE_FRUIT".to_string(), "POME".to_string()]
        );
    }

    #[test]
    fn test_report_counts_substring_matches() {
        let mut report = EvaluationReport::default();
        report.record(&["FRUIT", "TREE"], &["EDIBLE_FRUIT".to_string(), "POME".to_string()]);
        // one match out of two predicates, one match out of three targets
        assert_eq!(report.counted, 1);
        assert!((report.precision() - 0.5).abs() < 1e-9);
        assert!((report.coverage() - 1.0 / 3.0).abs() < 1e-9);

        report.record(&[], &["POME".to_string()]);
        assert_eq!(report.counted, 1);
    }
}
