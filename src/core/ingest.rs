// File: src/core/ingest.rs
//! Parser for the Project Gutenberg edition of Webster's Unabridged Dictionary.
//!
//! The text is a flat sequence of blocks:
//!
//! ```text
//! APPLE
//! Ap"ple, n. [OE. appel, eppel, AS. aeppel, aepl; ...]
//!
//! 1. The fleshy pome or fruit of a rosaceous tree ...
//!
//! 2. Any tree genus Pyrus which has the stated fruit; ...
//! ```
//!
//! An uppercase line opens a headword, the next lines (up to a blank line) are
//! the variation, and everything after that is definitions separated by blank
//! lines.

use crate::core::types::{EntryTable, Headword};
use crate::error::Result;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

#[derive(Default)]
struct EntryParser {
    table: EntryTable,
    word: Headword,
    variation: String,
    definitions: Vec<String>,
    variation_solid: bool,
}

// Same rule as an "is upper" check: at least one cased letter, none lowercase.
fn is_headword_line(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}

fn starts_with_digit(text: &str) -> bool {
    text.chars().next().map_or(false, |c| c.is_ascii_digit())
}

impl EntryParser {
    fn feed(&mut self, raw: &str) {
        let line = raw.trim();
        if line.starts_with("*** ") {
            // Gutenberg header/footer marker
            return;
        }
        if line.is_empty() {
            if !self.word.is_empty() && !self.variation.is_empty() {
                if !self.variation_solid {
                    // variations may span several lines until the first blank one
                    self.variation_solid = true;
                } else if !self.definitions.is_empty() {
                    self.close_definition();
                }
            }
            return;
        }
        if is_headword_line(line) {
            self.flush();
            self.word = line.to_string();
            self.variation.clear();
            self.definitions.clear();
            self.variation_solid = false;
            return;
        }
        if self.word.is_empty() {
            return;
        }
        if self.variation.is_empty() {
            self.variation = line.to_string();
        } else if !self.variation_solid {
            self.variation.push(' ');
            self.variation.push_str(line);
        } else {
            if self.definitions.is_empty() {
                self.definitions.push(String::new());
            }
            if let Some(current) = self.definitions.last_mut() {
                current.push(' ');
                current.push_str(&line.replace("Defn: ", ""));
            }
        }
    }

    fn close_definition(&mut self) {
        let Some(last) = self.definitions.pop() else {
            return;
        };
        let last = last.trim().to_string();
        if last.is_empty() {
            self.definitions.push(last);
            return;
        }
        // Notes carry usage commentary rather than definitions.
        if !last.starts_with("Note: ") {
            match self.definitions.last_mut() {
                // "3. (Bot.)" on its own line: the real text is the next block.
                Some(prev) if starts_with_digit(prev) && prev.ends_with(')') => {
                    prev.push(' ');
                    prev.push_str(&last);
                }
                _ => self.definitions.push(last),
            }
        }
        self.definitions.push(String::new());
    }

    fn flush(&mut self) {
        if self.word.is_empty()
            || self.variation.is_empty()
            || self.definitions.is_empty()
            || !self.variation_solid
        {
            return;
        }
        let definitions: Vec<String> = self
            .definitions
            .iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        if definitions.is_empty() {
            return;
        }
        let entry = self.table.entry(self.word.clone()).or_default();
        entry.entry(self.variation.clone()).or_insert(definitions);
    }

    fn finish(mut self) -> EntryTable {
        self.flush();
        self.table
    }
}

/// Parses dictionary text from any reader. Invalid UTF-8 is replaced rather
/// than rejected.
pub fn parse_gutenberg<R: BufRead>(mut reader: R) -> Result<EntryTable> {
    let mut parser = EntryParser::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        parser.feed(&String::from_utf8_lossy(&buf));
    }
    Ok(parser.finish())
}

pub fn parse_gutenberg_file(path: &Path) -> Result<EntryTable> {
    info!(path = %path.display(), "updating dictionary from Gutenberg text");
    let file = File::open(path)?;
    let table = parse_gutenberg(BufReader::new(file))?;
    info!(headwords = table.len(), "parsed dictionary");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
*** START OF THIS PROJECT GUTENBERG EBOOK WEBSTER'S UNABRIDGED DICTIONARY ***

APPLE
Ap\"ple, n. [OE. appel, eppel,
AS. aeppel.]

1. The fleshy pome or fruit of a rosaceous tree
cultivated in numberless varieties.

Note: The apple is a pome.

2. (Bot.)

Any tree of the genus Pyrus.

APPLE
Ap\"ple, v. i.

Defn: To grow like an apple.

ORCHARD
Or\"chard, n.

Defn: An inclosure devoted to the culture of fruit trees.
*** END OF THIS PROJECT GUTENBERG EBOOK ***
";

    #[test]
    fn test_parses_entries_and_variations() {
        let table = parse_gutenberg(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);

        let apple = &table["APPLE"];
        assert_eq!(apple.len(), 2);
        let noun = &apple["Ap\"ple, n. [OE. appel, eppel, AS. aeppel.]"];
        assert_eq!(
            noun,
            &vec![
                "1. The fleshy pome or fruit of a rosaceous tree cultivated in numberless varieties."
                    .to_string(),
                "2. (Bot.) Any tree of the genus Pyrus.".to_string(),
            ]
        );
        assert_eq!(apple["Ap\"ple, v. i."], vec!["To grow like an apple.".to_string()]);
    }

    #[test]
    fn test_last_entry_is_flushed() {
        let table = parse_gutenberg(SAMPLE.as_bytes()).unwrap();
        assert_eq!(
            table["ORCHARD"]["Or\"chard, n."],
            vec!["An inclosure devoted to the culture of fruit trees.".to_string()]
        );
    }

    #[test]
    fn test_repeated_variation_keeps_first() {
        let text = "WORD\nWord, n.\n\nFirst.\n\nWORD\nWord, n.\n\nSecond.\n";
        let table = parse_gutenberg(text.as_bytes()).unwrap();
        assert_eq!(table["WORD"]["Word, n."], vec!["First.".to_string()]);
    }

    #[test]
    fn test_headword_without_definitions_is_dropped() {
        let table = parse_gutenberg("LONELY\nLone\"ly, a.\n\nOTHER\n".as_bytes()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_headword_line_detection() {
        assert!(is_headword_line("APPLE"));
        assert!(is_headword_line("ZOÖL"));
        assert!(is_headword_line("A 1"));
        assert!(!is_headword_line("Apple"));
        assert!(!is_headword_line("1. 2."));
    }
}
