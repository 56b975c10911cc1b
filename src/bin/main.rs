// File: src/bin/main.rs
//! Interactive predicate lookup.
//!
//! Type a word to see its predicates. `.` switches between automatic mode
//! (every definition) and manual mode (pick one definition by number). An
//! empty line quits.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use predicate_core::config::{Thresholds, DEFAULT_CACHE_DIR, DEFAULT_DICTIONARY_PATH};
use predicate_core::core::finder::{DefinitionSelector, Finder, Lookup, PredicateSet, VariationListing};
use predicate_core::core::morphology::EnglishMorphology;
use predicate_core::loader::DictionaryLoader;
use predicate_core::persistence::{DiskCache, NoCache, TableCache};
use predicate_core::Dictionary;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "predicate_shell")]
#[command(about = "Find the words a dictionary headword is defined by", long_about = None)]
#[command(version)]
struct Cli {
    /// Gutenberg Webster's dictionary text
    #[arg(long, default_value = DEFAULT_DICTIONARY_PATH, env = "PREDICATE_DICTIONARY")]
    dictionary: PathBuf,

    /// Directory for the derived table caches
    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    cache_dir: PathBuf,

    /// Rebuild every table in memory and write nothing
    #[arg(long)]
    no_cache: bool,

    /// Start in automatic mode (score every definition)
    #[arg(short, long)]
    auto_definition: bool,

    /// JSON file overriding the scoring thresholds
    #[arg(long)]
    thresholds: Option<PathBuf>,
}

fn load_with<C: TableCache>(cache: C, source: &Path) -> predicate_core::Result<Dictionary> {
    DictionaryLoader::new(cache).load(source, &EnglishMorphology)
}

struct Shell {
    finder: Finder,
    automatic: bool,
    last_word: Option<String>,
}

impl Shell {
    fn mode_name(&self) -> &'static str {
        if self.automatic { "automatic" } else { "manual" }
    }

    fn handle(&mut self, input: &str) {
        if input == "." {
            self.automatic = !self.automatic;
            println!("definition mode: {}", self.mode_name().bold());
            return;
        }
        if let Ok(number) = input.parse::<usize>() {
            self.select(number);
            return;
        }
        let word = input.strip_prefix("lookup ").unwrap_or(input).trim();
        self.lookup(word);
    }

    fn lookup(&mut self, word: &str) {
        let selector = if self.automatic {
            DefinitionSelector::All
        } else {
            DefinitionSelector::Enumerate
        };
        debug!(word, mode = self.mode_name(), "lookup");
        let headword = self.finder.dictionary().normalize(word);
        let Some(lookup) = self.finder.find(word, selector) else {
            println!("{} is not in the dictionary", headword.as_str().bold());
            return;
        };
        self.last_word = Some(headword.clone());
        match lookup {
            Lookup::Predicates(set) => print_predicates(&headword, &set),
            Lookup::Definitions(listing) => {
                print_listing(&headword, &listing);
                println!("select a definition number:");
            }
        }
    }

    fn select(&mut self, number: usize) {
        let Some(headword) = self.last_word.clone() else {
            println!("look a word up first");
            return;
        };
        match self.finder.find(&headword, DefinitionSelector::Selected(number)) {
            Some(Lookup::Predicates(set)) if !set.is_empty() => {
                if let Some(definition) = set.selected_definition() {
                    println!("<Selected definition {}. {}>", definition.number, definition.text);
                }
                print_predicates(&headword, &set);
            }
            Some(_) => println!("{} has no definition {}", headword.as_str().bold(), number),
            None => println!("{} is not in the dictionary", headword.as_str().bold()),
        }
    }
}

fn print_predicates(headword: &str, set: &PredicateSet) {
    for group in set.groups() {
        println!("[ {} {} ]", headword.bold(), group.pos.label());
        for predicate in &group.predicates {
            match predicate.shared {
                Some(shared) => println!(
                    "  · {} {} ({})",
                    predicate.word.as_str().green(),
                    predicate.weight,
                    shared
                ),
                None => println!("  · {} {}", predicate.word.as_str().green(), predicate.weight),
            }
        }
    }
}

fn print_listing(headword: &str, listing: &[VariationListing]) {
    println!("{}", headword.bold());
    for variation in listing {
        println!("  {}", variation.variation.as_str().italic());
        for definition in &variation.definitions {
            println!("    {}. {}", definition.number.to_string().cyan(), definition.text);
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let thresholds = match &cli.thresholds {
        Some(path) => Thresholds::from_json_file(path)?,
        None => Thresholds::default(),
    };

    let dictionary = if cli.no_cache {
        load_with(NoCache, &cli.dictionary)
    } else {
        load_with(DiskCache::new(&cli.cache_dir), &cli.dictionary)
    }
    .with_context(|| format!("loading dictionary from {}", cli.dictionary.display()))?;

    let mut shell = Shell {
        finder: Finder::with_thresholds(Arc::new(dictionary), thresholds),
        automatic: cli.auto_definition,
        last_word: None,
    };

    println!(
        "Dictionary predicates ({} mode). '.' toggles the mode, an empty line quits.",
        shell.mode_name()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        stdout.flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let input = line?;
        let input = input.trim();
        if input.is_empty() {
            break;
        }
        shell.handle(input);
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "FATAL".red().bold(), e);
        std::process::exit(1);
    }
}
