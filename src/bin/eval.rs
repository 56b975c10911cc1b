// File: src/bin/eval.rs
//! Scores automatic-mode noun predicates against WordNet hypernyms.

use anyhow::{Context, Result};
use clap::Parser;
use predicate_core::config::{
    Thresholds, CACHE_VERSION, DEFAULT_CACHE_DIR, DEFAULT_DICTIONARY_PATH, DEFAULT_WORDNET_DIR,
};
use predicate_core::core::morphology::EnglishMorphology;
use predicate_core::evaluation::{evaluate, HypernymIndex};
use predicate_core::loader::DictionaryLoader;
use predicate_core::persistence::{DiskCache, NoCache, TableCache};
use predicate_core::Finder;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "predicate_eval")]
#[command(about = "Measure predicate precision and coverage against WordNet", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(long, default_value = DEFAULT_DICTIONARY_PATH, env = "PREDICATE_DICTIONARY")]
    dictionary: PathBuf,

    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    cache_dir: PathBuf,

    #[arg(long)]
    no_cache: bool,

    /// WordNet `dbfiles` directory holding the noun.* lexicographer files
    #[arg(long, default_value = DEFAULT_WORDNET_DIR)]
    wordnet_dir: PathBuf,

    /// Only evaluate the first N subjects
    #[arg(long)]
    limit: Option<usize>,

    #[arg(long)]
    thresholds: Option<PathBuf>,
}

fn run_with<C: TableCache>(cache: C, cli: &Cli, thresholds: Thresholds) -> Result<()> {
    let index = HypernymIndex::load(&cli.wordnet_dir, &cache, CACHE_VERSION)
        .context("loading WordNet hypernyms")?;
    info!(subjects = index.len(), "WordNet index ready");

    let dictionary = DictionaryLoader::new(cache)
        .load(&cli.dictionary, &EnglishMorphology)
        .with_context(|| format!("loading dictionary from {}", cli.dictionary.display()))?;
    let finder = Finder::with_thresholds(Arc::new(dictionary), thresholds);

    let report = evaluate(&finder, &index, cli.limit);
    println!("evaluated words: {}", report.counted);
    println!("precision: {:.4}", report.precision());
    println!("coverage: {:.4}", report.coverage());
    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let thresholds = match &cli.thresholds {
        Some(path) => Thresholds::from_json_file(path)?,
        None => Thresholds::default(),
    };

    if cli.no_cache {
        run_with(NoCache, &cli, thresholds)
    } else {
        run_with(DiskCache::new(&cli.cache_dir), &cli, thresholds)
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("FATAL {:#}", e);
        std::process::exit(1);
    }
}
