pub mod dictionary;
pub mod finder;
pub mod frequency;
pub mod inflection;
pub mod ingest;
pub mod morphology;
pub mod pos;
pub mod types;
