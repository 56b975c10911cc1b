// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod evaluation;
pub mod loader;
pub mod persistence;

pub use crate::config::Thresholds;
pub use crate::core::dictionary::Dictionary;
pub use crate::core::finder::{DefinitionSelector, Finder, Lookup, PredicateSet};
pub use crate::error::{PredicateError, Result};
