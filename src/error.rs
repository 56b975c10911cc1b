//! Error types for the predicate discovery engine.
//!
//! Lookup misses are not errors: an absent headword is `None`. The variants
//! here cover programmer errors (`Precondition`) and the I/O around caches and
//! configuration files.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredicateError {
    /// A table the operation depends on is empty or could not be derived.
    /// Callers are expected to abort on this.
    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid threshold or path configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl PredicateError {
    pub fn precondition(message: impl Into<String>) -> Self {
        PredicateError::Precondition(message.into())
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, PredicateError::Precondition(_))
    }
}

pub type Result<T> = std::result::Result<T, PredicateError>;
