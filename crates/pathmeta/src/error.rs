//! Error type for the facade crate.

use std::io;

use pathmeta_rule::{CompileError, PathNotParsableError};
use pathmeta_seeker::QueryError;
use thiserror::Error;

/// Errors raised by configuration loading, tagging, record loading and
/// export.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    NotParsable(#[from] PathNotParsableError),

    #[error(transparent)]
    Query(#[from] QueryError),

    /// The rule has no placeholder that produces a value.
    #[error("rule '{template}' has no named placeholder")]
    InvalidRule { template: String },

    /// The first file of a scan does not fit the rule.
    #[error("rule '{template}' does not match '{path}'; add an example to the rule config")]
    RuleMismatch { template: String, path: String },

    /// A file in the result set lacks the dataset's target key.
    #[error("file '{path}' has no value for target key '{key}'")]
    MissingLabel { path: String, key: String },

    #[error("test rate must be between 0 and 1 (exclusive), got {0}")]
    InvalidSplit(f64),

    #[error("unsupported file format '{0}' (expected yaml, yml, json or csv)")]
    UnsupportedFormat(String),

    #[error("invalid record data: {0}")]
    InvalidRecords(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
