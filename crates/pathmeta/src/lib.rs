//! pathmeta - tag files with metadata inferred from their paths.
//!
//! This crate ties the two engines together:
//!
//! - [`pathmeta_rule`] compiles a path template into a [`PathRule`] that
//!   extracts key/value metadata from paths
//! - [`pathmeta_seeker`] filters, sorts and combines the resulting records
//!   in a [`ResultSet`]
//!
//! On top of them it adds rule configuration files ([`RuleConfig`]), batch
//! tagging of path lists and directory trees ([`tag_paths`], [`scan_dir`]),
//! loading of records returned by a store ([`load_records`]), export to
//! JSON, YAML and CSV, and labelled [`Dataset`]s with a stratified
//! train/test split.
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use pathmeta::{tag_paths, PathRule};
//!
//! let rule = PathRule::compile("{_}/{disease}/{_}-{patient-id}-{part}-{iteration}", "wav")?;
//! let report = tag_paths(
//!     &rule,
//!     ["Origin/cyst/1-055-E-a01.wav", "Origin/cyst/1-056-F-a01.wav"],
//!     &BTreeMap::new(),
//! );
//!
//! let set = report.into_result_set("voice");
//! let part_e = set.apply_predicates(&["part == E"])?;
//! assert_eq!(part_e.paths(), vec!["Origin/cyst/1-055-E-a01.wav"]);
//! # Ok::<(), pathmeta::Error>(())
//! ```
//!
//! # Logging
//!
//! Tagging and scanning emit [`tracing`] events: `debug` per tagged path,
//! `warn` per path the rule cannot parse and `info` summaries. No subscriber
//! is installed; the rule and query engines themselves never log.

mod config;
mod dataset;
mod error;
mod export;
mod records;
mod tagging;

pub use config::RuleConfig;
pub use dataset::{Dataset, Split, DEFAULT_SEED, DEFAULT_TEST_RATE};
pub use error::{Error, Result};
pub use export::{export_file, to_csv, to_json, to_yaml};
pub use records::{load_records, load_records_file};
pub use tagging::{scan_dir, tag_path, tag_paths, TaggingReport};

pub use pathmeta_rule::{
    CompileError, ParsingKey, PathMetadata, PathNotParsableError, PathRule, DEFAULT_SEPARATOR,
};
pub use pathmeta_seeker::{
    natural_cmp, Dir, FileEntry, MetadataRecord, Op, Operand, OrderBy, Predicate, QueryError,
    ResultSet, FILE_PATH_KEY,
};
