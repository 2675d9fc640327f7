//! Path rules - extract metadata from file paths with a template.
//!
//! A template describes the shape of a path. Placeholders in braces capture
//! values, `{_}` matches a span and discards it, and any other text must
//! appear literally in the path:
//!
//! ```text
//! {_}/hoge{num1}/fuga{name}piyo_{month}.csv
//! ```
//!
//! Compiling a template produces a [`PathRule`] which can then be matched
//! against any number of concrete paths.
//!
//! # Quick Start
//!
//! ```rust
//! use pathmeta_rule::PathRule;
//!
//! let rule = PathRule::compile("{_}/hoge{num1}/fuga{name}piyo_{month}.csv", "csv").unwrap();
//! let meta = rule.match_path("Origin/hoge1/fugasuzukipiyo_03.csv").unwrap();
//!
//! assert_eq!(meta["num1"], "1");
//! assert_eq!(meta["name"], "suzuki");
//! assert_eq!(meta["month"], "03");
//! ```
//!
//! # Values containing splitters
//!
//! Every ASCII punctuation character outside braces acts as a splitter. By
//! default a splitter always ends the current value, so a value such as
//! `2022_03_02` cannot be captured by `{timestamp}` in `piyo_{timestamp}`.
//! Refining the rule with a fully bracketed example tells the matcher how many
//! splitters each value may contain:
//!
//! ```rust
//! use pathmeta_rule::PathRule;
//!
//! let rule = PathRule::compile("{_}/hoge{num1}/fuga{name}piyo_{timestamp}.csv", "csv").unwrap();
//! let path = "Origin/hoge1/fugasuzukipiyo_2022_03_02.csv";
//! assert!(!rule.is_matchable(path));
//!
//! let rule = rule
//!     .refined("{Origin}/hoge{1}/fuga{suzuki}piyo_{2022_03_02}.csv")
//!     .unwrap();
//! assert_eq!(rule.match_path(path).unwrap()["timestamp"], "2022_03_02");
//! ```

mod error;
mod matcher;
mod rule;
mod template;

pub use error::{CompileError, PathNotParsableError, Result};
pub use matcher::PathMetadata;
pub use rule::{ParsingKey, PathRule, DEFAULT_SEPARATOR};
pub use template::{is_splitter_char, IGNORE_MARKER, UNUSED_MARKER};
