//! Error types for the rule crate.

use thiserror::Error;

/// Errors raised while compiling or refining a path template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The template is empty or whitespace only.
    #[error("template is empty")]
    EmptyTemplate,

    /// A `{` without its `}` (or a stray `}`).
    #[error("unbalanced braces in template '{template}' at byte {position}")]
    UnbalancedBraces { template: String, position: usize },

    /// A `{}` span with nothing inside.
    #[error("empty placeholder in template '{template}' at byte {position}")]
    EmptyPlaceholder { template: String, position: usize },

    /// The disambiguation example does not have the same shape as the rule.
    #[error("example '{example}' has {found} segments, rule expects {expected}")]
    ExampleMismatch {
        example: String,
        expected: usize,
        found: usize,
    },
}

/// A path does not have the shape described by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("path '{path}' cannot be parsed: expected {expected} segments, found {found}")]
pub struct PathNotParsableError {
    /// The path as given to the matcher.
    pub path: String,
    /// Number of segments the rule expects.
    pub expected: usize,
    /// Number of segments the path was split into.
    pub found: usize,
}

/// Result type for template compilation.
pub type Result<T> = std::result::Result<T, CompileError>;
