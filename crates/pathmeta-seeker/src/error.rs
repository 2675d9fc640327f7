//! Error types for the seeker crate.

use thiserror::Error;

/// Errors raised while parsing query predicates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The predicate does not follow `<key> <operator> <value>`.
    #[error("invalid predicate '{predicate}': {reason}")]
    Syntax { predicate: String, reason: String },

    /// The operand is not allowed for the operator.
    #[error("invalid operand '{operand}' in predicate '{predicate}'")]
    InvalidOperand { predicate: String, operand: String },
}

impl QueryError {
    pub(crate) fn syntax(predicate: &str, reason: impl Into<String>) -> Self {
        QueryError::Syntax {
            predicate: predicate.to_string(),
            reason: reason.into(),
        }
    }

    /// The predicate text that was rejected.
    pub fn predicate(&self) -> &str {
        match self {
            QueryError::Syntax { predicate, .. } | QueryError::InvalidOperand { predicate, .. } => {
                predicate
            }
        }
    }
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, QueryError>;
