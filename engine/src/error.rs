use std::path::PathBuf;
use thiserror::Error;

/// Fatal initialization failures. Per-document problems during a build are
/// not errors; they are skipped and reported by the consistency pass.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A required corpus directory is absent. No fallback.
    #[error("corpus directory not found: {}", .0.display())]
    MissingCorpus(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Malformed boolean query. Returned to the caller; the index is untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("unbalanced parentheses in query")]
    UnbalancedParens,

    #[error("operator {0} is missing an operand")]
    MissingOperand(&'static str),

    #[error("query expression is empty")]
    EmptyExpression,

    #[error("query has operands without a connecting operator")]
    MissingOperator,
}
