//! Error types for parsing and evaluating guest programs.
//!
//! There is no transformation error. The rewrite driver matches every syntax node kind
//! exhaustively, so it is total over any tree the parser produces.
//!
//! Numeric anomalies are not errors either: NaN and infinities produced by division by
//! zero, `abs` at zero or domain errors in `log`/`asin` propagate through the dual number
//! as IEEE-754 special values.

use thiserror::Error;

/// Crate result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// The source text does not conform to the guest grammar.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("unrecognised input at offset {offset}")]
    InvalidToken { offset: usize },

    #[error("expected {expected} but found `{found}` at offset {offset}")]
    UnexpectedToken {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: String },

    /// The left side of an assignment, or the operand of `++`/`--`, is not a name or a
    /// member access.
    #[error("invalid assignment target at offset {offset}")]
    InvalidTarget { offset: usize },

    /// Parentheses, operators, statements or functions nest deeper than
    /// [MAX_NESTING](crate::syntax::MAX_NESTING).
    #[error("input nests too deeply at offset {offset}")]
    TooDeep { offset: usize },
}

/// A guest program raised while executing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("`{0}` is not defined")]
    ReferenceError(String),

    #[error("type error: {0}")]
    TypeError(String),

    /// An operator with no dual number rule was applied to a dual number. The evaluator
    /// refuses rather than produce a silently wrong derivative.
    #[error("operator `{operator}` is not supported on {operand} operands")]
    UnsupportedOperator {
        operator: &'static str,
        operand: &'static str,
    },

    #[error("`{callee}` expects {expected} argument(s) but got {found}")]
    Arity {
        callee: String,
        expected: usize,
        found: usize,
    },

    /// An in-place dual operation was given something other than a variable binding.
    #[error("`{0}` must be called with a variable as its first argument")]
    InvalidMutationTarget(String),

    #[error("`{0}` is not allowed here")]
    IllegalControlFlow(&'static str),

    #[error("maximum call depth of {depth} exceeded")]
    StackOverflow { depth: usize },

    #[error("expected a dual number result but got {found}")]
    NotDual { found: String },
}

/// Top level error, preserving the underlying cause as its `source`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn display() {
        let e = ParseError::UnexpectedToken {
            expected: "`)`".to_string(),
            found: "}".to_string(),
            offset: 7,
        };
        assert_eq!(e.to_string(), "expected `)` but found `}` at offset 7");
    }

    #[test]
    fn source_is_preserved() {
        let e: Error = EvaluationError::ReferenceError("y".to_string()).into();
        assert_eq!(e.to_string(), "evaluation error: `y` is not defined");
        let source = e.source().map(|s| s.to_string());
        assert_eq!(source, Some("`y` is not defined".to_string()));
    }
}
