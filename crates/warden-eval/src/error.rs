//! Evaluator error taxonomy.
//!
//! Every failure in preprocessing, parsing, checking, or evaluation lands in
//! one of these four variants; nothing in the evaluator panics on user input.

use thiserror::Error;

/// Why an expression failed to evaluate. All variants are expected,
/// caller-facing, and non-fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The text is not a single well-formed expression.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// The expression parsed, but contains a construct outside the sandbox
    /// whitelist. Reported before any evaluation happens.
    #[error("expression construct not allowed: {0}")]
    Forbidden(&'static str),

    /// A name that is not in the fixed symbol table. Reported before any
    /// evaluation happens.
    #[error("unknown name: {0}")]
    UnknownName(String),

    /// Arithmetic failure: division by zero, domain error, arity mismatch,
    /// integer overflow.
    #[error("evaluation error: {0}")]
    Evaluation(String),
}

impl EvalError {
    /// Stable machine-readable kind tag for the outbound signal layer.
    pub fn kind(&self) -> &'static str {
        match self {
            EvalError::Syntax(_) => "syntax",
            EvalError::Forbidden(_) => "forbidden",
            EvalError::UnknownName(_) => "unknown-name",
            EvalError::Evaluation(_) => "evaluation",
        }
    }
}
