//! Outbound signals for the presentation layer to render.

use warden_eval::{EvalError, Number};

/// Everything the core reports back to the excluded presentation layer.
/// Reason strings are surfaced to the user verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// A privileged operation was refused.
    PermissionDenied { reason: String },
    /// A delegation attempt failed one of the five conditions.
    DelegationRejected { reason: String },
    /// A compute request succeeded; `value` is exact, unrounded.
    EvalOk { value: Number },
    /// A compute request failed. `error.kind()` and the `Display` text give
    /// the (kind, detail) pair.
    EvalFailed { error: EvalError },
    /// A counting-channel message matched the expected number.
    CounterSuccess,
    /// A counting-channel message was a number, but the wrong one.
    CounterMismatch { expected_previous: i64 },
}
