//! Sandboxed arithmetic expression evaluator for Warden.
//!
//! Evaluates a restricted arithmetic expression from untrusted free text.
//! The pipeline is strict — each stage must pass before the next runs:
//!
//! 1. **Preprocess** — literal text substitutions for calculator notation
//!    (`^` → power, `tg(`/`ctg(` → tangent forms, `ln(` → natural log).
//! 2. **Parse** — a single expression, or [`EvalError::Syntax`].
//! 3. **Whitelist** — every node must be a literal, name, unary/binary
//!    arithmetic operator, or direct call; anything else is
//!    [`EvalError::Forbidden`] before any evaluation happens.
//! 4. **Name resolution** — every name must be in the fixed symbol table,
//!    checked up front, or [`EvalError::UnknownName`].
//! 5. **Evaluate** — arithmetic failures surface as
//!    [`EvalError::Evaluation`]; nothing panics on user input.
//!
//! The symbol table is closed and immutable for the process lifetime; the
//! grammar has no loops, so evaluation cost is linear in input size.
//!
//! Known sharp edge: the preprocess substitutions are plain find/replace
//! over the raw text, not token-aware, so they also rewrite identifiers that
//! happen to contain `^`, `tg(`, `ctg(`, or `ln(` as substrings.

mod ast;
mod check;
mod error;
mod eval;
mod parser;
mod symbols;
mod token;
mod value;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use error::EvalError;
pub use symbols::{Func, Symbol, lookup};
pub use value::{Number, format_sig};

/// Ordered preprocess substitutions. `ctg(` must precede `tg(` — these are
/// literal replaces, and the `tg(` pass would otherwise consume the tail of
/// every `ctg(`.
const PREPROCESS_REPLACES: [(&str, &str); 4] = [
    ("^", "**"),
    ("ctg(", "1/tan("),
    ("tg(", "tan("),
    ("ln(", "log("),
];

/// Apply the calculator-notation substitutions.
pub fn preprocess(raw: &str) -> String {
    let mut text = raw.to_string();
    for (from, to) in PREPROCESS_REPLACES {
        text = text.replace(from, to);
    }
    text
}

/// Evaluate `raw` through the full pipeline. Returns the exact numeric
/// result; display rounding is the caller's concern (see
/// [`Number::display`]).
pub fn evaluate(raw: &str) -> Result<Number, EvalError> {
    let text = preprocess(raw);
    let expr = parser::parse(&text)?;
    check::check_whitelist(&expr)?;
    check::resolve_names(&expr)?;
    eval::eval(&expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(src: &str) -> Number {
        evaluate(src).unwrap()
    }

    #[test]
    fn caret_is_exponentiation() {
        assert_eq!(ok("2^10"), Number::Int(1024));
    }

    #[test]
    fn tangent_shorthands() {
        assert_eq!(ok("tg(0)"), Number::Float(0.0));
        let Number::Float(v) = ok("ctg(1)") else {
            panic!("ctg(1) should be a float");
        };
        assert!((v - 1.0 / 1.0_f64.tan()).abs() < 1e-12);
    }

    #[test]
    fn natural_log_shorthand() {
        let Number::Float(v) = ok("ln(e)") else {
            panic!("ln(e) should be a float");
        };
        assert!((v - 1.0).abs() < 1e-12);
    }

    #[test]
    fn plain_arithmetic() {
        assert_eq!(ok("2 + 3 * 4"), Number::Int(14));
        assert_eq!(ok("(2 + 3) * 4"), Number::Int(20));
        assert_eq!(ok("7 // 2"), Number::Int(3));
        assert_eq!(ok("7 % 3"), Number::Int(1));
        assert_eq!(ok("1 << 10"), Number::Int(1024));
        assert_eq!(ok("5 & 3"), Number::Int(1));
        assert_eq!(ok("5 | 2"), Number::Int(7));
        assert_eq!(ok("-2**2"), Number::Int(-4));
        assert_eq!(ok("2**-1"), Number::Float(0.5));
    }

    #[test]
    fn division_by_zero_is_an_evaluation_error() {
        assert!(matches!(evaluate("1/0"), Err(EvalError::Evaluation(_))));
        assert!(matches!(evaluate("ctg(0)"), Err(EvalError::Evaluation(_))));
    }

    #[test]
    fn injection_attempts_are_forbidden_not_executed() {
        assert!(matches!(
            evaluate("__import__('os')"),
            Err(EvalError::Forbidden(_))
        ));
        assert!(matches!(
            evaluate("().__class__"),
            Err(EvalError::Forbidden(_)) | Err(EvalError::Syntax(_))
        ));
        assert!(matches!(
            evaluate("[1][0]"),
            Err(EvalError::Forbidden(_))
        ));
    }

    #[test]
    fn unknown_names_fail_fast() {
        assert!(matches!(
            evaluate("open(1)"),
            Err(EvalError::UnknownName(name)) if name == "open"
        ));
        // fails on the name before the division could ever run
        assert!(matches!(
            evaluate("nope + 1/0"),
            Err(EvalError::UnknownName(_))
        ));
    }

    #[test]
    fn syntax_errors_are_reported() {
        assert!(matches!(evaluate("2 +"), Err(EvalError::Syntax(_))));
        assert!(matches!(evaluate(""), Err(EvalError::Syntax(_))));
    }

    #[test]
    fn caret_rewrite_makes_xor_unreachable() {
        // `^` always becomes `**` before parsing; `3^2` is 9, not 1
        assert_eq!(ok("3^2"), Number::Int(9));
    }

    #[test]
    fn preprocess_is_not_token_aware() {
        // the documented sharp edge: substitutions hit identifier substrings
        assert_eq!(preprocess("ctg(x)"), "1/tan(x)");
        assert_eq!(preprocess("ln(10)"), "log(10)");
        assert_eq!(preprocess("tangent("), "tangent(");
        // an identifier merely containing `tg(` gets rewritten too
        assert_eq!(preprocess("xtg(1)"), "xtan(1)");
    }

    #[test]
    fn exact_result_with_display_rounding() {
        let v = ok("0.1 + 0.2");
        assert_eq!(v, Number::Float(0.1 + 0.2)); // exact, unrounded
        assert_eq!(v.display(), "0.3"); // display rounds
    }
}
