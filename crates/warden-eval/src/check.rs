//! Sandbox boundary: whitelist check and fail-fast name resolution.
//!
//! Both passes run to completion *before* evaluation starts, so a forbidden
//! or unknown subtree can never cause a partial side effect.

use crate::ast::Expr;
use crate::error::EvalError;
use crate::symbols;

/// Display name of a node kind, used in `Forbidden` reports.
pub(crate) fn node_kind(expr: &Expr) -> &'static str {
    match expr {
        Expr::Int(_) | Expr::Float(_) => "literal",
        Expr::Name(_) => "name",
        Expr::Unary { .. } => "unary operator",
        Expr::Binary { .. } => "binary operator",
        Expr::Call { .. } => "call",
        Expr::Str(_) => "string literal",
        Expr::Attribute { .. } => "attribute access",
        Expr::Subscript { .. } => "subscript",
        Expr::Compare { .. } => "comparison",
        Expr::BoolOp { .. } | Expr::Not(_) => "boolean operator",
        Expr::List(_) => "list literal",
    }
}

/// Reject any node kind outside the fixed whitelist (literals, names,
/// unary/binary arithmetic, direct calls).
pub fn check_whitelist(expr: &Expr) -> Result<(), EvalError> {
    match expr {
        Expr::Int(_) | Expr::Float(_) | Expr::Name(_) => Ok(()),
        Expr::Unary { operand, .. } => check_whitelist(operand),
        Expr::Binary { left, right, .. } => {
            check_whitelist(left)?;
            check_whitelist(right)
        }
        Expr::Call { func, args } => {
            check_whitelist(func)?;
            for arg in args {
                check_whitelist(arg)?;
            }
            Ok(())
        }
        forbidden => Err(EvalError::Forbidden(node_kind(forbidden))),
    }
}

/// Resolve every bare name and call target against the symbol table.
/// The first unknown name fails the whole expression up front.
pub fn resolve_names(expr: &Expr) -> Result<(), EvalError> {
    match expr {
        Expr::Name(name) => {
            if symbols::lookup(name).is_none() {
                return Err(EvalError::UnknownName(name.clone()));
            }
            Ok(())
        }
        Expr::Int(_) | Expr::Float(_) | Expr::Str(_) => Ok(()),
        Expr::Unary { operand, .. } | Expr::Not(operand) => resolve_names(operand),
        Expr::Binary { left, right, .. }
        | Expr::Compare { left, right, .. }
        | Expr::BoolOp { left, right, .. } => {
            resolve_names(left)?;
            resolve_names(right)
        }
        Expr::Call { func, args } => {
            resolve_names(func)?;
            for arg in args {
                resolve_names(arg)?;
            }
            Ok(())
        }
        Expr::Attribute { value, .. } => resolve_names(value),
        Expr::Subscript { value, index } => {
            resolve_names(value)?;
            resolve_names(index)
        }
        Expr::List(items) => {
            for item in items {
                resolve_names(item)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn arithmetic_passes_the_whitelist() {
        let expr = parse("1 + sin(pi) * -2 ** 3 // 4").unwrap();
        assert!(check_whitelist(&expr).is_ok());
    }

    #[test]
    fn forbidden_kinds_are_named() {
        let cases = [
            ("'os'", "string literal"),
            ("x.y", "attribute access"),
            ("x[0]", "subscript"),
            ("1 < 2", "comparison"),
            ("1 and 2", "boolean operator"),
            ("not 1", "boolean operator"),
            ("[1]", "list literal"),
        ];
        for (src, kind) in cases {
            let expr = parse(src).unwrap();
            assert_eq!(check_whitelist(&expr), Err(EvalError::Forbidden(kind)));
        }
    }

    #[test]
    fn forbidden_is_found_inside_call_arguments() {
        let expr = parse("sqrt('4')").unwrap();
        assert_eq!(
            check_whitelist(&expr),
            Err(EvalError::Forbidden("string literal"))
        );
    }

    #[test]
    fn unknown_names_fail_before_evaluation() {
        let expr = parse("foo + 1/0").unwrap();
        assert_eq!(
            resolve_names(&expr),
            Err(EvalError::UnknownName("foo".into()))
        );
    }

    #[test]
    fn call_targets_are_resolved_too() {
        let expr = parse("__import__(1)").unwrap();
        assert_eq!(
            resolve_names(&expr),
            Err(EvalError::UnknownName("__import__".into()))
        );
    }
}
