//! Tree-walking evaluation.
//!
//! Runs only after the whitelist and name-resolution passes, so every node
//! is an allowed kind and every name resolves. Cost is linear in AST size —
//! the grammar has no loops or recursion-introducing constructs.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::check::node_kind;
use crate::error::EvalError;
use crate::symbols::{self, Func, Symbol};
use crate::value::Number;

pub fn eval(expr: &Expr) -> Result<Number, EvalError> {
    match expr {
        Expr::Int(v) => Ok(Number::Int(*v)),
        Expr::Float(v) => Ok(Number::Float(*v)),

        Expr::Name(name) => match symbols::lookup(name) {
            Some(Symbol::Constant(v)) => Ok(Number::Float(v)),
            Some(Symbol::Func(f)) => Err(EvalError::Evaluation(format!(
                "'{}' is a function, not a value",
                f.name()
            ))),
            None => Err(EvalError::UnknownName(name.clone())),
        },

        Expr::Unary { op, operand } => {
            let value = eval(operand)?;
            match op {
                UnaryOp::Neg => value.neg(),
                UnaryOp::Pos => Ok(value),
            }
        }

        Expr::Binary { op, left, right } => {
            let l = eval(left)?;
            let r = eval(right)?;
            match op {
                BinaryOp::Add => l.add(r),
                BinaryOp::Sub => l.sub(r),
                BinaryOp::Mul => l.mul(r),
                BinaryOp::Div => l.div(r),
                BinaryOp::FloorDiv => l.floor_div(r),
                BinaryOp::Mod => l.rem(r),
                BinaryOp::Pow => l.pow(r),
                BinaryOp::Shl => l.shl(r),
                BinaryOp::Shr => l.shr(r),
                BinaryOp::BitAnd => l.bit_and(r),
                BinaryOp::BitOr => l.bit_or(r),
                BinaryOp::BitXor => l.bit_xor(r),
            }
        }

        Expr::Call { func, args } => {
            let Expr::Name(name) = func.as_ref() else {
                return Err(EvalError::Evaluation(
                    "call target must be a plain name".into(),
                ));
            };
            let f = match symbols::lookup(name) {
                Some(Symbol::Func(f)) => f,
                Some(Symbol::Constant(_)) => {
                    return Err(EvalError::Evaluation(format!("'{name}' is not callable")));
                }
                None => return Err(EvalError::UnknownName(name.clone())),
            };
            if args.len() != f.arity() {
                return Err(EvalError::Evaluation(format!(
                    "{}() takes {} argument(s), got {}",
                    f.name(),
                    f.arity(),
                    args.len()
                )));
            }
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval(arg)?);
            }
            call(f, &values)
        }

        // Unreachable after the whitelist pass; kept as an error, not a panic.
        other => Err(EvalError::Forbidden(node_kind(other))),
    }
}

fn domain_error() -> EvalError {
    EvalError::Evaluation("math domain error".into())
}

fn range_error() -> EvalError {
    EvalError::Evaluation("math range error".into())
}

/// Convert a float result back to an integer, erroring when it does not fit.
fn to_int(value: f64) -> Result<Number, EvalError> {
    if value.is_nan() || value < i64::MIN as f64 || value > i64::MAX as f64 {
        return Err(EvalError::Evaluation(
            "result does not fit in an integer".into(),
        ));
    }
    Ok(Number::Int(value as i64))
}

fn call(f: Func, args: &[Number]) -> Result<Number, EvalError> {
    let x = || args[0].as_f64();
    match f {
        Func::Sin => Ok(Number::Float(x().sin())),
        Func::Cos => Ok(Number::Float(x().cos())),
        Func::Tan => Ok(Number::Float(x().tan())),
        Func::Atan => Ok(Number::Float(x().atan())),
        Func::Tanh => Ok(Number::Float(x().tanh())),

        Func::Asin => {
            let v = x();
            if !(-1.0..=1.0).contains(&v) {
                return Err(domain_error());
            }
            Ok(Number::Float(v.asin()))
        }
        Func::Acos => {
            let v = x();
            if !(-1.0..=1.0).contains(&v) {
                return Err(domain_error());
            }
            Ok(Number::Float(v.acos()))
        }

        Func::Sinh | Func::Cosh => {
            let v = x();
            let result = if f == Func::Sinh { v.sinh() } else { v.cosh() };
            if result.is_infinite() && v.is_finite() {
                return Err(range_error());
            }
            Ok(Number::Float(result))
        }

        Func::Sqrt => {
            let v = x();
            if v < 0.0 {
                return Err(domain_error());
            }
            Ok(Number::Float(v.sqrt()))
        }
        Func::Log => {
            let v = x();
            if v <= 0.0 {
                return Err(domain_error());
            }
            Ok(Number::Float(v.ln()))
        }
        Func::Log10 => {
            let v = x();
            if v <= 0.0 {
                return Err(domain_error());
            }
            Ok(Number::Float(v.log10()))
        }
        Func::Log2 => {
            let v = x();
            if v <= 0.0 {
                return Err(domain_error());
            }
            Ok(Number::Float(v.log2()))
        }

        Func::Abs => match args[0] {
            Number::Int(v) => v
                .checked_abs()
                .map(Number::Int)
                .ok_or_else(|| EvalError::Evaluation("integer overflow".into())),
            Number::Float(v) => Ok(Number::Float(v.abs())),
        },

        Func::Floor => match args[0] {
            Number::Int(v) => Ok(Number::Int(v)),
            Number::Float(v) => to_int(v.floor()),
        },
        Func::Ceil => match args[0] {
            Number::Int(v) => Ok(Number::Int(v)),
            Number::Float(v) => to_int(v.ceil()),
        },
        Func::Round => match args[0] {
            Number::Int(v) => Ok(Number::Int(v)),
            // ties round to even
            Number::Float(v) => to_int(v.round_ties_even()),
        },

        Func::Factorial => match args[0] {
            Number::Int(n) => {
                if n < 0 {
                    return Err(EvalError::Evaluation(
                        "factorial() not defined for negative values".into(),
                    ));
                }
                let mut acc: i64 = 1;
                for k in 2..=n {
                    acc = acc
                        .checked_mul(k)
                        .ok_or_else(|| EvalError::Evaluation("integer overflow".into()))?;
                }
                Ok(Number::Int(acc))
            }
            Number::Float(_) => Err(EvalError::Evaluation(
                "factorial() only accepts integers".into(),
            )),
        },

        Func::Pow => args[0].pow(args[1]),
    }
}
