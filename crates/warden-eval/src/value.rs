//! Numeric values and their arithmetic.
//!
//! Integers and floats are kept distinct: int-with-int arithmetic stays
//! exact (checked, overflow is an evaluation error, never a wrap), anything
//! touching a float becomes a float. True division always produces a float;
//! floor-division and modulo floor toward negative infinity.

use crate::error::EvalError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

fn overflow() -> EvalError {
    EvalError::Evaluation("integer overflow".into())
}

fn div_by_zero() -> EvalError {
    EvalError::Evaluation("division by zero".into())
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    pub fn add(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                a.checked_add(b).map(Number::Int).ok_or_else(overflow)
            }
            (a, b) => Ok(Number::Float(a.as_f64() + b.as_f64())),
        }
    }

    pub fn sub(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                a.checked_sub(b).map(Number::Int).ok_or_else(overflow)
            }
            (a, b) => Ok(Number::Float(a.as_f64() - b.as_f64())),
        }
    }

    pub fn mul(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                a.checked_mul(b).map(Number::Int).ok_or_else(overflow)
            }
            (a, b) => Ok(Number::Float(a.as_f64() * b.as_f64())),
        }
    }

    /// True division. Always a float, even for two ints.
    pub fn div(self, rhs: Number) -> Result<Number, EvalError> {
        let d = rhs.as_f64();
        if d == 0.0 {
            return Err(div_by_zero());
        }
        Ok(Number::Float(self.as_f64() / d))
    }

    /// Floor division, flooring toward negative infinity.
    pub fn floor_div(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                if b == 0 {
                    return Err(div_by_zero());
                }
                let q = a.checked_div(b).ok_or_else(overflow)?;
                let r = a.checked_rem(b).ok_or_else(overflow)?;
                if r != 0 && ((r < 0) != (b < 0)) {
                    q.checked_sub(1).map(Number::Int).ok_or_else(overflow)
                } else {
                    Ok(Number::Int(q))
                }
            }
            (a, b) => {
                let d = b.as_f64();
                if d == 0.0 {
                    return Err(div_by_zero());
                }
                Ok(Number::Float((a.as_f64() / d).floor()))
            }
        }
    }

    /// Modulo with the divisor's sign, matching floor division.
    pub fn rem(self, rhs: Number) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                if b == 0 {
                    return Err(EvalError::Evaluation("modulo by zero".into()));
                }
                let r = a.checked_rem(b).ok_or_else(overflow)?;
                if r != 0 && ((r < 0) != (b < 0)) {
                    Ok(Number::Int(r + b))
                } else {
                    Ok(Number::Int(r))
                }
            }
            (a, b) => {
                let d = b.as_f64();
                if d == 0.0 {
                    return Err(EvalError::Evaluation("modulo by zero".into()));
                }
                let r = a.as_f64() % d;
                if r != 0.0 && ((r < 0.0) != (d < 0.0)) {
                    Ok(Number::Float(r + d))
                } else {
                    Ok(Number::Float(r))
                }
            }
        }
    }

    /// Exponentiation. Int base with a non-negative int exponent stays an
    /// int; a negative int exponent produces a float (`2**-1` is `0.5`).
    pub fn pow(self, rhs: Number) -> Result<Number, EvalError> {
        if let (Number::Int(a), Number::Int(b)) = (self, rhs) {
            if b >= 0 {
                let exp = u32::try_from(b).map_err(|_| overflow())?;
                return a.checked_pow(exp).map(Number::Int).ok_or_else(overflow);
            }
            if a == 0 {
                return Err(EvalError::Evaluation("zero to a negative power".into()));
            }
            return Ok(Number::Float((a as f64).powf(b as f64)));
        }

        let base = self.as_f64();
        let exp = rhs.as_f64();
        if base == 0.0 && exp < 0.0 {
            return Err(EvalError::Evaluation("zero to a negative power".into()));
        }
        let value = base.powf(exp);
        if value.is_nan() && !base.is_nan() && !exp.is_nan() {
            // negative base with a fractional exponent
            return Err(EvalError::Evaluation("math domain error".into()));
        }
        Ok(Number::Float(value))
    }

    pub fn shl(self, rhs: Number) -> Result<Number, EvalError> {
        let (a, b) = self.int_pair(rhs, "shift")?;
        if b < 0 {
            return Err(EvalError::Evaluation("negative shift count".into()));
        }
        if a == 0 {
            return Ok(Number::Int(0));
        }
        if b > 63 {
            return Err(overflow());
        }
        let wide = (a as i128) << b;
        i64::try_from(wide).map(Number::Int).map_err(|_| overflow())
    }

    pub fn shr(self, rhs: Number) -> Result<Number, EvalError> {
        let (a, b) = self.int_pair(rhs, "shift")?;
        if b < 0 {
            return Err(EvalError::Evaluation("negative shift count".into()));
        }
        // arithmetic shift; everything past 63 bits is all sign
        Ok(Number::Int(a >> b.min(63)))
    }

    pub fn bit_and(self, rhs: Number) -> Result<Number, EvalError> {
        let (a, b) = self.int_pair(rhs, "bitwise")?;
        Ok(Number::Int(a & b))
    }

    pub fn bit_or(self, rhs: Number) -> Result<Number, EvalError> {
        let (a, b) = self.int_pair(rhs, "bitwise")?;
        Ok(Number::Int(a | b))
    }

    pub fn bit_xor(self, rhs: Number) -> Result<Number, EvalError> {
        let (a, b) = self.int_pair(rhs, "bitwise")?;
        Ok(Number::Int(a ^ b))
    }

    pub fn neg(self) -> Result<Number, EvalError> {
        match self {
            Number::Int(v) => v.checked_neg().map(Number::Int).ok_or_else(overflow),
            Number::Float(v) => Ok(Number::Float(-v)),
        }
    }

    fn int_pair(self, rhs: Number, op: &str) -> Result<(i64, i64), EvalError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => Ok((a, b)),
            _ => Err(EvalError::Evaluation(format!(
                "{op} operands must be integers"
            ))),
        }
    }

    /// Presentation formatting: ints exactly, floats with 12 significant
    /// digits. The numeric value itself is never rounded — this is only for
    /// display.
    pub fn display(self) -> String {
        match self {
            Number::Int(v) => v.to_string(),
            Number::Float(v) => format_sig(v, 12),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Format `value` with `sig` significant digits, `%g`-style: positional
/// where it fits, scientific otherwise, trailing zeros trimmed.
pub fn format_sig(value: f64, sig: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sig = sig.max(1);
    // Round to `sig` digits first, then read the exponent off the result so
    // boundary values (9.99…e-1 → 1) land in the right branch.
    let sci = format!("{:.*e}", sig - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= sig as i32 {
        let mantissa = trim_zeros(mantissa);
        return format!("{}e{}{:02}", mantissa, if exp < 0 { '-' } else { '+' }, exp.abs());
    }

    let decimals = (sig as i32 - 1 - exp).max(0) as usize;
    trim_zeros(&format!("{value:.decimals$}"))
}

fn trim_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_arithmetic_stays_int() {
        assert_eq!(
            Number::Int(2).add(Number::Int(3)).unwrap(),
            Number::Int(5)
        );
        assert_eq!(
            Number::Int(2).pow(Number::Int(10)).unwrap(),
            Number::Int(1024)
        );
    }

    #[test]
    fn float_contaminates() {
        assert_eq!(
            Number::Int(2).add(Number::Float(0.5)).unwrap(),
            Number::Float(2.5)
        );
    }

    #[test]
    fn true_division_is_always_float() {
        assert_eq!(
            Number::Int(4).div(Number::Int(2)).unwrap(),
            Number::Float(2.0)
        );
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert!(Number::Int(1).div(Number::Int(0)).is_err());
        assert!(Number::Int(1).floor_div(Number::Int(0)).is_err());
        assert!(Number::Int(1).rem(Number::Int(0)).is_err());
        assert!(Number::Float(1.0).div(Number::Float(0.0)).is_err());
    }

    #[test]
    fn floor_division_floors_toward_negative_infinity() {
        assert_eq!(
            Number::Int(7).floor_div(Number::Int(2)).unwrap(),
            Number::Int(3)
        );
        assert_eq!(
            Number::Int(-7).floor_div(Number::Int(2)).unwrap(),
            Number::Int(-4)
        );
        assert_eq!(
            Number::Int(-7).floor_div(Number::Int(-2)).unwrap(),
            Number::Int(3)
        );
    }

    #[test]
    fn modulo_takes_the_divisor_sign() {
        assert_eq!(Number::Int(7).rem(Number::Int(3)).unwrap(), Number::Int(1));
        assert_eq!(Number::Int(-7).rem(Number::Int(3)).unwrap(), Number::Int(2));
        assert_eq!(
            Number::Int(7).rem(Number::Int(-3)).unwrap(),
            Number::Int(-2)
        );
    }

    #[test]
    fn negative_int_exponent_gives_a_float() {
        assert_eq!(
            Number::Int(2).pow(Number::Int(-1)).unwrap(),
            Number::Float(0.5)
        );
        assert!(Number::Int(0).pow(Number::Int(-1)).is_err());
    }

    #[test]
    fn fractional_power_of_negative_base_is_a_domain_error() {
        assert!(Number::Int(-8).pow(Number::Float(0.5)).is_err());
    }

    #[test]
    fn shifts_are_integer_only_and_bounded() {
        assert_eq!(
            Number::Int(1).shl(Number::Int(10)).unwrap(),
            Number::Int(1024)
        );
        assert_eq!(
            Number::Int(-16).shr(Number::Int(2)).unwrap(),
            Number::Int(-4)
        );
        assert!(Number::Int(1).shl(Number::Int(-1)).is_err());
        assert!(Number::Int(1).shl(Number::Int(64)).is_err());
        assert!(Number::Float(1.0).shl(Number::Int(1)).is_err());
        assert_eq!(
            Number::Int(-1).shr(Number::Int(1000)).unwrap(),
            Number::Int(-1)
        );
    }

    #[test]
    fn overflow_is_an_error_not_a_wrap() {
        assert!(Number::Int(i64::MAX).add(Number::Int(1)).is_err());
        assert!(Number::Int(i64::MIN).neg().is_err());
        assert!(Number::Int(i64::MIN).floor_div(Number::Int(-1)).is_err());
        assert!(Number::Int(2).pow(Number::Int(63)).is_err());
    }

    #[test]
    fn display_formats_ints_exactly_and_floats_to_12_digits() {
        assert_eq!(Number::Int(1024).display(), "1024");
        assert_eq!(Number::Float(2.0).display(), "2");
        assert_eq!(Number::Float(0.1 + 0.2).display(), "0.3");
        assert_eq!(Number::Float(1.0e20).display(), "1e+20");
        assert_eq!(Number::Float(0.5).display(), "0.5");
        assert_eq!(Number::Float(-1.5e-7).display(), "-1.5e-07");
    }

    #[test]
    fn format_sig_boundary_rounding() {
        // rounds up across the positional/scientific boundary
        assert_eq!(format_sig(0.999_999_999_999_9, 12), "1");
        assert_eq!(format_sig(3.141592653589793, 12), "3.14159265359");
    }
}
