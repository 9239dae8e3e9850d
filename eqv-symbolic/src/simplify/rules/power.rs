//! Simplification rules for power expressions.

use crate::expr::{Primary, SymExpr};
use crate::primitive::int;
use crate::simplify::rules::do_power;
use rug::{ops::Pow, Integer};

/// Largest exponent magnitude that numeric power evaluation will compute.
const MAX_EVAL_EXPONENT: u32 = 4096;

/// `a^0 = 1`
pub fn zero_exponent(expr: &SymExpr) -> Option<SymExpr> {
    do_power(expr, |_, exp| {
        if exp.as_integer().map(|n| n.is_zero()).unwrap_or(false) {
            Some(SymExpr::one())
        } else {
            None
        }
    })
}

/// `a^1 = a`
pub fn one_exponent(expr: &SymExpr) -> Option<SymExpr> {
    do_power(expr, |base, exp| {
        if exp.as_integer().map(|n| n == &1).unwrap_or(false) {
            Some(base.clone())
        } else {
            None
        }
    })
}

/// `1^a = 1`
pub fn one_base(expr: &SymExpr) -> Option<SymExpr> {
    do_power(expr, |base, _| {
        if base.as_integer().map(|n| n == &1).unwrap_or(false) {
            Some(SymExpr::one())
        } else {
            None
        }
    })
}

/// `0^a = 0` for positive integer `a`. Zero and negative exponents are left for evaluation,
/// which reports them as non-finite.
pub fn zero_base(expr: &SymExpr) -> Option<SymExpr> {
    do_power(expr, |base, exp| {
        if !base.as_integer().map(|n| n.is_zero()).unwrap_or(false) {
            return None;
        }
        if exp.as_integer().map(|n| n > &0).unwrap_or(false) {
            Some(SymExpr::zero())
        } else {
            None
        }
    })
}

/// Evaluates integer powers of integers: `2^10 = 1024`, `2^-3 = 8^-1`.
///
/// The exponent `-1` is left alone: `d^-1` is the canonical fraction representation.
pub fn integer_power(expr: &SymExpr) -> Option<SymExpr> {
    do_power(expr, |base, exp| {
        let base = base.as_integer()?;
        let exp = exp.as_integer()?;

        if exp >= &2 {
            let exp = exp.to_u32()?;
            if exp > MAX_EVAL_EXPONENT {
                return None;
            }
            Some(SymExpr::Primary(Primary::Integer(Integer::from(base.pow(exp)))))
        } else if exp <= &-2 {
            let exp = exp.clone().abs().to_u32()?;
            if exp > MAX_EVAL_EXPONENT {
                return None;
            }
            Some(SymExpr::Exp(
                Box::new(SymExpr::Primary(Primary::Integer(Integer::from(base.pow(exp))))),
                Box::new(SymExpr::Primary(Primary::Integer(int(-1)))),
            ))
        } else {
            None
        }
    })
}

/// Evaluates powers where either side is a float and both sides are numeric: `2.0^3 = 8.0`.
pub fn float_power(expr: &SymExpr) -> Option<SymExpr> {
    do_power(expr, |base, exp| {
        if !base.is_float() && !exp.is_float() {
            return None;
        }
        let base = base.as_number()?;
        let exp = exp.as_number()?;
        let value = base.pow(exp);
        if value.is_finite() {
            Some(SymExpr::Primary(Primary::Float(value)))
        } else {
            None
        }
    })
}

/// Evaluates exact rational roots of non-negative integers: `4^(1/2) = 2`, `8^(2/3) = 4`.
/// Inexact roots (`2^(1/2)`) are left symbolic.
pub fn exact_rational_root(expr: &SymExpr) -> Option<SymExpr> {
    do_power(expr, |base, exp| {
        let base = base.as_integer()?;
        if base < &0 {
            return None;
        }

        let value = exp.as_rational()?;
        if value.is_integer() {
            return None;
        }
        let (numer, denom) = value.into_numer_denom();
        let denom = denom.to_u32().filter(|d| *d <= 4)?;

        let root = base.clone().root(denom);
        if Integer::from((&root).pow(denom)) != *base {
            return None;
        }

        let numer_mag = numer.clone().abs().to_u32().filter(|n| *n <= MAX_EVAL_EXPONENT)?;
        let power = Integer::from((&root).pow(numer_mag));
        if numer > 0 {
            Some(SymExpr::Primary(Primary::Integer(power)))
        } else {
            Some(SymExpr::Exp(
                Box::new(SymExpr::Primary(Primary::Integer(power))),
                Box::new(SymExpr::Primary(Primary::Integer(int(-1)))),
            ))
        }
    })
}

/// `(a^b)^c = a^(b*c)` for integer `c`.
///
/// Restricting the outer exponent to integers keeps this sound for any base: `(x^2)^(1/2)` is
/// `abs(x)`, not `x`, and must not be collapsed here.
pub fn power_of_power(expr: &SymExpr) -> Option<SymExpr> {
    do_power(expr, |base, exp| {
        let SymExpr::Exp(inner_base, inner_exp) = base else { return None };
        exp.as_integer()?;

        Some(SymExpr::Exp(
            inner_base.clone(),
            Box::new((**inner_exp).clone() * exp.clone()),
        ))
    })
}

/// Applies all power rules.
pub fn all(expr: &SymExpr) -> Option<SymExpr> {
    zero_exponent(expr)
        .or_else(|| one_exponent(expr))
        .or_else(|| one_base(expr))
        .or_else(|| zero_base(expr))
        .or_else(|| integer_power(expr))
        .or_else(|| float_power(expr))
        .or_else(|| exact_rational_root(expr))
        .or_else(|| power_of_power(expr))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp(base: i32, power: i32) -> SymExpr {
        SymExpr::Exp(
            Box::new(SymExpr::Primary(Primary::Integer(int(base)))),
            Box::new(SymExpr::Primary(Primary::Integer(int(power)))),
        )
    }

    #[test]
    fn integer_powers_evaluate() {
        assert_eq!(integer_power(&exp(2, 10)), Some(SymExpr::Primary(Primary::Integer(int(1024)))));
    }

    #[test]
    fn negative_powers_become_reciprocals() {
        assert_eq!(integer_power(&exp(2, -3)), Some(exp(8, -1)));
    }

    #[test]
    fn reciprocal_is_canonical() {
        // `d^-1` is the fraction representation and must stay untouched
        assert_eq!(integer_power(&exp(2, -1)), None);
    }
}
