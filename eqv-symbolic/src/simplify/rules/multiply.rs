//! Simplification rules for expressions involving multiplication, including combining like
//! factors.

use crate::expr::{Primary, SymExpr};
use crate::primitive::float;
use crate::simplify::rules::do_multiply;
use rug::Rational;

/// `0*a = 0`
/// `a*0 = 0`
pub fn multiply_zero(expr: &SymExpr) -> Option<SymExpr> {
    do_multiply(expr, |factors| {
        if factors.iter().any(|factor| factor.as_integer().map(|n| n.is_zero()).unwrap_or(false)) {
            Some(SymExpr::zero())
        } else {
            None
        }
    })
}

/// `1*a = a`
/// `a*1 = a`
pub fn multiply_one(expr: &SymExpr) -> Option<SymExpr> {
    do_multiply(expr, |factors| {
        let new_factors = factors.iter()
            .filter(|factor| {
                // keep all non-one factors
                factor.as_integer()
                    .map(|n| n != &1)
                    .unwrap_or(true)
            })
            .cloned()
            .collect::<Vec<_>>();

        if new_factors.len() == factors.len() {
            None
        } else {
            Some(SymExpr::Mul(new_factors).downgrade())
        }
    })
}

/// Folds all exact rational factors (integers, integer reciprocals) into one canonical value.
///
/// `2*3*a = 6*a`
/// `3*a*12^-1 = 1/4*a`
pub fn combine_rational_factors(expr: &SymExpr) -> Option<SymExpr> {
    do_multiply(expr, |factors| {
        let rational_count = factors.iter().filter(|f| f.as_rational().is_some()).count();
        if rational_count < 2 {
            return None;
        }

        let mut value = Rational::from(1);
        let mut new_factors = Vec::with_capacity(factors.len());
        for factor in factors {
            match factor.as_rational() {
                Some(r) => value *= r,
                None => new_factors.push(factor.clone()),
            }
        }

        // splice the canonical value back in: a non-integer value is itself a two-factor
        // product `n * d^-1`
        let mut folded = Vec::new();
        match SymExpr::from_rational(value) {
            SymExpr::Mul(parts) => folded.extend(parts),
            part => folded.push(part),
        }
        folded.extend(new_factors);

        let result = SymExpr::Mul(folded).downgrade();
        if &result == expr {
            None
        } else {
            Some(result)
        }
    })
}

/// Folds float factors together with any other numeric factors.
///
/// `0.5*2 = 1.0`
pub fn multiply_floats(expr: &SymExpr) -> Option<SymExpr> {
    do_multiply(expr, |factors| {
        let float_count = factors.iter().filter(|f| f.is_float()).count();
        let numeric_count = factors.iter().filter(|f| f.as_number().is_some()).count();
        if float_count == 0 || numeric_count < 2 {
            return None;
        }

        let mut value = float(1);
        let mut new_factors = Vec::with_capacity(factors.len());
        for factor in factors {
            match factor.as_number() {
                Some(f) => value *= f,
                None => new_factors.push(factor.clone()),
            }
        }

        new_factors.insert(0, SymExpr::Primary(Primary::Float(value)));
        Some(SymExpr::Mul(new_factors).downgrade())
    })
}

/// Combines like factors.
///
/// `a*a = a^2`
/// `a^b*a^c = a^(b+c)`
/// etc.
///
/// Sums are skipped as bases: products of sums belong to the distribution rules, and combining
/// them into a power here would undo that work.
pub fn combine_like_factors(expr: &SymExpr) -> Option<SymExpr> {
    do_multiply(expr, |factors| {
        let mut new_factors = factors.to_vec();
        let mut current_factor_idx = 0;

        /// Utility function to extract the base and exponent of an expression. If the
        /// expression is not [`SymExpr::Exp`], the exponent is `1`.
        ///
        /// - `a^b` -> `(a, b)`
        /// - `a` -> `(a, 1)`
        fn get_exp(expr: &SymExpr) -> (SymExpr, SymExpr) {
            match expr {
                SymExpr::Exp(lhs, rhs) => ((**lhs).clone(), (**rhs).clone()),
                expr => (expr.clone(), SymExpr::one()),
            }
        }

        while current_factor_idx < new_factors.len() {
            let (current_base, mut current_exp) = get_exp(&new_factors[current_factor_idx]);

            // exact rational factors (including the canonical `d^-1` fraction halves) are folded
            // by the numeric rules; sums are left for the distribution rules
            if new_factors[current_factor_idx].as_rational().is_some()
                || matches!(current_base, SymExpr::Add(_))
            {
                current_factor_idx += 1;
                continue;
            }

            let mut merged = false;
            let mut next_factor_idx = current_factor_idx + 1;
            while next_factor_idx < new_factors.len() {
                if new_factors[next_factor_idx].as_rational().is_some() {
                    next_factor_idx += 1;
                    continue;
                }

                let (next_base, next_exp) = get_exp(&new_factors[next_factor_idx]);
                if current_base == next_base {
                    current_exp = current_exp + next_exp;
                    new_factors.swap_remove(next_factor_idx);
                    merged = true;
                } else {
                    next_factor_idx += 1;
                }
            }

            if merged {
                new_factors[current_factor_idx] = SymExpr::Exp(
                    Box::new(current_base),
                    Box::new(current_exp),
                );
            }

            current_factor_idx += 1;
        }

        if new_factors.len() == factors.len() {
            None
        } else {
            Some(SymExpr::Mul(new_factors).downgrade())
        }
    })
}

/// Applies all multiplication rules.
pub fn all(expr: &SymExpr) -> Option<SymExpr> {
    multiply_zero(expr)
        .or_else(|| multiply_one(expr))
        .or_else(|| combine_rational_factors(expr))
        .or_else(|| multiply_floats(expr))
        .or_else(|| combine_like_factors(expr))
}
