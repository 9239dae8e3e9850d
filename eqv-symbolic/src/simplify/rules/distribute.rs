//! Simplification rules related to the distributive property.

use crate::expr::SymExpr;
use crate::simplify::rules::{do_multiply, do_power};

/// Largest integer power of a sum that is expanded into a product.
const MAX_EXPANSION: u32 = 32;

/// `a*(b+c) = a*b + a*c`
pub fn distributive_property(expr: &SymExpr) -> Option<SymExpr> {
    do_multiply(expr, |factors| {
        // find the first `SymExpr::Add`, and distribute every other factor over it
        let mut factors_to_distribute = factors.to_vec();
        let add_factor_terms = {
            let idx = factors_to_distribute.iter()
                .position(|factor| matches!(factor, SymExpr::Add(_)));
            if let Some(idx) = idx {
                if let SymExpr::Add(terms) = factors_to_distribute.swap_remove(idx) {
                    terms
                } else {
                    unreachable!()
                }
            } else {
                return None;
            }
        };

        if factors_to_distribute.is_empty() {
            return None;
        }

        let new_terms = add_factor_terms.into_iter()
            .map(|term| {
                SymExpr::Mul(factors_to_distribute.clone()) * term
            })
            .collect::<Vec<_>>();
        Some(SymExpr::Add(new_terms))
    })
}

/// `(a*b)^c = a^c * b^c` for integer `c`.
pub fn distribute_power(expr: &SymExpr) -> Option<SymExpr> {
    do_power(expr, |base, exp| {
        exp.as_integer()?;
        if let SymExpr::Mul(factors) = base {
            let new_factors = factors.iter()
                .map(|factor| SymExpr::Exp(
                    Box::new(factor.clone()),
                    Box::new(exp.clone()),
                ))
                .collect::<Vec<_>>();

            return Some(SymExpr::Mul(new_factors));
        }

        None
    })
}

/// `(a+b)^n` with a small positive integer `n` becomes a product of `n` copies of the sum, so
/// that [`distributive_property`] can expand it.
pub fn expand_integer_power(expr: &SymExpr) -> Option<SymExpr> {
    do_power(expr, |base, exp| {
        if !matches!(base, SymExpr::Add(_)) {
            return None;
        }

        let n = exp.as_integer()?.to_u32().filter(|n| (2..=MAX_EXPANSION).contains(n))?;
        Some(SymExpr::Mul(vec![base.clone(); n as usize]))
    })
}

/// Applies all distribution rules.
///
/// The distributive property may or may not reduce the complexity of the expression, since it
/// can introduce additional operations. However, it may be necessary for future rules to apply.
pub fn all(expr: &SymExpr) -> Option<SymExpr> {
    distributive_property(expr)
        .or_else(|| distribute_power(expr))
        .or_else(|| expand_integer_power(expr))
}
