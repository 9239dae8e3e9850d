//! Simplification rules for expressions involving addition, including combining like terms.

use crate::expr::{Primary, SymExpr};
use crate::simplify::{fraction::extract_fractional, rules::do_add};

/// Extension of the `+=` implementation for [`SymExpr`] that adds exact rational and float
/// values in place instead of wrapping them in an [`SymExpr::Add`].
fn add_values(lhs: &mut SymExpr, rhs: SymExpr) {
    if let (Some(a), Some(b)) = (lhs.as_rational(), rhs.as_rational()) {
        *lhs = SymExpr::from_rational(a + b);
        return;
    }

    if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
        *lhs = SymExpr::Primary(Primary::Float(a + b));
        return;
    }

    *lhs += rhs;
}

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero(expr: &SymExpr) -> Option<SymExpr> {
    do_add(expr, |terms| {
        let new_terms = terms.iter()
            .filter(|term| {
                // keep all non-zero terms
                term.as_integer()
                    .map(|n| !n.is_zero())
                    .unwrap_or(true)
            })
            .cloned()
            .collect::<Vec<_>>();

        if new_terms.len() == terms.len() {
            None
        } else {
            Some(SymExpr::Add(new_terms).downgrade())
        }
    })
}

/// Combines like terms.
///
/// `a+a = 2a`
/// `a+a+a = 3a`
/// `2a+3a = 5a`
/// etc.
pub fn combine_like_terms(expr: &SymExpr) -> Option<SymExpr> {
    do_add(expr, |terms| {
        let mut new_terms = terms.to_vec();
        let mut current_term_idx = 0;

        /// Utility function to extract the numeric coefficient and factors of an expression. If
        /// the expression is not [`SymExpr::Mul`], the coefficient is 1.
        ///
        /// - `5` -> `(5, 1)`
        /// - `3*a` -> `(3, a)`
        /// - `1/4*a*b` -> `(1/4, a*b)`
        /// - `a` -> `(1, a)`
        fn get_coeff(expr: &SymExpr) -> (SymExpr, SymExpr) {
            match expr {
                SymExpr::Primary(Primary::Integer(_)) | SymExpr::Primary(Primary::Float(_)) => {
                    (expr.clone(), SymExpr::one())
                },
                SymExpr::Mul(factors) => {
                    let mut factors = factors.clone();
                    let fraction = extract_fractional(&mut factors)
                        .unwrap_or_else(SymExpr::one);

                    (fraction, SymExpr::Mul(factors).downgrade())
                },
                SymExpr::Exp(..) => {
                    if expr.is_integer_recip() {
                        (expr.clone(), SymExpr::one())
                    } else {
                        (SymExpr::one(), expr.clone())
                    }
                },
                _ => (SymExpr::one(), expr.clone()),
            }
        }

        // this is O(n^2) worst case, due to scanning the whole vec for each term
        while current_term_idx < new_terms.len() {
            let (mut current_term_coeff, current_term_factors) = get_coeff(&new_terms[current_term_idx]);

            // look at every term after `current_term`
            let mut next_term_idx = current_term_idx + 1;
            while next_term_idx < new_terms.len() {
                let (next_term_coeff, next_term_factors) = get_coeff(&new_terms[next_term_idx]);

                // factors must be strictly equal
                if current_term_factors == next_term_factors {
                    // if so, apply a*n + a*m = (n+m)*a
                    add_values(&mut current_term_coeff, next_term_coeff);
                    new_terms.swap_remove(next_term_idx);
                } else {
                    next_term_idx += 1;
                }
            }

            if current_term_coeff.as_integer().map(|n| n == &1).unwrap_or(false) {
                new_terms[current_term_idx] = current_term_factors;
            } else {
                new_terms[current_term_idx] =
                    current_term_coeff * current_term_factors;
            }

            current_term_idx += 1;
        }

        if new_terms.len() == terms.len() {
            None
        } else {
            Some(SymExpr::Add(new_terms).downgrade())
        }
    })
}

/// Applies all addition rules.
///
/// All addition rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr) -> Option<SymExpr> {
    add_zero(expr)
        .or_else(|| combine_like_terms(expr))
}
