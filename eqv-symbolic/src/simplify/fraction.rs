//! Tools to help manipulate fractions.

use crate::expr::{Primary, SymExpr};
use crate::primitive::int;
use rug::Integer;

/// Create a [`SymExpr`] representing a fraction with the given numerator and denominator.
///
/// The representation is a [`SymExpr::Mul`] containing two factors. The first factor is the
/// numerator, and the second factor is the denominator raised to the power of -1.
pub fn make_fraction(numerator: SymExpr, denominator: SymExpr) -> SymExpr {
    numerator *
        SymExpr::Exp(
            Box::new(denominator),
            Box::new(SymExpr::Primary(Primary::Integer(int(-1)))),
        )
}

/// Extracts a numerical fraction from the factors of a [`SymExpr::Mul`].
///
/// Fractions are represented as a [`SymExpr::Mul`] containing a [`Primary::Integer`], and a
/// [`SymExpr::Exp`], where the base is a [`Primary::Integer`] and the exponent is `-1`.
///
/// This function finds two integer factors that match this pattern, removes them, and returns
/// the numerator and denominator. This is a very specific definition of a fraction; this
/// function **will not** return the fraction 1/1 if it does not find any of those patterns,
/// unless the `numerator_optional` and / or `denominator_optional` arguments are set to `true`.
pub(crate) fn extract_integer_fraction(
    factors: &mut Vec<SymExpr>,
    numerator_optional: bool,
    denominator_optional: bool,
) -> Option<(Integer, Integer)> {
    let mut idx = 0;
    let mut numerator = None;
    let mut denominator = None;
    while idx < factors.len() {
        if numerator.is_none() && factors[idx].is_integer() {
            numerator = Some(factors.swap_remove(idx).into_integer().unwrap());
            continue;
        }

        if denominator.is_none() && factors[idx].is_integer_recip() {
            denominator = Some(factors.swap_remove(idx).into_integer_recip().unwrap());
            continue;
        }

        if numerator.is_some() && denominator.is_some() {
            break;
        }

        idx += 1;
    }

    match (numerator, denominator) {
        (Some(numerator), Some(denominator)) => Some((numerator, denominator)),
        (Some(numerator), None) if denominator_optional => Some((numerator, int(1))),
        (None, Some(denominator)) if numerator_optional => Some((int(1), denominator)),
        (None, None) if numerator_optional && denominator_optional => Some((int(1), int(1))),
        _ => None,
    }
}

/// Extracts an expression from the factors of a [`SymExpr::Mul`] that represents a fraction.
/// This is like [`extract_integer_fraction`], but the result of the function is a [`SymExpr`],
/// and not the extracted numerator and denominator.
///
/// Accordingly, this function also extracts [`Primary::Float`]s, simply returning them as-is.
pub(crate) fn extract_fractional(factors: &mut Vec<SymExpr>) -> Option<SymExpr> {
    let mut idx = 0;
    let mut numerator_idx = None;
    let mut denominator_idx = None;
    while idx < factors.len() {
        if factors[idx].is_float() {
            return Some(factors.swap_remove(idx));
        }

        if numerator_idx.is_none() && factors[idx].is_integer() {
            numerator_idx = Some(idx);
            idx += 1;
            continue;
        }

        if denominator_idx.is_none() && factors[idx].is_integer_recip() {
            denominator_idx = Some(idx);
            idx += 1;
            continue;
        }

        if numerator_idx.is_some() && denominator_idx.is_some() {
            break;
        }

        idx += 1;
    }

    match (numerator_idx, denominator_idx) {
        (Some(numerator_idx), Some(denominator_idx)) => {
            // remove the larger index first, so that the smaller index is still valid
            if numerator_idx > denominator_idx {
                Some(factors.swap_remove(numerator_idx)
                    * factors.swap_remove(denominator_idx))
            } else {
                Some(factors.swap_remove(denominator_idx)
                    * factors.swap_remove(numerator_idx))
            }
        },
        (Some(numerator_idx), None) => Some(factors.swap_remove(numerator_idx)),
        (None, Some(denominator_idx)) => Some(factors.swap_remove(denominator_idx)),
        (None, None) => None,
    }
}

/// Builds the product of the given denominators, dropping factors of 1.
fn denominator_product<I: Iterator<Item = SymExpr>>(parts: I) -> SymExpr {
    let parts = parts
        .filter(|part| !part.as_integer().map(|n| n == &1).unwrap_or(false))
        .collect::<Vec<_>>();
    SymExpr::Mul(parts).downgrade()
}

/// Returns the structural denominator of the expression: the product, over all terms and
/// factors, of the bases of negative powers. The result is only used to detect sample points
/// where the expression is singular; it is never substituted back into a tree.
pub fn denominator(expr: &SymExpr) -> SymExpr {
    match expr {
        SymExpr::Add(terms) => denominator_product(terms.iter().map(denominator)),
        SymExpr::Mul(factors) => denominator_product(factors.iter().map(denominator)),
        SymExpr::Exp(base, exp) => match exp.as_rational() {
            Some(value) if value < 0 => {
                let positive = SymExpr::from_rational(-value);
                if positive.as_integer().map(|n| n == &1).unwrap_or(false) {
                    (**base).clone()
                } else {
                    SymExpr::Exp(base.clone(), Box::new(positive))
                }
            },
            _ => SymExpr::one(),
        },
        SymExpr::Primary(_) => SymExpr::one(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqv_parser::Parser;
    use pretty_assertions::assert_eq;

    fn convert(source: &str) -> SymExpr {
        SymExpr::from(Parser::new(source).parse_full().unwrap())
    }

    #[test]
    fn denominator_of_simple_fraction() {
        assert_eq!(denominator(&convert("1/(x - 1)")), convert("x - 1"));
    }

    #[test]
    fn denominator_of_sum_is_the_product() {
        let denom = denominator(&convert("1/x + 1/y"));
        assert_eq!(denom, SymExpr::Mul(vec![convert("x"), convert("y")]));
    }

    #[test]
    fn denominator_of_polynomial_is_one() {
        assert_eq!(denominator(&convert("x^2 + 1")), SymExpr::one());
    }
}
