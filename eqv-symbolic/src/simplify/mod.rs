//! Simplification of expressions.
//!
//! We define an expression to be simplified if it has reached the fixed point of the rule set
//! in [`rules`]: numeric folding, like-term / like-factor combination, power normalization, and
//! full distribution of products over sums. The result is an **expanded sum-of-products normal
//! form**: `(x + 1)^2` simplifies to `x^2 + 2x + 1`, and a difference of two semantically equal
//! polynomials simplifies to `0`.
//!
//! Each rule is a function that takes the expression to simplify as an argument, and returns
//! `Some(expr)` with the simplified expression if the rule applies, or `None` if the rule does
//! not apply. One pass applies at most one rule at every node of the tree, bottom-up; passes
//! repeat until the tree stops changing.

pub mod fraction;
pub mod rules;

use crate::expr::{Primary, SymExpr};

/// Upper bound on full-tree passes. The rule set has no pair of mutually inverse rules, so a
/// fixed point is normally reached within a handful of passes; the bound exists so that a
/// pathological input degrades to a partially simplified tree instead of spinning.
const MAX_PASSES: usize = 200;

/// Simplifies the given expression to the fixed point of the rule set.
pub fn simplify(expr: &SymExpr) -> SymExpr {
    let mut current = expr.clone();
    for _ in 0..MAX_PASSES {
        let next = simplify_pass(&current);
        if next == current {
            return next;
        }
        current = next;
    }
    current
}

/// Applies one bottom-up pass of the rule set: children are rewritten first, nested sums /
/// products are flattened, then the first applicable rule fires at each node.
fn simplify_pass(expr: &SymExpr) -> SymExpr {
    let expr = match expr {
        SymExpr::Primary(Primary::Call(name, args)) => SymExpr::Primary(Primary::Call(
            name.clone(),
            args.iter().map(simplify_pass).collect(),
        )),
        SymExpr::Primary(primary) => SymExpr::Primary(primary.clone()),
        SymExpr::Add(terms) => terms.iter()
            .map(simplify_pass)
            .fold(SymExpr::Add(Vec::new()), |acc, term| acc + term)
            .downgrade(),
        SymExpr::Mul(factors) => factors.iter()
            .map(simplify_pass)
            .fold(SymExpr::Mul(Vec::new()), |acc, factor| acc * factor)
            .downgrade(),
        SymExpr::Exp(base, exp) => SymExpr::Exp(
            Box::new(simplify_pass(base)),
            Box::new(simplify_pass(exp)),
        ),
    };

    rules::all(&expr).unwrap_or(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqv_parser::Parser;
    use pretty_assertions::assert_eq;

    fn simplified(source: &str) -> SymExpr {
        simplify(&SymExpr::from(Parser::new(source).parse_full().unwrap()))
    }

    #[test]
    fn combines_like_terms() {
        assert_eq!(simplified("x + x + x"), simplified("3x"));
    }

    #[test]
    fn folds_numbers() {
        assert_eq!(simplified("2 + 3 * 4"), SymExpr::Primary(Primary::Integer(crate::primitive::int(14))));
    }

    #[test]
    fn expands_binomial_squares() {
        assert_eq!(simplified("(x + 1)^2"), simplified("x^2 + 2x + 1"));
    }

    #[test]
    fn polynomial_difference_cancels_to_zero() {
        assert_eq!(simplified("(x + 1)^2 - (x^2 + 2x + 1)"), SymExpr::zero());
    }

    #[test]
    fn distributes_over_fractions() {
        // (x + y)/(x*y) and 1/x + 1/y normalize to the same partial-fraction form
        assert_eq!(simplified("(x + y)/(x y)"), simplified("1/x + 1/y"));
    }

    #[test]
    fn reduces_numerical_fractions() {
        assert_eq!(simplified("3/12"), simplified("1/4"));
        assert_eq!(simplified("12/3"), SymExpr::Primary(Primary::Integer(crate::primitive::int(4))));
    }

    #[test]
    fn half_plus_half_is_one() {
        assert_eq!(simplified("1/2 + 1/2"), SymExpr::one());
    }

    #[test]
    fn power_of_power_with_integer_outer_exponent() {
        assert_eq!(simplified("(x^3)^2"), simplified("x^6"));
    }

    #[test]
    fn sqrt_of_square_is_not_collapsed() {
        // (x^2)^(1/2) is abs(x), not x; the rewrite is the equivalence checker's job
        let expr = simplified("(x^2)^(1/2)");
        assert!(matches!(expr, SymExpr::Exp(..)), "{expr}");
    }

    #[test]
    fn pythagorean_identity() {
        assert_eq!(simplified("sin(x)^2 + cos(x)^2"), SymExpr::one());
        assert_eq!(simplified("3sin(x)^2 + 3cos(x)^2"), simplified("3"));
    }

    #[test]
    fn exact_square_roots_fold() {
        assert_eq!(simplified("4^(1/2)"), simplified("2"));
    }

    #[test]
    fn log_of_exp_unwraps() {
        assert_eq!(simplified("log(e^x)"), SymExpr::symbol("x"));
    }

    #[test]
    fn abs_of_even_power_drops_for_real_arguments() {
        use crate::expr::{Domain, Sym};
        let expr = SymExpr::from(Parser::new("abs(x)^2").parse_full().unwrap())
            .map_symbols(&|sym| Sym::with_domain(sym.name.clone(), Domain::Real));
        let x = SymExpr::Primary(Primary::Symbol(Sym::with_domain("x", Domain::Real)));
        assert_eq!(simplify(&expr), SymExpr::Exp(
            Box::new(x),
            Box::new(SymExpr::Primary(Primary::Integer(crate::primitive::int(2)))),
        ));
    }
}
