//! Evaluation of deferred operations: finite sums and products.

use crate::expr::{Primary, SymExpr};
use crate::primitive::int;
use std::collections::HashMap;

/// Largest number of iterations a sum or product is expanded over.
const MAX_ITERATIONS: i64 = 1000;

/// Expands finite `sum` / `prod` calls (body, bound variable, lower bound, upper bound) whose
/// bounds are integers. Anything else — symbolic bounds, a non-symbol bound variable — is left
/// untouched; evaluation later reports such trees as unevaluated.
pub fn eval_deferred(expr: &SymExpr) -> SymExpr {
    let expr = expr.map_children(eval_deferred);

    let Some((name, args)) = expr.as_call() else { return expr };
    if !matches!(name, "sum" | "prod") {
        return expr;
    }
    let [body, var, lo, hi] = args else { return expr };
    let Some(var) = var.as_symbol() else { return expr };
    let (Some(lo), Some(hi)) = (lo.as_integer(), hi.as_integer()) else { return expr };
    let (Some(lo), Some(hi)) = (lo.to_i64(), hi.to_i64()) else { return expr };

    if hi.saturating_sub(lo) > MAX_ITERATIONS {
        return expr;
    }

    let terms = (lo..=hi)
        .map(|k| {
            let binding = HashMap::from([(
                var.name.clone(),
                SymExpr::Primary(Primary::Integer(int(k))),
            )]);
            body.substitute(&binding)
        })
        .collect::<Vec<_>>();

    // an empty range is the empty sum / product
    match name {
        "sum" => SymExpr::Add(terms).downgrade(),
        _ => SymExpr::Mul(terms).downgrade(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplify::simplify;
    use eqv_parser::Parser;
    use pretty_assertions::assert_eq;

    fn convert(source: &str) -> SymExpr {
        SymExpr::from(Parser::new(source).parse_full().unwrap())
    }

    #[test]
    fn finite_sum_expands() {
        // 1 + 4 + 9 = 14
        let expanded = eval_deferred(&convert("sum(k^2, k, 1, 3)"));
        assert_eq!(simplify(&expanded), convert("14"));
    }

    #[test]
    fn finite_product_expands() {
        let expanded = eval_deferred(&convert("prod(k, k, 1, 4)"));
        assert_eq!(simplify(&expanded), convert("24"));
    }

    #[test]
    fn symbolic_bounds_are_left_alone() {
        let expr = convert("sum(k, k, 1, n)");
        assert_eq!(eval_deferred(&expr), expr);
    }
}
