//! Logarithm expansion and recombination passes.
//!
//! These are standalone rewrite passes rather than fixed-point simplification rules: expansion
//! and recombination are mutual inverses, so running them inside the rule loop would never
//! converge. The equivalence pipeline runs expansion followed by recombination, which leaves
//! every logarithm expression in one canonical combined form.
//!
//! Both passes are *forced*: they assume arguments are positive, the same way the checker
//! assumes real variables. This is a heuristic canonicalization, not a proof step.

use crate::expr::{Primary, SymExpr};
use crate::simplify::fraction::make_fraction;
use rug::Rational;

fn log_call(arg: SymExpr) -> SymExpr {
    SymExpr::Primary(Primary::Call("log".to_string(), vec![arg]))
}

/// Expands logarithms of products and powers: `log(a*b) = log(a) + log(b)`,
/// `log(a^b) = b*log(a)`.
pub fn expand_log(expr: &SymExpr) -> SymExpr {
    let expr = expr.map_children(expand_log);

    if let Some(("log", [arg])) = expr.as_call() {
        match arg {
            SymExpr::Mul(factors) => {
                let logs = SymExpr::Add(factors.iter().map(|factor| log_call(factor.clone())).collect());
                return expand_log(&logs);
            },
            SymExpr::Exp(base, exp) => {
                let log_base = log_call((**base).clone());
                return (**exp).clone() * expand_log(&log_base);
            },
            _ => {},
        }
    }

    expr
}

/// Recombines sums of rational-coefficient logarithms into a single logarithm:
/// `log(a) + 2*log(b) = log(a*b^2)`.
pub fn combine_log(expr: &SymExpr) -> SymExpr {
    let expr = expr.map_children(combine_log);
    let SymExpr::Add(terms) = &expr else { return expr };

    /// Recognizes `log(z)` or `c * log(z)` with an exact rational `c`.
    fn log_term(term: &SymExpr) -> Option<(Rational, SymExpr)> {
        if let Some(("log", [arg])) = term.as_call() {
            return Some((Rational::from(1), arg.clone()));
        }

        let SymExpr::Mul(factors) = term else { return None };
        let mut coeff = Rational::from(1);
        let mut arg = None;
        for factor in factors {
            if let Some(r) = factor.as_rational() {
                coeff *= r;
                continue;
            }
            match (factor.as_call(), &arg) {
                (Some(("log", [inner])), None) => arg = Some(inner.clone()),
                _ => return None,
            }
        }
        arg.map(|arg| (coeff, arg))
    }

    let mut logs = Vec::new();
    let mut rest = Vec::new();
    for term in terms {
        match log_term(term) {
            Some(log) => logs.push(log),
            None => rest.push(term.clone()),
        }
    }

    if logs.len() < 2 {
        return expr;
    }

    let product = logs.into_iter()
        .map(|(coeff, arg)| {
            if coeff == 1 {
                arg
            } else if coeff == -1 {
                make_fraction(SymExpr::one(), arg)
            } else {
                SymExpr::Exp(Box::new(arg), Box::new(SymExpr::from_rational(coeff)))
            }
        })
        .fold(SymExpr::Mul(Vec::new()), |acc, factor| acc * factor)
        .downgrade();

    rest.push(log_call(product));
    SymExpr::Add(rest).downgrade()
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

    fn canonical(source: &str) -> SymExpr {
        simplify(&combine_log(&expand_log(&simplify(&convert(source)))))
    }

    #[test]
    fn log_of_product_round_trips() {
        assert_eq!(canonical("log(x y)"), canonical("log(x) + log(y)"));
    }

    #[test]
    fn log_of_power_round_trips() {
        assert_eq!(canonical("log(x^2)"), canonical("2 log(x)"));
    }

    #[test]
    fn expansion_distributes_over_products() {
        let expanded = expand_log(&convert("log(x y)"));
        assert_eq!(expanded, SymExpr::Add(vec![
            log_call(SymExpr::symbol("x")),
            log_call(SymExpr::symbol("y")),
        ]));
    }
}
