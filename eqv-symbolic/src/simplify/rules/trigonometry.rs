//! Simplification rules for trigonometric functions.

use crate::expr::{Primary, SymExpr};
use crate::simplify::rules::{absolute::extract_negation, do_add};
use rug::{ops::RemRounding, Rational};
use std::ops::Neg;

/// If the argument is an exact rational multiple of `pi`, returns that multiple. The integer
/// zero also counts, as `0 * pi`.
fn as_pi_multiple(expr: &SymExpr) -> Option<Rational> {
    if let Some(sym) = expr.as_symbol() {
        return (sym.name == "pi").then(|| Rational::from(1));
    }

    if let Some(n) = expr.as_integer() {
        return n.is_zero().then(|| Rational::from(0));
    }

    if let SymExpr::Mul(factors) = expr {
        let mut coeff = Rational::from(1);
        let mut pi_count = 0usize;
        for factor in factors {
            if factor.as_symbol().map(|sym| sym.name == "pi").unwrap_or(false) {
                pi_count += 1;
                continue;
            }
            match factor.as_rational() {
                Some(r) => coeff *= r,
                None => return None,
            }
        }
        if pi_count == 1 {
            return Some(coeff);
        }
    }

    None
}

/// Looks up the exact value of `sin`, `cos` or `tan` at a rational multiple of `pi`. The
/// multiple is first reduced modulo a full turn; quarter-turn angles have exact values.
fn eval_at_pi_multiple(name: &str, turns: Rational) -> Option<SymExpr> {
    // reduce to [0, 2) turns of pi
    let (numer, denom) = turns.into_numer_denom();
    let modulus = rug::Integer::from(2) * &denom;
    let reduced = Rational::from((numer.rem_euc(modulus), denom));

    let value = |n: i32| Some(SymExpr::Primary(Primary::Integer(crate::primitive::int(n))));
    if reduced == 0 {
        match name {
            "sin" | "tan" => value(0),
            "cos" => value(1),
            _ => None,
        }
    } else if reduced == Rational::from((1, 2)) {
        match name {
            "sin" => value(1),
            "cos" => value(0),
            _ => None,
        }
    } else if reduced == 1 {
        match name {
            "sin" | "tan" => value(0),
            "cos" => value(-1),
            _ => None,
        }
    } else if reduced == Rational::from((3, 2)) {
        match name {
            "sin" => value(-1),
            "cos" => value(0),
            _ => None,
        }
    } else {
        None
    }
}

/// `sin(0) = 0`, `cos(pi) = -1`, `sin(pi/2) = 1`, etc.
pub fn special_values(expr: &SymExpr) -> Option<SymExpr> {
    let (name, args) = expr.as_call()?;
    if !matches!(name, "sin" | "cos" | "tan") {
        return None;
    }
    let [arg] = args else { return None };
    eval_at_pi_multiple(name, as_pi_multiple(arg)?)
}

/// `sin(-u) = -sin(u)`, `cos(-u) = cos(u)`, `tan(-u) = -tan(u)`.
pub fn parity(expr: &SymExpr) -> Option<SymExpr> {
    let (name, args) = expr.as_call()?;
    if !matches!(name, "sin" | "cos" | "tan") {
        return None;
    }
    let [arg] = args else { return None };
    let positive = extract_negation(arg)?;
    let call = SymExpr::Primary(Primary::Call(name.to_string(), vec![positive]));

    match name {
        "cos" => Some(call),
        _ => Some(call.neg()),
    }
}

/// `c*sin(x)^2 + c*cos(x)^2 = c`
pub fn pythagorean(expr: &SymExpr) -> Option<SymExpr> {
    /// Recognizes `sin(x)^2` / `cos(x)^2`.
    fn squared_trig(expr: &SymExpr) -> Option<(&'static str, &SymExpr)> {
        let SymExpr::Exp(base, exp) = expr else { return None };
        if !exp.as_integer().map(|n| n == &2).unwrap_or(false) {
            return None;
        }
        match base.as_call() {
            Some(("sin", [arg])) => Some(("sin", arg)),
            Some(("cos", [arg])) => Some(("cos", arg)),
            _ => None,
        }
    }

    /// Recognizes a term of the shape `c * sin(x)^2` (or cosine) with an exact rational `c`.
    fn classify(term: &SymExpr) -> Option<(Rational, &'static str, &SymExpr)> {
        if let Some((kind, arg)) = squared_trig(term) {
            return Some((Rational::from(1), kind, arg));
        }

        let SymExpr::Mul(factors) = term else { return None };
        let mut coeff = Rational::from(1);
        let mut hit = None;
        for factor in factors {
            if let Some(r) = factor.as_rational() {
                coeff *= r;
                continue;
            }
            if hit.is_none() {
                if let Some(found) = squared_trig(factor) {
                    hit = Some(found);
                    continue;
                }
            }
            return None;
        }
        hit.map(|(kind, arg)| (coeff, kind, arg))
    }

    do_add(expr, |terms| {
        let classified = terms.iter().map(classify).collect::<Vec<_>>();

        for i in 0..terms.len() {
            let Some((ci, ki, ai)) = &classified[i] else { continue };
            for j in i + 1..terms.len() {
                let Some((cj, kj, aj)) = &classified[j] else { continue };
                if ki != kj && ci == cj && ai == aj {
                    let mut new_terms = terms.iter()
                        .enumerate()
                        .filter(|(idx, _)| *idx != i && *idx != j)
                        .map(|(_, term)| term.clone())
                        .collect::<Vec<_>>();
                    new_terms.push(SymExpr::from_rational(ci.clone()));
                    return Some(SymExpr::Add(new_terms).downgrade());
                }
            }
        }

        None
    })
}

/// Applies all trigonometric rules.
pub fn all(expr: &SymExpr) -> Option<SymExpr> {
    special_values(expr)
        .or_else(|| parity(expr))
        .or_else(|| pythagorean(expr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqv_parser::Parser;

    fn convert(source: &str) -> SymExpr {
        SymExpr::from(Parser::new(source).parse_full().unwrap())
    }

    #[test]
    fn sin_of_zero() {
        assert_eq!(special_values(&convert("sin(0)")), Some(SymExpr::zero()));
    }

    #[test]
    fn cos_of_pi() {
        assert_eq!(
            special_values(&convert("cos(pi)")),
            Some(SymExpr::Primary(Primary::Integer(crate::primitive::int(-1)))),
        );
    }

    #[test]
    fn sin_is_odd() {
        let rewritten = parity(&convert("sin(-x)")).unwrap();
        assert_eq!(rewritten, convert("-sin(x)"));
    }

    #[test]
    fn cos_is_even() {
        assert_eq!(parity(&convert("cos(-x)")), Some(convert("cos(x)")));
    }
}
