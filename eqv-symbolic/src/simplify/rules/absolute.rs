//! Simplification rules for absolute values.

use crate::expr::{Domain, Primary, SymExpr};
use crate::simplify::rules::{do_call, do_power};

/// If the expression is a product with a negative integer factor, returns the product with
/// that factor made positive.
pub(crate) fn extract_negation(expr: &SymExpr) -> Option<SymExpr> {
    let SymExpr::Mul(factors) = expr else { return None };

    for (i, factor) in factors.iter().enumerate() {
        if let Some(n) = factor.as_integer() {
            if n < &0 {
                let mut rest = factors.clone();
                if n == &-1 {
                    rest.remove(i);
                } else {
                    rest[i] = SymExpr::Primary(Primary::Integer(-n.clone()));
                }
                return Some(SymExpr::Mul(rest).downgrade());
            }
        }
    }

    None
}

/// `abs(n)` for an exact numeric argument.
pub fn abs_numeric(expr: &SymExpr) -> Option<SymExpr> {
    do_call(expr, "abs", |args| {
        let [arg] = args else { return None };

        if let Some(value) = arg.as_rational() {
            let result = SymExpr::from_rational(value.abs());
            return if &result == arg { None } else { Some(result) };
        }

        if let SymExpr::Primary(Primary::Float(f)) = arg {
            return if f.is_sign_negative() {
                Some(SymExpr::Primary(Primary::Float(f.clone().abs())))
            } else {
                None
            };
        }

        None
    })
}

/// `abs(x) = x` when `x` is assumed positive.
pub fn abs_positive(expr: &SymExpr) -> Option<SymExpr> {
    do_call(expr, "abs", |args| {
        let [arg] = args else { return None };
        if arg.as_symbol().map(|sym| sym.domain == Domain::Positive).unwrap_or(false) {
            Some(arg.clone())
        } else {
            None
        }
    })
}

/// `abs(abs(z)) = abs(z)`
pub fn abs_abs(expr: &SymExpr) -> Option<SymExpr> {
    do_call(expr, "abs", |args| {
        let [arg] = args else { return None };
        match arg.as_call() {
            Some(("abs", _)) => Some(arg.clone()),
            _ => None,
        }
    })
}

/// `abs(-z) = abs(z)`
pub fn abs_negation(expr: &SymExpr) -> Option<SymExpr> {
    do_call(expr, "abs", |args| {
        let [arg] = args else { return None };
        let positive = extract_negation(arg)?;
        Some(SymExpr::Primary(Primary::Call("abs".to_string(), vec![positive])))
    })
}

/// `abs(z^(2n)) = z^(2n)` for real `z`.
pub fn abs_even_power(expr: &SymExpr) -> Option<SymExpr> {
    do_call(expr, "abs", |args| {
        let [arg] = args else { return None };
        let SymExpr::Exp(base, exp) = arg else { return None };
        if exp.as_integer().map(|n| n.is_even() && !n.is_zero()).unwrap_or(false)
            && base.all_symbols_real()
        {
            Some(arg.clone())
        } else {
            None
        }
    })
}

/// `abs(z)^(2n) = z^(2n)` for real `z`.
pub fn even_power_of_abs(expr: &SymExpr) -> Option<SymExpr> {
    do_power(expr, |base, exp| {
        let Some(("abs", [arg])) = base.as_call() else { return None };
        if exp.as_integer().map(|n| n.is_even() && !n.is_zero()).unwrap_or(false)
            && arg.all_symbols_real()
        {
            Some(SymExpr::Exp(Box::new(arg.clone()), Box::new(exp.clone())))
        } else {
            None
        }
    })
}

/// Applies all absolute-value rules.
pub fn all(expr: &SymExpr) -> Option<SymExpr> {
    abs_numeric(expr)
        .or_else(|| abs_positive(expr))
        .or_else(|| abs_abs(expr))
        .or_else(|| abs_negation(expr))
        .or_else(|| abs_even_power(expr))
        .or_else(|| even_power_of_abs(expr))
}
