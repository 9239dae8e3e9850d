//! Simplification rules for logarithms and exponentials. `log` is the natural logarithm.

use crate::expr::{Primary, SymExpr};
use crate::simplify::rules::do_call;

/// `log(1) = 0`
pub fn log_one(expr: &SymExpr) -> Option<SymExpr> {
    do_call(expr, "log", |args| {
        let [arg] = args else { return None };
        if arg.as_integer().map(|n| n == &1).unwrap_or(false) {
            Some(SymExpr::zero())
        } else {
            None
        }
    })
}

/// `log(e) = 1`
pub fn log_e(expr: &SymExpr) -> Option<SymExpr> {
    do_call(expr, "log", |args| {
        let [arg] = args else { return None };
        if arg.as_symbol().map(|sym| sym.name == "e").unwrap_or(false) {
            Some(SymExpr::one())
        } else {
            None
        }
    })
}

/// `log(exp(z)) = z`, in both the `exp(z)` and `e^z` spellings.
pub fn log_exp(expr: &SymExpr) -> Option<SymExpr> {
    do_call(expr, "log", |args| {
        let [arg] = args else { return None };

        if let Some(("exp", [inner])) = arg.as_call() {
            return Some(inner.clone());
        }

        if let SymExpr::Exp(base, exp) = arg {
            if base.as_symbol().map(|sym| sym.name == "e").unwrap_or(false) {
                return Some((**exp).clone());
            }
        }

        None
    })
}

/// `exp(0) = 1`
pub fn exp_zero(expr: &SymExpr) -> Option<SymExpr> {
    do_call(expr, "exp", |args| {
        let [arg] = args else { return None };
        if arg.as_integer().map(|n| n.is_zero()).unwrap_or(false) {
            Some(SymExpr::one())
        } else {
            None
        }
    })
}

/// `exp(log(z)) = z`
pub fn exp_log(expr: &SymExpr) -> Option<SymExpr> {
    do_call(expr, "exp", |args| {
        let [arg] = args else { return None };
        match arg.as_call() {
            Some(("log", [inner])) => Some(inner.clone()),
            _ => None,
        }
    })
}

/// Applies all logarithm rules.
pub fn all(expr: &SymExpr) -> Option<SymExpr> {
    log_one(expr)
        .or_else(|| log_e(expr))
        .or_else(|| log_exp(expr))
        .or_else(|| exp_zero(expr))
        .or_else(|| exp_log(expr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_of_exp_call_unwraps() {
        let expr = SymExpr::Primary(Primary::Call(
            "log".to_string(),
            vec![SymExpr::Primary(Primary::Call("exp".to_string(), vec![SymExpr::symbol("x")]))],
        ));
        assert_eq!(log_exp(&expr), Some(SymExpr::symbol("x")));
    }
}
