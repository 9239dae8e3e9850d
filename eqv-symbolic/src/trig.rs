//! Trigonometric canonicalization.

use crate::expr::{Primary, SymExpr};
use crate::simplify::{fraction::make_fraction, simplify};

/// Rewrites the quotient trig functions in terms of `sin` and `cos`.
fn rewrite_quotient_trig(expr: &SymExpr) -> SymExpr {
    let expr = expr.map_children(rewrite_quotient_trig);

    let Some((name, args)) = expr.as_call() else { return expr };
    let [arg] = args else { return expr };
    let call = |f: &str| SymExpr::Primary(Primary::Call(f.to_string(), vec![arg.clone()]));

    match name {
        "tan" => make_fraction(call("sin"), call("cos")),
        "cot" => make_fraction(call("cos"), call("sin")),
        "sec" => make_fraction(SymExpr::one(), call("cos")),
        "csc" => make_fraction(SymExpr::one(), call("sin")),
        _ => expr,
    }
}

/// Trigonometric simplification: quotient trig functions are rewritten in terms of `sin` and
/// `cos`, then the general rule set (including the pythagorean identity and exact special
/// values) runs to a fixed point.
pub fn trig_simplify(expr: &SymExpr) -> SymExpr {
    simplify(&rewrite_quotient_trig(expr))
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
    fn tan_times_cos_is_sin() {
        assert_eq!(trig_simplify(&convert("tan(x) cos(x)")), convert("sin(x)"));
    }

    #[test]
    fn tan_matches_its_quotient_form() {
        assert_eq!(
            trig_simplify(&convert("tan(x)")),
            trig_simplify(&convert("sin(x)/cos(x)")),
        );
    }
}
