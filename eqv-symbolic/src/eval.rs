//! Numeric evaluation of an expression tree at a point.

use crate::consts;
use crate::expr::{Primary, SymExpr};
use crate::primitive::float;
use rug::{ops::Pow, Float};
use std::collections::HashMap;
use std::fmt;

/// The functions numeric evaluation understands, used for unknown-name suggestions.
const KNOWN_FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "cot", "sec", "csc",
    "asin", "acos", "atan", "acot",
    "sinh", "cosh", "tanh", "coth",
    "log", "exp", "sqrt", "abs",
];

/// An error produced while numerically evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A free variable had no binding.
    Unbound {
        /// The name of the variable.
        name: String,
    },

    /// A call to a function the evaluator does not know.
    UnknownFunction {
        /// The name of the function.
        name: String,

        /// The closest known function, if one is close enough.
        suggestion: Option<String>,
    },

    /// A known function was called with the wrong number of arguments.
    WrongArity {
        /// The name of the function.
        name: String,

        /// The number of arguments the function takes.
        expected: usize,
    },

    /// The evaluation produced a non-finite value (infinity or NaN).
    NonFinite,

    /// A deferred operation with symbolic bounds cannot be evaluated numerically.
    Unevaluated {
        /// The name of the deferred operation.
        name: String,
    },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbound { name } => write!(f, "no value bound for variable `{}`", name),
            Self::UnknownFunction { name, suggestion } => {
                write!(f, "unknown function `{}`", name)?;
                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean `{}`?)", suggestion)?;
                }
                Ok(())
            },
            Self::WrongArity { name, expected } => {
                write!(f, "`{}` takes {} argument(s)", name, expected)
            },
            Self::NonFinite => write!(f, "evaluation produced a non-finite value"),
            Self::Unevaluated { name } => {
                write!(f, "deferred `{}` with symbolic bounds cannot be evaluated", name)
            },
        }
    }
}

impl std::error::Error for EvalError {}

/// Checks that a computed value is finite before letting it propagate.
fn finite(value: Float) -> Result<Float, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite)
    }
}

/// Evaluates a single function call on already-evaluated arguments.
fn eval_call(name: &str, mut args: Vec<Float>) -> Result<Float, EvalError> {
    // `log` also takes an explicit base as a second argument
    if name == "log" && args.len() == 2 {
        let base = args.pop().unwrap();
        let value = args.pop().unwrap();
        return finite(value.ln() / base.ln());
    }

    let count = args.len();
    let arity = move |expected: usize| {
        if count == expected {
            Ok(())
        } else {
            Err(EvalError::WrongArity { name: name.to_string(), expected })
        }
    };

    let unary = |args: Vec<Float>| args.into_iter().next().unwrap();
    match name {
        "sin" => { arity(1)?; finite(unary(args).sin()) },
        "cos" => { arity(1)?; finite(unary(args).cos()) },
        "tan" => { arity(1)?; finite(unary(args).tan()) },
        "cot" => { arity(1)?; finite(unary(args).tan().recip()) },
        "sec" => { arity(1)?; finite(unary(args).cos().recip()) },
        "csc" => { arity(1)?; finite(unary(args).sin().recip()) },
        "asin" => { arity(1)?; finite(unary(args).asin()) },
        "acos" => { arity(1)?; finite(unary(args).acos()) },
        "atan" => { arity(1)?; finite(unary(args).atan()) },
        "acot" => { arity(1)?; finite(unary(args).recip().atan()) },
        "sinh" => { arity(1)?; finite(unary(args).sinh()) },
        "cosh" => { arity(1)?; finite(unary(args).cosh()) },
        "tanh" => { arity(1)?; finite(unary(args).tanh()) },
        "coth" => { arity(1)?; finite(unary(args).tanh().recip()) },
        "log" => { arity(1)?; finite(unary(args).ln()) },
        "exp" => { arity(1)?; finite(unary(args).exp()) },
        "sqrt" => { arity(1)?; finite(unary(args).sqrt()) },
        "abs" => { arity(1)?; finite(unary(args).abs()) },
        "sum" | "prod" => Err(EvalError::Unevaluated { name: name.to_string() }),
        _ => {
            let suggestion = KNOWN_FUNCTIONS.iter()
                .map(|candidate| (levenshtein::levenshtein(name, candidate), candidate))
                .min_by_key(|(distance, _)| *distance)
                .filter(|(distance, _)| *distance <= 2)
                .map(|(_, candidate)| candidate.to_string());
            Err(EvalError::UnknownFunction { name: name.to_string(), suggestion })
        },
    }
}

/// Evaluates the expression at the given point. Every free variable must be bound; the
/// constants `pi` and `e` are bound implicitly. Any non-finite intermediate value is reported
/// as [`EvalError::NonFinite`].
pub fn eval(expr: &SymExpr, bindings: &HashMap<String, Float>) -> Result<Float, EvalError> {
    match expr {
        SymExpr::Primary(Primary::Integer(n)) => Ok(float(n.clone())),
        SymExpr::Primary(Primary::Float(f)) => finite(f.clone()),
        SymExpr::Primary(Primary::Symbol(sym)) => {
            if let Some(value) = bindings.get(&sym.name) {
                return finite(value.clone());
            }
            match sym.name.as_str() {
                "pi" => Ok(consts::PI.clone()),
                "e" => Ok(consts::E.clone()),
                _ => Err(EvalError::Unbound { name: sym.name.clone() }),
            }
        },
        SymExpr::Primary(Primary::Call(name, args)) => {
            let args = args.iter()
                .map(|arg| eval(arg, bindings))
                .collect::<Result<Vec<_>, _>>()?;
            eval_call(name, args)
        },
        SymExpr::Add(terms) => {
            let mut total = float(0);
            for term in terms {
                total += eval(term, bindings)?;
            }
            finite(total)
        },
        SymExpr::Mul(factors) => {
            let mut total = float(1);
            for factor in factors {
                total *= eval(factor, bindings)?;
            }
            finite(total)
        },
        SymExpr::Exp(base, exp) => {
            let base = eval(base, bindings)?;
            let exp = eval(exp, bindings)?;
            finite(base.pow(exp))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::assert_float_absolute_eq;
    use eqv_parser::Parser;

    fn convert(source: &str) -> SymExpr {
        SymExpr::from(Parser::new(source).parse_full().unwrap())
    }

    fn eval_at(source: &str, bindings: &[(&str, i32)]) -> Result<f64, EvalError> {
        let bindings = bindings.iter()
            .map(|(name, value)| (name.to_string(), float(*value)))
            .collect();
        eval(&convert(source), &bindings).map(|value| value.to_f64())
    }

    #[test]
    fn polynomial_at_a_point() {
        assert_float_absolute_eq!(eval_at("x^2 + 2x + 1", &[("x", 3)]).unwrap(), 16.0);
    }

    #[test]
    fn constants_are_bound_implicitly() {
        assert_float_absolute_eq!(eval_at("sin(pi)", &[]).unwrap(), 0.0);
        assert_float_absolute_eq!(eval_at("log(e)", &[]).unwrap(), 1.0);
    }

    #[test]
    fn division_by_zero_is_non_finite() {
        assert_eq!(eval_at("1/x", &[("x", 0)]), Err(EvalError::NonFinite));
    }

    #[test]
    fn log_of_negative_is_non_finite() {
        assert_eq!(eval_at("log(x)", &[("x", -2)]), Err(EvalError::NonFinite));
    }

    #[test]
    fn unbound_variable_errors() {
        assert_eq!(
            eval_at("x + y", &[("x", 1)]),
            Err(EvalError::Unbound { name: "y".to_string() }),
        );
    }

    #[test]
    fn unknown_function_suggests_a_name() {
        let err = eval_at("sine(1)", &[]).unwrap_err();
        assert_eq!(err, EvalError::UnknownFunction {
            name: "sine".to_string(),
            suggestion: Some("sin".to_string()),
        });
    }
}
