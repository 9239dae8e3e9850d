//! Two-stage equivalence testing: symbolic proof, then numeric sampling.

use crate::assumptions::{assume_all_real, Assumptions};
use eqv_symbolic::primitive::float;
use eqv_symbolic::simplify::fraction::denominator;
use eqv_symbolic::{
    combine_log, eval, eval_deferred, expand_log, simplify, trig_simplify, Primary, SymExpr,
};
use log::{debug, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rug::Rational;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::Neg;

/// Default number of accepted sample points the numeric stage evaluates.
pub const DEFAULT_SAMPLES: usize = 8;

/// Default absolute tolerance for numeric comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// The seed of the default sampling source; fixed for reproducibility.
const SAMPLE_SEED: u64 = 42;

/// The integer values sample points are drawn from. Zero is excluded to dodge spurious domain
/// errors at the origin.
const SAMPLE_DOMAIN: [i32; 6] = [-3, -2, -1, 1, 2, 3];

/// How an equivalence verdict was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum EquivalenceMethod {
    /// The simplified difference reduced to zero.
    Symbolic,

    /// All sampled points agreed within tolerance.
    Numeric,

    /// Both expressions were constant and compared numerically.
    NumericConst,

    /// No valid sample point could be found.
    NumericNone,
}

impl fmt::Display for EquivalenceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbolic => write!(f, "symbolic"),
            Self::Numeric => write!(f, "numeric"),
            Self::NumericConst => write!(f, "numeric-const"),
            Self::NumericNone => write!(f, "numeric-none"),
        }
    }
}

/// The outcome of one equivalence comparison.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquivalenceResult {
    /// Whether the expressions were judged equivalent.
    pub is_equivalent: bool,

    /// How the verdict was reached. Numeric verdicts are heuristic, not proof.
    pub method: EquivalenceMethod,

    /// The number of sample points actually evaluated.
    pub samples_total: usize,

    /// The number of evaluated sample points that agreed within tolerance.
    pub samples_success: usize,

    /// An optional diagnostic.
    pub message: Option<String>,
}

impl EquivalenceResult {
    fn new(is_equivalent: bool, method: EquivalenceMethod) -> Self {
        Self {
            is_equivalent,
            method,
            samples_total: 0,
            samples_success: 0,
            message: None,
        }
    }
}

/// Rewrites `sqrt(z^2)` — that is, `(z^2)^(1/2)` — to `abs(z)` everywhere in the tree. The
/// rewrite runs both before and after simplification, since simplification can reveal new
/// instances of the pattern.
pub(crate) fn sqrt_to_abs(expr: &SymExpr) -> SymExpr {
    let expr = expr.map_children(sqrt_to_abs);

    if let SymExpr::Exp(base, exp) = &expr {
        let is_half = exp.as_rational().map(|r| r == Rational::from((1, 2))).unwrap_or(false);
        if is_half {
            if let SymExpr::Exp(inner, inner_exp) = &**base {
                if inner_exp.as_integer().map(|n| n == &2).unwrap_or(false) {
                    return SymExpr::Primary(Primary::Call(
                        "abs".to_string(),
                        vec![(**inner).clone()],
                    ));
                }
            }
        }
    }

    expr
}

/// Decides equivalence of two expression trees with the default sample count, tolerance, and
/// sampling source.
pub fn are_equivalent(
    expr1: &SymExpr,
    expr2: &SymExpr,
    assumptions: Option<&Assumptions>,
) -> EquivalenceResult {
    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
    are_equivalent_with_rng(expr1, expr2, DEFAULT_SAMPLES, DEFAULT_TOLERANCE, assumptions, &mut rng)
}

/// Decides equivalence of two expression trees.
///
/// Pipeline:
///
/// 1. Assumptions are applied to both trees (explicit variable tag over blanket tag); with no
///    assumptions, every free variable defaults to the real domain.
/// 2. `sqrt(z^2)` is canonicalized to `abs(z)` before and after simplification.
/// 3. Symbolic stage: deferred sums/products are evaluated, trig forms simplified, both trees
///    fully simplified and log-canonicalized, and the difference simplified. A difference
///    that reduces to zero is an exact symbolic verdict.
/// 4. Constant expressions are compared numerically against the tolerance.
/// 5. Otherwise the difference is sampled at deterministic integer points drawn from the
///    caller's sampling source; points where the symbolic denominator vanishes are rejected,
///    failed evaluations are skipped, and equivalence holds iff every evaluated point agrees.
///
/// Symbolic proof is attempted first because it is exact; numeric sampling is a probabilistic
/// fallback bounded by a small fixed sample size, favoring speed over soundness.
pub fn are_equivalent_with_rng(
    expr1: &SymExpr,
    expr2: &SymExpr,
    samples: usize,
    tolerance: f64,
    assumptions: Option<&Assumptions>,
    rng: &mut impl Rng,
) -> EquivalenceResult {
    let (expr1, expr2) = match assumptions {
        Some(assumptions) => (assumptions.apply(expr1), assumptions.apply(expr2)),
        None => (assume_all_real(expr1), assume_all_real(expr2)),
    };
    let expr1 = sqrt_to_abs(&expr1);
    let expr2 = sqrt_to_abs(&expr2);

    // symbolic stage: canonicalize each side, then simplify the difference toward zero
    let canonical = |expr: &SymExpr| {
        let expr = simplify(&trig_simplify(&eval_deferred(expr)));
        let expr = sqrt_to_abs(&expr);
        simplify(&combine_log(&expand_log(&expr)))
    };
    let diff = simplify(&(canonical(&expr1) + canonical(&expr2).neg()));

    if diff.is_zero_value() {
        debug!("equivalence established symbolically");
        return EquivalenceResult::new(true, EquivalenceMethod::Symbolic);
    }

    let mut variables: BTreeSet<String> = expr1.free_variables();
    variables.extend(expr2.free_variables());

    // constant case: one direct numeric comparison
    if variables.is_empty() {
        return match eval(&diff, &HashMap::new()) {
            Ok(value) => {
                let is_equivalent = value.to_f64().abs() < tolerance;
                debug!("constant comparison: |diff| {} tolerance", if is_equivalent { "<" } else { ">=" });
                EquivalenceResult::new(is_equivalent, EquivalenceMethod::NumericConst)
            },
            Err(err) => {
                let mut result = EquivalenceResult::new(false, EquivalenceMethod::NumericConst);
                result.message = Some(err.to_string());
                result
            },
        };
    }

    // numeric sampling stage; the denominator filter avoids counting removable-singularity
    // mismatches as failures
    let denom = denominator(&diff);
    let variables: Vec<String> = variables.into_iter().collect();

    let mut tried = 0usize;
    let mut successes = 0usize;
    for _ in 0..samples.saturating_mul(3) {
        if tried >= samples {
            break;
        }

        let point: HashMap<String, _> = variables.iter()
            .map(|name| {
                let value = SAMPLE_DOMAIN[rng.gen_range(0..SAMPLE_DOMAIN.len())];
                (name.clone(), float(value))
            })
            .collect();

        match eval(&denom, &point) {
            Ok(value) if !value.is_zero() => {},
            _ => {
                trace!("sample rejected: singular denominator");
                continue;
            },
        }

        let value = match eval(&diff, &point) {
            Ok(value) => value,
            // a candidate that fails to evaluate is skipped, not counted as a trial
            Err(err) => {
                trace!("sample skipped: {err}");
                continue;
            },
        };

        tried += 1;
        if value.to_f64().abs() < tolerance {
            successes += 1;
        }
    }

    if tried == 0 {
        let mut result = EquivalenceResult::new(false, EquivalenceMethod::NumericNone);
        result.message = Some("no valid samples".to_string());
        return result;
    }

    debug!("numeric sampling: {successes}/{tried} points agreed");
    EquivalenceResult {
        is_equivalent: successes == tried,
        method: EquivalenceMethod::Numeric,
        samples_total: tried,
        samples_success: successes,
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqv_parser::Parser;
    use eqv_symbolic::Domain;
    use pretty_assertions::assert_eq;

    fn convert(source: &str) -> SymExpr {
        SymExpr::from(Parser::new(source).parse_full().unwrap())
    }

    fn check(a: &str, b: &str) -> EquivalenceResult {
        are_equivalent(&convert(a), &convert(b), None)
    }

    #[test]
    fn binomial_square_is_symbolic() {
        let result = check("(x+1)^2", "x^2 + 2x + 1");
        assert!(result.is_equivalent);
        assert_eq!(result.method, EquivalenceMethod::Symbolic);
    }

    #[test]
    fn reflexivity_is_symbolic() {
        for source in ["x", "sin(x) + 1", "(x+y)^3", "log(x^2)"] {
            let result = check(source, source);
            assert!(result.is_equivalent, "{source}");
            assert_eq!(result.method, EquivalenceMethod::Symbolic, "{source}");
        }
    }

    #[test]
    fn symmetry() {
        let ab = check("(x+1)^2", "x^2 + 1");
        let ba = check("x^2 + 1", "(x+1)^2");
        assert_eq!(ab.is_equivalent, ba.is_equivalent);
        assert!(!ab.is_equivalent);
    }

    #[test]
    fn distinct_polynomials_are_not_equivalent() {
        let result = check("x^2", "x^3");
        assert!(!result.is_equivalent);
    }

    #[test]
    fn constants_compare_numerically() {
        let result = check("log(8)/log(2)", "3");
        assert!(result.is_equivalent);
        assert_eq!(result.method, EquivalenceMethod::NumericConst);
    }

    #[test]
    fn removable_singularity_is_sampled_around() {
        // (x^2-1)/(x-1) equals x+1 away from x = 1; the denominator filter rejects x = 1
        let result = check("(x^2-1)/(x-1)", "x+1");
        assert!(result.is_equivalent);
    }

    #[test]
    fn pythagorean_identity_is_symbolic() {
        let result = check("sin(x)^2 + cos(x)^2", "1");
        assert!(result.is_equivalent);
        assert_eq!(result.method, EquivalenceMethod::Symbolic);
    }

    #[test]
    fn log_canonicalization_matches_expanded_forms() {
        let result = check("log(x^2)", "2 log(x)");
        assert!(result.is_equivalent);
        assert_eq!(result.method, EquivalenceMethod::Symbolic);
    }

    #[test]
    fn sqrt_of_square_needs_positivity() {
        let positive = Assumptions::vars([("x", Domain::Positive)]);
        let result = are_equivalent(&convert("sqrt(x^2)"), &convert("x"), Some(&positive));
        assert!(result.is_equivalent);
        assert_eq!(result.method, EquivalenceMethod::Symbolic);

        // without the assumption, sqrt(x^2) is abs(x), which differs at negative samples;
        // a mock source that always draws the lowest sample value (-3) makes that certain
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        let result = are_equivalent_with_rng(
            &convert("sqrt(x^2)"),
            &convert("x"),
            DEFAULT_SAMPLES,
            DEFAULT_TOLERANCE,
            None,
            &mut rng,
        );
        assert!(!result.is_equivalent);
        assert_eq!(result.method, EquivalenceMethod::Numeric);
    }

    #[test]
    fn finite_sums_are_evaluated() {
        let result = check("sum(k, k, 1, 10)", "55");
        assert!(result.is_equivalent);
    }

    #[test]
    fn sampling_is_reproducible() {
        let a = convert("e^x");
        let b = convert("exp(x)");
        let first = are_equivalent(&a, &b, None);
        let second = are_equivalent(&a, &b, None);
        assert_eq!(first, second);
        assert!(first.is_equivalent);
    }
}
