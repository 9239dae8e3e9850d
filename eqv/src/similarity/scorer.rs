//! Combines equivalence and structural similarity into one score.

use crate::assumptions::Assumptions;
use crate::similarity::equivalence::{are_equivalent, EquivalenceResult};
use crate::similarity::structure::structure_similarity;
use eqv_symbolic::{simplify, SymExpr};

/// Default weight of the equivalence component.
pub const DEFAULT_EQUIV_WEIGHT: f64 = 0.7;

/// The weights used to combine the equivalence and structure components, echoed in the result
/// for transparency.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weights {
    /// Weight of the equivalence component.
    pub equivalence: f64,

    /// Weight of the structure component.
    pub structure: f64,
}

/// The structured breakdown behind a similarity score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimilarityDetail {
    /// The equivalence verdict.
    pub equivalence: EquivalenceResult,

    /// The structural similarity of the simplified inputs.
    pub structure: f64,

    /// The weights used.
    pub weights: Weights,
}

/// The outcome of one similarity comparison.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimilarityResult {
    /// Whether the expressions were judged equivalent.
    pub equivalent: bool,

    /// The combined score in `[0, 1]`. Equivalence forces exactly 1.0.
    pub score: f64,

    /// The structured breakdown.
    pub detail: SimilarityDetail,
}

/// Scores two expression trees with the default equivalence weight.
pub fn similarity(
    expr1: &SymExpr,
    expr2: &SymExpr,
    assumptions: Option<&Assumptions>,
) -> SimilarityResult {
    similarity_weighted(expr1, expr2, DEFAULT_EQUIV_WEIGHT, assumptions)
}

/// Scores two expression trees.
///
/// Equivalence dominates: an equivalent pair scores exactly 1.0 regardless of shape. A
/// non-equivalent pair earns no credit on the equivalence component at all; partial credit
/// comes solely from structural similarity, scaled by the remaining weight.
pub fn similarity_weighted(
    expr1: &SymExpr,
    expr2: &SymExpr,
    equiv_weight: f64,
    assumptions: Option<&Assumptions>,
) -> SimilarityResult {
    let equivalence = are_equivalent(expr1, expr2, assumptions);
    let structure = structure_similarity(&simplify(expr1), &simplify(expr2));
    let weights = Weights {
        equivalence: equiv_weight,
        structure: 1.0 - equiv_weight,
    };

    let equivalent = equivalence.is_equivalent;
    let score = if equivalent {
        1.0
    } else {
        ((1.0 - equiv_weight) * structure).clamp(0.0, 1.0)
    };

    SimilarityResult {
        equivalent,
        score,
        detail: SimilarityDetail { equivalence, structure, weights },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqv_parser::Parser;

    fn convert(source: &str) -> SymExpr {
        SymExpr::from(Parser::new(source).parse_full().unwrap())
    }

    #[test]
    fn equivalence_forces_a_perfect_score() {
        let result = similarity(&convert("(x+1)^2"), &convert("x^2 + 2x + 1"), None);
        assert!(result.equivalent);
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn partial_credit_comes_from_structure_alone() {
        let result = similarity(&convert("(x+1)^2"), &convert("x^2 + 1"), None);
        assert!(!result.equivalent);
        assert!(result.score < 1.0);
        assert_eq!(result.score, (1.0 - DEFAULT_EQUIV_WEIGHT) * result.detail.structure);
    }

    #[test]
    fn weights_are_echoed_in_the_detail() {
        let result = similarity_weighted(&convert("x"), &convert("x"), 0.9, None);
        assert_eq!(result.detail.weights.equivalence, 0.9);
        assert!((result.detail.weights.structure - 0.1).abs() < 1e-12);
    }
}
