//! Semantic equivalence and similarity scoring for mathematical expressions and chemical
//! formulas.
//!
//! Superficially different answers — `$(x+1)^2$` against `$x^2+2x+1$`, or `H2O` against
//! `OH2` — are recognized as the same object, and a continuous similarity score in `[0, 1]`
//! is produced when they are not equivalent.
//!
//! The high-level entry points live in [`api`]:
//!
//! ```
//! use eqv::api;
//!
//! let outcome = api::similarity("$(x+1)^2$", "$x^2+2x+1$", None);
//! assert!(outcome.equivalent);
//! assert_eq!(outcome.score, 1.0);
//!
//! assert!(api::formulas_equivalent("H2O", "OH2").unwrap());
//! ```
//!
//! Every operation is a pure, stateless computation over its inputs; nothing is cached between
//! calls, and concurrent use needs no coordination.

pub mod api;
pub mod assumptions;
pub mod preprocess;
pub mod recognize;
pub mod similarity;

pub use api::{normalize, parse_input, Comparison, Normalized};
pub use assumptions::Assumptions;
pub use eqv_symbolic::{Domain, SymExpr};
pub use similarity::{
    equivalence::{are_equivalent, EquivalenceMethod, EquivalenceResult},
    scorer::{similarity, SimilarityResult},
    structure::structure_similarity,
};
