//! Chemical composition engine: formula parsing, reaction balancing, and reaction
//! equivalence.
//!
//! A formula string is parsed into an [`ElementComposition`] (element symbol to atom count),
//! tolerating bracket nesting, hydrate dots, leading multiplicities, and trailing phase /
//! charge annotations. A reaction string is split on an arrow, each side's species are parsed,
//! and minimal integer stoichiometric coefficients are computed from the right null space of
//! the element-by-species matrix over exact rationals.

pub mod error;
pub mod formula;
pub mod reaction;

use std::collections::BTreeMap;

pub use error::{BalanceError, FormulaError};
pub use formula::{formulas_equivalent, normalize_formula, parse_formula};
pub use reaction::{
    balance_reaction_info, balance_reaction_with, parse_reaction, reactions_equivalent,
    BalanceMethod, BalancedReaction, StoichiometricBalancer,
};

/// A mapping from element symbol to a non-negative atom count. Keys are unique; equality is
/// exact structural equality of the mapping.
pub type ElementComposition = BTreeMap<String, u64>;
