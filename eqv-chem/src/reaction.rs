//! Reaction balancing and reaction equivalence.

use crate::error::BalanceError;
use crate::formula::parse_formula;
use crate::ElementComposition;
use log::debug;
use rug::{Integer, Rational};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Arrow spellings, in detection order. Reversible arrows come first so that `<->` is found
/// before its `->` suffix.
const ARROWS: &[&str] = &["<=>", "<->", "⇌", "↔", "=>", "→", "->", "⟶"];

/// How a reaction was balanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BalanceMethod {
    /// An external stoichiometry library produced the coefficients.
    Library,

    /// The rational null-space matrix method produced the coefficients.
    Matrix,
}

impl fmt::Display for BalanceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library => write!(f, "library"),
            Self::Matrix => write!(f, "matrix"),
        }
    }
}

/// A balanced reaction: minimal positive integer coefficients for each species, in the order
/// the species were written.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BalancedReaction {
    /// Coefficients of the reactant species.
    pub reactant_coefficients: Vec<u64>,

    /// Coefficients of the product species.
    pub product_coefficients: Vec<u64>,

    /// The reactant species, stripped of any leading coefficients.
    pub reactant_species: Vec<String>,

    /// The product species, stripped of any leading coefficients.
    pub product_species: Vec<String>,

    /// How the coefficients were computed.
    pub method: BalanceMethod,
}

/// An external stoichiometry balancing capability. Implementations are caller-constructed and
/// injected; when one is provided its result is used only if every species on both sides
/// receives a nonzero coefficient.
pub trait StoichiometricBalancer {
    /// Balances the given species sets, returning per-species coefficient maps for the
    /// reactant and product sides.
    fn balance(
        &self,
        reactants: &[String],
        products: &[String],
    ) -> Result<(HashMap<String, u64>, HashMap<String, u64>), BalanceError>;
}

/// Splits a reaction string on the first recognized arrow, then each side on `+`.
fn split_reaction(s: &str) -> Result<(Vec<String>, Vec<String>), BalanceError> {
    let arrow = ARROWS.iter()
        .find(|arrow| s.contains(*arrow))
        .ok_or(BalanceError::MissingArrow)?;
    let (left, right) = s.split_once(arrow).unwrap();

    let side = |half: &str| {
        half.split('+')
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(String::from)
            .collect::<Vec<_>>()
    };

    let reactants = side(left);
    let products = side(right);
    if reactants.is_empty() || products.is_empty() {
        return Err(BalanceError::EmptySide);
    }
    Ok((reactants, products))
}

/// Strips a leading numeric coefficient — an integer, a fraction like `1/2`, or a decimal like
/// `0.5` — from a species term. The coefficient is only a hint from the user and is never
/// trusted by the balancer.
fn strip_coefficient(term: &str) -> &str {
    let term = term.trim_start();
    let digits = term.find(|c: char| !c.is_ascii_digit()).unwrap_or(term.len());
    let rest = &term[digits..];

    let stripped = if digits > 0 && rest.starts_with('/') {
        let tail = &rest[1..];
        let tail_digits = tail.find(|c: char| !c.is_ascii_digit()).unwrap_or(tail.len());
        if tail_digits > 0 { &tail[tail_digits..] } else { term }
    } else if rest.starts_with('.') {
        let tail = &rest[1..];
        let tail_digits = tail.find(|c: char| !c.is_ascii_digit()).unwrap_or(tail.len());
        if tail_digits > 0 { &tail[tail_digits..] } else { term }
    } else if digits > 0 {
        rest
    } else {
        term
    };

    stripped.trim_start()
}

/// Parses a reaction into its sides: for each species, the explicit leading integer
/// coefficient (1 when absent) and the species' element composition. Order is preserved as
/// written.
pub fn parse_reaction(
    s: &str,
) -> Result<(Vec<(u64, ElementComposition)>, Vec<(u64, ElementComposition)>), BalanceError> {
    let (reactants, products) = split_reaction(s)?;

    let parse_term = |term: &str| -> Result<(u64, ElementComposition), BalanceError> {
        let digits = term.find(|c: char| !c.is_ascii_digit()).unwrap_or(term.len());
        let coefficient = if digits > 0 {
            term[..digits].parse::<u64>().map_err(|_| BalanceError::CoefficientOverflow)?
        } else {
            1
        };
        let composition = parse_formula(term[digits..].trim_start())?;
        Ok((coefficient, composition))
    };

    Ok((
        reactants.iter().map(|t| parse_term(t)).collect::<Result<_, _>>()?,
        products.iter().map(|t| parse_term(t)).collect::<Result<_, _>>()?,
    ))
}

/// Computes one basis vector of the right null space of the matrix (rows × `cols`), using
/// Gauss-Jordan elimination over exact rationals. Returns `None` when the null space is
/// trivial.
fn null_space_vector(mut rows: Vec<Vec<Rational>>, cols: usize) -> Option<Vec<Rational>> {
    let mut pivot_cols = Vec::new();
    let mut pivot_row = 0usize;

    for col in 0..cols {
        if pivot_row == rows.len() {
            break;
        }

        let Some(row) = (pivot_row..rows.len()).find(|&r| rows[r][col].cmp0() != Ordering::Equal)
        else {
            continue;
        };
        rows.swap(pivot_row, row);

        let pivot = rows[pivot_row][col].clone();
        for k in col..cols {
            let value = rows[pivot_row][k].clone() / pivot.clone();
            rows[pivot_row][k] = value;
        }

        for other in 0..rows.len() {
            if other == pivot_row {
                continue;
            }
            let factor = rows[other][col].clone();
            if factor.cmp0() == Ordering::Equal {
                continue;
            }
            for k in col..cols {
                let delta = factor.clone() * rows[pivot_row][k].clone();
                rows[other][k] -= delta;
            }
        }

        pivot_cols.push(col);
        pivot_row += 1;
    }

    // the first free column yields the first basis vector
    let free_col = (0..cols).find(|col| !pivot_cols.contains(col))?;
    let mut vector = vec![Rational::new(); cols];
    vector[free_col] = Rational::from(1);
    for (row, &col) in pivot_cols.iter().enumerate() {
        vector[col] = -rows[row][free_col].clone();
    }
    Some(vector)
}

/// Scales a rational vector by the LCM of its denominators and reduces by the GCD, producing
/// the minimal integer vector with the same direction.
fn integer_solution(vector: Vec<Rational>) -> Vec<Integer> {
    let mut lcm = Integer::from(1);
    for value in &vector {
        lcm = lcm.lcm(value.denom());
    }

    let integers = vector.into_iter()
        .map(|value| (value * Rational::from(lcm.clone())).into_numer_denom().0)
        .collect::<Vec<_>>();

    let mut gcd = Integer::from(0);
    for value in &integers {
        gcd = gcd.gcd(value);
    }
    if gcd > 1 {
        integers.into_iter().map(|value| value / &gcd).collect()
    } else {
        integers
    }
}

/// Balances a reaction, preferring the injected external balancer when one is supplied and
/// falling back to the rational null-space matrix method.
pub fn balance_reaction_with(
    s: &str,
    balancer: Option<&dyn StoichiometricBalancer>,
) -> Result<BalancedReaction, BalanceError> {
    let (reactants_raw, products_raw) = split_reaction(s)?;
    let reactants: Vec<String> = reactants_raw.iter()
        .map(|term| strip_coefficient(term).to_string())
        .collect();
    let products: Vec<String> = products_raw.iter()
        .map(|term| strip_coefficient(term).to_string())
        .collect();

    if let Some(balancer) = balancer {
        match balancer.balance(&reactants, &products) {
            Ok((reactant_map, product_map)) => {
                let reactant_coefficients: Vec<u64> = reactants.iter()
                    .map(|species| reactant_map.get(species).copied().unwrap_or(0))
                    .collect();
                let product_coefficients: Vec<u64> = products.iter()
                    .map(|species| product_map.get(species).copied().unwrap_or(0))
                    .collect();

                // accept the library result only if every coefficient is nonzero
                if reactant_coefficients.iter().chain(&product_coefficients).all(|c| *c != 0) {
                    debug!("balanced via external library");
                    return Ok(BalancedReaction {
                        reactant_coefficients,
                        product_coefficients,
                        reactant_species: reactants,
                        product_species: products,
                        method: BalanceMethod::Library,
                    });
                }
                debug!("library result had zero coefficients, falling back to matrix");
            },
            Err(err) => {
                debug!("library balancer failed ({err}), falling back to matrix");
            },
        }
    }

    let compositions: Vec<ElementComposition> = reactants.iter()
        .chain(products.iter())
        .map(|species| parse_formula(species).map_err(BalanceError::from))
        .collect::<Result<_, _>>()?;

    let elements: BTreeSet<&String> = compositions.iter().flat_map(|c| c.keys()).collect();
    if elements.is_empty() {
        return Err(BalanceError::NoSolution);
    }

    // rows are elements; columns are species, products negated
    let species_count = compositions.len();
    let rows = elements.iter()
        .map(|element| {
            compositions.iter()
                .enumerate()
                .map(|(i, composition)| {
                    let count = composition.get(*element).copied().unwrap_or(0);
                    let signed = if i < reactants.len() {
                        Integer::from(count)
                    } else {
                        -Integer::from(count)
                    };
                    Rational::from(signed)
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let vector = null_space_vector(rows, species_count).ok_or(BalanceError::NoSolution)?;
    let mut coefficients = integer_solution(vector);

    // the null space is defined up to sign: a vector that is entirely non-positive is flipped,
    // but genuinely mixed signs mean the reaction is ill-posed
    if coefficients.iter().all(|c| c.cmp0() != Ordering::Greater) {
        coefficients = coefficients.into_iter().map(|c| -c).collect();
    }
    if coefficients.iter().any(|c| c.cmp0() == Ordering::Less) {
        return Err(BalanceError::MixedSigns);
    }
    if coefficients.iter().any(|c| c.cmp0() == Ordering::Equal) {
        return Err(BalanceError::ZeroCoefficient);
    }

    let coefficients = coefficients.into_iter()
        .map(|c| c.to_u64().ok_or(BalanceError::CoefficientOverflow))
        .collect::<Result<Vec<_>, _>>()?;
    let product_coefficients = coefficients[reactants.len()..].to_vec();
    let reactant_coefficients = coefficients[..reactants.len()].to_vec();

    debug!("balanced via matrix null space");
    Ok(BalancedReaction {
        reactant_coefficients,
        product_coefficients,
        reactant_species: reactants,
        product_species: products,
        method: BalanceMethod::Matrix,
    })
}

/// Balances a reaction with the matrix method.
pub fn balance_reaction_info(s: &str) -> Result<BalancedReaction, BalanceError> {
    balance_reaction_with(s, None)
}

/// The net per-species coefficient map of a balanced reaction: reactants count positively,
/// products negatively, repeated species summed.
fn net_map(balanced: &BalancedReaction) -> BTreeMap<String, i64> {
    let mut map = BTreeMap::new();
    for (species, coefficient) in balanced.reactant_species.iter().zip(&balanced.reactant_coefficients) {
        *map.entry(species.clone()).or_insert(0) += *coefficient as i64;
    }
    for (species, coefficient) in balanced.product_species.iter().zip(&balanced.product_coefficients) {
        *map.entry(species.clone()).or_insert(0) -= *coefficient as i64;
    }
    map
}

/// Balances both reactions independently and compares their net coefficient maps. Balancing
/// normalizes to minimal integer coefficients, which is what makes differently-scaled inputs
/// compare equal.
pub fn reactions_equivalent(a: &str, b: &str) -> Result<bool, BalanceError> {
    let balanced_a = balance_reaction_info(a)?;
    let balanced_b = balance_reaction_info(b)?;
    Ok(net_map(&balanced_a) == net_map(&balanced_b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn water_formation() {
        let balanced = balance_reaction_info("H2 + O2 -> H2O").unwrap();
        assert_eq!(balanced.reactant_coefficients, vec![2, 1]);
        assert_eq!(balanced.product_coefficients, vec![2]);
        assert_eq!(balanced.method, BalanceMethod::Matrix);
    }

    #[test]
    fn fractional_hint_is_ignored() {
        let balanced = balance_reaction_info("H2 + 0.5 O2 -> H2O").unwrap();
        assert_eq!(balanced.reactant_coefficients, vec![2, 1]);
        assert_eq!(balanced.product_coefficients, vec![2]);
        assert_eq!(balanced.reactant_species, vec!["H2".to_string(), "O2".to_string()]);
    }

    #[test]
    fn photosynthesis() {
        let balanced = balance_reaction_info("CO2 + H2O -> C6H12O6 + O2").unwrap();
        assert_eq!(balanced.reactant_coefficients, vec![6, 6]);
        assert_eq!(balanced.product_coefficients, vec![1, 6]);
    }

    #[test]
    fn combustion_of_methane() {
        let balanced = balance_reaction_info("CH4 + O2 -> CO2 + H2O").unwrap();
        assert_eq!(balanced.reactant_coefficients, vec![1, 2]);
        assert_eq!(balanced.product_coefficients, vec![1, 2]);
    }

    #[test]
    fn coefficients_share_no_common_factor() {
        let balanced = balance_reaction_info("2H2 + 2O2 -> 2H2O2").unwrap();
        assert_eq!(balanced.reactant_coefficients, vec![1, 1]);
        assert_eq!(balanced.product_coefficients, vec![1]);
    }

    #[test]
    fn reversible_arrow_variants() {
        for reaction in ["H2 + O2 <=> H2O", "H2 + O2 ⇌ H2O", "H2 + O2 → H2O"] {
            let balanced = balance_reaction_info(reaction).unwrap();
            assert_eq!(balanced.reactant_coefficients, vec![2, 1]);
        }
    }

    #[test]
    fn missing_arrow_is_an_error() {
        assert_eq!(balance_reaction_info("H2 + O2").unwrap_err(), BalanceError::MissingArrow);
    }

    #[test]
    fn impossible_reaction_has_no_solution() {
        assert_eq!(
            balance_reaction_info("H2 -> O2").unwrap_err(),
            BalanceError::NoSolution,
        );
    }

    #[test]
    fn mixed_sign_null_space_is_a_failure() {
        // carbon cannot appear alone on the left with both oxides on the right
        assert_eq!(
            balance_reaction_info("C -> CO2 + O2").unwrap_err(),
            BalanceError::MixedSigns,
        );
    }

    #[test]
    fn scaled_reactions_are_equivalent() {
        assert!(reactions_equivalent("2H2+O2->2H2O", "H2+0.5 O2->H2O").unwrap());
    }

    #[test]
    fn different_reactions_are_not_equivalent() {
        assert!(!reactions_equivalent("H2 + O2 -> H2O", "H2 + O2 -> H2O2").unwrap());
    }

    #[test]
    fn library_path_is_used_when_every_coefficient_is_nonzero() {
        struct Stub;
        impl StoichiometricBalancer for Stub {
            fn balance(
                &self,
                reactants: &[String],
                products: &[String],
            ) -> Result<(HashMap<String, u64>, HashMap<String, u64>), BalanceError> {
                let mut r = HashMap::new();
                r.insert(reactants[0].clone(), 2);
                r.insert(reactants[1].clone(), 1);
                let mut p = HashMap::new();
                p.insert(products[0].clone(), 2);
                Ok((r, p))
            }
        }

        let balanced = balance_reaction_with("H2 + O2 -> H2O", Some(&Stub)).unwrap();
        assert_eq!(balanced.method, BalanceMethod::Library);
        assert_eq!(balanced.reactant_coefficients, vec![2, 1]);
    }

    #[test]
    fn library_zero_coefficient_falls_back_to_matrix() {
        struct Zeroes;
        impl StoichiometricBalancer for Zeroes {
            fn balance(
                &self,
                reactants: &[String],
                products: &[String],
            ) -> Result<(HashMap<String, u64>, HashMap<String, u64>), BalanceError> {
                let r = reactants.iter().map(|s| (s.clone(), 0)).collect();
                let p = products.iter().map(|s| (s.clone(), 0)).collect();
                Ok((r, p))
            }
        }

        let balanced = balance_reaction_with("H2 + O2 -> H2O", Some(&Zeroes)).unwrap();
        assert_eq!(balanced.method, BalanceMethod::Matrix);
        assert_eq!(balanced.reactant_coefficients, vec![2, 1]);
    }
}
