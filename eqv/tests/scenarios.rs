//! End-to-end scenarios over the public API.

use eqv::api;
use eqv::{Assumptions, Domain};
use pretty_assertions::assert_eq;

#[test]
fn binomial_square_matches_its_expansion() {
    let outcome = api::similarity("$(x+1)^2$", "$x^2+2x+1$", None);
    assert!(outcome.equivalent);
    assert_eq!(outcome.score, 1.0);
}

#[test]
fn sqrt_of_square_matches_abs_for_positive_x() {
    let assumptions = Assumptions::vars([("x", Domain::Positive)]);
    let outcome = api::similarity(r"$\sqrt{x^2}$", "$|x|$", Some(&assumptions));
    assert!(outcome.equivalent);
    assert_eq!(outcome.score, 1.0);
}

#[test]
fn latex_and_plain_text_forms_agree() {
    let outcome = api::similarity(r"$\frac{x^2 - 1}{x - 1}$", "x + 1", None);
    assert!(outcome.equivalent);
}

#[test]
fn non_equivalent_expressions_earn_partial_credit_from_shape() {
    let outcome = api::similarity("$(x+1)^2$", "$x^2+1$", None);
    assert!(!outcome.equivalent);
    assert!(outcome.score > 0.0);
    assert!(outcome.score < 1.0);

    let result = outcome.outcome.unwrap();
    let detail = &result.detail;
    assert_eq!(outcome.score, detail.weights.structure * detail.structure);
}

#[test]
fn equivalence_is_symmetric_at_the_api_level() {
    let ab = api::similarity("$2x$", "$x + x$", None);
    let ba = api::similarity("$x + x$", "$2x$", None);
    assert_eq!(ab.equivalent, ba.equivalent);
    assert_eq!(ab.score, ba.score);
    assert!(ab.equivalent);
}

#[test]
fn trig_identity_is_recognized() {
    let outcome = api::similarity(r"$\sin^2 x + \cos^2 x$", "$1$", None);
    assert!(outcome.equivalent);
}

#[test]
fn unparseable_input_is_reported_not_fatal() {
    let outcome = api::similarity(r"$\frac{1}$", "$1$", None);
    assert!(!outcome.equivalent);
    assert_eq!(outcome.score, 0.0);
    assert!(!outcome.a.errors.is_empty());
}

#[test]
fn water_is_water_however_it_is_written() {
    assert!(api::formulas_equivalent("H2O", "OH2").unwrap());
    assert!(!api::formulas_equivalent("H2O", "H2O2").unwrap());
}

#[test]
fn hydrate_composition() {
    let composition = api::normalize_formula("CuSO4·5H2O").unwrap();
    let expected: std::collections::BTreeMap<String, u64> = [("Cu", 1), ("S", 1), ("O", 9), ("H", 10)]
        .into_iter()
        .map(|(el, n)| (el.to_string(), n))
        .collect();
    assert_eq!(composition, expected);
}

#[test]
fn balancing_ignores_fractional_hints() {
    let balanced = api::balance_reaction_info("H2 + 0.5 O2 -> H2O").unwrap();
    assert_eq!(balanced.reactant_coefficients, vec![2, 1]);
    assert_eq!(balanced.product_coefficients, vec![2]);
}

#[test]
fn balanced_coefficients_share_no_common_factor() {
    for reaction in [
        "H2 + O2 -> H2O",
        "4H2 + 2O2 -> 4H2O",
        "CH4 + O2 -> CO2 + H2O",
        "CO2 + H2O -> C6H12O6 + O2",
    ] {
        let balanced = api::balance_reaction_info(reaction).unwrap();
        let mut coefficients = balanced.reactant_coefficients.clone();
        coefficients.extend(&balanced.product_coefficients);
        let gcd = coefficients.into_iter().fold(0u64, gcd);
        assert_eq!(gcd, 1, "{reaction}");
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

#[test]
fn scaled_reactions_are_equivalent() {
    assert!(api::reactions_equivalent("2H2+O2->2H2O", "H2+0.5 O2->H2O").unwrap());
    assert!(!api::reactions_equivalent("2H2+O2->2H2O", "CH4 + 2O2 -> CO2 + 2H2O").unwrap());
}
