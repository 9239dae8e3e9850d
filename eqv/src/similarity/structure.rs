//! Structural similarity of expression trees.

use eqv_symbolic::{Primary, SymExpr};
use std::collections::HashSet;
use std::hash::Hash;

/// Returns true if the node is an exact non-integer rational value (an explicit fraction).
/// Such nodes are treated as leaves, matching a tree shape with atomic rationals.
fn is_rational_leaf(expr: &SymExpr) -> bool {
    !expr.is_integer() && expr.as_rational().is_some()
}

/// The label of a node: symbols are distinguished by name, integers by value, rationals by
/// numerator/denominator, floats by a generic tag, calls by function name, and the remaining
/// operators by kind.
fn label(expr: &SymExpr) -> String {
    if is_rational_leaf(expr) {
        return format!("Rat:{}", expr.as_rational().unwrap());
    }

    match expr {
        SymExpr::Primary(Primary::Integer(n)) => format!("Int:{}", n),
        SymExpr::Primary(Primary::Float(_)) => "Float".to_string(),
        SymExpr::Primary(Primary::Symbol(sym)) => format!("Sym:{}", sym.name),
        SymExpr::Primary(Primary::Call(name, _)) => name.clone(),
        SymExpr::Add(_) => "Add".to_string(),
        SymExpr::Mul(_) => "Mul".to_string(),
        SymExpr::Exp(..) => "Pow".to_string(),
    }
}

/// Collects the node-label set and the directed label-pair edge set of the tree. Repeated
/// identical sub-structures collapse to the same labels.
fn collect(
    expr: &SymExpr,
    nodes: &mut HashSet<String>,
    edges: &mut HashSet<(String, String)>,
) {
    let parent = label(expr);
    nodes.insert(parent.clone());

    if is_rational_leaf(expr) {
        return;
    }

    for child in expr.children() {
        edges.insert((parent.clone(), label(child)));
        collect(child, nodes, edges);
    }
}

/// Jaccard similarity of two sets; two empty sets are defined as identical (1.0).
fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Computes a continuous similarity in `[0, 1]` between two expression trees, independent of
/// equivalence: the even combination of the Jaccard similarity of the node-label sets and of
/// the directed label-pair edge sets.
pub fn structure_similarity(expr1: &SymExpr, expr2: &SymExpr) -> f64 {
    let (mut nodes1, mut edges1) = (HashSet::new(), HashSet::new());
    let (mut nodes2, mut edges2) = (HashSet::new(), HashSet::new());
    collect(expr1, &mut nodes1, &mut edges1);
    collect(expr2, &mut nodes2, &mut edges2);

    0.5 * jaccard(&nodes1, &nodes2) + 0.5 * jaccard(&edges1, &edges2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::assert_float_absolute_eq;
    use eqv_parser::Parser;

    fn convert(source: &str) -> SymExpr {
        SymExpr::from(Parser::new(source).parse_full().unwrap())
    }

    #[test]
    fn identical_trees_score_one() {
        let expr = convert("x^2 + 2x + 1");
        assert_float_absolute_eq!(structure_similarity(&expr, &expr), 1.0);
    }

    #[test]
    fn distinct_leaves_share_only_the_empty_edge_set() {
        // node sets are disjoint; both edge sets are empty and empty sets count as identical
        assert_float_absolute_eq!(structure_similarity(&convert("x"), &convert("y")), 0.5);
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = convert("x^2 + 2x + 1");
        let b = convert("(x + 1)^2");
        assert_float_absolute_eq!(
            structure_similarity(&a, &b),
            structure_similarity(&b, &a),
        );
    }

    #[test]
    fn score_is_within_bounds() {
        let pairs = [
            ("x^2", "x^2 + 1"),
            ("sin(x)", "cos(x)"),
            ("1/2", "1/3"),
            ("x y z", "x + y + z"),
        ];
        for (a, b) in pairs {
            let score = structure_similarity(&convert(a), &convert(b));
            assert!((0.0..=1.0).contains(&score), "{a} vs {b}: {score}");
        }
    }

    #[test]
    fn overlapping_trees_score_in_between() {
        let score = structure_similarity(&convert("x^2"), &convert("x^2 + 1"));
        assert!(score > 0.0 && score < 1.0, "{score}");
    }
}
