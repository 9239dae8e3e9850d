//! Per-variable domain assumptions.

use eqv_symbolic::{Domain, Sym, SymExpr};
use std::collections::HashMap;

/// Domain assumptions for the variables of a comparison: an optional blanket domain applied to
/// every variable, and per-variable overrides. An explicit per-variable tag always wins over
/// the blanket tag, so a variable can never carry two conflicting tags within one evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Assumptions {
    /// The domain applied to every variable without a specific tag.
    pub all: Option<Domain>,

    /// Per-variable domains.
    pub vars: HashMap<String, Domain>,
}

impl Assumptions {
    /// An assumption set with one blanket domain.
    pub fn all(domain: Domain) -> Self {
        Self { all: Some(domain), vars: HashMap::new() }
    }

    /// An assumption set for specific variables.
    pub fn vars<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = (S, Domain)>,
        S: Into<String>,
    {
        Self {
            all: None,
            vars: vars.into_iter().map(|(name, domain)| (name.into(), domain)).collect(),
        }
    }

    /// Resolves the domain for a variable: its specific tag if present, else the blanket tag.
    pub fn domain_for(&self, name: &str) -> Option<Domain> {
        self.vars.get(name).copied().or(self.all)
    }

    /// Rewrites every symbol of the expression to carry its resolved domain. Symbols with no
    /// resolved domain are left untouched.
    pub fn apply(&self, expr: &SymExpr) -> SymExpr {
        expr.map_symbols(&|sym| match self.domain_for(&sym.name) {
            Some(domain) => Sym::with_domain(sym.name.clone(), domain),
            None => sym.clone(),
        })
    }

    /// Parses an assumption set from JSON of the shape
    /// `{"all": "real", "vars": {"x": "positive", "n": "integer"}}`. Malformed input is
    /// treated as no assumptions.
    #[cfg(feature = "serde")]
    pub fn from_json(s: &str) -> Self {
        serde_json::from_str(s).unwrap_or_default()
    }
}

/// Rewrites every symbol of the expression to the real domain. This is the default applied
/// when a comparison is given no assumptions.
pub fn assume_all_real(expr: &SymExpr) -> SymExpr {
    expr.map_symbols(&|sym| Sym::with_domain(sym.name.clone(), Domain::Real))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn specific_tag_wins_over_blanket_tag() {
        let mut assumptions = Assumptions::all(Domain::Real);
        assumptions.vars.insert("n".to_string(), Domain::Integer);

        assert_eq!(assumptions.domain_for("x"), Some(Domain::Real));
        assert_eq!(assumptions.domain_for("n"), Some(Domain::Integer));
    }

    #[test]
    fn apply_rewrites_symbol_domains() {
        let assumptions = Assumptions::vars([("x", Domain::Positive)]);
        let expr = SymExpr::symbol("x");
        let applied = assumptions.apply(&expr);
        assert_eq!(applied.as_symbol().unwrap().domain, Domain::Positive);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_parsing_is_lenient() {
        let assumptions = Assumptions::from_json(r#"{"all": "real", "vars": {"x": "positive"}}"#);
        assert_eq!(assumptions.domain_for("x"), Some(Domain::Positive));
        assert_eq!(assumptions.domain_for("y"), Some(Domain::Real));

        assert_eq!(Assumptions::from_json("not json"), Assumptions::default());
    }
}
