//! A representation of mathematical expressions that is easier to manipulate than an AST.
//!
//! The [`Expr`](eqv_parser::parser::ast::Expr) type from `eqv_parser` is a recursive `enum` that
//! represents the AST of a mathematical expression. It's convenient for parsing, but not so much
//! for algebraic manipulation.
//!
//! This module defines a separate type, [`SymExpr`], that simplifies the AST by recursively
//! flattening it into a list of terms or factors, depending on the operation, and normalizing
//! the expression into a sum of products.
//!
//! # Strict equality
//!
//! The [`PartialEq`] implementation for [`SymExpr`] implements **strict equality**: two
//! expressions are strictly equal if they are the same kind of node with strictly equal
//! children, where the terms of an [`SymExpr::Add`] and the factors of an [`SymExpr::Mul`]
//! may appear in any order. Strict equality is a subset of semantic equality; it can never
//! report false positives, and it does not depend on simplification to work. `x^2 + 2x + 1`
//! and `(x + 1)^2` are semantically equal but **not** strictly equal.

mod iter;

use crate::primitive::{float, float_from_str, int, int_from_str};
use crate::simplify::fraction::make_fraction;
use eqv_parser::parser::ast::{BinOpKind, Expr as AstExpr, Literal, UnaryOpKind};
use iter::ExprIter;
use rug::{Float, Integer, Rational};
use std::collections::{BTreeSet, HashMap};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg};

/// Symbol names that denote mathematical constants rather than free variables.
pub const CONSTANT_NAMES: &[&str] = &["pi", "e"];

/// The domain a symbol is assumed to range over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Domain {
    /// No assumption.
    #[default]
    Unconstrained,

    /// The symbol is real.
    Real,

    /// The symbol is real and strictly positive.
    Positive,

    /// The symbol is an integer.
    Integer,
}

impl Domain {
    /// Returns true if the domain implies the symbol is real.
    pub fn is_real(self) -> bool {
        matches!(self, Domain::Real | Domain::Positive | Domain::Integer)
    }
}

/// A variable together with its assumed domain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sym {
    /// The name of the symbol.
    pub name: String,

    /// The domain the symbol ranges over.
    pub domain: Domain,
}

impl Sym {
    /// Creates a symbol with no domain assumption.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), domain: Domain::Unconstrained }
    }

    /// Creates a symbol with the given domain.
    pub fn with_domain(name: impl Into<String>, domain: Domain) -> Self {
        Self { name: name.into(), domain }
    }
}

/// A single term / factor, such as a number, variable, or function call.
#[derive(Debug, Clone, PartialEq)]
pub enum Primary {
    /// An integer, such as `2` or `144`.
    Integer(Integer),

    /// A floating-point number, such as `3.14` or `0.5`.
    Float(Float),

    /// A variable, such as `x` or `y`.
    Symbol(Sym),

    /// A function call, such as `sin(x)` or `abs(x)`.
    Call(String, Vec<SymExpr>),
}

/// This module **must never** produce non-normal [`Float`]s (such as `NaN` or `Infinity`);
/// numeric evaluation reports them as errors before they can enter a tree.
impl Eq for Primary {}

impl std::fmt::Display for Primary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(num) => write!(f, "{}", num),
            Self::Float(num) => write!(f, "{}", num.to_f64()),
            Self::Symbol(sym) => write!(f, "{}", sym.name),
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                let mut iter = args.iter();
                if let Some(arg) = iter.next() {
                    write!(f, "{}", arg)?;
                    for arg in iter {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}

/// Adds two [`Primary`]s together. If both are the **same numeric type**, the numbers are added
/// together. Otherwise, the two [`Primary`]s are wrapped in an [`SymExpr::Add`].
impl Add<Primary> for Primary {
    type Output = SymExpr;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Primary::Integer(lhs), Primary::Integer(rhs)) => {
                SymExpr::Primary(Primary::Integer(lhs + rhs))
            },
            (Primary::Float(lhs), Primary::Float(rhs)) => {
                SymExpr::Primary(Primary::Float(lhs + rhs))
            },
            (lhs, rhs) => SymExpr::Add(vec![
                SymExpr::Primary(lhs),
                SymExpr::Primary(rhs),
            ]),
        }
    }
}

/// Multiplies two [`Primary`]s together. If both are the **same numeric type**, the numbers are
/// multiplied together. Otherwise, the two [`Primary`]s are wrapped in an [`SymExpr::Mul`].
impl Mul<Primary> for Primary {
    type Output = SymExpr;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Primary::Integer(lhs), Primary::Integer(rhs)) => {
                SymExpr::Primary(Primary::Integer(lhs * rhs))
            },
            (Primary::Float(lhs), Primary::Float(rhs)) => {
                SymExpr::Primary(Primary::Float(lhs * rhs))
            },
            (lhs, rhs) => SymExpr::Mul(vec![
                SymExpr::Primary(lhs),
                SymExpr::Primary(rhs),
            ]),
        }
    }
}

/// A mathematical expression with information about its terms and factors.
///
/// This type **flattens** out the tree structure of the AST: the expression `x + (y + z)` is
/// represented as a single [`SymExpr::Add`] node with _three_ children, `x`, `y`, and `z`.
#[derive(Debug, Clone, Eq)]
pub enum SymExpr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<SymExpr>),

    /// Multiple factors multiplied together.
    Mul(Vec<SymExpr>),

    /// An expression raised to a power.
    Exp(Box<SymExpr>, Box<SymExpr>),
}

/// Compares two term / factor lists as multisets: every element of `lhs` must pair with a
/// distinct, strictly equal element of `rhs`.
fn multiset_eq(lhs: &[SymExpr], rhs: &[SymExpr]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }

    let mut used = vec![false; rhs.len()];
    'terms: for term in lhs {
        for (i, other) in rhs.iter().enumerate() {
            if !used[i] && term == other {
                used[i] = true;
                continue 'terms;
            }
        }
        return false;
    }
    true
}

/// Checks if two expressions are **strictly** equal. See the
/// [module-level documentation](self) for what that means.
impl PartialEq for SymExpr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs == rhs,
            (Self::Add(lhs), Self::Add(rhs)) | (Self::Mul(lhs), Self::Mul(rhs)) => {
                multiset_eq(lhs, rhs)
            },
            (Self::Exp(lhs_base, lhs_exp), Self::Exp(rhs_base, rhs_exp)) => {
                lhs_base == rhs_base && lhs_exp == rhs_exp
            },
            _ => false,
        }
    }
}

impl std::fmt::Display for SymExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        /// Rough precedence for parenthesization while printing.
        fn level(expr: &SymExpr) -> u8 {
            match expr {
                SymExpr::Primary(_) => 3,
                SymExpr::Exp(..) => 2,
                SymExpr::Mul(_) => 1,
                SymExpr::Add(_) => 0,
            }
        }

        fn write_child(
            f: &mut std::fmt::Formatter<'_>,
            child: &SymExpr,
            min: u8,
        ) -> std::fmt::Result {
            if level(child) < min {
                write!(f, "({})", child)
            } else {
                write!(f, "{}", child)
            }
        }

        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => {
                let mut iter = terms.iter();
                if let Some(term) = iter.next() {
                    write!(f, "{}", term)?;
                    for term in iter {
                        write!(f, " + {}", term)?;
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let mut iter = factors.iter();
                if let Some(factor) = iter.next() {
                    write_child(f, factor, 1)?;
                    for factor in iter {
                        write!(f, " * ")?;
                        write_child(f, factor, 1)?;
                    }
                }
                Ok(())
            },
            Self::Exp(base, exp) => {
                write_child(f, base, 3)?;
                write!(f, "^")?;
                write_child(f, exp, 3)
            },
        }
    }
}

impl SymExpr {
    /// The integer zero.
    pub fn zero() -> Self {
        Self::Primary(Primary::Integer(int(0)))
    }

    /// The integer one.
    pub fn one() -> Self {
        Self::Primary(Primary::Integer(int(1)))
    }

    /// Creates a symbol expression with no domain assumption.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Primary(Primary::Symbol(Sym::new(name)))
    }

    /// If the expression is a [`Primary::Integer`], returns a reference to the contained integer.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Primary(Primary::Integer(int)) => Some(int),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Integer`], returns the contained integer.
    pub fn into_integer(self) -> Option<Integer> {
        match self {
            Self::Primary(Primary::Integer(int)) => Some(int),
            _ => None,
        }
    }

    /// Returns true if the expression is a [`Primary::Integer`].
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Primary(Primary::Integer(_)))
    }

    /// Returns true if the expression is a [`Primary::Float`].
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Primary(Primary::Float(_)))
    }

    /// Returns true if the expression is a [`Primary::Integer`] raised to the power of -1.
    pub fn is_integer_recip(&self) -> bool {
        self.as_integer_recip().is_some()
    }

    /// If the expression is a [`Primary::Integer`] raised to the power of -1, returns a
    /// reference to the contained integer (the denominator of the fraction).
    pub fn as_integer_recip(&self) -> Option<&Integer> {
        if let Self::Exp(base, exp) = self {
            if let Self::Primary(Primary::Integer(exp)) = &**exp {
                if exp == &-1 {
                    return base.as_integer();
                }
            }
        }

        None
    }

    /// If the expression is a [`Primary::Integer`] raised to the power of -1, returns the
    /// contained integer (the denominator of the fraction).
    pub fn into_integer_recip(self) -> Option<Integer> {
        if let Self::Exp(base, exp) = self {
            if let Self::Primary(Primary::Integer(exp)) = *exp {
                if exp == -1 {
                    return base.into_integer();
                }
            }
        }

        None
    }

    /// If the expression is a [`Primary::Symbol`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&Sym> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Call`], returns the name and arguments.
    pub fn as_call(&self) -> Option<(&str, &[SymExpr])> {
        match self {
            Self::Primary(Primary::Call(name, args)) => Some((name, args)),
            _ => None,
        }
    }

    /// Returns true if the expression is the integer zero or a zero float.
    pub fn is_zero_value(&self) -> bool {
        match self {
            Self::Primary(Primary::Integer(n)) => n.is_zero(),
            Self::Primary(Primary::Float(f)) => f.is_zero(),
            _ => false,
        }
    }

    /// If the expression is an exact rational value (an integer, an integer reciprocal, or a
    /// product of those), returns it.
    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            Self::Primary(Primary::Integer(n)) => Some(Rational::from(n.clone())),
            Self::Exp(..) => {
                let denom = self.as_integer_recip()?;
                if denom.is_zero() {
                    return None;
                }
                Some(Rational::from((int(1), denom.clone())))
            },
            Self::Mul(factors) => {
                let mut value = Rational::from(1);
                for factor in factors {
                    if let Some(n) = factor.as_integer() {
                        value *= Rational::from(n.clone());
                    } else if let Some(d) = factor.as_integer_recip() {
                        if d.is_zero() {
                            return None;
                        }
                        value /= Rational::from(d.clone());
                    } else {
                        return None;
                    }
                }
                Some(value)
            },
            _ => None,
        }
    }

    /// Builds the canonical expression for an exact rational value: a plain integer, or an
    /// `n * d^-1` explicit fraction.
    pub fn from_rational(value: Rational) -> Self {
        if value.is_integer() {
            Self::Primary(Primary::Integer(value.into_numer_denom().0))
        } else {
            let (numer, denom) = value.into_numer_denom();
            make_fraction(
                Self::Primary(Primary::Integer(numer)),
                Self::Primary(Primary::Integer(denom)),
            )
        }
    }

    /// If the expression is an exact numeric value (rational or float), returns it as a
    /// [`Float`].
    pub fn as_number(&self) -> Option<Float> {
        match self {
            Self::Primary(Primary::Float(f)) => Some(f.clone()),
            _ => self.as_rational().map(float),
        }
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in an [`SymExpr::Add`] with zero / one term, or an
    /// [`SymExpr::Mul`] with zero / one factor. This function checks for these cases and
    /// simplifies the expression into the single term / factor, or a [`SymExpr::Primary`]
    /// containing the integer 0 or 1.
    pub fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::zero()
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::one()
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Applies `f` to every direct child of this node, returning the rewritten node. The
    /// building block for bottom-up rewrite passes.
    pub fn map_children(&self, f: impl Fn(&SymExpr) -> SymExpr) -> SymExpr {
        match self {
            Self::Primary(Primary::Call(name, args)) => Self::Primary(Primary::Call(
                name.clone(),
                args.iter().map(|arg| f(arg)).collect(),
            )),
            Self::Primary(primary) => Self::Primary(primary.clone()),
            Self::Add(terms) => Self::Add(terms.iter().map(|term| f(term)).collect()),
            Self::Mul(factors) => Self::Mul(factors.iter().map(|factor| f(factor)).collect()),
            Self::Exp(base, exp) => Self::Exp(Box::new(f(base)), Box::new(f(exp))),
        }
    }

    /// Returns the direct children of this node.
    pub fn children(&self) -> Vec<&SymExpr> {
        match self {
            Self::Primary(Primary::Call(_, args)) => args.iter().collect(),
            Self::Primary(_) => Vec::new(),
            Self::Add(terms) => terms.iter().collect(),
            Self::Mul(factors) => factors.iter().collect(),
            Self::Exp(base, exp) => vec![&**base, &**exp],
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns the names of the free variables of the expression. Constant symbols (`pi`, `e`)
    /// are not free.
    pub fn free_variables(&self) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        for expr in self.post_order_iter() {
            if let Some(sym) = expr.as_symbol() {
                if !CONSTANT_NAMES.contains(&sym.name.as_str()) {
                    vars.insert(sym.name.clone());
                }
            }
        }
        vars
    }

    /// Rewrites every symbol in the expression with the given function.
    pub fn map_symbols(&self, f: &impl Fn(&Sym) -> Sym) -> SymExpr {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Self::Primary(Primary::Symbol(f(sym))),
            Self::Primary(Primary::Call(name, args)) => Self::Primary(Primary::Call(
                name.clone(),
                args.iter().map(|arg| arg.map_symbols(f)).collect(),
            )),
            Self::Primary(primary) => Self::Primary(primary.clone()),
            Self::Add(terms) => Self::Add(terms.iter().map(|term| term.map_symbols(f)).collect()),
            Self::Mul(factors) => {
                Self::Mul(factors.iter().map(|factor| factor.map_symbols(f)).collect())
            },
            Self::Exp(base, exp) => Self::Exp(
                Box::new(base.map_symbols(f)),
                Box::new(exp.map_symbols(f)),
            ),
        }
    }

    /// Replaces every symbol whose name appears in the map with the mapped expression.
    pub fn substitute(&self, bindings: &HashMap<String, SymExpr>) -> SymExpr {
        match self {
            Self::Primary(Primary::Symbol(sym)) => match bindings.get(&sym.name) {
                Some(expr) => expr.clone(),
                None => self.clone(),
            },
            Self::Primary(Primary::Call(name, args)) => Self::Primary(Primary::Call(
                name.clone(),
                args.iter().map(|arg| arg.substitute(bindings)).collect(),
            )),
            Self::Primary(primary) => Self::Primary(primary.clone()),
            Self::Add(terms) => {
                Self::Add(terms.iter().map(|term| term.substitute(bindings)).collect())
            },
            Self::Mul(factors) => {
                Self::Mul(factors.iter().map(|factor| factor.substitute(bindings)).collect())
            },
            Self::Exp(base, exp) => Self::Exp(
                Box::new(base.substitute(bindings)),
                Box::new(exp.substitute(bindings)),
            ),
        }
    }

    /// Returns true if every symbol in the expression is known to be real.
    pub fn all_symbols_real(&self) -> bool {
        self.post_order_iter().all(|expr| {
            expr.as_symbol().map_or(true, |sym| {
                sym.domain.is_real() || CONSTANT_NAMES.contains(&sym.name.as_str())
            })
        })
    }
}

impl Add for SymExpr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs + rhs,
            (Self::Add(mut terms), Self::Add(others)) => {
                terms.extend(others);
                Self::Add(terms)
            },
            (Self::Add(mut terms), rhs) => {
                terms.push(rhs);
                Self::Add(terms)
            },
            (lhs, Self::Add(others)) => {
                let mut terms = vec![lhs];
                terms.extend(others);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

impl AddAssign for SymExpr {
    fn add_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Self::Add(Vec::new()));
        *self = lhs + rhs;
    }
}

impl Mul for SymExpr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs * rhs,
            (Self::Mul(mut factors), Self::Mul(others)) => {
                factors.extend(others);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), rhs) => {
                factors.push(rhs);
                Self::Mul(factors)
            },
            (lhs, Self::Mul(others)) => {
                let mut factors = vec![lhs];
                factors.extend(others);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

impl MulAssign for SymExpr {
    fn mul_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Self::Mul(Vec::new()));
        *self = lhs * rhs;
    }
}

impl Neg for SymExpr {
    type Output = Self;

    fn neg(self) -> Self {
        match self {
            Self::Primary(Primary::Integer(n)) => Self::Primary(Primary::Integer(-n)),
            Self::Primary(Primary::Float(f)) => Self::Primary(Primary::Float(-f)),
            Self::Mul(mut factors) => {
                factors.insert(0, Self::Primary(Primary::Integer(int(-1))));
                Self::Mul(factors)
            },
            expr => Self::Mul(vec![Self::Primary(Primary::Integer(int(-1))), expr]),
        }
    }
}

impl From<AstExpr> for SymExpr {
    fn from(expr: AstExpr) -> Self {
        match expr {
            AstExpr::Literal(literal) => match literal {
                Literal::Integer(int) => Self::Primary(Primary::Integer(int_from_str(&int.value))),
                Literal::Float(float) => Self::Primary(Primary::Float(float_from_str(&float.value))),
                Literal::Symbol(sym) => Self::Primary(Primary::Symbol(Sym::new(sym.name))),
            },
            AstExpr::Paren(paren) => Self::from(*paren.expr),
            AstExpr::Abs(abs) => {
                Self::Primary(Primary::Call("abs".to_string(), vec![Self::from(*abs.expr)]))
            },
            AstExpr::Call(call) => {
                let name = call.name.name;
                let mut args = call.args.into_iter().map(Self::from).collect::<Vec<_>>();

                // `sqrt(x)` is `x^(1/2)` and `root(x, n)` is `x^(1/n)`, matching the power
                // representation used everywhere else
                if name == "sqrt" && args.len() == 1 {
                    return Self::Exp(
                        Box::new(args.remove(0)),
                        Box::new(make_fraction(Self::one(), Self::Primary(Primary::Integer(int(2))))),
                    );
                }
                if name == "root" && args.len() == 2 {
                    let operand = args.remove(0);
                    let index = args.remove(0);
                    return Self::Exp(
                        Box::new(operand),
                        Box::new(make_fraction(Self::one(), index)),
                    );
                }

                Self::Primary(Primary::Call(name, args))
            },
            AstExpr::Unary(unary) => match unary.op {
                UnaryOpKind::Neg => Self::from(*unary.operand).neg(),
            },
            AstExpr::Binary(bin) => match bin.op {
                BinOpKind::Exp => {
                    // a power with the bare constant `e` as its base is the exponential function
                    let is_e_base = matches!(
                        bin.lhs.innermost(),
                        AstExpr::Literal(Literal::Symbol(sym)) if sym.name == "e"
                    );
                    if is_e_base {
                        Self::Primary(Primary::Call(
                            "exp".to_string(),
                            vec![Self::from(*bin.rhs)],
                        ))
                    } else {
                        Self::Exp(Box::new(Self::from(*bin.lhs)), Box::new(Self::from(*bin.rhs)))
                    }
                },
                BinOpKind::Mul => Self::from(*bin.lhs) * Self::from(*bin.rhs),
                BinOpKind::Div => make_fraction(Self::from(*bin.lhs), Self::from(*bin.rhs)),
                BinOpKind::Add => Self::from(*bin.lhs) + Self::from(*bin.rhs),
                // `lhs - rhs`, and equations `lhs = rhs`, become `lhs + (-1 * rhs)`
                BinOpKind::Sub | BinOpKind::Eq => {
                    Self::from(*bin.lhs) + Self::from(*bin.rhs).neg()
                },
            },
        }
    }
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
    fn addition_flattens() {
        assert_eq!(convert("x + (y + z)"), SymExpr::Add(vec![
            SymExpr::symbol("x"),
            SymExpr::symbol("y"),
            SymExpr::symbol("z"),
        ]));
    }

    #[test]
    fn strict_equality_ignores_term_order() {
        assert_eq!(convert("x + y"), convert("y + x"));
        assert_eq!(convert("2x y"), convert("y * 2x"));
    }

    #[test]
    fn strict_equality_counts_duplicates() {
        assert_ne!(convert("x + x + y"), convert("x + y + y"));
    }

    #[test]
    fn division_is_an_explicit_fraction() {
        let expr = convert("1/2");
        assert_eq!(expr.as_rational(), Some(Rational::from((1, 2))));
    }

    #[test]
    fn e_power_is_the_exponential() {
        let expr = convert("e^x");
        let (name, args) = expr.as_call().unwrap();
        assert_eq!(name, "exp");
        assert_eq!(args, &[SymExpr::symbol("x")]);
    }

    #[test]
    fn free_variables_exclude_constants() {
        let vars = convert("pi x + e").free_variables();
        assert_eq!(vars.into_iter().collect::<Vec<_>>(), vec!["x".to_string()]);
    }

    #[test]
    fn substitution_replaces_symbols() {
        let expr = convert("x^2 + y");
        let bindings = HashMap::from([("x".to_string(), SymExpr::Primary(Primary::Integer(int(3))))]);
        assert_eq!(expr.substitute(&bindings), convert("3^2 + y"));
    }
}
