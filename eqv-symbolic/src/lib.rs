//! Symbolic algebra engine for expression equivalence checking.
//!
//! The engine exposes the operations the similarity pipeline consumes:
//!
//! - conversion of a parsed AST into the flattened [`SymExpr`] tree;
//! - [`simplify()`], a rule-based rewriter that normalizes toward an expanded
//!   sum-of-products form;
//! - [`trig_simplify()`], [`expand_log()`] and [`combine_log()`] canonicalization passes;
//! - [`eval_deferred()`], which expands finite sums and products;
//! - [`eval()`], numeric evaluation of a tree at a point;
//! - free-variable enumeration and substitution on [`SymExpr`].
//!
//! All operations are pure: a [`SymExpr`] is never mutated in place, only rewritten into new
//! trees.

pub mod consts;
pub mod deferred;
pub mod eval;
pub mod expr;
pub mod logarithm;
pub mod primitive;
pub mod simplify;
pub mod trig;

pub use deferred::eval_deferred;
pub use eval::{eval, EvalError};
pub use expr::{Domain, Primary, Sym, SymExpr};
pub use logarithm::{combine_log, expand_log};
pub use simplify::simplify;
pub use trig::trig_simplify;
