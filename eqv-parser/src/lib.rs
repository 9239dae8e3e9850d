//! Tokenizer and parsers for mathematical input.
//!
//! Two parsing modes share one token stream and one AST:
//!
//! - **Plain-text mode** ([`Parser::new`]): calculator-style input with implicit multiplication
//!   (`2x`, `x(x + 1)`) and `^` exponentiation.
//! - **LaTeX mode** ([`Parser::new_latex`]): cleaned LaTeX math, covering `\frac`, `\sqrt`,
//!   `\left`/`\right` delimiters, absolute-value bars, named functions, greek letters,
//!   subscripted symbols, `\sum`/`\prod` bounds and top-level equations.
//!
//! Parsing produces a spanned [`parser::ast::Expr`]; all errors point back into the source
//! string and render through [`eqv_error::ErrorKind`].

pub mod parser;
pub mod tokenizer;

pub use parser::Parser;
