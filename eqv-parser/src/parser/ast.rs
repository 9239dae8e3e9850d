//! The abstract syntax tree produced by the parsers.
//!
//! Every node carries the region of the source string it was parsed from, so that errors
//! reported by later stages can point back into the user's input.

use std::ops::Range;

/// A parsed integer literal, kept as its source digits.
#[derive(Debug, Clone, PartialEq)]
pub struct LitInt {
    /// The digits of the integer.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

/// A parsed floating-point literal, kept as its source digits.
#[derive(Debug, Clone, PartialEq)]
pub struct LitFloat {
    /// The digits of the float.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

/// A symbol, such as `x`, `pi`, or a subscripted name like `x_1`.
#[derive(Debug, Clone, PartialEq)]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this symbol was parsed from.
    pub span: Range<usize>,
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// An integer, such as `2` or `144`.
    Integer(LitInt),

    /// A floating-point number, such as `3.14` or `0.5`.
    Float(LitFloat),

    /// A symbol, such as `x`.
    Symbol(LitSym),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Integer(int) => int.span.clone(),
            Literal::Float(float) => float.span.clone(),
            Literal::Symbol(sym) => sym.span.clone(),
        }
    }
}

/// A parenthesized (or brace-grouped) expression, such as `(1 + 2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Paren {
    /// The expression inside the parentheses.
    pub expr: Box<Expr>,

    /// The region of the source code that this expression was parsed from.
    pub span: Range<usize>,
}

/// An expression surrounded by absolute-value delimiters, such as `|x|` or
/// `\left| x \right|`.
#[derive(Debug, Clone, PartialEq)]
pub struct Abs {
    /// The expression inside the delimiters.
    pub expr: Box<Expr>,

    /// The region of the source code that this expression was parsed from.
    pub span: Range<usize>,
}

/// A function call, such as `sin(x)` or `\sqrt{2}`. The deferred operations `sum` and `prod`
/// are represented as calls with four arguments: body, bound variable, lower and upper bound.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// The name of the function.
    pub name: LitSym,

    /// The arguments of the call.
    pub args: Vec<Expr>,

    /// The region of the source code that this call was parsed from.
    pub span: Range<usize>,
}

/// The kind of a unary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOpKind {
    /// Numeric negation.
    Neg,
}

/// A unary operation, such as `-x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    /// The kind of operation.
    pub op: UnaryOpKind,

    /// The operand.
    pub operand: Box<Expr>,

    /// The region of the source code that this expression was parsed from.
    pub span: Range<usize>,
}

/// The kind of a binary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    /// Addition.
    Add,

    /// Subtraction.
    Sub,

    /// Multiplication (explicit or implicit).
    Mul,

    /// Division, including `\frac`.
    Div,

    /// Exponentiation.
    Exp,

    /// An equation, only produced in LaTeX mode.
    Eq,
}

/// A binary operation, such as `1 + 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOpKind,

    /// Whether the operator was implicit (adjacent primaries multiplying).
    pub implicit: bool,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

/// Represents a general parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),

    /// An absolute value, such as `|x|`.
    Abs(Abs),

    /// A function call, such as `abs(-1)`.
    Call(Call),

    /// A unary operation, such as `-1`.
    Unary(Unary),

    /// A binary operation, such as `1 + 2`.
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span.clone(),
            Expr::Abs(abs) => abs.span.clone(),
            Expr::Call(call) => call.span.clone(),
            Expr::Unary(unary) => unary.span.clone(),
            Expr::Binary(binary) => binary.span.clone(),
        }
    }

    /// Strips any number of surrounding [`Expr::Paren`] layers.
    pub fn innermost(&self) -> &Expr {
        match self {
            Expr::Paren(paren) => paren.expr.innermost(),
            expr => expr,
        }
    }
}
