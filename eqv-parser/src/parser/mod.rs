pub mod ast;
pub mod error;

mod latex;

use crate::tokenizer::{tokenize_complete, Token, TokenKind};
use ast::{Binary, BinOpKind, Call, Expr, LitFloat, LitInt, LitSym, Literal, Paren, Unary, UnaryOpKind};
use eqv_error::{Error, ErrorKind};
use std::ops::Range;

/// Operator precedence levels, from lowest (evaluated last) to highest.
pub(crate) mod precedence {
    /// Equations (`lhs = rhs`), LaTeX mode only.
    pub const EQUATION: u8 = 1;

    /// Addition and subtraction.
    pub const TERM: u8 = 2;

    /// Multiplication (explicit or implicit) and division.
    pub const FACTOR: u8 = 3;
}

/// Function names understood by both parsing modes, under their canonical spelling.
pub(crate) const KNOWN_FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "cot", "sec", "csc",
    "asin", "acos", "atan", "acot",
    "sinh", "cosh", "tanh", "coth",
    "log", "exp", "sqrt", "root", "abs",
    "sum", "prod",
];

/// Maps alias spellings (`ln`, `arcsin`, ...) onto the canonical function names.
pub(crate) fn canonical_function(name: &str) -> &str {
    match name {
        "ln" => "log",
        "arcsin" => "asin",
        "arccos" => "acos",
        "arctan" => "atan",
        "arccot" => "acot",
        name => name,
    }
}

/// Returns true if the given name is a function name in either spelling.
pub(crate) fn is_known_function(name: &str) -> bool {
    KNOWN_FUNCTIONS.contains(&canonical_function(name))
}

/// A high-level parser for mathematical input. This is the type to use to parse an arbitrary
/// piece of text into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// Whether the parser is operating in LaTeX mode.
    latex: bool,

    /// The number of bare `|` absolute-value groups currently open. While non-zero, a `|` token
    /// closes a group instead of opening a new one.
    abs_depth: usize,
}

impl<'source> Parser<'source> {
    /// Create a new plain-text-mode parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
            latex: false,
            abs_depth: 0,
        }
    }

    /// Create a new LaTeX-mode parser for the given source.
    pub fn new_latex(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
            latex: true,
            abs_depth: 0,
        }
    }

    /// Returns a span pointing at the end of the source code.
    fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the index of the next non-whitespace token, if any.
    fn peek_index(&self) -> Option<usize> {
        (self.cursor..self.tokens.len()).find(|&i| !self.tokens[i].is_whitespace())
    }

    /// Returns the next non-whitespace token without consuming it.
    fn peek_token(&self) -> Option<&Token<'source>> {
        self.peek_index().map(|i| &self.tokens[i])
    }

    /// Returns the span of the next non-whitespace token, or the end of the source code if there
    /// is none.
    fn span(&self) -> Range<usize> {
        self.peek_token().map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Creates an error that points at the next token, or the end of the source code if the
    /// stream is exhausted.
    fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Consumes and returns the next non-whitespace token, advancing the cursor past it.
    fn bump(&mut self) -> Option<Token<'source>> {
        let i = self.peek_index()?;
        self.cursor = i + 1;
        Some(self.tokens[i].clone())
    }

    /// Consumes the next token, requiring it to be of the given kind.
    fn expect(&mut self, kind: TokenKind) -> Result<Token<'source>, Error> {
        match self.peek_token() {
            Some(token) if token.kind == kind => Ok(self.bump().unwrap()),
            Some(token) => {
                let found = token.lexeme.to_string();
                Err(self.error(error::UnexpectedToken { found }))
            },
            None => Err(self.error(error::UnexpectedEof)),
        }
    }

    /// Parses the full source as one expression. All tokens must be consumed; if not, an error
    /// is returned.
    pub fn parse_full(&mut self) -> Result<Expr, Error> {
        let expr = self.parse_expr(precedence::EQUATION)?;
        match self.peek_token() {
            Some(_) => Err(self.error(error::ExpectedEof)),
            None => Ok(expr),
        }
    }

    /// Returns true if the next token can begin a primary expression, which decides whether
    /// implicit multiplication applies.
    fn starts_primary(&self) -> bool {
        let Some(token) = self.peek_token() else { return false };
        match token.kind {
            TokenKind::Int | TokenKind::Float | TokenKind::Name | TokenKind::OpenParen => true,
            TokenKind::OpenBrace => self.latex,
            TokenKind::Pipe => self.latex && self.abs_depth == 0,
            TokenKind::Command => {
                self.latex
                    && !matches!(token.command_name(), "cdot" | "times" | "div" | "right" | "rvert")
            },
            _ => false,
        }
    }

    /// Precedence-climbing loop for binary operators and implicit multiplication.
    fn parse_expr(&mut self, min: u8) -> Result<Expr, Error> {
        let mut lhs = self.parse_unary()?;

        loop {
            let Some(token) = self.peek_token() else { break };
            let op = match token.kind {
                TokenKind::Add => Some((BinOpKind::Add, precedence::TERM)),
                TokenKind::Sub => Some((BinOpKind::Sub, precedence::TERM)),
                TokenKind::Mul => Some((BinOpKind::Mul, precedence::FACTOR)),
                TokenKind::Div => Some((BinOpKind::Div, precedence::FACTOR)),
                TokenKind::Eq if self.latex => Some((BinOpKind::Eq, precedence::EQUATION)),
                TokenKind::Command if self.latex => match token.command_name() {
                    "cdot" | "times" => Some((BinOpKind::Mul, precedence::FACTOR)),
                    "div" => Some((BinOpKind::Div, precedence::FACTOR)),
                    _ => None,
                },
                _ => None,
            };

            if let Some((kind, prec)) = op {
                if prec < min {
                    break;
                }
                self.bump();
                let rhs = self.parse_expr(prec + 1)?;
                lhs = binary(lhs, kind, false, rhs);
            } else if precedence::FACTOR >= min && self.starts_primary() {
                // no operator, but another primary follows: implicit multiplication
                let rhs = self.parse_expr(precedence::FACTOR + 1)?;
                lhs = binary(lhs, BinOpKind::Mul, true, rhs);
            } else {
                break;
            }
        }

        Ok(lhs)
    }

    /// Parses an optionally signed expression. `-x^2` parses as `-(x^2)`.
    fn parse_unary(&mut self) -> Result<Expr, Error> {
        match self.peek_token().map(|token| token.kind) {
            Some(TokenKind::Sub) => {
                let op_span = self.span();
                self.bump();
                let operand = self.parse_unary()?;
                let span = op_span.start..operand.span().end;
                Ok(Expr::Unary(Unary {
                    op: UnaryOpKind::Neg,
                    operand: Box::new(operand),
                    span,
                }))
            },
            // unary plus is a no-op
            Some(TokenKind::Add) => {
                self.bump();
                self.parse_unary()
            },
            _ => self.parse_exponent_chain(),
        }
    }

    /// Parses a primary expression followed by an optional right-associative `^` exponent.
    fn parse_exponent_chain(&mut self) -> Result<Expr, Error> {
        let base = self.parse_primary()?;
        if matches!(self.peek_token().map(|token| token.kind), Some(TokenKind::Exp)) {
            self.bump();
            // the exponent may itself be signed (`2^-3`) or another chain (`x^y^z`)
            let exponent = self.parse_unary()?;
            let span = base.span().start..exponent.span().end;
            Ok(Expr::Binary(Binary {
                lhs: Box::new(base),
                op: BinOpKind::Exp,
                implicit: false,
                rhs: Box::new(exponent),
                span,
            }))
        } else {
            Ok(base)
        }
    }

    /// Parses a primary expression: a literal, a parenthesized group, a call, or (in LaTeX mode)
    /// a brace group, absolute value or command.
    fn parse_primary(&mut self) -> Result<Expr, Error> {
        let Some(token) = self.peek_token().cloned() else {
            return Err(self.error(error::UnexpectedEof));
        };

        match token.kind {
            TokenKind::Int => {
                self.bump();
                Ok(Expr::Literal(Literal::Integer(LitInt {
                    value: token.lexeme.to_string(),
                    span: token.span,
                })))
            },
            TokenKind::Float => {
                self.bump();
                Ok(Expr::Literal(Literal::Float(LitFloat {
                    value: token.lexeme.to_string(),
                    span: token.span,
                })))
            },
            TokenKind::Name => self.parse_name(token),
            TokenKind::OpenParen => self.parse_paren(token),
            TokenKind::OpenBrace if self.latex => self.parse_brace_group(token),
            TokenKind::Pipe if self.latex && self.abs_depth == 0 => self.parse_abs(token),
            TokenKind::Command if self.latex => self.parse_command(token),
            _ => {
                let found = token.lexeme.to_string();
                Err(self.error(error::UnexpectedToken { found }))
            },
        }
    }

    /// Parses a name token: a function call, a symbol, or (in LaTeX mode) a run of adjacent
    /// one-letter symbols multiplying each other.
    fn parse_name(&mut self, token: Token<'source>) -> Result<Expr, Error> {
        self.bump();

        if matches!(self.peek_token().map(|t| t.kind), Some(TokenKind::OpenParen))
            && (!self.latex || is_known_function(token.lexeme))
        {
            return self.parse_call(token);
        }

        if self.latex && token.lexeme.chars().count() > 1 {
            // adjacent letters multiply in LaTeX: `xyz` is `x * y * z`; only the final letter
            // can take a subscript, since the subscript token follows the whole run
            let start = token.span.start;
            let mut symbols = token.lexeme.char_indices()
                .map(|(i, c)| {
                    let span = start + i..start + i + c.len_utf8();
                    Expr::Literal(Literal::Symbol(LitSym { name: c.to_string(), span }))
                })
                .collect::<Vec<_>>();

            let last = symbols.pop().unwrap();
            let last = match last {
                Expr::Literal(Literal::Symbol(sym)) => {
                    Expr::Literal(Literal::Symbol(self.maybe_subscript(sym)?))
                },
                expr => expr,
            };

            let product = symbols.into_iter()
                .rfold(last, |rhs, lhs| binary(lhs, BinOpKind::Mul, true, rhs));
            Ok(product)
        } else {
            let sym = self.maybe_subscript(LitSym {
                name: token.lexeme.to_string(),
                span: token.span,
            })?;
            Ok(Expr::Literal(Literal::Symbol(sym)))
        }
    }

    /// If an underscore follows, folds the subscript into the symbol's name (`x_1`, `x_{ab}`).
    fn maybe_subscript(&mut self, sym: LitSym) -> Result<LitSym, Error> {
        if !matches!(self.peek_token().map(|t| t.kind), Some(TokenKind::Underscore)) {
            return Ok(sym);
        }
        self.bump();

        let (sub, end) = match self.peek_token().cloned() {
            Some(token) if token.kind == TokenKind::OpenBrace => {
                self.bump();
                let mut sub = String::new();
                let mut depth = 1usize;
                loop {
                    let Some(token) = self.bump() else {
                        return Err(self.error(error::UnclosedDelimiter));
                    };
                    match token.kind {
                        TokenKind::OpenBrace => depth += 1,
                        TokenKind::CloseBrace => {
                            depth -= 1;
                            if depth == 0 {
                                break (sub, token.span.end);
                            }
                        },
                        _ => sub.push_str(token.lexeme),
                    }
                }
            },
            Some(token) if matches!(token.kind, TokenKind::Int | TokenKind::Name) => {
                self.bump();
                (token.lexeme.to_string(), token.span.end)
            },
            Some(token) => {
                let found = token.lexeme.to_string();
                return Err(self.error(error::UnexpectedToken { found }));
            },
            None => return Err(self.error(error::UnexpectedEof)),
        };

        Ok(LitSym {
            name: format!("{}_{}", sym.name, sub),
            span: sym.span.start..end,
        })
    }

    /// Parses the argument list of a function call. The opening parenthesis has not been
    /// consumed yet.
    fn parse_call(&mut self, name: Token<'source>) -> Result<Expr, Error> {
        let open = self.expect(TokenKind::OpenParen)?;
        let mut args = Vec::new();

        loop {
            args.push(self.parse_expr(precedence::EQUATION)?);
            match self.peek_token().map(|t| t.kind) {
                Some(TokenKind::Comma) => {
                    self.bump();
                },
                Some(TokenKind::CloseParen) => {
                    let close = self.bump().unwrap();
                    return Ok(Expr::Call(Call {
                        name: LitSym {
                            name: canonical_function(name.lexeme).to_string(),
                            span: name.span.clone(),
                        },
                        args,
                        span: name.span.start..close.span.end,
                    }));
                },
                _ => {
                    return Err(Error::new(
                        vec![open.span.clone()],
                        error::UnclosedParenthesis { opening: true },
                    ));
                },
            }
        }
    }

    /// Parses a parenthesized expression. The opening parenthesis has not been consumed yet.
    fn parse_paren(&mut self, open: Token<'source>) -> Result<Expr, Error> {
        self.bump();

        if matches!(self.peek_token().map(|t| t.kind), Some(TokenKind::CloseParen)) {
            return Err(self.error(error::EmptyParenthesis));
        }

        let expr = self.parse_expr(precedence::EQUATION)?;
        match self.peek_token().map(|t| t.kind) {
            Some(TokenKind::CloseParen) => {
                let close = self.bump().unwrap();
                Ok(Expr::Paren(Paren {
                    expr: Box::new(expr),
                    span: open.span.start..close.span.end,
                }))
            },
            _ => Err(Error::new(
                vec![open.span.clone()],
                error::UnclosedParenthesis { opening: true },
            )),
        }
    }
}

/// Builds a [`Expr::Binary`] node spanning both operands.
pub(crate) fn binary(lhs: Expr, op: BinOpKind, implicit: bool, rhs: Expr) -> Expr {
    let span = lhs.span().start..rhs.span().end;
    Expr::Binary(Binary {
        lhs: Box::new(lhs),
        op,
        implicit,
        rhs: Box::new(rhs),
        span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Expr {
        Parser::new(source).parse_full().unwrap()
    }

    fn sym(expr: &Expr) -> &str {
        match expr {
            Expr::Literal(Literal::Symbol(sym)) => &sym.name,
            _ => panic!("not a symbol: {:?}", expr),
        }
    }

    #[test]
    fn implicit_multiplication() {
        let expr = parse("2x");
        let Expr::Binary(bin) = expr else { panic!() };
        assert_eq!(bin.op, BinOpKind::Mul);
        assert!(bin.implicit);
        assert_eq!(sym(&bin.rhs), "x");
    }

    #[test]
    fn exponent_binds_tighter_than_implicit_multiplication() {
        // `2x^2` is `2 * (x^2)`, not `(2x)^2`
        let Expr::Binary(bin) = parse("2x^2") else { panic!() };
        assert_eq!(bin.op, BinOpKind::Mul);
        let Expr::Binary(exp) = &*bin.rhs else { panic!() };
        assert_eq!(exp.op, BinOpKind::Exp);
    }

    #[test]
    fn negation_binds_looser_than_exponent() {
        // `-x^2` is `-(x^2)`
        let Expr::Unary(unary) = parse("-x^2") else { panic!() };
        assert_eq!(unary.op, UnaryOpKind::Neg);
        let Expr::Binary(exp) = &*unary.operand else { panic!() };
        assert_eq!(exp.op, BinOpKind::Exp);
    }

    #[test]
    fn exponent_is_right_associative() {
        let Expr::Binary(outer) = parse("x^y^z") else { panic!() };
        assert_eq!(outer.op, BinOpKind::Exp);
        assert_eq!(sym(&outer.lhs), "x");
        let Expr::Binary(inner) = &*outer.rhs else { panic!() };
        assert_eq!(inner.op, BinOpKind::Exp);
    }

    #[test]
    fn function_call_with_args() {
        let Expr::Call(call) = parse("sum(k^2, k, 1, 10)") else { panic!() };
        assert_eq!(call.name.name, "sum");
        assert_eq!(call.args.len(), 4);
    }

    #[test]
    fn ln_is_canonicalized_to_log() {
        let Expr::Call(call) = parse("ln(x)") else { panic!() };
        assert_eq!(call.name.name, "log");
    }

    #[test]
    fn multi_letter_name_is_one_symbol_in_text_mode() {
        assert_eq!(sym(&parse("foo")), "foo");
    }

    #[test]
    fn subscripted_symbol() {
        assert_eq!(sym(&parse("x_1")), "x_1");
    }

    #[test]
    fn unclosed_paren_is_an_error() {
        assert!(Parser::new("(x + 1").parse_full().is_err());
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(Parser::new("").parse_full().is_err());
    }

    #[test]
    fn equation_rejected_in_text_mode() {
        assert!(Parser::new("x = 1").parse_full().is_err());
    }
}
