//! LaTeX-mode command handling: `\frac`, `\sqrt`, delimiters, named functions, greek letters
//! and `\sum`/`\prod` bounds.

use crate::tokenizer::{Token, TokenKind};
use eqv_error::Error;
use super::{
    ast::{Abs, BinOpKind, Call, Expr, LitSym, Literal, Paren, UnaryOpKind},
    binary,
    canonical_function,
    error,
    precedence,
    Parser,
};

/// Greek letters accepted as symbol names.
const GREEK_LETTERS: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "varepsilon", "zeta", "eta", "theta",
    "vartheta", "iota", "kappa", "lambda", "mu", "nu", "xi", "pi", "rho", "varrho", "sigma",
    "tau", "upsilon", "phi", "varphi", "chi", "psi", "omega",
    "Gamma", "Delta", "Theta", "Lambda", "Xi", "Pi", "Sigma", "Upsilon", "Phi", "Psi", "Omega",
];

/// Function commands, under their LaTeX spelling.
const FUNCTION_COMMANDS: &[&str] = &[
    "sin", "cos", "tan", "cot", "sec", "csc",
    "arcsin", "arccos", "arctan", "arccot",
    "sinh", "cosh", "tanh", "coth",
    "log", "ln", "exp", "abs",
];

/// Every command the LaTeX parser understands, used for unknown-command suggestions.
const KNOWN_COMMANDS: &[&str] = &[
    "frac", "dfrac", "tfrac", "sqrt", "cdot", "times", "div", "left", "right", "lvert", "rvert",
    "sum", "prod",
    "sin", "cos", "tan", "cot", "sec", "csc",
    "arcsin", "arccos", "arctan", "arccot",
    "sinh", "cosh", "tanh", "coth",
    "log", "ln", "exp", "abs",
    "alpha", "beta", "gamma", "delta", "epsilon", "varepsilon", "zeta", "eta", "theta",
    "vartheta", "iota", "kappa", "lambda", "mu", "nu", "xi", "pi", "rho", "varrho", "sigma",
    "tau", "upsilon", "phi", "varphi", "chi", "psi", "omega",
    "Gamma", "Delta", "Theta", "Lambda", "Xi", "Pi", "Sigma", "Upsilon", "Phi", "Psi", "Omega",
];

/// Returns the closest known command, if one is close enough to be a plausible typo.
fn suggest_command(name: &str) -> Option<String> {
    KNOWN_COMMANDS.iter()
        .map(|candidate| (levenshtein::levenshtein(name, candidate), candidate))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= 2)
        .map(|(_, candidate)| candidate.to_string())
}

/// Returns true if the expression is the literal `-1`, in any number of parenthesis layers.
fn is_neg_one(expr: &Expr) -> bool {
    match expr.innermost() {
        Expr::Unary(unary) if unary.op == UnaryOpKind::Neg => {
            matches!(
                unary.operand.innermost(),
                Expr::Literal(Literal::Integer(int)) if int.value == "1"
            )
        },
        _ => false,
    }
}

impl<'source> Parser<'source> {
    /// Parses a brace group `{ ... }`. The opening brace has not been consumed yet.
    pub(super) fn parse_brace_group(&mut self, open: Token<'source>) -> Result<Expr, Error> {
        self.bump();
        let expr = self.parse_expr(precedence::EQUATION)?;
        match self.peek_token().map(|t| t.kind) {
            Some(TokenKind::CloseBrace) => {
                let close = self.bump().unwrap();
                Ok(Expr::Paren(Paren {
                    expr: Box::new(expr),
                    span: open.span.start..close.span.end,
                }))
            },
            _ => Err(Error::new(vec![open.span.clone()], error::UnclosedDelimiter)),
        }
    }

    /// Parses a bare `| ... |` absolute value. The opening bar has not been consumed yet.
    pub(super) fn parse_abs(&mut self, open: Token<'source>) -> Result<Expr, Error> {
        self.bump();
        self.abs_depth += 1;
        let expr = self.parse_expr(precedence::EQUATION);
        self.abs_depth -= 1;
        let expr = expr?;

        match self.peek_token().map(|t| t.kind) {
            Some(TokenKind::Pipe) => {
                let close = self.bump().unwrap();
                Ok(Expr::Abs(Abs {
                    expr: Box::new(expr),
                    span: open.span.start..close.span.end,
                }))
            },
            _ => Err(Error::new(vec![open.span.clone()], error::UnclosedAbs)),
        }
    }

    /// Parses a LaTeX command in primary position. The command token has not been consumed yet.
    pub(super) fn parse_command(&mut self, token: Token<'source>) -> Result<Expr, Error> {
        let name = token.command_name();
        match name {
            "frac" | "dfrac" | "tfrac" => {
                self.bump();
                let numerator = self.require_brace_group()?;
                let denominator = self.require_brace_group()?;
                Ok(binary(numerator, BinOpKind::Div, false, denominator))
            },
            "sqrt" => self.parse_sqrt(token),
            "left" => self.parse_left(token),
            "lvert" => {
                // cleaned input normalizes `\lvert` away, but accept it directly as well
                self.bump();
                self.abs_depth += 1;
                let expr = self.parse_expr(precedence::EQUATION);
                self.abs_depth -= 1;
                let expr = expr?;
                match self.peek_token() {
                    Some(t) if t.kind == TokenKind::Command && t.command_name() == "rvert" => {
                        let close = self.bump().unwrap();
                        Ok(Expr::Abs(Abs {
                            expr: Box::new(expr),
                            span: token.span.start..close.span.end,
                        }))
                    },
                    _ => Err(Error::new(vec![token.span.clone()], error::UnclosedAbs)),
                }
            },
            "sum" | "prod" => self.parse_reduction(token),
            name if GREEK_LETTERS.contains(&name) => {
                self.bump();
                let sym = self.maybe_subscript(LitSym {
                    name: name.to_string(),
                    span: token.span.clone(),
                })?;
                Ok(Expr::Literal(Literal::Symbol(sym)))
            },
            name if FUNCTION_COMMANDS.contains(&name) => self.parse_function(token),
            "right" | "rvert" | "cdot" | "times" | "div" => {
                let found = token.lexeme.to_string();
                Err(self.error(error::UnexpectedToken { found }))
            },
            name => {
                let suggestion = suggest_command(name);
                Err(Error::new(
                    vec![token.span.clone()],
                    error::UnknownCommand { name: name.to_string(), suggestion },
                ))
            },
        }
    }

    /// Requires and parses a `{ ... }` group.
    fn require_brace_group(&mut self) -> Result<Expr, Error> {
        match self.peek_token().cloned() {
            Some(token) if token.kind == TokenKind::OpenBrace => self.parse_brace_group(token),
            Some(token) => {
                let found = token.lexeme.to_string();
                Err(self.error(error::UnexpectedToken { found }))
            },
            None => Err(self.error(error::UnexpectedEof)),
        }
    }

    /// `\sqrt{x}` or `\sqrt[n]{x}`.
    fn parse_sqrt(&mut self, token: Token<'source>) -> Result<Expr, Error> {
        self.bump();

        let index = if matches!(self.peek_token().map(|t| t.kind), Some(TokenKind::OpenBracket)) {
            self.bump();
            let index = self.parse_expr(precedence::TERM)?;
            self.expect(TokenKind::CloseBracket)?;
            Some(index)
        } else {
            None
        };

        let operand = match self.peek_token().cloned() {
            Some(t) if t.kind == TokenKind::OpenBrace => self.parse_brace_group(t)?,
            _ => self.parse_primary()?,
        };

        let span = token.span.start..operand.span().end;
        let (name, args) = match index {
            Some(index) => ("root", vec![operand, index]),
            None => ("sqrt", vec![operand]),
        };
        Ok(Expr::Call(Call {
            name: LitSym { name: name.to_string(), span: token.span.clone() },
            args,
            span,
        }))
    }

    /// `\left( ... \right)`, `\left[ ... \right]` or `\left| ... \right|`.
    fn parse_left(&mut self, left: Token<'source>) -> Result<Expr, Error> {
        self.bump();
        let Some(delim) = self.peek_token().cloned() else {
            return Err(Error::new(vec![left.span.clone()], error::UnclosedDelimiter));
        };

        let closer = match delim.kind {
            TokenKind::OpenParen => TokenKind::CloseParen,
            TokenKind::OpenBracket => TokenKind::CloseBracket,
            TokenKind::Pipe => TokenKind::Pipe,
            TokenKind::Command if delim.command_name() == "lvert" => TokenKind::Pipe,
            _ => {
                let found = delim.lexeme.to_string();
                return Err(self.error(error::UnexpectedToken { found }));
            },
        };
        let is_abs = closer == TokenKind::Pipe;
        self.bump();

        let expr = self.parse_expr(precedence::EQUATION)?;

        // expect `\right` followed by the matching closing delimiter
        match self.peek_token() {
            Some(t) if t.kind == TokenKind::Command && t.command_name() == "right" => {
                self.bump();
            },
            _ => return Err(Error::new(vec![left.span.clone()], error::UnclosedDelimiter)),
        }
        let close = match self.peek_token().cloned() {
            Some(t) if t.kind == closer || (is_abs && t.kind == TokenKind::Pipe) => {
                self.bump().unwrap()
            },
            Some(t) if is_abs && t.kind == TokenKind::Command && t.command_name() == "rvert" => {
                self.bump().unwrap()
            },
            _ => return Err(Error::new(vec![left.span.clone()], error::UnclosedDelimiter)),
        };

        let span = left.span.start..close.span.end;
        if is_abs {
            Ok(Expr::Abs(Abs { expr: Box::new(expr), span }))
        } else {
            Ok(Expr::Paren(Paren { expr: Box::new(expr), span }))
        }
    }

    /// A named function: optional `^` exponent, then a tight operand (`\sin^2 x`). The exponent
    /// `-1` selects the inverse function for the trig family (`\sin^{-1} x` is `asin(x)`).
    fn parse_function(&mut self, token: Token<'source>) -> Result<Expr, Error> {
        self.bump();
        let mut name = canonical_function(token.command_name()).to_string();

        let mut power = None;
        if matches!(self.peek_token().map(|t| t.kind), Some(TokenKind::Exp)) {
            self.bump();
            let exponent = self.parse_unary()?;
            if is_neg_one(&exponent) && matches!(name.as_str(), "sin" | "cos" | "tan" | "cot") {
                name = format!("a{}", name);
            } else {
                power = Some(exponent);
            }
        }

        let operand = self.parse_function_operand()?;
        let span = token.span.start..operand.span().end;
        let call = Expr::Call(Call {
            name: LitSym { name, span: token.span.clone() },
            args: vec![operand],
            span: span.clone(),
        });

        match power {
            Some(power) => Ok(binary(call, BinOpKind::Exp, false, power)),
            None => Ok(call),
        }
    }

    /// The operand of a function or reduction: either a delimited group, or an implicit product
    /// of signed power-chains (`\sin 2x` applies to `2x`, `\sin x + 1` applies to `x` only).
    fn parse_function_operand(&mut self) -> Result<Expr, Error> {
        let mut operand = self.parse_unary()?;
        if matches!(operand, Expr::Paren(_) | Expr::Abs(_)) {
            // a delimited operand is complete; anything after it multiplies outside the call
            return Ok(operand);
        }

        while self.starts_primary() {
            let rhs = self.parse_expr(precedence::FACTOR + 1)?;
            operand = binary(operand, BinOpKind::Mul, true, rhs);
        }
        Ok(operand)
    }

    /// `\sum_{var = lo}^{hi} body` or `\prod_{var = lo}^{hi} body`, represented as a four-argument
    /// call: body, bound variable, lower bound, upper bound.
    fn parse_reduction(&mut self, token: Token<'source>) -> Result<Expr, Error> {
        self.bump();
        let name = token.command_name().to_string();

        if self.expect(TokenKind::Underscore).is_err() {
            return Err(Error::new(vec![token.span.clone()], error::InvalidBounds));
        }
        if self.expect(TokenKind::OpenBrace).is_err() {
            return Err(Error::new(vec![token.span.clone()], error::InvalidBounds));
        }

        let var = match self.peek_token().cloned() {
            Some(t) if t.kind == TokenKind::Name => {
                self.bump();
                LitSym { name: t.lexeme.to_string(), span: t.span }
            },
            Some(t) if t.kind == TokenKind::Command && GREEK_LETTERS.contains(&t.command_name()) => {
                self.bump();
                LitSym { name: t.command_name().to_string(), span: t.span }
            },
            _ => return Err(Error::new(vec![token.span.clone()], error::InvalidBounds)),
        };

        if self.expect(TokenKind::Eq).is_err() {
            return Err(Error::new(vec![token.span.clone()], error::InvalidBounds));
        }
        let lo = self.parse_expr(precedence::TERM)?;
        if self.expect(TokenKind::CloseBrace).is_err() {
            return Err(Error::new(vec![token.span.clone()], error::InvalidBounds));
        }
        if self.expect(TokenKind::Exp).is_err() {
            return Err(Error::new(vec![token.span.clone()], error::InvalidBounds));
        }
        let hi = match self.peek_token().cloned() {
            Some(t) if t.kind == TokenKind::OpenBrace => self.parse_brace_group(t)?,
            _ => self.parse_primary()?,
        };

        let body = self.parse_function_operand()?;
        let span = token.span.start..body.span().end;
        Ok(Expr::Call(Call {
            name: LitSym { name, span: token.span.clone() },
            args: vec![body, Expr::Literal(Literal::Symbol(var)), lo, hi],
            span,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Expr {
        Parser::new_latex(source).parse_full().unwrap()
    }

    #[test]
    fn frac_parses_to_division() {
        let Expr::Binary(bin) = parse(r"\frac{x}{2}") else { panic!() };
        assert_eq!(bin.op, BinOpKind::Div);
    }

    #[test]
    fn sqrt_parses_to_call() {
        let Expr::Call(call) = parse(r"\sqrt{x^2}") else { panic!() };
        assert_eq!(call.name.name, "sqrt");
        assert_eq!(call.args.len(), 1);
    }

    #[test]
    fn sqrt_with_index_parses_to_root() {
        let Expr::Call(call) = parse(r"\sqrt[3]{x}") else { panic!() };
        assert_eq!(call.name.name, "root");
        assert_eq!(call.args.len(), 2);
    }

    #[test]
    fn bare_bars_parse_to_abs() {
        let Expr::Abs(_) = parse("|x|") else { panic!() };
    }

    #[test]
    fn left_right_bars_parse_to_abs() {
        let Expr::Abs(_) = parse(r"\left| x - 1 \right|") else { panic!() };
    }

    #[test]
    fn adjacent_letters_multiply() {
        let Expr::Binary(bin) = parse("xy") else { panic!() };
        assert_eq!(bin.op, BinOpKind::Mul);
        assert!(bin.implicit);
    }

    #[test]
    fn function_with_exponent() {
        // `\sin^2 x` is `sin(x)^2`
        let Expr::Binary(bin) = parse(r"\sin^2 x") else { panic!() };
        assert_eq!(bin.op, BinOpKind::Exp);
        let Expr::Call(call) = &*bin.lhs else { panic!() };
        assert_eq!(call.name.name, "sin");
    }

    #[test]
    fn inverse_trig_shorthand() {
        let Expr::Call(call) = parse(r"\sin^{-1} x") else { panic!() };
        assert_eq!(call.name.name, "asin");
    }

    #[test]
    fn sum_with_bounds() {
        let Expr::Call(call) = parse(r"\sum_{k=1}^{3} k^2") else { panic!() };
        assert_eq!(call.name.name, "sum");
        assert_eq!(call.args.len(), 4);
    }

    #[test]
    fn equation_becomes_binary_eq() {
        let Expr::Binary(bin) = parse("x^2 = 4") else { panic!() };
        assert_eq!(bin.op, BinOpKind::Eq);
    }

    #[test]
    fn unknown_command_fails_with_suggestion() {
        let err = Parser::new_latex(r"\frsc{x}{2}").parse_full().unwrap_err();
        let message = err.render_message("input", r"\frsc{x}{2}");
        assert!(message.contains("unknown command"), "{message}");
        assert!(message.contains("frac"), "{message}");
    }

    #[test]
    fn greek_letters_are_symbols() {
        let Expr::Literal(Literal::Symbol(sym)) = parse(r"\theta") else { panic!() };
        assert_eq!(sym.name, "theta");
    }
}
