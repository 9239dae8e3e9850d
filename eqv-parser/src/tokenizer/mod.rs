pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to look ahead and backtrack while parsing.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(Ok(kind)) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind,
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn basic_expr() {
        compare_tokens(
            "1 + 2x",
            [
                (TokenKind::Int, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
                (TokenKind::Name, "x"),
            ],
        );
    }

    #[test]
    fn latex_expr() {
        compare_tokens(
            r"\frac{x^2}{2}",
            [
                (TokenKind::Command, r"\frac"),
                (TokenKind::OpenBrace, "{"),
                (TokenKind::Name, "x"),
                (TokenKind::Exp, "^"),
                (TokenKind::Int, "2"),
                (TokenKind::CloseBrace, "}"),
                (TokenKind::OpenBrace, "{"),
                (TokenKind::Int, "2"),
                (TokenKind::CloseBrace, "}"),
            ],
        );
    }

    #[test]
    fn floats_and_subscripts() {
        compare_tokens(
            "0.5 x_1",
            [
                (TokenKind::Float, "0.5"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "x"),
                (TokenKind::Underscore, "_"),
                (TokenKind::Int, "1"),
            ],
        );
    }

    #[test]
    fn unknown_characters_are_symbols() {
        compare_tokens(
            "x$y",
            [
                (TokenKind::Name, "x"),
                (TokenKind::Symbol, "$"),
                (TokenKind::Name, "y"),
            ],
        );
    }
}
