//! Error kinds reported by the parsers.

use ariadne::Fmt;
use eqv_attrs::ErrorKind;
use eqv_error::{ErrorKind, EXPR};

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of input",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of input",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = ["this token cannot appear here"],
    help = format!("found `{}`", found),
)]
pub struct UnexpectedToken {
    /// The lexeme that was found.
    pub found: String,
}

/// A parenthesis was not closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed parenthesis",
    labels = ["this parenthesis is not closed"],
    help = if *opening {
        "add a closing parenthesis `)` somewhere after this"
    } else {
        "add an opening parenthesis `(` somewhere before this"
    },
)]
pub struct UnclosedParenthesis {
    /// Whether the parenthesis was an opening parenthesis `(`. Otherwise, the parenthesis was a
    /// closing parenthesis `)`.
    pub opening: bool,
}

/// There was no expression inside a pair of parentheses.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing expression inside parenthesis",
    labels = ["add an expression here"],
)]
pub struct EmptyParenthesis;

/// A `\left` delimiter has no matching `\right` delimiter, or the delimiters do not match.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed delimiter",
    labels = ["this delimiter is not closed"],
    help = "close it with a matching `\\right` delimiter",
)]
pub struct UnclosedDelimiter;

/// An absolute-value bar has no closing bar.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed absolute value",
    labels = ["this `|` is not closed"],
)]
pub struct UnclosedAbs;

/// A LaTeX command that the parser does not recognize.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown command: `\\{}`", name),
    labels = ["this command is not supported"],
    help = match suggestion {
        Some(suggestion) => format!("did you mean `\\{}`?", suggestion.fg(EXPR)),
        None => "see the documentation for the list of supported commands".to_string(),
    },
)]
pub struct UnknownCommand {
    /// The name of the command, without the leading backslash.
    pub name: String,

    /// The closest known command, if one is close enough.
    pub suggestion: Option<String>,
}

/// `\sum` or `\prod` bounds that do not follow the `_{var = lo}^{hi}` shape.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "malformed summation bounds",
    labels = ["expected bounds of the form `_{var = lo}^{hi}` here"],
)]
pub struct InvalidBounds;
