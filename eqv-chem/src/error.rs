//! Closed error kinds for the chemical composition engine.

use std::fmt;

/// An error produced while parsing a chemical formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    /// A character that is not an element symbol, digit, or bracket.
    InvalidToken {
        /// The offending text.
        text: String,

        /// Byte offset of the token in the (annotation-stripped) formula.
        position: usize,
    },

    /// A closing bracket with no matching opening bracket.
    UnexpectedClose {
        /// Byte offset of the bracket.
        position: usize,
    },

    /// A count or multiplier too large to represent.
    CountOverflow {
        /// The offending digits.
        text: String,
    },
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken { text, position } => {
                write!(f, "invalid token `{}` at offset {}", text, position)
            },
            Self::UnexpectedClose { position } => {
                write!(f, "unmatched closing bracket at offset {}", position)
            },
            Self::CountOverflow { text } => write!(f, "count `{}` is too large", text),
        }
    }
}

impl std::error::Error for FormulaError {}

/// An error produced while balancing a reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceError {
    /// The reaction string contains no recognized arrow.
    MissingArrow,

    /// One side of the reaction has no species.
    EmptySide,

    /// A species failed to parse.
    Formula(FormulaError),

    /// The stoichiometric matrix has a trivial null space: no balancing solution exists.
    NoSolution,

    /// The null-space basis vector has both positive and negative entries; the reaction is
    /// ill-posed and no sign convention is guessed.
    MixedSigns,

    /// A species received a zero coefficient, so it cannot participate in the balanced
    /// reaction.
    ZeroCoefficient,

    /// A balanced coefficient does not fit the output integer type.
    CoefficientOverflow,
}

impl fmt::Display for BalanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArrow => write!(f, "no reaction arrow found"),
            Self::EmptySide => write!(f, "a reaction side has no species"),
            Self::Formula(err) => write!(f, "species failed to parse: {}", err),
            Self::NoSolution => write!(f, "no balancing solution exists"),
            Self::MixedSigns => {
                write!(f, "balancing produced mixed-sign coefficients; the reaction is ill-posed")
            },
            Self::ZeroCoefficient => write!(f, "balancing produced a zero coefficient"),
            Self::CoefficientOverflow => write!(f, "balanced coefficients are too large"),
        }
    }
}

impl std::error::Error for BalanceError {}

impl From<FormulaError> for BalanceError {
    fn from(err: FormulaError) -> Self {
        Self::Formula(err)
    }
}
