//! The public operations consumed by front ends.

use crate::assumptions::Assumptions;
use crate::preprocess::{clean_latex, preprocess_text, strip_math_wrappers};
use crate::recognize::{RecognizeError, Recognizer};
use crate::similarity::scorer::{self, SimilarityResult};
use eqv_chem::{BalanceError, BalancedReaction, ElementComposition, FormulaError};
use eqv_parser::Parser;
use eqv_symbolic::{simplify, SymExpr};
use log::debug;
use std::fmt;

pub use eqv_chem::{
    balance_reaction_info, balance_reaction_with, formulas_equivalent, normalize_formula,
    reactions_equivalent,
};

/// The result of normalizing one input string.
#[derive(Debug, Clone)]
pub struct Normalized {
    /// The original input.
    pub input: String,

    /// The preprocessed text.
    pub text_norm: String,

    /// The cleaned LaTeX, when the input was treated as LaTeX.
    pub latex_norm: Option<String>,

    /// The parsed (and simplified) expression tree, when parsing succeeded.
    pub expr: Option<SymExpr>,

    /// Messages for every error encountered.
    pub errors: Vec<String>,
}

/// Parses normalized text into an expression tree.
///
/// In LaTeX mode, any parse failure is surfaced as a `latex_parse_error` message; ambiguous
/// LaTeX fails loudly and is never silently retried as plain text. In plain-text mode the
/// parser error is returned verbatim as the message.
pub fn parse_input(text: &str, assume_latex: bool) -> (Option<SymExpr>, Option<String>) {
    if text.is_empty() {
        return (None, Some("empty input".to_string()));
    }

    if assume_latex {
        match Parser::new_latex(text).parse_full() {
            Ok(ast) => (Some(simplify(&SymExpr::from(ast))), None),
            Err(err) => {
                let message = format!("latex_parse_error: {}", err.render_message("input", text));
                (None, Some(message))
            },
        }
    } else {
        match Parser::new(text).parse_full() {
            Ok(ast) => (Some(simplify(&SymExpr::from(ast))), None),
            Err(err) => (None, Some(err.render_message("input", text))),
        }
    }
}

/// Normalizes an input string: preprocesses the text, detects (or honors) LaTeX-ness, cleans
/// LaTeX, and parses. Errors are collected as messages, never raised.
pub fn normalize(input: &str, is_latex: Option<bool>) -> Normalized {
    let text_norm = preprocess_text(input);

    let looks_latex = is_latex.unwrap_or_else(|| {
        ["\\", "^{", "_{", "$"].iter().any(|marker| text_norm.contains(marker))
    });

    let (latex_norm, to_parse) = if looks_latex {
        let cleaned = clean_latex(&text_norm);
        (Some(cleaned.clone()), cleaned)
    } else {
        (None, text_norm.clone())
    };

    let (expr, error) = parse_input(&to_parse, looks_latex);
    let errors = error.into_iter().collect();

    Normalized {
        input: input.to_string(),
        text_norm,
        latex_norm,
        expr,
        errors,
    }
}

/// The outcome of comparing two input strings.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// The normalization of the first input.
    pub a: Normalized,

    /// The normalization of the second input.
    pub b: Normalized,

    /// Whether the inputs were judged equivalent. False when either fails to parse.
    pub equivalent: bool,

    /// The combined score; 0.0 when either input fails to parse.
    pub score: f64,

    /// The detailed outcome, absent when either input fails to parse.
    pub outcome: Option<SimilarityResult>,
}

/// Computes the equivalence and similarity score of two input expressions (plain text or
/// LaTeX, auto-detected).
pub fn similarity(a: &str, b: &str, assumptions: Option<&Assumptions>) -> Comparison {
    let a = normalize(a, None);
    let b = normalize(b, None);

    let (Some(expr_a), Some(expr_b)) = (&a.expr, &b.expr) else {
        debug!("similarity short-circuited: failed to parse one of the inputs");
        return Comparison { a, b, equivalent: false, score: 0.0, outcome: None };
    };

    let outcome = scorer::similarity(expr_a, expr_b, assumptions);
    Comparison {
        equivalent: outcome.equivalent,
        score: outcome.score,
        outcome: Some(outcome),
        a,
        b,
    }
}

/// An error from the composite image-comparison operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The recognizer failed.
    Recognize(RecognizeError),

    /// A chemical formula failed to parse.
    Formula(FormulaError),

    /// A reaction failed to balance.
    Balance(BalanceError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recognize(err) => write!(f, "{}", err),
            Self::Formula(err) => write!(f, "{}", err),
            Self::Balance(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<RecognizeError> for ApiError {
    fn from(err: RecognizeError) -> Self {
        Self::Recognize(err)
    }
}

impl From<FormulaError> for ApiError {
    fn from(err: FormulaError) -> Self {
        Self::Formula(err)
    }
}

impl From<BalanceError> for ApiError {
    fn from(err: BalanceError) -> Self {
        Self::Balance(err)
    }
}

/// Wraps bare LaTeX in `$...$` so the comparison pipeline treats it as LaTeX; input that
/// already carries a math-mode wrapper is left as-is.
fn wrap_latex(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() || strip_math_wrappers(trimmed) != trimmed {
        trimmed.to_string()
    } else {
        format!("${}$", trimmed)
    }
}

/// The result of comparing a recognized image against a reference LaTeX string.
#[derive(Debug, Clone)]
pub struct ImageComparison {
    /// The recognized LaTeX, stripped of math-mode wrappers for display.
    pub image_latex: String,

    /// The reference LaTeX, stripped of math-mode wrappers for display.
    pub input_latex: String,

    /// The comparison outcome.
    pub result: Comparison,
}

/// Recognizes the formula in an image and compares it against the given LaTeX. The
/// already-recognized string goes through exactly the same pipeline as text equivalence.
pub fn image_latex_similarity(
    recognizer: &dyn Recognizer,
    image_ref: &str,
    latex: &str,
    assumptions: Option<&Assumptions>,
) -> Result<ImageComparison, ApiError> {
    let recognized = recognizer.recognize(image_ref)?;
    if recognized.trim().is_empty() {
        return Err(RecognizeError::Recognition {
            message: "recognizer returned an empty string".to_string(),
        }.into());
    }

    let a = wrap_latex(&recognized);
    let b = wrap_latex(latex);
    let result = similarity(&a, &b, assumptions);

    Ok(ImageComparison {
        image_latex: strip_math_wrappers(&recognized).to_string(),
        input_latex: strip_math_wrappers(latex).to_string(),
        result,
    })
}

/// Which kind of chemical input an image comparison expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChemKind {
    /// A single formula.
    Formula,

    /// A full reaction.
    Reaction,
}

/// The detail behind a chemical image comparison.
#[derive(Debug, Clone)]
pub enum ChemDetail {
    /// Both normalized compositions.
    Formula {
        /// Composition of the recognized text.
        normalized_a: ElementComposition,

        /// Composition of the reference text.
        normalized_b: ElementComposition,
    },

    /// Both balanced reactions, where balancing succeeded.
    Reaction {
        /// Balance of the recognized text.
        balance_a: Option<BalancedReaction>,

        /// Balance of the reference text.
        balance_b: Option<BalancedReaction>,
    },
}

/// The result of comparing a recognized chemical image against a reference text.
#[derive(Debug, Clone)]
pub struct ChemImageComparison {
    /// The recognized text, stripped of math wrappers and simple macros.
    pub image_text: String,

    /// The reference text, stripped the same way.
    pub input_text: String,

    /// The kind that was compared.
    pub kind: ChemKind,

    /// Whether the two are equivalent.
    pub equivalent: bool,

    /// Supporting detail.
    pub detail: ChemDetail,
}

/// Strips simple LaTeX macro wrappers (`\ce{...}`, `\mathrm{...}`, `\text{...}`) that OCR
/// output commonly carries around chemical text.
fn strip_chem_macros(s: &str) -> String {
    let mut s = strip_math_wrappers(s).to_string();
    for macro_name in ["\\ce{", "\\mathrm{", "\\text{"] {
        while let Some(start) = s.find(macro_name) {
            let inner_start = start + macro_name.len();
            let Some(close) = s[inner_start..].find('}') else { break };
            let inner = s[inner_start..inner_start + close].to_string();
            s.replace_range(start..inner_start + close + 1, &inner);
        }
    }
    s.trim().to_string()
}

/// Recognizes the chemical content of an image and compares it against the given text, as a
/// formula or as a reaction.
pub fn chem_image_similarity(
    recognizer: &dyn Recognizer,
    image_ref: &str,
    text: &str,
    kind: ChemKind,
) -> Result<ChemImageComparison, ApiError> {
    let recognized = recognizer.recognize(image_ref)?;
    if recognized.trim().is_empty() {
        return Err(RecognizeError::Recognition {
            message: "recognizer returned an empty string".to_string(),
        }.into());
    }

    let image_text = strip_chem_macros(&recognized);
    let input_text = strip_chem_macros(text);

    let (equivalent, detail) = match kind {
        ChemKind::Formula => {
            let normalized_a = normalize_formula(&image_text)?;
            let normalized_b = normalize_formula(&input_text)?;
            (normalized_a == normalized_b, ChemDetail::Formula { normalized_a, normalized_b })
        },
        ChemKind::Reaction => {
            let equivalent = reactions_equivalent(&image_text, &input_text)?;
            // per-side balance info is diagnostic only; a side that fails to balance here
            // would already have failed the equivalence call above
            let detail = ChemDetail::Reaction {
                balance_a: balance_reaction_info(&image_text).ok(),
                balance_b: balance_reaction_info(&input_text).ok(),
            };
            (equivalent, detail)
        },
    };

    Ok(ChemImageComparison { image_text, input_text, kind, equivalent, detail })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_detects_latex() {
        let normalized = normalize(r"$\frac{1}{2}$", None);
        assert!(normalized.latex_norm.is_some());
        assert!(normalized.expr.is_some());
        assert!(normalized.errors.is_empty());
    }

    #[test]
    fn normalize_plain_text() {
        let normalized = normalize("x^2 + 1", None);
        assert!(normalized.latex_norm.is_none());
        assert!(normalized.expr.is_some());
    }

    #[test]
    fn normalization_of_normalized_text_is_stable() {
        let first = normalize("2 × x", None);
        let second = normalize(&first.text_norm, None);
        assert_eq!(first.text_norm, second.text_norm);
    }

    #[test]
    fn empty_input_reports_an_error() {
        let normalized = normalize("", None);
        assert!(normalized.expr.is_none());
        assert_eq!(normalized.errors, vec!["empty input".to_string()]);
    }

    #[test]
    fn forced_latex_never_falls_back_to_text() {
        // `2x` is fine as plain text; as forced LaTeX with a stray `)` it must fail loudly
        let normalized = normalize("2x)", Some(true));
        assert!(normalized.expr.is_none());
        assert!(normalized.errors[0].starts_with("latex_parse_error"), "{:?}", normalized.errors);
    }

    #[test]
    fn parse_failure_scores_zero() {
        let comparison = similarity("x +* 1", "x + 1", None);
        assert!(!comparison.equivalent);
        assert_eq!(comparison.score, 0.0);
        assert!(comparison.outcome.is_none());
    }

    #[test]
    fn wrap_latex_leaves_wrapped_input_alone() {
        assert_eq!(wrap_latex("$x$"), "$x$");
        assert_eq!(wrap_latex("x"), "$x$");
    }

    #[test]
    fn chem_macros_are_stripped() {
        assert_eq!(strip_chem_macros(r"\ce{H2O}"), "H2O");
        assert_eq!(strip_chem_macros(r"$\mathrm{CO2}$"), "CO2");
    }

    struct FixedRecognizer(&'static str);

    impl Recognizer for FixedRecognizer {
        fn recognize(&self, _image_ref: &str) -> Result<String, RecognizeError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn image_similarity_uses_the_recognized_string() {
        let recognizer = FixedRecognizer(r"\frac{1}{2}");
        let outcome = image_latex_similarity(&recognizer, "ignored.png", "0.5", None).unwrap();
        assert!(outcome.result.equivalent);
        assert_eq!(outcome.image_latex, r"\frac{1}{2}");
    }

    #[test]
    fn chem_image_formula_comparison() {
        let recognizer = FixedRecognizer(r"\ce{H2O}");
        let outcome = chem_image_similarity(&recognizer, "ignored.png", "OH2", ChemKind::Formula)
            .unwrap();
        assert!(outcome.equivalent);
        assert_eq!(outcome.image_text, "H2O");
    }

    #[test]
    fn unconfigured_recognizer_fails_fast() {
        struct Unconfigured;
        impl Recognizer for Unconfigured {
            fn recognize(&self, _image_ref: &str) -> Result<String, RecognizeError> {
                Err(RecognizeError::Configuration {
                    message: "endpoint not set".to_string(),
                })
            }
        }

        let err = image_latex_similarity(&Unconfigured, "x.png", "1", None).unwrap_err();
        assert!(matches!(err, ApiError::Recognize(RecognizeError::Configuration { .. })));
    }
}
