//! Chemical formula parsing.

use crate::error::FormulaError;
use crate::ElementComposition;
use logos::Logos;

/// Tokens of the formula core: element symbols, digit runs, and brackets.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
enum FormulaToken {
    /// An element symbol: a capital letter optionally followed by one lowercase letter.
    #[regex(r"[A-Z][a-z]?")]
    Element,

    #[regex(r"[0-9]+")]
    Digits,

    #[regex(r"[(\[{]")]
    Open,

    #[regex(r"[)\]}]")]
    Close,

    #[regex(r".", priority = 0)]
    Other,
}

/// Adds `b` into `a`, each count scaled by `k`.
fn merge_counts(a: &mut ElementComposition, b: &ElementComposition, k: u64) {
    for (element, count) in b {
        *a.entry(element.clone()).or_insert(0) += count * k;
    }
}

/// Strips trailing state/phase annotations (`(s)`, `(l)`, `(g)`, `(aq)`) and charge
/// annotations (`^{2-}`, `^2-`, a bare run of `+`/`-`) from the end of the string, repeatedly,
/// since a formula may carry both a phase and a charge. Whitespace is removed everywhere.
fn strip_trailing_annotations(s: &str) -> String {
    let mut s: String = s.chars().filter(|c| !c.is_whitespace()).collect();

    loop {
        let mut changed = false;

        for phase in ["(s)", "(l)", "(g)", "(aq)"] {
            if s.ends_with(phase) {
                s.truncate(s.len() - phase.len());
                changed = true;
            }
        }

        // charge in braces: `^{...}` at the end
        if s.ends_with('}') {
            if let Some(pos) = s.rfind("^{") {
                let inner = &s[pos + 2..s.len() - 1];
                if !inner.contains('}') {
                    s.truncate(pos);
                    changed = true;
                }
            }
        }

        // bare caret charge: `^`, optional sign, optional digits, at the end
        if let Some(pos) = s.rfind('^') {
            let tail = &s[pos + 1..];
            let tail = tail.strip_prefix(['+', '-']).unwrap_or(tail);
            if tail.chars().all(|c| c.is_ascii_digit()) {
                s.truncate(pos);
                changed = true;
            }
        }

        // a trailing run of ionic signs
        let trimmed_len = s.trim_end_matches(['+', '-']).len();
        if trimmed_len != s.len() {
            s.truncate(trimmed_len);
            changed = true;
        }

        if !changed || s.is_empty() {
            break;
        }
    }

    s
}

/// Parses the bracket-aware core of a formula (no annotations, no hydrate dots).
fn parse_core(formula: &str) -> Result<ElementComposition, FormulaError> {
    struct Token<'s> {
        kind: FormulaToken,
        lexeme: &'s str,
        position: usize,
    }

    let mut lexer = FormulaToken::lexer(formula);
    let mut tokens = Vec::new();
    while let Some(Ok(kind)) = lexer.next() {
        tokens.push(Token {
            kind,
            lexeme: lexer.slice(),
            position: lexer.span().start,
        });
    }

    fn parse_count(token: &Token) -> Result<u64, FormulaError> {
        token.lexeme.parse::<u64>().map_err(|_| FormulaError::CountOverflow {
            text: token.lexeme.to_string(),
        })
    }

    /// Consumes tokens until a closing bracket (when `nested`) or the end of the stream.
    fn parse_group(
        tokens: &[Token],
        i: &mut usize,
        nested: bool,
    ) -> Result<ElementComposition, FormulaError> {
        let mut counts = ElementComposition::new();

        while *i < tokens.len() {
            let token = &tokens[*i];
            *i += 1;

            match token.kind {
                FormulaToken::Open => {
                    let inner = parse_group(tokens, i, true)?;
                    let multiplier = match tokens.get(*i) {
                        Some(next) if next.kind == FormulaToken::Digits => {
                            *i += 1;
                            parse_count(next)?
                        },
                        _ => 1,
                    };
                    merge_counts(&mut counts, &inner, multiplier);
                },
                FormulaToken::Close => {
                    if nested {
                        return Ok(counts);
                    }
                    return Err(FormulaError::UnexpectedClose { position: token.position });
                },
                FormulaToken::Element => {
                    let count = match tokens.get(*i) {
                        Some(next) if next.kind == FormulaToken::Digits => {
                            *i += 1;
                            parse_count(next)?
                        },
                        _ => 1,
                    };
                    *counts.entry(token.lexeme.to_string()).or_insert(0) += count;
                },
                FormulaToken::Digits | FormulaToken::Other => {
                    return Err(FormulaError::InvalidToken {
                        text: token.lexeme.to_string(),
                        position: token.position,
                    });
                },
            }
        }

        Ok(counts)
    }

    let mut i = 0;
    parse_group(&tokens, &mut i, false)
}

/// Parses a chemical formula into its element composition:
///
/// - brackets and nesting: `Ca(OH)2`, `K4[ON(SO3)2]2`
/// - hydrate / adduct separators: `CuSO4·5H2O`, `Na2CO3.10H2O` (`·`, `•` or `.`)
/// - a leading whole-formula multiplicity: `2H2O` is `(H2O)2`
/// - trailing phase and charge annotations are ignored: `Fe(s)`, `SO4^{2-}`, `Cl-`
///
/// An input that is empty once annotations are stripped yields the empty composition.
pub fn parse_formula(s: &str) -> Result<ElementComposition, FormulaError> {
    let stripped = strip_trailing_annotations(s);
    if stripped.is_empty() {
        return Ok(ElementComposition::new());
    }

    let mut total = ElementComposition::new();
    for part in stripped.split(['·', '•', '.']) {
        if part.is_empty() {
            continue;
        }
        let part = strip_trailing_annotations(part);

        let digits_end = part.find(|c: char| !c.is_ascii_digit()).unwrap_or(part.len());
        let (multiplier, core) = if digits_end > 0 {
            let multiplier = part[..digits_end].parse::<u64>()
                .map_err(|_| FormulaError::CountOverflow { text: part[..digits_end].to_string() })?;
            (multiplier, &part[digits_end..])
        } else {
            (1, part.as_str())
        };

        let core = strip_trailing_annotations(core);
        if core.is_empty() {
            continue;
        }

        let counts = parse_core(&core)?;
        merge_counts(&mut total, &counts, multiplier);
    }

    Ok(total)
}

/// Parses a formula into its canonical element composition. Alias of [`parse_formula`] under
/// the name the public API uses.
pub fn normalize_formula(s: &str) -> Result<ElementComposition, FormulaError> {
    parse_formula(s)
}

/// Returns true if both formulas have exactly the same element composition.
pub fn formulas_equivalent(a: &str, b: &str) -> Result<bool, FormulaError> {
    Ok(normalize_formula(a)? == normalize_formula(b)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn composition<const N: usize>(entries: [(&str, u64); N]) -> ElementComposition {
        entries.into_iter().map(|(el, n)| (el.to_string(), n)).collect()
    }

    #[test]
    fn plain_formula() {
        assert_eq!(parse_formula("H2O").unwrap(), composition([("H", 2), ("O", 1)]));
    }

    #[test]
    fn composition_is_order_insensitive() {
        assert!(formulas_equivalent("H2O", "OH2").unwrap());
    }

    #[test]
    fn brackets_multiply_the_group() {
        assert_eq!(
            parse_formula("Ca(OH)2").unwrap(),
            composition([("Ca", 1), ("O", 2), ("H", 2)]),
        );
    }

    #[test]
    fn nested_brackets() {
        assert_eq!(
            parse_formula("K4[ON(SO3)2]2").unwrap(),
            composition([("K", 4), ("O", 14), ("N", 2), ("S", 4)]),
        );
    }

    #[test]
    fn hydrate_with_multiplicity() {
        assert_eq!(
            parse_formula("CuSO4·5H2O").unwrap(),
            composition([("Cu", 1), ("S", 1), ("O", 9), ("H", 10)]),
        );
    }

    #[test]
    fn hydrate_with_period_separator() {
        assert_eq!(
            parse_formula("Na2CO3.10H2O").unwrap(),
            composition([("Na", 2), ("C", 1), ("O", 13), ("H", 20)]),
        );
    }

    #[test]
    fn leading_multiplicity() {
        assert_eq!(parse_formula("2H2O").unwrap(), composition([("H", 4), ("O", 2)]));
    }

    #[test]
    fn phase_annotations_are_stripped() {
        assert_eq!(parse_formula("Fe(s)").unwrap(), composition([("Fe", 1)]));
        assert_eq!(parse_formula("CO2(g)").unwrap(), composition([("C", 1), ("O", 2)]));
    }

    #[test]
    fn charge_annotations_are_stripped() {
        assert_eq!(parse_formula("SO4^{2-}").unwrap(), composition([("S", 1), ("O", 4)]));
        assert_eq!(parse_formula("SO4^2-").unwrap(), composition([("S", 1), ("O", 4)]));
        assert_eq!(parse_formula("Cl-").unwrap(), composition([("Cl", 1)]));
    }

    #[test]
    fn phase_and_charge_together() {
        assert_eq!(parse_formula("SO4^{2-}(aq)").unwrap(), composition([("S", 1), ("O", 4)]));
    }

    #[test]
    fn empty_input_is_the_empty_composition() {
        assert_eq!(parse_formula("").unwrap(), ElementComposition::new());
        assert_eq!(parse_formula("  ").unwrap(), ElementComposition::new());
    }

    #[test]
    fn lowercase_start_is_invalid() {
        assert!(matches!(
            parse_formula("h2O"),
            Err(FormulaError::InvalidToken { .. }),
        ));
    }

    #[test]
    fn stray_closing_bracket_is_invalid() {
        assert!(matches!(
            parse_formula("H2)O"),
            Err(FormulaError::UnexpectedClose { .. }),
        ));
    }
}
