//! Text preprocessing and LaTeX cleanup: deterministic string-rewrite passes that run before
//! parsing.

/// Common unicode symbol substitutions, including fullwidth punctuation.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("×", "*"),
    ("⋅", "*"),
    ("·", "*"),
    ("•", "*"),
    ("÷", "/"),
    ("−", "-"),
    ("—", "-"),
    ("–", "-"),
    ("，", ","),
    ("；", ";"),
    ("（", "("),
    ("）", ")"),
    ("【", "["),
    ("】", "]"),
];

/// Basic text preprocessing: symbol substitution and whitespace normalization. Idempotent.
pub fn preprocess_text(text: &str) -> String {
    let mut s = text.to_string();
    for (from, to) in REPLACEMENTS {
        s = s.replace(from, to);
    }

    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// If the whole string is wrapped in a math-mode delimiter pair (`$...$`, `\(...\)` or
/// `\[...\]`), returns the inner text.
pub fn strip_math_wrappers(s: &str) -> &str {
    let s = s.trim();
    for (open, close) in [("$", "$"), (r"\(", r"\)"), (r"\[", r"\]")] {
        if s.len() >= open.len() + close.len() {
            if let Some(inner) = s.strip_prefix(open).and_then(|s| s.strip_suffix(close)) {
                return inner.trim();
            }
        }
    }
    s
}

/// Replaces the command `\name` with `\replacement`, but only where the command name ends (not
/// inside a longer command, so `\th` never touches `\theta`).
fn replace_command(s: &str, name: &str, replacement: &str) -> String {
    let needle = format!("\\{}", name);
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find(&needle) {
        let after = &rest[pos + needle.len()..];
        out.push_str(&rest[..pos]);
        if after.chars().next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false) {
            // part of a longer command; keep it as-is
            out.push_str(&needle);
        } else {
            out.push_str(replacement);
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Replaces every `\name{inner}` occurrence with `left + inner + right`, tracking nested
/// braces.
fn unwrap_macro(s: &str, name: &str, left: &str, right: &str) -> String {
    let needle = format!("\\{}", name);
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    'outer: while let Some(pos) = rest.find(&needle) {
        let after = &rest[pos + needle.len()..];
        let trimmed = after.trim_start();

        // the macro must be followed by a brace group; anything else is left untouched
        if !trimmed.starts_with('{')
            || after.chars().next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false)
        {
            out.push_str(&rest[..pos + needle.len()]);
            rest = after;
            continue;
        }

        let mut depth = 0usize;
        for (i, c) in trimmed.char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        out.push_str(&rest[..pos]);
                        out.push_str(left);
                        out.push_str(&trimmed[1..i]);
                        out.push_str(right);
                        rest = &trimmed[i + 1..];
                        continue 'outer;
                    }
                },
                _ => {},
            }
        }

        // unbalanced braces; give up on this occurrence
        out.push_str(&rest[..pos + needle.len()]);
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Lightweight LaTeX cleanup:
///
/// - strips `$...$` / `\(...\)` / `\[...\]` wrappers;
/// - removes spacing commands (`\,`, `\;`, `\!`, `~`, `\quad`, `\qquad`);
/// - normalizes equivalent macros: `\dfrac`/`\tfrac` to `\frac`, `\ln` to `\log`, trig
///   aliases (`\tg`, `\ctg`, `\arctg`, `\ch`, `\sh`, `\th`) to their canonical names;
/// - normalizes absolute-value delimiters (`\lvert`/`\rvert`, `\abs{...}`) to
///   `\left| ... \right|`;
/// - unwraps `\mathrm{...}` and `\operatorname{...}`.
///
/// Necessary braces are kept; `\cdot` is left for the parser.
pub fn clean_latex(s: &str) -> String {
    let mut s = strip_math_wrappers(s).to_string();

    for (name, replacement) in [
        ("dfrac", "\\frac"),
        ("tfrac", "\\frac"),
        ("ln", "\\log"),
        ("tg", "\\tan"),
        ("ctg", "\\cot"),
        ("arctg", "\\arctan"),
        ("arccotg", "\\arccot"),
        ("ch", "\\cosh"),
        ("sh", "\\sinh"),
        ("th", "\\tanh"),
    ] {
        s = replace_command(&s, name, replacement);
    }

    // absolute value: normalize every delimiter spelling to `\left| ... \right|`
    s = s.replace("\\left\\lvert", "\\left|");
    s = s.replace("\\right\\rvert", "\\right|");
    s = replace_command(&s, "lvert", "\\left|");
    s = replace_command(&s, "rvert", "\\right|");
    s = unwrap_macro(&s, "abs", "\\left|", "\\right|");

    s = unwrap_macro(&s, "mathrm", "", "");
    s = unwrap_macro(&s, "operatorname", "", "");

    // spacing commands carry no meaning
    for (name, replacement) in [("quad", " "), ("qquad", " ")] {
        s = replace_command(&s, name, replacement);
    }
    s = s.replace("\\,", "").replace("\\;", "").replace("\\!", "");
    s = s.replace('~', " ");

    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn preprocessing_is_idempotent() {
        let once = preprocess_text("2 × x  ÷ 3");
        assert_eq!(once, "2 * x / 3");
        assert_eq!(preprocess_text(&once), once);
    }

    #[test]
    fn wrappers_are_stripped() {
        assert_eq!(strip_math_wrappers("$x + 1$"), "x + 1");
        assert_eq!(strip_math_wrappers(r"\(x\)"), "x");
        assert_eq!(strip_math_wrappers(r"\[x\]"), "x");
        assert_eq!(strip_math_wrappers("x + 1"), "x + 1");
    }

    #[test]
    fn dfrac_normalizes_to_frac() {
        assert_eq!(clean_latex(r"\dfrac{1}{2}"), r"\frac{1}{2}");
    }

    #[test]
    fn ln_normalizes_to_log() {
        assert_eq!(clean_latex(r"\ln(x)"), r"\log(x)");
    }

    #[test]
    fn short_aliases_do_not_corrupt_longer_commands() {
        // `\th` must not rewrite the prefix of `\theta`
        assert_eq!(clean_latex(r"\theta + \th(x)"), r"\theta + \tanh(x)");
    }

    #[test]
    fn lvert_normalizes_to_left_bar() {
        assert_eq!(clean_latex(r"\lvert x \rvert"), r"\left| x \right|");
        assert_eq!(clean_latex(r"\left\lvert x \right\rvert"), r"\left| x \right|");
    }

    #[test]
    fn abs_macro_normalizes_to_bars() {
        assert_eq!(clean_latex(r"\abs{x - 1}"), r"\left|x - 1\right|");
    }

    #[test]
    fn mathrm_is_unwrapped() {
        assert_eq!(clean_latex(r"\mathrm{abc}"), "abc");
    }

    #[test]
    fn spacing_commands_are_removed() {
        assert_eq!(clean_latex(r"x\,+\;y\quad z"), "x+y z");
    }
}
