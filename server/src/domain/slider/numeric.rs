//! Numeric parsing for free-text term labels
//!
//! Term labels are shop-editable text. A label takes part in range math only
//! when it reads as a plain decimal literal (`12`, `-0.5`, `1e3`) or as a
//! simple fraction of two such literals (`3/4`).

use std::sync::OnceLock;

use regex::Regex;

/// Parse a term label (or a request value) into a finite number.
///
/// Returns `None` for anything that is not a numeric literal or a single
/// `a/b` fraction. A zero denominator yields `None` so that infinities never
/// reach the range computation.
pub fn parse_numeric(text: &str) -> Option<f64> {
    if let Some(value) = parse_literal(text) {
        return Some(value);
    }

    let (numerator, denominator) = text.split_once('/')?;
    if denominator.contains('/') {
        return None;
    }

    let numerator = parse_literal(numerator)?;
    let denominator = parse_literal(denominator)?;
    if denominator == 0.0 {
        tracing::trace!(text, "Fraction with zero denominator ignored");
        return None;
    }

    Some(numerator / denominator)
}

/// Parse a single numeric literal, rejecting spellings like `inf` or `NaN`
/// that `f64::from_str` would otherwise accept.
fn parse_literal(text: &str) -> Option<f64> {
    let text = text.trim_matches(|c: char| c.is_ascii_whitespace());
    if !is_numeric_literal(text) {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_numeric_literal(text: &str) -> bool {
    static RE_LITERAL: OnceLock<Regex> = OnceLock::new();
    let re = RE_LITERAL.get_or_init(|| {
        Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$").expect("Invalid regex")
    });
    re.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_numeric("12"), Some(12.0));
    }

    #[test]
    fn test_parse_decimal_and_sign() {
        assert_eq!(parse_numeric("2.5"), Some(2.5));
        assert_eq!(parse_numeric("-0.25"), Some(-0.25));
        assert_eq!(parse_numeric("+3"), Some(3.0));
        assert_eq!(parse_numeric(".5"), Some(0.5));
        assert_eq!(parse_numeric("5."), Some(5.0));
    }

    #[test]
    fn test_parse_exponent() {
        assert_eq!(parse_numeric("1e3"), Some(1000.0));
        assert_eq!(parse_numeric("2.5E-1"), Some(0.25));
        assert_eq!(parse_numeric("1e"), None);
    }

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse_numeric("3/4"), Some(0.75));
        assert_eq!(parse_numeric("1/2"), Some(0.5));
        assert_eq!(parse_numeric("-1/4"), Some(-0.25));
    }

    #[test]
    fn test_parse_whitespace_is_tolerated() {
        assert_eq!(parse_numeric(" 7 "), Some(7.0));
        assert_eq!(parse_numeric("3 / 4"), Some(0.75));
    }

    #[test]
    fn test_parse_not_numeric() {
        assert_eq!(parse_numeric("abc"), None);
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("12kg"), None);
        assert_eq!(parse_numeric("."), None);
        assert_eq!(parse_numeric("-"), None);
    }

    #[test]
    fn test_parse_rejects_multiple_slashes() {
        assert_eq!(parse_numeric("1/2/3"), None);
    }

    #[test]
    fn test_parse_rejects_fraction_with_bad_half() {
        assert_eq!(parse_numeric("a/2"), None);
        assert_eq!(parse_numeric("1/"), None);
        assert_eq!(parse_numeric("/4"), None);
    }

    #[test]
    fn test_parse_zero_denominator_is_not_numeric() {
        assert_eq!(parse_numeric("1/0"), None);
        assert_eq!(parse_numeric("0/0"), None);
    }

    #[test]
    fn test_parse_rejects_non_finite_spellings() {
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric("infinity"), None);
        assert_eq!(parse_numeric("1e400"), None);
    }
}
