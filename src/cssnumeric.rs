//! This file separates out the more difficult aspects of string parsing, in this case dealing with
//! CSS numeric notation and all of its warts: optional signs, leading dots, exponents, percentages,
//! angle units, and the `none` keyword. The functional color parser in `csscolor.rs` splits its
//! arguments into tokens and hands each one here. (Source for CSS syntax:
//! [https://www.w3.org/TR/css-values-4/#numbers](https://www.w3.org/TR/css-values-4/#numbers).)

use regex::Regex;

use crate::error::ColorParseError;
use crate::format::AngleUnit;

/// A single CSS numeric component of a color function.
#[derive(Debug, PartialEq, Copy, Clone)]
pub(crate) enum CssNumeric {
    /// A plain number, like `255`, `-.5`, or `1e2`.
    Number(f64),
    /// A number followed by `%`. Holds the number itself, so `50%` is `Percentage(50.0)`.
    Percentage(f64),
    /// A number followed by an angle unit.
    Angle(f64, AngleUnit),
    /// The `none` keyword.
    None,
}

lazy_static! {
    static ref NUMERIC: Regex =
        Regex::new(r"^([+-]?(?:\d+(?:\.\d+)?|\.\d+)(?:[eE][+-]?\d+)?)(%|[a-zA-Z]+)?$")
            .expect("numeric token pattern is valid");
}

/// Parses a single CSS numeric token. Fails with `InvalidNumericCharacters` when the token has
/// characters that could never appear in a number or has no digits at all, and with
/// `InvalidNumericSyntax` when the characters are plausible but the token isn't well-formed.
pub(crate) fn parse_css_number(token: &str) -> Result<CssNumeric, ColorParseError> {
    let token = token.trim();
    if token.eq_ignore_ascii_case("none") {
        return Ok(CssNumeric::None);
    }
    // if invalid characters, or nothing numeric at all, return appropriate error
    if !token.chars().any(|c| c.is_ascii_digit())
        || !token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "+-.%".contains(c))
    {
        return Err(ColorParseError::InvalidNumericCharacters(token.to_string()));
    }
    let caps = NUMERIC
        .captures(token)
        .ok_or_else(|| ColorParseError::InvalidNumericSyntax(token.to_string()))?;
    let value: f64 = caps[1]
        .parse()
        .map_err(|_| ColorParseError::InvalidNumericSyntax(token.to_string()))?;
    if !value.is_finite() {
        return Err(ColorParseError::InvalidNumericSyntax(token.to_string()));
    }
    match caps.get(2).map(|m| m.as_str()) {
        None => Ok(CssNumeric::Number(value)),
        Some("%") => Ok(CssNumeric::Percentage(value)),
        Some(unit) => AngleUnit::from_suffix(unit)
            .map(|u| CssNumeric::Angle(value, u))
            .ok_or_else(|| ColorParseError::InvalidNumericSyntax(token.to_string())),
    }
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;

    #[test]
    fn test_css_parse_number() {
        assert_eq!(parse_css_number("184"), Ok(CssNumeric::Number(184.0)));
        // test leading zeros
        assert_eq!(parse_css_number("00423"), Ok(CssNumeric::Number(423.0)));
        // test signs
        assert_eq!(parse_css_number("-00423"), Ok(CssNumeric::Number(-423.0)));
        assert_eq!(parse_css_number("+00423"), Ok(CssNumeric::Number(423.0)));
        // test no leading zeros
        assert_eq!(parse_css_number(".423"), Ok(CssNumeric::Number(0.423)));
        assert_eq!(parse_css_number("-00.423"), Ok(CssNumeric::Number(-0.423)));
        // test exponents
        assert_eq!(parse_css_number("1e2"), Ok(CssNumeric::Number(100.0)));
        assert_eq!(parse_css_number("2.5E-1"), Ok(CssNumeric::Number(0.25)));
    }

    #[test]
    fn test_css_parse_percentages() {
        assert_eq!(parse_css_number("184%"), Ok(CssNumeric::Percentage(184.0)));
        assert_eq!(parse_css_number("-20%"), Ok(CssNumeric::Percentage(-20.0)));
        assert_eq!(parse_css_number("45.5%"), Ok(CssNumeric::Percentage(45.5)));
    }

    #[test]
    fn test_css_parse_angles_and_none() {
        assert_eq!(
            parse_css_number("0.25turn"),
            Ok(CssNumeric::Angle(0.25, AngleUnit::Turn))
        );
        assert_eq!(
            parse_css_number("25DEG"),
            Ok(CssNumeric::Angle(25.0, AngleUnit::Deg))
        );
        assert_eq!(parse_css_number("none"), Ok(CssNumeric::None));
        assert_eq!(parse_css_number("NONE"), Ok(CssNumeric::None));
    }

    #[test]
    fn test_errors() {
        // test non-numeric characters
        assert_eq!(
            parse_css_number("abc"),
            Err(ColorParseError::InvalidNumericCharacters("abc".to_string()))
        );
        assert_eq!(
            parse_css_number("12#"),
            Err(ColorParseError::InvalidNumericCharacters("12#".to_string()))
        );
        // test multiple periods
        assert_eq!(
            parse_css_number("14.23.2"),
            Err(ColorParseError::InvalidNumericSyntax("14.23.2".to_string()))
        );
        // test multiple percentages, percentages in wrong place
        assert_eq!(
            parse_css_number("-24%%"),
            Err(ColorParseError::InvalidNumericSyntax("-24%%".to_string()))
        );
        assert_eq!(
            parse_css_number("1%2%"),
            Err(ColorParseError::InvalidNumericSyntax("1%2%".to_string()))
        );
        // stray signs, trailing dots, and unknown units
        assert!(parse_css_number("+-1").is_err());
        assert!(parse_css_number("1.").is_err());
        assert!(parse_css_number("10px").is_err());
    }
}
