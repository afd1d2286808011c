//! The string detector. Text is first cleaned of a couple of legacy quirks, then tried as CSS. If
//! that fails, it's tried as a record or tuple written out as text: strict JSON first, then a
//! permissive key/value reading that accepts things like `{r: 255, g: 0, b: 102}`.

use regex::Regex;
use serde_json::Value;

use crate::color::Color;
use crate::csscolor::parse_css_color;
use crate::cssnumeric::{parse_css_number, CssNumeric};
use crate::error::ColorParseError;
use crate::external::{ColorRecord, ExternalValue};
use crate::format::{FormatDescriptor, ParseOptions};
use crate::formats::{object, tuple};

lazy_static! {
    static ref HEX_0X: Regex = Regex::new(r"^0[xX]([0-9a-fA-F]+)$").expect("hex pattern is valid");
    static ref HSL: Regex = Regex::new(r"^(?i)(hsla?)\((.*)\)$").expect("hsl pattern is valid");
}

/// Rewrites legacy quirks into plain CSS: `0xRRGGBB` becomes `#RRGGBB`, and unitless saturation
/// and lightness in `hsl()`/`hsla()` get their `%`. The hue and alpha slots are never touched.
pub fn normalize(input: &str) -> String {
    let input = input.trim();
    if let Some(caps) = HEX_0X.captures(input) {
        return format!("#{}", &caps[1]);
    }
    if let Some(caps) = HSL.captures(input) {
        let body = &caps[2];
        let (main, alpha) = match body.find('/') {
            Some(slash) => (&body[..slash], Some(body[slash + 1..].trim())),
            None => (body, None),
        };
        let comma = main.contains(',');
        let mut tokens: Vec<String> = if comma {
            main.split(',').map(|t| t.trim().to_string()).collect()
        } else {
            main.split_whitespace().map(String::from).collect()
        };
        if tokens.len() < 3 {
            return input.to_string();
        }
        for token in tokens.iter_mut().take(3).skip(1) {
            if let Ok(CssNumeric::Number(_)) = parse_css_number(token) {
                token.push('%');
            }
        }
        let args = if comma {
            tokens.join(", ")
        } else {
            tokens.join(" ")
        };
        return match alpha {
            Some(a) => format!("{}({} / {})", &caps[1], args, a),
            None => format!("{}({})", &caps[1], args),
        };
    }
    input.to_string()
}

/// Reads text like `{r: 255, g: 0, b: 102}` or `r 255 g 0 b 102` as alternating keys and values:
/// the characters `"'%,:{}` are dropped, and what's left is split on whitespace.
pub fn parse_record_text(input: &str) -> Result<Vec<(String, Option<f64>)>, ColorParseError> {
    let cleaned: String = input
        .chars()
        .filter(|c| !"\"'%,:{}".contains(*c))
        .collect();
    let parts: Vec<&str> = cleaned.split_whitespace().collect();
    if parts.is_empty() || parts.len() % 2 != 0 {
        return Err(ColorParseError::WrongShape("record"));
    }
    parts
        .chunks(2)
        .map(|pair| {
            let value = if pair[1].eq_ignore_ascii_case("null") {
                None
            } else {
                let v: f64 = pair[1]
                    .parse()
                    .map_err(|_| ColorParseError::InvalidObjectValue(pair[0].to_string()))?;
                Some(v)
            };
            Ok((pair[0].to_string(), value))
        })
        .collect()
}

/// Recognizes a color written as text.
pub fn parse_string(
    input: &str,
    options: &ParseOptions,
) -> Result<(Color, FormatDescriptor), ColorParseError> {
    let normalized = normalize(input);
    let css_error = match parse_css_color(&normalized) {
        Ok((color, format)) => return Ok((color, FormatDescriptor::String(format))),
        Err(e) => e,
    };
    trace!("`{}` is not CSS ({}), trying record forms", input, css_error);

    let trimmed = input.trim();
    if let Ok(json) = serde_json::from_str::<Value>(trimmed) {
        match ExternalValue::from_json(&json) {
            Some(ExternalValue::Object(record)) => {
                return object::parse_object(&record, options.numeric_mode)
            }
            Some(ExternalValue::Tuple(items)) => {
                return tuple::parse_tuple(&items, options.numeric_mode)
            }
            _ => {}
        }
    }

    match parse_record_text(trimmed) {
        Ok(pairs) => object::parse_object(&ColorRecord(pairs), options.numeric_mode),
        // report the object error for things that at least look like objects
        Err(e) if trimmed.starts_with('{') => Err(e),
        Err(_) => Err(css_error),
    }
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;
    use crate::format::{CoordKind, NumericMode, StringFormat};
    use crate::space::ColorSpaceId;

    fn string_format(f: FormatDescriptor) -> StringFormat {
        match f {
            FormatDescriptor::String(s) => s,
            other => panic!("expected a string format, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("0xff0066"), "#ff0066");
        assert_eq!(normalize(" 0XF06 "), "#F06");
        assert_eq!(normalize("hsl(180, 24, 25)"), "hsl(180, 24%, 25%)");
        assert_eq!(normalize("hsla(180, 24, 25, 0.5)"), "hsla(180, 24%, 25%, 0.5)");
        assert_eq!(normalize("hsl(180 24 25 / 0.5)"), "hsl(180 24% 25% / 0.5)");
        assert_eq!(normalize("hsl(180deg 24% 25)"), "hsl(180deg 24% 25%)");
        assert_eq!(normalize("rgb(1, 2, 3)"), "rgb(1, 2, 3)");
    }

    #[test]
    fn test_legacy_forms() {
        let opts = ParseOptions::default();
        let (c, f) = parse_string("hsl(180, 24, 25)", &opts).unwrap();
        assert_eq!(c.space(), ColorSpaceId::Hsl);
        assert_eq!(c.values(), [180.0, 24.0, 25.0]);
        assert_eq!(string_format(f).coord_kinds[1], CoordKind::Percentage);
        let (a, _) = parse_string("0xf068", &opts).unwrap();
        let (b, _) = parse_string("#f06", &opts).unwrap();
        assert_eq!(a.values(), b.values());
    }

    #[test]
    fn test_record_text() {
        assert_eq!(
            parse_record_text("{r: 255, 'g': 0, \"b\": null}").unwrap(),
            vec![
                ("r".to_string(), Some(255.0)),
                ("g".to_string(), Some(0.0)),
                ("b".to_string(), None)
            ]
        );
        assert_eq!(
            parse_record_text("{r: 255, g}"),
            Err(ColorParseError::WrongShape("record"))
        );
        assert_eq!(
            parse_record_text("r x"),
            Err(ColorParseError::InvalidObjectValue("r".to_string()))
        );
    }

    #[test]
    fn test_object_and_tuple_strings() {
        let opts = ParseOptions::default();
        let (loose, f1) = parse_string("{r: 255, g: 0, b: 102}", &opts).unwrap();
        let (json, f2) = parse_string(r#"{"r": 255, "g": 0, "b": 102}"#, &opts).unwrap();
        assert_eq!(loose, json);
        assert_eq!(f1, f2);
        let (tuple, f) = parse_string("[255, 0, 102]", &opts).unwrap();
        assert_eq!(tuple, json);
        match f {
            FormatDescriptor::Tuple(t) => assert_eq!(t.numeric_mode, NumericMode::Int),
            other => panic!("expected a tuple format, got {:?}", other),
        }
        assert_eq!(
            parse_string("[1, 2]", &opts),
            Err(ColorParseError::InvalidTupleLength(2))
        );
    }

    #[test]
    fn test_errors_prefer_css() {
        let opts = ParseOptions::default();
        match parse_string("rgb(1, 2)", &opts) {
            Err(ColorParseError::InvalidColorSyntax(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            parse_string("{r: 255, g: 0}", &opts),
            Err(ColorParseError::UnrecognizedKeys(vec![
                "r".to_string(),
                "g".to_string()
            ]))
        );
    }
}
