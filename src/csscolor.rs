//! This file uses the CSS numeric parsing in `cssnumeric.rs` to parse CSS color notation according
//! to the W3 specification, and to write colors back out in the same notation. The only difference
//! from a browser is that arithmetic (`calc()`, relative colors) is not supported. You can see the
//! full grammar here: [https://www.w3.org/TR/css-color-4/](https://www.w3.org/TR/css-color-4/).
//!
//! Parsing is deliberately a little more lenient than CSS: legacy comma syntax accepts `none` and
//! mixes of numbers and percentages, and `rgba()`/`hsla()` are accepted with either separator. The
//! point is to understand what a person typed, not to validate a stylesheet.
//!
//! Every channel records how it was written (a number, a percentage, or an angle in a particular
//! unit) so that rendering can use the same form: `hsl(0.25turn 50% 40%)` goes back out with its
//! hue in turns.

use num::ToPrimitive;
use regex::Regex;

use crate::color::{Color, Coord};
use crate::cssnumeric::{parse_css_number, CssNumeric};
use crate::error::ColorParseError;
use crate::format::{
    AlphaKind, AlphaMode, AngleUnit, CoordKind, Precision, Separator, StringFormat, SyntaxId,
};
use crate::named_colors;
use crate::scale::{constrain, format_number, map_range};
use crate::space::ColorSpaceId;

lazy_static! {
    static ref FUNCTION: Regex =
        Regex::new(r"^([a-zA-Z-]+)\((.*)\)$").expect("function pattern is valid");
}

/// The identifiers `color()` accepts.
const COLOR_FUNCTION_SPACES: [&str; 10] = [
    "srgb",
    "srgb-linear",
    "display-p3",
    "a98-rgb",
    "prophoto-rgb",
    "rec2020",
    "xyz",
    "xyz-d50",
    "xyz-d65",
    "--hsv",
];

/// The range `rgb()` numbers are written in.
const RGB_BYTE_RANGE: (f64, f64) = (0.0, 255.0);

fn syntax_error(msg: String) -> ColorParseError {
    ColorParseError::InvalidColorSyntax(msg)
}

/// Converts a 0-1 channel to a byte, clamping out-of-gamut values.
pub(crate) fn to_byte(v: f64) -> u8 {
    (constrain(v, (0.0, 1.0)) * 255.0)
        .round()
        .to_u8()
        .unwrap_or(0)
}

/// Parses any supported CSS color: hex, a keyword, or a color function.
pub(crate) fn parse_css_color(input: &str) -> Result<(Color, StringFormat), ColorParseError> {
    let input = input.trim();
    if input.starts_with('#') {
        parse_hex(input)
    } else if !input.is_empty() && input.chars().all(|c| c.is_ascii_alphabetic()) {
        parse_keyword(input)
    } else {
        parse_function(input)
    }
}

/// Parses `#rgb`, `#rgba`, `#rrggbb`, or `#rrggbbaa`. Alpha is present for 4 and 8 digits.
fn parse_hex(input: &str) -> Result<(Color, StringFormat), ColorParseError> {
    let digits = &input[1..];
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) || ![3, 4, 6, 8].contains(&digits.len()) {
        return Err(ColorParseError::InvalidHex(input.to_string()));
    }
    // expand shorthand, so "f06" becomes "ff0066"
    let expanded: String = if digits.len() <= 4 {
        digits
            .chars()
            .flat_map(|c| std::iter::repeat(c).take(2))
            .collect()
    } else {
        digits.to_string()
    };
    let mut bytes = Vec::with_capacity(4);
    for i in (0..expanded.len()).step_by(2) {
        let byte = u8::from_str_radix(&expanded[i..i + 2], 16)
            .map_err(|_| ColorParseError::InvalidHex(input.to_string()))?;
        bytes.push(f64::from(byte) / 255.0);
    }
    let has_alpha = bytes.len() == 4;
    let alpha = if has_alpha { bytes[3] } else { 1.0 };
    let color = Color::from_values(ColorSpaceId::Srgb, [bytes[0], bytes[1], bytes[2]], alpha);
    Ok((
        color,
        StringFormat {
            syntax: SyntaxId::Hex,
            coord_kinds: [CoordKind::Number; 3],
            alpha_kind: None,
            separator: Separator::Space,
            space: ColorSpaceId::Srgb,
            has_alpha,
        },
    ))
}

fn parse_keyword(input: &str) -> Result<(Color, StringFormat), ColorParseError> {
    let name = input.to_ascii_lowercase();
    let color = named_colors::lookup(&name)
        .ok_or_else(|| syntax_error(format!("unknown color keyword `{}`", input)))?;
    let has_alpha = name == "transparent";
    Ok((
        color,
        StringFormat {
            syntax: SyntaxId::Keyword(name),
            coord_kinds: [CoordKind::Number; 3],
            alpha_kind: None,
            separator: Separator::Space,
            space: ColorSpaceId::Srgb,
            has_alpha,
        },
    ))
}

/// The arguments of a color function, split but not yet parsed.
struct Arguments<'a> {
    tokens: Vec<&'a str>,
    alpha: Option<&'a str>,
    separator: Separator,
}

/// Splits a function body on commas (legacy syntax) or whitespace with an optional `/ alpha`
/// (modern syntax). Mixing the two is an error.
fn split_arguments(body: &str) -> Result<Arguments<'_>, ColorParseError> {
    if body.contains(',') {
        if body.contains('/') {
            return Err(syntax_error(format!("mixed separators in `{}`", body)));
        }
        let mut tokens: Vec<&str> = body.split(',').map(str::trim).collect();
        if tokens
            .iter()
            .any(|t| t.is_empty() || t.contains(char::is_whitespace))
        {
            return Err(syntax_error(format!("malformed arguments `{}`", body)));
        }
        let alpha = if tokens.len() == 4 { tokens.pop() } else { None };
        Ok(Arguments {
            tokens,
            alpha,
            separator: Separator::Comma,
        })
    } else {
        let mut halves = body.split('/');
        let main = halves.next().unwrap_or("");
        let alpha = halves.next().map(str::trim);
        if halves.next().is_some() {
            return Err(syntax_error(format!("more than one `/` in `{}`", body)));
        }
        if let Some(a) = alpha {
            if a.is_empty() || a.contains(char::is_whitespace) {
                return Err(syntax_error(format!("malformed alpha `{}`", a)));
            }
        }
        Ok(Arguments {
            tokens: main.split_whitespace().collect(),
            alpha,
            separator: Separator::Space,
        })
    }
}

fn is_rgb_syntax(syntax: &SyntaxId) -> bool {
    match syntax {
        SyntaxId::Rgb | SyntaxId::Rgba => true,
        _ => false,
    }
}

/// Parses one channel token into a native coordinate, recording how it was written.
fn parse_channel(
    token: &str,
    space: ColorSpaceId,
    index: usize,
    syntax: &SyntaxId,
) -> Result<(Coord, CoordKind), ColorParseError> {
    let channel = space.channel(index);
    match parse_css_number(token)? {
        CssNumeric::None => Ok((None, CoordKind::Number)),
        CssNumeric::Number(v) if is_rgb_syntax(syntax) => Ok((
            Some(map_range(v, RGB_BYTE_RANGE, channel.range)),
            CoordKind::Number,
        )),
        CssNumeric::Number(v) => Ok((Some(v), CoordKind::Number)),
        CssNumeric::Percentage(p) if !channel.hue => Ok((
            Some(p * channel.percent_reference() / 100.0),
            CoordKind::Percentage,
        )),
        CssNumeric::Angle(v, unit) if channel.hue => {
            Ok((Some(v / unit.per_turn() * 360.0), CoordKind::Angle(unit)))
        }
        _ => Err(syntax_error(format!(
            "`{}` is not a valid {} value",
            token, channel.name
        ))),
    }
}

/// Parses an alpha token. `none` is treated as fully opaque.
fn parse_alpha(token: &str) -> Result<(f64, AlphaKind), ColorParseError> {
    match parse_css_number(token)? {
        CssNumeric::Number(v) => Ok((v, AlphaKind::Number)),
        CssNumeric::Percentage(p) => Ok((p / 100.0, AlphaKind::Percentage)),
        CssNumeric::None => Ok((1.0, AlphaKind::Number)),
        CssNumeric::Angle(..) => Err(syntax_error(format!("`{}` is not a valid alpha", token))),
    }
}

fn parse_function(input: &str) -> Result<(Color, StringFormat), ColorParseError> {
    let caps = FUNCTION
        .captures(input)
        .ok_or_else(|| syntax_error(format!("`{}` is not a color function", input)))?;
    let name = caps[1].to_ascii_lowercase();
    let body = caps.get(2).map_or("", |m| m.as_str());
    let args = split_arguments(body)?;
    let mut tokens = args.tokens;

    let (syntax, space) = match name.as_str() {
        "rgb" => (SyntaxId::Rgb, ColorSpaceId::Srgb),
        "rgba" => (SyntaxId::Rgba, ColorSpaceId::Srgb),
        "hsl" => (SyntaxId::Hsl, ColorSpaceId::Hsl),
        "hsla" => (SyntaxId::Hsla, ColorSpaceId::Hsl),
        "hwb" => (SyntaxId::Hwb, ColorSpaceId::Hwb),
        "lab" => (SyntaxId::Lab, ColorSpaceId::Lab),
        "lch" => (SyntaxId::Lch, ColorSpaceId::Lch),
        "oklab" => (SyntaxId::Oklab, ColorSpaceId::Oklab),
        "oklch" => (SyntaxId::Oklch, ColorSpaceId::Oklch),
        "color" => {
            if tokens.is_empty() {
                return Err(syntax_error("color() needs a color space".to_string()));
            }
            let ident = tokens.remove(0).to_ascii_lowercase();
            if !COLOR_FUNCTION_SPACES.contains(&ident.as_str()) {
                return Err(syntax_error(format!("unsupported color() space `{}`", ident)));
            }
            let space = ColorSpaceId::from_css_id(&ident)
                .ok_or_else(|| syntax_error(format!("unknown color space `{}`", ident)))?;
            (SyntaxId::ColorFunction(ident), space)
        }
        _ => return Err(syntax_error(format!("unknown color function `{}`", name))),
    };

    let legacy_allowed = match syntax {
        SyntaxId::Rgb | SyntaxId::Rgba | SyntaxId::Hsl | SyntaxId::Hsla => true,
        _ => false,
    };
    if args.separator == Separator::Comma && !legacy_allowed {
        return Err(syntax_error(format!("{}() does not take commas", name)));
    }
    if tokens.len() != 3 {
        return Err(syntax_error(format!(
            "{}() takes 3 channels, got {}",
            name,
            tokens.len()
        )));
    }

    let mut coords = [None; 3];
    let mut coord_kinds = [CoordKind::Number; 3];
    for (i, token) in tokens.iter().enumerate() {
        let (coord, kind) = parse_channel(token, space, i, &syntax)?;
        coords[i] = coord;
        coord_kinds[i] = kind;
    }
    let (alpha, alpha_kind) = match args.alpha {
        Some(token) => {
            let (a, kind) = parse_alpha(token)?;
            (a, Some(kind))
        }
        None => (1.0, None),
    };
    // rgba() and hsla() mark alpha even when the slot is left out
    let has_alpha = alpha_kind.is_some() || syntax == SyntaxId::Rgba || syntax == SyntaxId::Hsla;

    Ok((
        Color::new(space, coords, alpha),
        StringFormat {
            syntax,
            coord_kinds,
            alpha_kind,
            separator: args.separator,
            space,
            has_alpha,
        },
    ))
}

/// Writes `color` as hex, always in the long form.
fn render_hex(color: &Color, with_alpha: bool) -> String {
    let rgb = color.convert(ColorSpaceId::Srgb).values();
    let mut hex = String::with_capacity(9);
    hex.push('#');
    for v in rgb.iter() {
        hex.push_str(&format!("{:02x}", to_byte(*v)));
    }
    if with_alpha {
        hex.push_str(&format!("{:02x}", to_byte(color.alpha())));
    }
    hex
}

fn render_channel(
    value: Coord,
    kind: CoordKind,
    space: ColorSpaceId,
    index: usize,
    syntax: &SyntaxId,
    precision: &Precision,
) -> String {
    let v = match value {
        Some(v) => v,
        None => return "none".to_string(),
    };
    let channel = space.channel(index);
    match kind {
        CoordKind::Angle(unit) => {
            let decimals = match unit {
                AngleUnit::Deg | AngleUnit::Grad => precision.number,
                AngleUnit::Rad | AngleUnit::Turn => precision.unit,
            };
            format!(
                "{}{}",
                format_number(v / 360.0 * unit.per_turn(), decimals),
                unit.suffix()
            )
        }
        CoordKind::Percentage => format!(
            "{}%",
            format_number(
                v / channel.percent_reference() * 100.0,
                precision.percentage
            )
        ),
        CoordKind::Number if is_rgb_syntax(syntax) => format_number(
            map_range(v, channel.range, RGB_BYTE_RANGE),
            precision.number,
        ),
        CoordKind::Number => format_number(v, precision.for_range(channel.range.1)),
    }
}

fn render_alpha(alpha: f64, kind: Option<AlphaKind>, precision: &Precision) -> String {
    match kind {
        Some(AlphaKind::Percentage) => {
            format!("{}%", format_number(alpha * 100.0, precision.percentage))
        }
        _ => format_number(alpha, precision.alpha),
    }
}

/// Writes `color` in the notation described by `format`. The color is converted into the format's
/// space first.
pub(crate) fn render_css_color(
    color: &Color,
    format: &StringFormat,
    alpha: AlphaMode,
    precision: &Precision,
) -> String {
    let name = match (&format.syntax, format.syntax.function_name()) {
        (SyntaxId::Hex, _) => return render_hex(color, alpha.emit(format.has_alpha)),
        (SyntaxId::Keyword(keyword), _) => {
            if named_colors::matches(keyword, color) {
                return keyword.clone();
            }
            // a keyword can't carry alpha, so the hex fallback shows any translucency
            let with_alpha = match alpha {
                AlphaMode::MatchOriginal => color.alpha() < 1.0,
                other => other.emit(false),
            };
            return render_hex(color, with_alpha);
        }
        (_, Some(name)) => name,
        (_, None) => unreachable!("every other syntax is functional"),
    };

    let mut converted = color.convert(format.space);
    // gamut-bound spaces are written in range, the same way hex already is
    if format.space.def().bounded {
        converted = converted.to_gamut(None);
    }
    let coords = converted.coords();
    let mut args: Vec<String> = Vec::with_capacity(5);
    if let SyntaxId::ColorFunction(ident) = &format.syntax {
        args.push(ident.clone());
    }
    for i in 0..3 {
        args.push(render_channel(
            coords[i],
            format.coord_kinds[i],
            format.space,
            i,
            &format.syntax,
            precision,
        ));
    }
    let alpha_str = if alpha.emit(format.has_alpha) {
        Some(render_alpha(converted.alpha(), format.alpha_kind, precision))
    } else {
        None
    };

    match format.separator {
        Separator::Comma => {
            if let Some(a) = alpha_str {
                args.push(a);
            }
            format!("{}({})", name, args.join(", "))
        }
        Separator::Space => match alpha_str {
            Some(a) => format!("{}({} / {})", name, args.join(" "), a),
            None => format!("{}({})", name, args.join(" ")),
        },
    }
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;

    fn coords_close(color: &Color, expected: [f64; 3]) -> bool {
        let v = color.values();
        (0..3).all(|i| approx_eq!(f64, v[i], expected[i], epsilon = 1e-4))
    }

    fn round_trip(s: &str) -> String {
        let (color, format) = parse_css_color(s).unwrap();
        render_css_color(&color, &format, AlphaMode::MatchOriginal, &Precision::default())
    }

    #[test]
    fn test_hex_parsing() {
        let (short, f1) = parse_css_color("#f06").unwrap();
        let (long, f2) = parse_css_color("#FF0066").unwrap();
        assert_eq!(short, long);
        assert_eq!(f1, f2);
        assert!(coords_close(&short, [1.0, 0.0, 0.4]));
        let (with_alpha, f) = parse_css_color("#ff00667f").unwrap();
        assert!(f.has_alpha);
        assert!(approx_eq!(f64, with_alpha.alpha(), 127.0 / 255.0, epsilon = 1e-12));
        assert_eq!(
            parse_css_color("#12345"),
            Err(ColorParseError::InvalidHex("#12345".to_string()))
        );
        assert!(parse_css_color("#ggg").is_err());
    }

    #[test]
    fn test_hex_always_long() {
        assert_eq!(round_trip("#f06"), "#ff0066");
        assert_eq!(round_trip("#f068"), "#ff006688");
        assert_eq!(round_trip("#FF0066"), "#ff0066");
    }

    #[test]
    fn test_keywords() {
        assert_eq!(round_trip("Red"), "red");
        assert_eq!(round_trip("transparent"), "transparent");
        let (red, format) = parse_css_color("red").unwrap();
        let pinker = red.set("b", 0.4, None);
        let p = Precision::default();
        assert_eq!(render_css_color(&pinker, &format, AlphaMode::MatchOriginal, &p), "#ff0066");
        let faded = red.with_alpha(0.5);
        assert_eq!(render_css_color(&faded, &format, AlphaMode::MatchOriginal, &p), "#ff000080");
        assert_eq!(render_css_color(&faded, &format, AlphaMode::Never, &p), "#ff0000");
        assert!(parse_css_color("reddish").is_err());
    }

    #[test]
    fn test_rgb_parsing() {
        let (c, f) = parse_css_color("rgb(0 127.5 300 / .5)").unwrap();
        assert!(coords_close(&c, [0.0, 0.5, 1.1765]));
        assert_eq!(c.alpha(), 0.5);
        assert_eq!(f.separator, Separator::Space);
        assert_eq!(f.alpha_kind, Some(AlphaKind::Number));
        let (c, f) = parse_css_color("RGB(100%, 0%, 40%)").unwrap();
        assert!(coords_close(&c, [1.0, 0.0, 0.4]));
        assert_eq!(f.coord_kinds, [CoordKind::Percentage; 3]);
        assert_eq!(f.separator, Separator::Comma);
        assert!(!f.has_alpha);
    }

    #[test]
    fn test_lab_family() {
        let (c, f) = parse_css_color("lab(50% 25% -25% / 50%)").unwrap();
        assert!(coords_close(&c, [50.0, 31.25, -31.25]));
        assert_eq!(c.alpha(), 0.5);
        assert_eq!(f.alpha_kind, Some(AlphaKind::Percentage));
        let (c, _) = parse_css_color("oklch(100% 50% 50)").unwrap();
        assert!(coords_close(&c, [1.0, 0.2, 50.0]));
        let (c, f) = parse_css_color("lch(50 30 0.25turn)").unwrap();
        assert!(coords_close(&c, [50.0, 30.0, 90.0]));
        assert_eq!(f.coord_kinds[2], CoordKind::Angle(AngleUnit::Turn));
    }

    #[test]
    fn test_color_function() {
        let (c, f) = parse_css_color("color(--hsv 25deg 50% 75)").unwrap();
        assert_eq!(c.space(), ColorSpaceId::Hsv);
        assert!(coords_close(&c, [25.0, 50.0, 75.0]));
        assert_eq!(f.syntax, SyntaxId::ColorFunction("--hsv".to_string()));
        let (c, _) = parse_css_color("color(xyz 0.1 0.2 0.3)").unwrap();
        assert_eq!(c.space(), ColorSpaceId::XyzD65);
        assert_eq!(round_trip("color(xyz 0.1 0.2 0.3)"), "color(xyz 0.1 0.2 0.3)");
        assert_eq!(
            round_trip("color(display-p3 1 0.5 0 / 0.25)"),
            "color(display-p3 1 0.5 0 / 0.25)"
        );
        assert!(parse_css_color("color(lab 50 0 0)").is_err());
        assert!(parse_css_color("color(srgb 1 0)").is_err());
    }

    #[test]
    fn test_none_components() {
        let (c, f) = parse_css_color("hsl(none 0% 50%)").unwrap();
        assert_eq!(c.coords(), [None, Some(0.0), Some(50.0)]);
        assert_eq!(f.coord_kinds[0], CoordKind::Number);
        assert_eq!(round_trip("hsl(none 0% 50%)"), "hsl(none 0% 50%)");
    }

    #[test]
    fn test_round_trips() {
        for s in &[
            "rgb(255, 0, 102)",
            "rgba(255, 0, 102, 0.5)",
            "rgb(255 0 102 / 50%)",
            "hsl(336 100% 50%)",
            "hsla(336, 100%, 50%, 0.3)",
            "hwb(336 0% 0%)",
            "lab(50% 25 -25 / 50%)",
            "lch(54 107 41)",
            "oklab(0.628 0.225 0.126)",
            "oklch(0.628 0.258 29)",
            "hsl(0.25turn 50% 40%)",
        ] {
            assert_eq!(&round_trip(s), s);
        }
    }

    #[test]
    fn test_bounded_output_stays_in_gamut() {
        let p = Precision::default();
        let (rgb, rgb_format) = parse_css_color("rgb(255 0 102)").unwrap();
        let vivid = rgb.set("c", 0.37, Some(ColorSpaceId::Oklch));
        assert_eq!(
            render_css_color(&vivid, &rgb_format, AlphaMode::MatchOriginal, &p),
            format!(
                "rgb({} {} {})",
                to_byte(vivid.to_gamut(None).values()[0]),
                to_byte(vivid.to_gamut(None).values()[1]),
                to_byte(vivid.to_gamut(None).values()[2])
            )
        );
        let (hsl, hsl_format) = parse_css_color("hsl(336 100% 50%)").unwrap();
        let vivid = hsl.set("c", 0.37, Some(ColorSpaceId::Oklch));
        let text = render_css_color(&vivid, &hsl_format, AlphaMode::MatchOriginal, &p);
        let (reparsed, _) = parse_css_color(&text).unwrap();
        let values = reparsed.values();
        assert!(values[1] >= 0.0 && values[1] <= 100.0, "{}", text);
        assert!(values[2] >= 0.0 && values[2] <= 100.0, "{}", text);
        // unbounded spaces are left alone
        let (lab, lab_format) = parse_css_color("lab(50 200 0)").unwrap();
        assert_eq!(
            render_css_color(&lab, &lab_format, AlphaMode::MatchOriginal, &p),
            "lab(50 200 0)"
        );
    }

    #[test]
    fn test_rgba_without_alpha_slot() {
        let (c, f) = parse_css_color("rgba(255, 0, 0)").unwrap();
        assert_eq!(c.alpha(), 1.0);
        assert!(f.has_alpha);
        assert_eq!(round_trip("rgba(255, 0, 0)"), "rgba(255, 0, 0, 1)");
    }

    #[test]
    fn test_syntax_errors() {
        assert!(parse_css_color("rgb(1, 2)").is_err());
        assert!(parse_css_color("rgb(1 2 3 4)").is_err());
        assert!(parse_css_color("rgb(1, 2, 3 / 4)").is_err());
        assert!(parse_css_color("lab(1, 2, 3)").is_err());
        assert!(parse_css_color("hsl(50% 50% 50%)").is_err());
        assert!(parse_css_color("rgb(1deg 2 3)").is_err());
        assert!(parse_css_color("rgb(1 2 3 / 4 / 5)").is_err());
        assert!(parse_css_color("cmyk(1 2 3)").is_err());
        assert!(parse_css_color("rgb(1 2 3").is_err());
        assert!(parse_css_color("").is_err());
    }
}
