//! Chromaplus is the color engine behind a color picker: it takes whatever a user or a host
//! application hands it (a CSS string, a packed integer, a keyed record, or an RGB tuple), turns
//! it into a single canonical [`Color`], lets the picker read and write channels in any of sixteen
//! color spaces, and then writes the color back out *in the notation it came in*. If the input was
//! `hsl(336 100% 50%)`, the output is an `hsl()` string with percentages and no alpha; if it was
//! `{red: 255, green: 0, blue: 102}`, the output uses `red`, `green`, and `blue`.
//!
//! That last part is the point of the crate. Parsing returns a [`FormatDescriptor`] alongside the
//! color that records everything about how the value was written, and serialization reads it back.
//!
//! # Example
//! ```
//! use chromaplus::prelude::*;
//!
//! let (pink, format) = chromaplus::parse(&"hsl(336 100% 50%)".into()).unwrap();
//! // make it darker, working in OKLCh
//! let darker = chromaplus::set_with(&pink, "l", |l| l - 0.1, Some(ColorSpaceId::Oklch));
//! // still an hsl() string, since that's what came in
//! let text = chromaplus::serialize(&darker, &format, AlphaMode::MatchOriginal);
//! assert!(text.starts_with("hsl("));
//! assert!(text.ends_with("%)"));
//! ```
//!
//! Invalid input never panics: [`parse`] returns `None` and logs why at `warn` level, and
//! [`try_parse`] hands back the [`ColorParseError`] instead. The only panics are for programming
//! errors, like asking for a channel that doesn't exist.

// we don't mess around with documentation
#![deny(missing_docs)]
// Clippy doesn't like long decimals, but adding separators in decimals isn't any more readable
// compare -0.96924 with -0.96_924
#![allow(clippy::unreadable_literal)]

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate maplit;
#[macro_use]
extern crate log;
extern crate nalgebra as na;
extern crate num;
extern crate regex;
extern crate serde;
extern crate serde_derive;
extern crate serde_json;
extern crate thiserror;

#[cfg(test)]
#[macro_use]
extern crate float_cmp;

pub mod color;
mod consts;
pub mod convert;
mod csscolor;
mod cssnumeric;
pub mod error;
pub mod external;
pub mod format;
pub mod formats;
pub mod illuminants;
pub mod named_colors;
pub mod prelude;
pub mod scale;
pub mod space;

pub use crate::color::{Color, Coord};
pub use crate::error::ColorParseError;
pub use crate::external::{ColorRecord, ExternalValue};
pub use crate::format::{AlphaMode, FormatDescriptor, NumericMode, ParseOptions, Precision};
pub use crate::space::ColorSpaceId;

/// Recognizes a color with the default options (integer records, no forced alpha). Returns `None`
/// if the value isn't a color.
pub fn parse(value: &ExternalValue) -> Option<(Color, FormatDescriptor)> {
    formats::parse(value, &ParseOptions::default())
}

/// Recognizes a color with the given options.
pub fn parse_with(value: &ExternalValue, options: &ParseOptions) -> Option<(Color, FormatDescriptor)> {
    formats::parse(value, options)
}

/// Recognizes a color, returning why the value was rejected if it isn't one.
pub fn try_parse(
    value: &ExternalValue,
    options: &ParseOptions,
) -> Result<(Color, FormatDescriptor), ColorParseError> {
    formats::try_parse(value, options)
}

/// Converts a color to another space. Converting to the color's own space returns it unchanged.
pub fn convert(color: &Color, space: ColorSpaceId) -> Color {
    color.convert(space)
}

/// Reads one channel. See [`Color::get`].
pub fn get(color: &Color, channel: &str, space: Option<ColorSpaceId>) -> f64 {
    color.get(channel, space)
}

/// Writes one channel. See [`Color::set`].
pub fn set(color: &Color, channel: &str, value: f64, space: Option<ColorSpaceId>) -> Color {
    color.set(channel, value, space)
}

/// Updates one channel from its current value. See [`Color::set_with`].
pub fn set_with<F: FnOnce(f64) -> f64>(
    color: &Color,
    channel: &str,
    f: F,
    space: Option<ColorSpaceId>,
) -> Color {
    color.set_with(channel, f, space)
}

/// Reads all three coordinates. See [`Color::get_all`].
pub fn get_all(color: &Color, space: Option<ColorSpaceId>) -> [Coord; 3] {
    color.get_all(space)
}

/// Writes all three coordinates. See [`Color::set_all`].
pub fn set_all(color: &Color, coords: [Coord; 3], space: Option<ColorSpaceId>) -> Color {
    color.set_all(coords, space)
}

/// Writes a color as text in the format it was parsed from, with the default [`Precision`].
pub fn serialize(color: &Color, format: &FormatDescriptor, alpha: AlphaMode) -> String {
    formats::serialize(color, format, alpha, &Precision::default())
}

/// Writes a color as text with a custom number of decimals per kind of value.
pub fn serialize_with(
    color: &Color,
    format: &FormatDescriptor,
    alpha: AlphaMode,
    precision: &Precision,
) -> String {
    formats::serialize(color, format, alpha, precision)
}

/// Writes a color as an external value of the same shape it was parsed from.
pub fn to_external(color: &Color, format: &FormatDescriptor, alpha: AlphaMode) -> ExternalValue {
    formats::to_external(color, format, alpha)
}

/// Exact equality, with no tolerance.
pub fn equals(a: &Color, b: &Color) -> bool {
    a.equals(b)
}

/// An independent copy of a color.
pub fn clone(color: &Color) -> Color {
    *color
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;

    fn round_trip(input: &str) -> String {
        let (color, format) = parse(&input.into()).unwrap();
        serialize(&color, &format, AlphaMode::MatchOriginal)
    }

    #[test]
    fn test_string_round_trips() {
        for s in &[
            "#ff0066",
            "#ff006680",
            "hsl(336 100% 50%)",
            "rgb(255, 0, 102)",
            "rgba(255, 0, 102, 0.5)",
            "lab(50% 25 -25 / 50%)",
            "oklch(0.628 0.258 29)",
            "hwb(336 0% 0%)",
            "color(display-p3 1 0 0.4)",
            "rebeccapurple",
        ] {
            assert_eq!(&round_trip(s), s);
        }
    }

    #[test]
    fn test_hex_canonicalization() {
        let (short, f) = parse(&"#f06".into()).unwrap();
        let (long, _) = parse(&"#ff0066".into()).unwrap();
        assert_eq!(short, long);
        assert_eq!(serialize(&short, &f, AlphaMode::MatchOriginal), "#ff0066");
        assert_eq!(serialize(&short, &f, AlphaMode::Always), "#ff0066ff");
    }

    #[test]
    fn test_alpha_is_clamped() {
        let (c, _) = parse(&"#ff0066".into()).unwrap();
        assert_eq!(set(&c, "alpha", 1.5, None).alpha(), 1.0);
        assert_eq!(set(&c, "alpha", -0.2, None).alpha(), 0.0);
        // even when the channel is addressed through another space
        assert_eq!(set(&c, "alpha", 2.0, Some(ColorSpaceId::Lab)).alpha(), 1.0);
    }

    #[test]
    fn test_number_packing() {
        let pink = Color::from_values(ColorSpaceId::Srgb, [1.0, 0.0, 0.4], 1.0);
        let without = FormatDescriptor::Number(format::NumberFormat { has_alpha: false });
        let with = FormatDescriptor::Number(format::NumberFormat { has_alpha: true });
        assert_eq!(
            to_external(&pink, &without, AlphaMode::MatchOriginal),
            ExternalValue::Number(f64::from(0xff0066u32))
        );
        assert_eq!(
            to_external(&pink, &with, AlphaMode::MatchOriginal),
            ExternalValue::Number(f64::from(0xff0066ffu32))
        );
        assert_eq!(serialize(&pink, &with, AlphaMode::MatchOriginal), "0xff0066ff");
    }

    #[test]
    fn test_object_and_tuple_equivalence() {
        let (long, _) = parse(&ColorRecord::from(vec![("red", 255.0), ("green", 0.0), ("blue", 102.0)]).into())
            .unwrap();
        let (short, _) = parse(&ColorRecord::from(vec![("r", 255.0), ("g", 0.0), ("b", 102.0)]).into())
            .unwrap();
        assert_eq!(long, short);

        let (int, _) = parse(&vec![255.0, 0.0, 102.0].into()).unwrap();
        let float_opts = ParseOptions {
            numeric_mode: NumericMode::Float,
            ..ParseOptions::default()
        };
        let (float, _) = parse_with(&vec![1.0, 0.0, 0.4].into(), &float_opts).unwrap();
        assert_eq!(int, float);
        assert_eq!(int, short);
    }

    #[test]
    fn test_conversion_identity() {
        for &space in ColorSpaceId::ALL.iter() {
            let c = Color::new(space, [Some(0.3), None, Some(0.1)], 0.7);
            assert_eq!(convert(&c, space), c);
        }
    }

    #[test]
    fn test_achromatic_hue_is_stable() {
        for &s in &[0.0, 1e-10] {
            let hsv = Color::from_values(ColorSpaceId::Hsv, [200.0, s, 50.0], 1.0);
            let hsl = convert(&hsv, ColorSpaceId::Hsl);
            assert!(approx_eq!(f64, hsl.get("h", None), 200.0, epsilon = 1e-6));
            let back = convert(&hsl, ColorSpaceId::Hsv);
            assert!(approx_eq!(f64, back.get("h", None), 200.0, epsilon = 1e-6));
            assert!(approx_eq!(f64, get(&hsv, "h", Some(ColorSpaceId::Hsl)), 200.0, epsilon = 1e-6));
            let all = get_all(&hsv, Some(ColorSpaceId::Hsl));
            assert!(approx_eq!(f64, all[0].unwrap(), 200.0, epsilon = 1e-6));
            // setting a channel elsewhere keeps the hue too
            let lighter = set(&hsv, "l", 60.0, Some(ColorSpaceId::Hsl));
            assert!(approx_eq!(f64, lighter.get("h", None), 200.0, epsilon = 1e-6));
        }
    }

    #[test]
    fn test_clone_isolation() {
        let (c, _) = parse(&"oklch(0.628 0.258 29)".into()).unwrap();
        let copy = clone(&c);
        assert!(equals(&copy, &c));
        let changed = set(&copy, "h", 120.0, None);
        assert!(!equals(&changed, &c));
        assert!(equals(&copy, &c));
    }

    #[test]
    fn test_invalid_input_is_none() {
        assert!(parse(&"rgb(nope)".into()).is_none());
        assert!(parse(&ExternalValue::Number(1.5)).is_none());
        assert!(parse(&vec![1.0, 2.0].into()).is_none());
        assert!(try_parse(&"".into(), &ParseOptions::default()).is_err());
    }

    #[test]
    fn test_set_in_foreign_space_keeps_own_space() {
        let (c, format) = parse(&"hsl(336 100% 50%)".into()).unwrap();
        let bluer = set_all(
            &c,
            [Some(0.0), Some(0.0), Some(1.0)],
            Some(ColorSpaceId::Srgb),
        );
        assert_eq!(bluer.space(), ColorSpaceId::Hsl);
        assert_eq!(serialize(&bluer, &format, AlphaMode::MatchOriginal), "hsl(240 100% 50%)");
        let rgb = get_all(&bluer, Some(ColorSpaceId::Srgb));
        assert!(approx_eq!(f64, rgb[2].unwrap(), 1.0, epsilon = 1e-9));
    }
}
