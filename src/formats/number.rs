//! Packed integer colors: `0xRRGGBB`, or `0xRRGGBBAA` when alpha is present. A number is turned
//! into a zero-padded hex string and read by the CSS parser, so it gets exactly the same treatment
//! as a typed hex code.

use num::ToPrimitive;

use crate::color::Color;
use crate::csscolor::{parse_css_color, to_byte};
use crate::error::ColorParseError;
use crate::format::{AlphaMode, FormatDescriptor, NumberFormat, ParseOptions};
use crate::space::ColorSpaceId;

/// The largest value that fits in 24 bits, i.e., the largest color without alpha.
const MAX_RGB: u32 = 0x00FF_FFFF;

/// Recognizes a packed integer. Values above 24 bits always carry alpha in the low byte; smaller
/// values do only when `options.has_alpha` says so.
pub fn parse_number(
    value: f64,
    options: &ParseOptions,
) -> Result<(Color, FormatDescriptor), ColorParseError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(ColorParseError::InvalidNumber(value));
    }
    let packed = value
        .to_u32()
        .ok_or(ColorParseError::InvalidNumber(value))?;
    let has_alpha = options.has_alpha || packed > MAX_RGB;
    let hex = if has_alpha {
        format!("#{:08x}", packed)
    } else {
        format!("#{:06x}", packed)
    };
    debug!("reading packed color {} as {}", value, hex);
    let (color, _) = parse_css_color(&hex)?;
    Ok((color, FormatDescriptor::Number(NumberFormat { has_alpha })))
}

/// Packs a color's sRGB channels, rounded and clamped to bytes, with alpha as the low byte if
/// asked.
pub fn pack(color: &Color, with_alpha: bool) -> u32 {
    let rgb = color.convert(ColorSpaceId::Srgb).values();
    let packed = rgb
        .iter()
        .fold(0u32, |acc, v| (acc << 8) | u32::from(to_byte(*v)));
    if with_alpha {
        (packed << 8) | u32::from(to_byte(color.alpha()))
    } else {
        packed
    }
}

/// Writes the packed form as `0x` and 6 or 8 lowercase hex digits.
pub fn render_number(color: &Color, format: &NumberFormat, alpha: AlphaMode) -> String {
    if alpha.emit(format.has_alpha) {
        format!("0x{:08x}", pack(color, true))
    } else {
        format!("0x{:06x}", pack(color, false))
    }
}
