//! This module ties the four format detectors together. Each external shape has its own detector,
//! and each detector has a matching serializer that reverses it: [`string`] for CSS text, [`number`]
//! for packed integers, [`object`] for keyed records, and [`tuple`] for sRGB tuples.
//!
//! Strings are the only ambiguous shape, since a record or a tuple can arrive written out as text;
//! the string detector handles that fallback itself.

use crate::color::Color;
use crate::csscolor;
use crate::error::ColorParseError;
use crate::external::ExternalValue;
use crate::format::{AlphaMode, FormatDescriptor, NumericMode, ParseOptions, Precision};
use crate::scale::map_range;
use crate::space::ColorSpaceId;

pub mod number;
pub mod object;
pub mod string;
pub mod tuple;

/// The 0-255 scale integer sRGB channels are written on.
const BYTE_RANGE: (f64, f64) = (0.0, 255.0);
/// The 0-1 scale float channels of other spaces are written on.
const UNIT_RANGE: (f64, f64) = (0.0, 1.0);

/// Moves an externally written object or tuple channel into its native range. sRGB is natively
/// 0-1, so it only needs scaling in `Int` mode; every other space is natively in its own range, so
/// it only needs scaling in `Float` mode.
pub(crate) fn scale_in(value: f64, space: ColorSpaceId, index: usize, mode: NumericMode) -> f64 {
    let range = space.range(index);
    match (space, mode) {
        (ColorSpaceId::Srgb, NumericMode::Int) => map_range(value, BYTE_RANGE, range),
        (ColorSpaceId::Srgb, NumericMode::Float) => value,
        (_, NumericMode::Float) => map_range(value, UNIT_RANGE, range),
        (_, NumericMode::Int) => value,
    }
}

/// The inverse of [`scale_in`].
pub(crate) fn scale_out(value: f64, space: ColorSpaceId, index: usize, mode: NumericMode) -> f64 {
    let range = space.range(index);
    match (space, mode) {
        (ColorSpaceId::Srgb, NumericMode::Int) => map_range(value, range, BYTE_RANGE),
        (ColorSpaceId::Srgb, NumericMode::Float) => value,
        (_, NumericMode::Float) => map_range(value, range, UNIT_RANGE),
        (_, NumericMode::Int) => value,
    }
}

/// Runs the detector for the value's shape, returning why it was rejected on failure.
pub fn try_parse(
    value: &ExternalValue,
    options: &ParseOptions,
) -> Result<(Color, FormatDescriptor), ColorParseError> {
    match value {
        ExternalValue::String(s) => string::parse_string(s, options),
        ExternalValue::Number(n) => number::parse_number(*n, options),
        ExternalValue::Object(record) => object::parse_object(record, options.numeric_mode),
        ExternalValue::Tuple(items) => tuple::parse_tuple(items, options.numeric_mode),
    }
}

/// Recognizes a color, logging and discarding the reason when it can't.
pub fn parse(value: &ExternalValue, options: &ParseOptions) -> Option<(Color, FormatDescriptor)> {
    match try_parse(value, options) {
        Ok((color, format)) => {
            debug!("parsed {:?} as {}", value, color);
            Some((color, format))
        }
        Err(e) => {
            warn!("rejected color value {:?}: {}", value, e);
            None
        }
    }
}

/// Writes a color as text in the given format.
pub fn serialize(
    color: &Color,
    format: &FormatDescriptor,
    alpha: AlphaMode,
    precision: &Precision,
) -> String {
    match format {
        FormatDescriptor::String(f) => csscolor::render_css_color(color, f, alpha, precision),
        FormatDescriptor::Number(f) => number::render_number(color, f, alpha),
        FormatDescriptor::Object(f) => object::render_object_string(color, f, alpha, precision),
        FormatDescriptor::Tuple(f) => tuple::render_tuple_string(color, f, alpha, precision),
    }
}

/// Writes a color as an external value of the format's own shape: a number for
/// [`FormatDescriptor::Number`], a record for `Object`, and so on.
pub fn to_external(color: &Color, format: &FormatDescriptor, alpha: AlphaMode) -> ExternalValue {
    match format {
        FormatDescriptor::String(f) => ExternalValue::String(csscolor::render_css_color(
            color,
            f,
            alpha,
            &Precision::default(),
        )),
        FormatDescriptor::Number(f) => ExternalValue::Number(f64::from(number::pack(
            color,
            alpha.emit(f.has_alpha),
        ))),
        FormatDescriptor::Object(f) => ExternalValue::Object(object::render_object(color, f, alpha)),
        FormatDescriptor::Tuple(f) => ExternalValue::Tuple(tuple::render_tuple(color, f, alpha)),
    }
}
