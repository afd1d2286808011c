//! Positional sRGB tuples, `[r, g, b]` or `[r, g, b, alpha]`.

use crate::color::Color;
use crate::error::ColorParseError;
use crate::format::{AlphaMode, FormatDescriptor, NumericMode, Precision, TupleFormat};
use crate::formats::{scale_in, scale_out};
use crate::scale::format_number;
use crate::space::ColorSpaceId;

/// Recognizes a tuple of three or four numbers. The first three may be `None`; alpha may not.
pub fn parse_tuple(
    items: &[Option<f64>],
    mode: NumericMode,
) -> Result<(Color, FormatDescriptor), ColorParseError> {
    if items.len() < 3 || items.len() > 4 {
        debug!("a color tuple needs 3 or 4 items, got {}", items.len());
        return Err(ColorParseError::InvalidTupleLength(items.len()));
    }
    for (i, item) in items.iter().enumerate() {
        match item {
            Some(v) if !v.is_finite() => return Err(ColorParseError::InvalidTupleValue(i)),
            None if i == 3 => return Err(ColorParseError::InvalidTupleValue(i)),
            _ => {}
        }
    }

    let mut coords = [None; 3];
    for (i, coord) in coords.iter_mut().enumerate() {
        *coord = items[i].map(|v| scale_in(v, ColorSpaceId::Srgb, i, mode));
    }
    let has_alpha = items.len() == 4;
    let alpha = items.get(3).copied().flatten().unwrap_or(1.0);
    Ok((
        Color::new(ColorSpaceId::Srgb, coords, alpha),
        FormatDescriptor::Tuple(TupleFormat {
            numeric_mode: mode,
            has_alpha,
        }),
    ))
}

/// Writes a color as an sRGB tuple, appending alpha if the mode asks for it.
pub fn render_tuple(color: &Color, format: &TupleFormat, alpha: AlphaMode) -> Vec<Option<f64>> {
    let rgb = color.convert(ColorSpaceId::Srgb);
    let mut items: Vec<Option<f64>> = rgb
        .coords()
        .iter()
        .enumerate()
        .map(|(i, c)| c.map(|v| scale_out(v, ColorSpaceId::Srgb, i, format.numeric_mode)))
        .collect();
    if alpha.emit(format.has_alpha) {
        items.push(Some(rgb.alpha()));
    }
    items
}

/// Writes a tuple as text, e.g. `[255, 0, 102, 0.5]`.
pub fn render_tuple_string(
    color: &Color,
    format: &TupleFormat,
    alpha: AlphaMode,
    precision: &Precision,
) -> String {
    let decimals = match format.numeric_mode {
        NumericMode::Int => precision.number,
        NumericMode::Float => precision.unit,
    };
    let parts: Vec<String> = render_tuple(color, format, alpha)
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Some(v) if i == 3 => format_number(*v, precision.alpha),
            Some(v) => format_number(*v, decimals),
            None => "null".to_string(),
        })
        .collect();
    format!("[{}]", parts.join(", "))
}
