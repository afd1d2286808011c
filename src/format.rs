//! Format descriptors: the bookkeeping that lets a color be written back out in the same notation it
//! was read in. A descriptor is produced by every successful parse, alongside the [`Color`], and
//! records everything about the input's *shape* that the color itself doesn't: which CSS function
//! was used, whether each channel was a number or a percentage (or an angle, and in what unit),
//! whether the arguments were separated by commas, which keys an object used, and so on.
//!
//! This module also holds the small option types that tune parsing and serialization.
//!
//! [`Color`]: crate::color::Color

use serde_derive::{Deserialize, Serialize};

use crate::external::ExternalValue;
use crate::formats;
use crate::space::ColorSpaceId;

/// The textual syntax a string color was written in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyntaxId {
    /// `#rrggbb` and its 3, 4, and 8 digit variants.
    Hex,
    /// A CSS named color, or `transparent`, lowercased.
    Keyword(String),
    /// `rgb()`
    Rgb,
    /// `rgba()`
    Rgba,
    /// `hsl()`
    Hsl,
    /// `hsla()`
    Hsla,
    /// `hwb()`
    Hwb,
    /// `lab()`
    Lab,
    /// `lch()`
    Lch,
    /// `oklab()`
    Oklab,
    /// `oklch()`
    Oklch,
    /// `color()`, with the space identifier exactly as written (lowercased), so that `xyz` doesn't
    /// come back as `xyz-d65`.
    ColorFunction(String),
}

impl SyntaxId {
    /// The CSS function name, if this syntax is functional.
    pub fn function_name(&self) -> Option<&'static str> {
        match self {
            SyntaxId::Hex | SyntaxId::Keyword(_) => None,
            SyntaxId::Rgb => Some("rgb"),
            SyntaxId::Rgba => Some("rgba"),
            SyntaxId::Hsl => Some("hsl"),
            SyntaxId::Hsla => Some("hsla"),
            SyntaxId::Hwb => Some("hwb"),
            SyntaxId::Lab => Some("lab"),
            SyntaxId::Lch => Some("lch"),
            SyntaxId::Oklab => Some("oklab"),
            SyntaxId::Oklch => Some("oklch"),
            SyntaxId::ColorFunction(_) => Some("color"),
        }
    }
}

/// A CSS angle unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AngleUnit {
    /// Degrees, 360 to a turn.
    Deg,
    /// Gradians, 400 to a turn.
    Grad,
    /// Radians, 2π to a turn.
    Rad,
    /// Whole turns.
    Turn,
}

impl AngleUnit {
    /// How many of this unit make a full circle.
    pub fn per_turn(self) -> f64 {
        match self {
            AngleUnit::Deg => 360.0,
            AngleUnit::Grad => 400.0,
            AngleUnit::Rad => 2.0 * std::f64::consts::PI,
            AngleUnit::Turn => 1.0,
        }
    }

    /// The unit's CSS suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            AngleUnit::Deg => "deg",
            AngleUnit::Grad => "grad",
            AngleUnit::Rad => "rad",
            AngleUnit::Turn => "turn",
        }
    }

    /// Parses a CSS angle suffix, ignoring case.
    pub fn from_suffix(suffix: &str) -> Option<AngleUnit> {
        match suffix.to_ascii_lowercase().as_str() {
            "deg" => Some(AngleUnit::Deg),
            "grad" => Some(AngleUnit::Grad),
            "rad" => Some(AngleUnit::Rad),
            "turn" => Some(AngleUnit::Turn),
            _ => None,
        }
    }
}

/// How a single color channel was written.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordKind {
    /// A plain number, or `none`.
    Number,
    /// A percentage of the channel's reference range.
    Percentage,
    /// An angle with a unit. Only valid for hue channels.
    Angle(AngleUnit),
}

/// How the alpha channel was written.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlphaKind {
    /// A number between 0 and 1.
    Number,
    /// A percentage.
    Percentage,
}

/// The separator between arguments of a CSS color function.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Separator {
    /// Legacy `rgb(1, 2, 3)`.
    Comma,
    /// Modern `rgb(1 2 3 / 0.5)`.
    Space,
}

/// Whether object and tuple channels are integers on a 0-255 scale or floats on a 0-1 scale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericMode {
    /// 0-255 for sRGB channels, and each channel's native range otherwise.
    Int,
    /// 0-1 for every channel.
    Float,
}

impl Default for NumericMode {
    fn default() -> NumericMode {
        NumericMode::Int
    }
}

/// Whether to write alpha when serializing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlphaMode {
    /// Never write alpha.
    Never,
    /// Always write alpha, even if it's 1.
    Always,
    /// Write alpha if the original value had it.
    MatchOriginal,
}

impl Default for AlphaMode {
    fn default() -> AlphaMode {
        AlphaMode::MatchOriginal
    }
}

impl AlphaMode {
    /// Decides whether alpha should be written for a format that originally did or didn't have it.
    pub fn emit(self, had_alpha: bool) -> bool {
        match self {
            AlphaMode::Never => false,
            AlphaMode::Always => true,
            AlphaMode::MatchOriginal => had_alpha,
        }
    }
}

/// Number of decimal places used when printing each kind of value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Precision {
    /// Channels with a whole-number range, like 0-255 RGB, hues, and Lab.
    pub number: u32,
    /// Percentages, on the 0-100 scale.
    pub percentage: u32,
    /// Channels with a unit range (maximum of at most 1), like OKLab or `color(srgb)`.
    pub unit: u32,
    /// Alpha written as a number.
    pub alpha: u32,
}

impl Default for Precision {
    fn default() -> Precision {
        Precision {
            number: 0,
            percentage: 1,
            unit: 3,
            alpha: 3,
        }
    }
}

impl Precision {
    /// The decimals for a plain number whose formatted range tops out at `max`.
    pub fn for_range(&self, max: f64) -> u32 {
        if max.abs() > 1.0 {
            self.number
        } else {
            self.unit
        }
    }
}

/// Options for recognizing a color.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Treat a packed number as carrying alpha in its low byte, even when it fits in 24 bits.
    pub has_alpha: bool,
    /// The scale of object and tuple channels.
    pub numeric_mode: NumericMode,
}

/// The shape of a color written as CSS text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringFormat {
    /// Which syntax was used.
    pub syntax: SyntaxId,
    /// How each channel was written.
    pub coord_kinds: [CoordKind; 3],
    /// How alpha was written, if it was written at all as a function argument.
    pub alpha_kind: Option<AlphaKind>,
    /// Commas or spaces.
    pub separator: Separator,
    /// The space the coordinates were given in.
    pub space: ColorSpaceId,
    /// Whether alpha was present on input.
    pub has_alpha: bool,
}

/// The shape of a color written as a packed integer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberFormat {
    /// Whether the low byte is alpha.
    pub has_alpha: bool,
}

/// The shape of a color written as a keyed record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectFormat {
    /// The key spelling used for each channel, in channel order.
    pub coord_keys: [String; 3],
    /// The key spelling used for alpha, if there was one.
    pub alpha_key: Option<String>,
    /// The scale the values were on.
    pub numeric_mode: NumericMode,
    /// The space whose aliases matched.
    pub space: ColorSpaceId,
}

/// The shape of a color written as an sRGB tuple.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleFormat {
    /// The scale the values were on.
    pub numeric_mode: NumericMode,
    /// Whether there was a fourth element.
    pub has_alpha: bool,
}

/// Everything about the external shape of a parsed color that's needed to write it back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FormatDescriptor {
    /// CSS text.
    String(StringFormat),
    /// A packed integer.
    Number(NumberFormat),
    /// A keyed record.
    Object(ObjectFormat),
    /// A positional sRGB tuple.
    Tuple(TupleFormat),
}

impl FormatDescriptor {
    /// The color space the format is written in.
    pub fn space(&self) -> ColorSpaceId {
        match self {
            FormatDescriptor::String(f) => f.space,
            FormatDescriptor::Object(f) => f.space,
            FormatDescriptor::Number(_) | FormatDescriptor::Tuple(_) => ColorSpaceId::Srgb,
        }
    }

    /// Whether the original value carried alpha.
    pub fn has_alpha(&self) -> bool {
        match self {
            FormatDescriptor::String(f) => f.has_alpha,
            FormatDescriptor::Number(f) => f.has_alpha,
            FormatDescriptor::Object(f) => f.alpha_key.is_some(),
            FormatDescriptor::Tuple(f) => f.has_alpha,
        }
    }

    /// Decides whether a new external value means something different from the previous one, by
    /// comparing what they parse to rather than how they're spelled: `"#F06"` and `"#ff0066"` are
    /// the same hex color, so going from one to the other is not a change. Two values that both fail
    /// to parse are compared directly.
    pub fn value_changed(
        previous: &ExternalValue,
        next: &ExternalValue,
        options: &ParseOptions,
    ) -> bool {
        match (
            formats::try_parse(previous, options),
            formats::try_parse(next, options),
        ) {
            (Ok(a), Ok(b)) => a != b,
            (Err(_), Err(_)) => previous != next,
            _ => true,
        }
    }
}
