//! This module is the color space registry: a read-only table describing every supported color
//! space, its three channels, and how to refer to it in CSS. Everything that needs to know what a
//! coordinate *means* (its range, whether it wraps around like a hue, what it's called) looks it up
//! here instead of hard-coding it.
//!
//! The table is built lazily on first use and never mutated afterwards, so it can be shared freely.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};

use crate::error::ColorParseError;
use crate::illuminants::Illuminant;

/// Identifies one of the supported color spaces. The set is closed: every `match` over it is
/// exhaustive, so there's no such thing as an unregistered space at runtime.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSpaceId {
    /// Gamma-encoded sRGB, the space of hex codes and `rgb()`.
    #[serde(rename = "srgb")]
    Srgb,
    /// sRGB without the transfer function.
    #[serde(rename = "srgb-linear")]
    SrgbLinear,
    /// Display P3, sRGB's transfer function with wider primaries.
    #[serde(rename = "display-p3")]
    DisplayP3,
    /// Adobe RGB (1998).
    #[serde(rename = "a98-rgb")]
    A98Rgb,
    /// ProPhoto (ROMM) RGB, relative to D50.
    #[serde(rename = "prophoto-rgb")]
    ProPhoto,
    /// ITU-R BT.2020.
    #[serde(rename = "rec2020")]
    Rec2020,
    /// The HSL cylinder over sRGB.
    #[serde(rename = "hsl")]
    Hsl,
    /// The HSV (or HSB) cylinder over sRGB.
    #[serde(rename = "hsv")]
    Hsv,
    /// Hue, whiteness, and blackness over sRGB.
    #[serde(rename = "hwb")]
    Hwb,
    /// CIELAB relative to D50, as CSS uses it.
    #[serde(rename = "lab")]
    Lab,
    /// CIELAB relative to D65.
    #[serde(rename = "lab-d65")]
    LabD65,
    /// The polar form of CIELAB (D50).
    #[serde(rename = "lch")]
    Lch,
    /// Björn Ottosson's OKLab.
    #[serde(rename = "oklab")]
    Oklab,
    /// The polar form of OKLab.
    #[serde(rename = "oklch")]
    Oklch,
    /// CIE 1931 XYZ relative to D50.
    #[serde(rename = "xyz-d50")]
    XyzD50,
    /// CIE 1931 XYZ relative to D65.
    #[serde(rename = "xyz-d65")]
    XyzD65,
}

/// Describes a single non-alpha channel of a color space.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelDef {
    /// Short identifier used by channel lookups, e.g. `"h"`.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Reference range `(min, max)`. For bounded spaces this is the gamut; for the others it's the
    /// conventional range, which also defines what 100% means in CSS.
    pub range: (f64, f64),
    /// Whether this channel is an angle that wraps around at the end of its range.
    pub hue: bool,
}

impl ChannelDef {
    /// The value that `100%` corresponds to when this channel is written as a CSS percentage.
    pub fn percent_reference(&self) -> f64 {
        self.range.0.abs().max(self.range.1.abs())
    }
}

/// Describes a color space: its channels, its names, and how it connects to the others.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceDef {
    /// The id this definition belongs to.
    pub id: ColorSpaceId,
    /// Human-readable name.
    pub name: &'static str,
    /// Canonical CSS identifier, as used in `color()` and in `"space.channel"` references.
    pub css_id: &'static str,
    /// Other identifiers that resolve to this space.
    pub aliases: &'static [&'static str],
    /// The three non-alpha channels, in coordinate order.
    pub channels: [ChannelDef; 3],
    /// Reference white of the space's XYZ connection.
    pub white: Illuminant,
    /// Whether the channel ranges describe a real gamut (true for RGB-derived spaces), as opposed
    /// to a conventional range that valid colors may exceed.
    pub bounded: bool,
}

const fn ch(id: &'static str, name: &'static str, min: f64, max: f64, hue: bool) -> ChannelDef {
    ChannelDef {
        id,
        name,
        range: (min, max),
        hue,
    }
}

const RGB_CHANNELS: [ChannelDef; 3] = [
    ch("r", "Red", 0.0, 1.0, false),
    ch("g", "Green", 0.0, 1.0, false),
    ch("b", "Blue", 0.0, 1.0, false),
];

const XYZ_CHANNELS: [ChannelDef; 3] = [
    ch("x", "X", 0.0, 1.0, false),
    ch("y", "Y", 0.0, 1.0, false),
    ch("z", "Z", 0.0, 1.0, false),
];

const LAB_CHANNELS: [ChannelDef; 3] = [
    ch("l", "Lightness", 0.0, 100.0, false),
    ch("a", "a", -125.0, 125.0, false),
    ch("b", "b", -125.0, 125.0, false),
];

fn rgb_space(
    id: ColorSpaceId,
    name: &'static str,
    css_id: &'static str,
    white: Illuminant,
) -> SpaceDef {
    SpaceDef {
        id,
        name,
        css_id,
        aliases: &[],
        channels: RGB_CHANNELS,
        white,
        bounded: true,
    }
}

lazy_static! {
    static ref REGISTRY: HashMap<ColorSpaceId, SpaceDef> = {
        use self::ColorSpaceId::*;
        hashmap! {
            Srgb => rgb_space(Srgb, "sRGB", "srgb", Illuminant::D65),
            SrgbLinear => rgb_space(SrgbLinear, "Linear sRGB", "srgb-linear", Illuminant::D65),
            DisplayP3 => rgb_space(DisplayP3, "Display P3", "display-p3", Illuminant::D65),
            A98Rgb => rgb_space(A98Rgb, "Adobe RGB (1998)", "a98-rgb", Illuminant::D65),
            ProPhoto => rgb_space(ProPhoto, "ProPhoto RGB", "prophoto-rgb", Illuminant::D50),
            Rec2020 => rgb_space(Rec2020, "Rec. 2020", "rec2020", Illuminant::D65),
            Hsl => SpaceDef {
                id: Hsl,
                name: "HSL",
                css_id: "hsl",
                aliases: &[],
                channels: [
                    ch("h", "Hue", 0.0, 360.0, true),
                    ch("s", "Saturation", 0.0, 100.0, false),
                    ch("l", "Lightness", 0.0, 100.0, false),
                ],
                white: Illuminant::D65,
                bounded: true,
            },
            Hsv => SpaceDef {
                id: Hsv,
                name: "HSV",
                css_id: "hsv",
                aliases: &["--hsv", "hsb"],
                channels: [
                    ch("h", "Hue", 0.0, 360.0, true),
                    ch("s", "Saturation", 0.0, 100.0, false),
                    ch("v", "Value", 0.0, 100.0, false),
                ],
                white: Illuminant::D65,
                bounded: true,
            },
            Hwb => SpaceDef {
                id: Hwb,
                name: "HWB",
                css_id: "hwb",
                aliases: &[],
                channels: [
                    ch("h", "Hue", 0.0, 360.0, true),
                    ch("w", "Whiteness", 0.0, 100.0, false),
                    ch("b", "Blackness", 0.0, 100.0, false),
                ],
                white: Illuminant::D65,
                bounded: true,
            },
            Lab => SpaceDef {
                id: Lab,
                name: "CIE Lab",
                css_id: "lab",
                aliases: &["lab-d50"],
                channels: LAB_CHANNELS,
                white: Illuminant::D50,
                bounded: false,
            },
            LabD65 => SpaceDef {
                id: LabD65,
                name: "CIE Lab D65",
                css_id: "lab-d65",
                aliases: &[],
                channels: LAB_CHANNELS,
                white: Illuminant::D65,
                bounded: false,
            },
            Lch => SpaceDef {
                id: Lch,
                name: "CIE LCH",
                css_id: "lch",
                aliases: &[],
                channels: [
                    ch("l", "Lightness", 0.0, 100.0, false),
                    ch("c", "Chroma", 0.0, 150.0, false),
                    ch("h", "Hue", 0.0, 360.0, true),
                ],
                white: Illuminant::D50,
                bounded: false,
            },
            Oklab => SpaceDef {
                id: Oklab,
                name: "OKLab",
                css_id: "oklab",
                aliases: &[],
                channels: [
                    ch("l", "Lightness", 0.0, 1.0, false),
                    ch("a", "a", -0.4, 0.4, false),
                    ch("b", "b", -0.4, 0.4, false),
                ],
                white: Illuminant::D65,
                bounded: false,
            },
            Oklch => SpaceDef {
                id: Oklch,
                name: "OKLCh",
                css_id: "oklch",
                aliases: &[],
                channels: [
                    ch("l", "Lightness", 0.0, 1.0, false),
                    ch("c", "Chroma", 0.0, 0.4, false),
                    ch("h", "Hue", 0.0, 360.0, true),
                ],
                white: Illuminant::D65,
                bounded: false,
            },
            XyzD50 => SpaceDef {
                id: XyzD50,
                name: "XYZ D50",
                css_id: "xyz-d50",
                aliases: &[],
                channels: XYZ_CHANNELS,
                white: Illuminant::D50,
                bounded: false,
            },
            XyzD65 => SpaceDef {
                id: XyzD65,
                name: "XYZ D65",
                css_id: "xyz-d65",
                aliases: &["xyz"],
                channels: XYZ_CHANNELS,
                white: Illuminant::D65,
                bounded: false,
            },
        }
    };

    // reverse index from every CSS identifier and alias to its space
    static ref CSS_IDS: HashMap<&'static str, ColorSpaceId> = {
        let mut ids = HashMap::new();
        for def in REGISTRY.values() {
            ids.insert(def.css_id, def.id);
            for alias in def.aliases {
                ids.insert(*alias, def.id);
            }
        }
        ids
    };
}

impl ColorSpaceId {
    /// Every registered space, in declaration order.
    pub const ALL: [ColorSpaceId; 16] = [
        ColorSpaceId::Srgb,
        ColorSpaceId::SrgbLinear,
        ColorSpaceId::DisplayP3,
        ColorSpaceId::A98Rgb,
        ColorSpaceId::ProPhoto,
        ColorSpaceId::Rec2020,
        ColorSpaceId::Hsl,
        ColorSpaceId::Hsv,
        ColorSpaceId::Hwb,
        ColorSpaceId::Lab,
        ColorSpaceId::LabD65,
        ColorSpaceId::Lch,
        ColorSpaceId::Oklab,
        ColorSpaceId::Oklch,
        ColorSpaceId::XyzD50,
        ColorSpaceId::XyzD65,
    ];

    /// Looks up the registry entry for this space.
    pub fn def(self) -> &'static SpaceDef {
        // every variant is inserted above, so a miss is a bug in the table itself
        REGISTRY
            .get(&self)
            .unwrap_or_else(|| panic!("color space {:?} missing from registry", self))
    }

    /// Gets the definition of the channel at `index`. Panics if `index` isn't 0, 1, or 2.
    pub fn channel(self, index: usize) -> &'static ChannelDef {
        match self.def().channels.get(index) {
            Some(channel) => channel,
            None => panic!("{} has no channel {}", self, index),
        }
    }

    /// Gets the reference range of the channel at `index`.
    pub fn range(self, index: usize) -> (f64, f64) {
        self.channel(index).range
    }

    /// Finds the index of a channel by its short id, ignoring case.
    pub fn channel_index(self, id: &str) -> Option<usize> {
        self.def()
            .channels
            .iter()
            .position(|c| c.id.eq_ignore_ascii_case(id))
    }

    /// The index of this space's hue channel, if it has one.
    pub fn hue_index(self) -> Option<usize> {
        self.def().channels.iter().position(|c| c.hue)
    }

    /// Whether this is one of the sRGB cylinders whose hue becomes unstable at zero saturation or
    /// lightness: HSL and HSV.
    pub fn is_hue_based(self) -> bool {
        match self {
            ColorSpaceId::Hsl | ColorSpaceId::Hsv => true,
            _ => false,
        }
    }

    /// The canonical CSS identifier.
    pub fn css_id(self) -> &'static str {
        self.def().css_id
    }

    /// Resolves a CSS identifier or alias, ignoring case.
    pub fn from_css_id(id: &str) -> Option<ColorSpaceId> {
        CSS_IDS.get(id.to_ascii_lowercase().as_str()).cloned()
    }
}

impl fmt::Display for ColorSpaceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.css_id())
    }
}

impl FromStr for ColorSpaceId {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<ColorSpaceId, ColorParseError> {
        ColorSpaceId::from_css_id(s)
            .ok_or_else(|| ColorParseError::InvalidColorSyntax(format!("unknown color space `{}`", s)))
    }
}
