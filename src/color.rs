//! This file defines [`Color`], the canonical value every other part of the crate works with: a
//! color space, three coordinates in that space, and an alpha. A coordinate may be missing (CSS
//! `none`), which is different from zero: `hsl(none 0% 50%)` is a gray that simply has no hue,
//! and it should serialize back out that way.
//!
//! `Color` is a small `Copy` value. None of its methods mutate: reading a channel in another space
//! converts a copy, and writing a channel returns a new color. That makes it trivial to hand the
//! same color to several consumers, since nothing can change it out from under them.
//!
//! Channels are named by their short ids from the color space registry, so `"h"` is the hue of an
//! HSL color and `"l"` is the lightness of a Lab or OKLCh color. A name can also carry its own
//! space, as in `"oklch.h"`, and `"alpha"` always refers to the alpha channel.
//!
//! # Example
//! ```
//! # use chromaplus::prelude::*;
//! let pink = Color::from_values(ColorSpaceId::Srgb, [1.0, 0.0, 0.4], 1.0);
//! // read the hue in HSL without changing the color itself
//! assert_eq!(pink.get("hsl.h", None).round(), 336.0);
//! // darken it in HSL: the result stays in sRGB
//! let darker = pink.set("l", 25.0, Some(ColorSpaceId::Hsl));
//! assert_eq!(darker.space(), ColorSpaceId::Srgb);
//! assert!(darker.get("r", None) < 0.6);
//! ```

use std::fmt;

use serde_derive::{Deserialize, Serialize};

use crate::convert;
use crate::scale::{clamp_alpha, constrain, format_number, loop_hue, to_precision};
use crate::space::ColorSpaceId;

/// A single color coordinate: `None` is the CSS `none` keyword.
pub type Coord = Option<f64>;

/// A color in one of the registered color spaces. Alpha is always in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawColor")]
pub struct Color {
    space: ColorSpaceId,
    coords: [Coord; 3],
    alpha: f64,
}

/// What a `Color` deserializes through, so that alpha gets clamped on the way in.
#[derive(Deserialize)]
struct RawColor {
    space: ColorSpaceId,
    coords: [Coord; 3],
    alpha: f64,
}

impl From<RawColor> for Color {
    fn from(raw: RawColor) -> Color {
        Color::new(raw.space, raw.coords, raw.alpha)
    }
}

/// A resolved channel reference.
#[derive(Debug, Copy, Clone, PartialEq)]
enum Channel {
    Alpha,
    Coord(ColorSpaceId, usize),
}

/// Resolves a channel name against `space`. `"space.channel"` overrides `space`. An unknown name is
/// a programming error, so this panics instead of returning an error.
fn resolve_channel(name: &str, space: ColorSpaceId) -> Channel {
    if name.eq_ignore_ascii_case("alpha") {
        return Channel::Alpha;
    }
    let (space, id) = match name.find('.') {
        Some(dot) => {
            let space_id = &name[..dot];
            match ColorSpaceId::from_css_id(space_id) {
                Some(s) => (s, &name[dot + 1..]),
                None => panic!("unknown color space `{}` in channel `{}`", space_id, name),
            }
        }
        None => (space, name),
    };
    match space.channel_index(id) {
        Some(index) => Channel::Coord(space, index),
        None => panic!("color space {} has no channel `{}`", space, id),
    }
}

impl Color {
    /// Creates a new color, clamping alpha into `[0, 1]`.
    pub fn new(space: ColorSpaceId, coords: [Coord; 3], alpha: f64) -> Color {
        Color {
            space,
            coords,
            alpha: clamp_alpha(alpha),
        }
    }

    /// Creates a new color with every coordinate present.
    pub fn from_values(space: ColorSpaceId, values: [f64; 3], alpha: f64) -> Color {
        Color::new(space, [Some(values[0]), Some(values[1]), Some(values[2])], alpha)
    }

    /// The space this color's coordinates are in.
    pub fn space(&self) -> ColorSpaceId {
        self.space
    }

    /// The raw coordinates, including any that are `none`.
    pub fn coords(&self) -> [Coord; 3] {
        self.coords
    }

    /// The coordinates with `none` read as 0, which is how conversions treat them.
    pub fn values(&self) -> [f64; 3] {
        [
            self.coords[0].unwrap_or(0.0),
            self.coords[1].unwrap_or(0.0),
            self.coords[2].unwrap_or(0.0),
        ]
    }

    /// The alpha channel, between 0 (transparent) and 1 (opaque).
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns this color with a different alpha, clamped into `[0, 1]`.
    pub fn with_alpha(&self, alpha: f64) -> Color {
        Color::new(self.space, self.coords, alpha)
    }

    /// Converts to `target`. Converting to the current space returns an identical copy. Near
    /// gray, an HSL or HSV result keeps this color's own hue instead of whatever the noise gives.
    pub fn convert(&self, target: ColorSpaceId) -> Color {
        convert::convert_with_hue(self, target, self.own_hue())
    }

    /// Converts to `target`, keeping HSL and HSV hues stable near gray. See
    /// [`convert_with_hue`](crate::convert::convert_with_hue).
    pub fn convert_with_hue(&self, target: ColorSpaceId, last_hue: Option<f64>) -> Color {
        convert::convert_with_hue(self, target, last_hue)
    }

    /// The current hue of a color in one of the hexagonal sRGB spaces, which all share the same
    /// hue. Used as the fallback when a conversion lands on gray.
    fn own_hue(&self) -> Option<f64> {
        match self.space {
            ColorSpaceId::Hsl | ColorSpaceId::Hsv | ColorSpaceId::Hwb => {
                self.space.hue_index().and_then(|i| self.coords[i])
            }
            _ => None,
        }
    }

    /// Reads a single channel, optionally in another space. A `none` coordinate reads as 0.
    ///
    /// # Panics
    /// Panics if the channel name doesn't exist in the space it refers to.
    pub fn get(&self, channel: &str, space: Option<ColorSpaceId>) -> f64 {
        match resolve_channel(channel, space.unwrap_or(self.space)) {
            Channel::Alpha => self.alpha,
            Channel::Coord(s, i) => self.convert(s).coords[i].unwrap_or(0.0),
        }
    }

    /// Writes a single channel, optionally in another space, returning the new color in this
    /// color's own space. Alpha is always clamped.
    ///
    /// # Panics
    /// Panics if the channel name doesn't exist in the space it refers to.
    pub fn set(&self, channel: &str, value: f64, space: Option<ColorSpaceId>) -> Color {
        self.set_with(channel, |_| value, space)
    }

    /// Like [`set`](Color::set), but computes the new value from the current one. A `none`
    /// coordinate is passed in as 0.
    pub fn set_with<F: FnOnce(f64) -> f64>(
        &self,
        channel: &str,
        f: F,
        space: Option<ColorSpaceId>,
    ) -> Color {
        match resolve_channel(channel, space.unwrap_or(self.space)) {
            Channel::Alpha => self.with_alpha(f(self.alpha)),
            Channel::Coord(s, i) if s == self.space => {
                let mut coords = self.coords;
                coords[i] = Some(f(coords[i].unwrap_or(0.0)));
                Color::new(self.space, coords, self.alpha)
            }
            Channel::Coord(s, i) => {
                let mut foreign = self.convert(s);
                foreign.coords[i] = Some(f(foreign.coords[i].unwrap_or(0.0)));
                foreign.convert_with_hue(self.space, self.own_hue())
            }
        }
    }

    /// Reads all three coordinates, optionally in another space.
    pub fn get_all(&self, space: Option<ColorSpaceId>) -> [Coord; 3] {
        self.convert(space.unwrap_or(self.space)).coords
    }

    /// Writes all three coordinates, optionally given in another space. The result stays in this
    /// color's own space.
    pub fn set_all(&self, coords: [Coord; 3], space: Option<ColorSpaceId>) -> Color {
        let space = space.unwrap_or(self.space);
        Color::new(space, coords, self.alpha).convert_with_hue(self.space, self.own_hue())
    }

    /// Exact equality of space, alpha, and coordinates, with no tolerance.
    pub fn equals(&self, other: &Color) -> bool {
        self == other
    }

    /// Clips this color into the gamut of `space` (its own space by default): linear channels are
    /// clamped to their registered range and hues are wrapped. Spaces without a real gamut, like
    /// Lab, leave the color alone. The result is in this color's own space.
    pub fn to_gamut(&self, space: Option<ColorSpaceId>) -> Color {
        let space = space.unwrap_or(self.space);
        if !space.def().bounded {
            return *self;
        }
        let mut clipped = self.convert(space);
        for i in 0..3 {
            let channel = space.channel(i);
            clipped.coords[i] = clipped.coords[i].map(|v| {
                if channel.hue {
                    loop_hue(v, channel.range)
                } else {
                    constrain(v, channel.range)
                }
            });
        }
        clipped.convert_with_hue(self.space, self.own_hue())
    }

    /// Rounds every present coordinate, and alpha if asked, to `decimals` places.
    pub fn round(&self, decimals: u32, include_alpha: bool) -> Color {
        let mut coords = self.coords;
        for c in coords.iter_mut() {
            *c = c.map(|v| to_precision(v, decimals));
        }
        let alpha = if include_alpha {
            to_precision(self.alpha, decimals)
        } else {
            self.alpha
        };
        Color::new(self.space, coords, alpha)
    }
}

impl fmt::Display for Color {
    /// Prints a short debugging form, e.g. `Color(srgb, [1,0,0.4], 1)`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let coords: Vec<String> = self
            .coords
            .iter()
            .map(|c| match c {
                Some(v) => format_number(*v, 4),
                None => "none".to_string(),
            })
            .collect();
        write!(
            f,
            "Color({}, [{}], {})",
            self.space,
            coords.join(","),
            format_number(self.alpha, 4)
        )
    }
}
