//! This module provides an enum of the illuminants (reference whites) that the supported color
//! spaces are defined against. Only the two used by CSS Color 4 are needed: D50 for the CIELAB
//! family, ProPhoto RGB, and XYZ-D50, and D65 for everything else. Unlike the ASTM tables, these
//! white points are derived from the CIE 1931 chromaticity coordinates used by the CSS
//! specification, normalized so that the Y (luminance) value is 1.

use serde_derive::{Deserialize, Serialize};

use crate::consts::{mat_vec_mul, D50_TO_D65, D65_TO_D50};

/// A CIE standard illuminant that a color space's XYZ coordinates are relative to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Illuminant {
    /// Horizon light, used by CIELAB, CIELCH, ProPhoto RGB, and XYZ-D50.
    D50,
    /// Noon daylight, used by sRGB and most display spaces.
    D65,
}

/// White point chromaticity (x, y) for each illuminant, in the order of the enum.
static CHROMATICITIES: [(f64, f64); 2] = [(0.3457, 0.3585), (0.3127, 0.3290)];

impl Illuminant {
    /// Gets the XYZ coordinates of the white point of the illuminant, with Y normalized to 1.
    pub fn white_point(self) -> [f64; 3] {
        let (x, y) = match self {
            Illuminant::D50 => CHROMATICITIES[0],
            Illuminant::D65 => CHROMATICITIES[1],
        };
        [x / y, 1.0, (1.0 - x - y) / y]
    }

    /// Chromatically adapts an XYZ triple from this illuminant to another one, using the Bradford
    /// transform. Adapting to the same illuminant returns the input unchanged.
    pub fn adapt(self, xyz: [f64; 3], to: Illuminant) -> [f64; 3] {
        match (self, to) {
            (Illuminant::D50, Illuminant::D65) => mat_vec_mul(&D50_TO_D65, xyz),
            (Illuminant::D65, Illuminant::D50) => mat_vec_mul(&D65_TO_D50, xyz),
            _ => xyz,
        }
    }
}
