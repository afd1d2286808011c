//! This file provides the constant matrices used for color space conversion. Only the forward
//! direction of each transform is written down; every inverse is computed from it once, on first
//! use. Tabulating both directions separately means the two are never quite inverses of each
//! other, and the leftover error creeps into colors that should survive a round trip untouched,
//! e.g., going from D65 to D50 and back.
//!
//! Every matrix maps linear-light RGB (or LMS) to XYZ at the space's own white point, or the
//! reverse, and is applied to column vectors.

// Clippy doesn't like long decimals, and these are copied verbatim from the CSS sample code
#![allow(clippy::excessive_precision)]

use na::{Matrix3, Vector3};

/// Computes the inverse of a constant matrix. Panics on a singular matrix, which none of the
/// tables below are.
fn inv(m: &Matrix3<f64>) -> Matrix3<f64> {
    m.try_inverse()
        .expect("constant conversion matrix is invertible")
}

/// Applies a matrix to a coordinate triple.
pub fn mat_vec_mul(m: &Matrix3<f64>, v: [f64; 3]) -> [f64; 3] {
    let out = m * Vector3::new(v[0], v[1], v[2]);
    [out[0], out[1], out[2]]
}

lazy_static! {
    pub static ref SRGB_TO_XYZ: Matrix3<f64> = Matrix3::new(
        0.41239079926595934, 0.357584339383878, 0.1804807884018343,
        0.21263900587151027, 0.715168678767756, 0.07219231536073371,
        0.01933081871559182, 0.11919477979462598, 0.9505321522496607,
    );
    pub static ref XYZ_TO_SRGB: Matrix3<f64> = inv(&SRGB_TO_XYZ);

    pub static ref P3_TO_XYZ: Matrix3<f64> = Matrix3::new(
        0.4865709486482162, 0.26566769316909306, 0.1982172852343625,
        0.2289745640697488, 0.6917385218365064, 0.079286914093745,
        0.0, 0.04511338185890264, 1.043944368900976,
    );
    pub static ref XYZ_TO_P3: Matrix3<f64> = inv(&P3_TO_XYZ);

    pub static ref A98_TO_XYZ: Matrix3<f64> = Matrix3::new(
        0.5766690429101305, 0.1855582379065463, 0.1882286462349947,
        0.29734497525053605, 0.6273635662554661, 0.07529145849399788,
        0.02703136138641234, 0.07068885253582723, 0.9913375368376388,
    );
    pub static ref XYZ_TO_A98: Matrix3<f64> = inv(&A98_TO_XYZ);

    /// ProPhoto is relative to D50, unlike the other RGB spaces.
    pub static ref PROPHOTO_TO_XYZ: Matrix3<f64> = Matrix3::new(
        0.7977604896723027, 0.13518583717574031, 0.0313493495815248,
        0.2880711282292934, 0.7118432178101014, 0.00008565396060525902,
        0.0, 0.0, 0.8251046025104601,
    );
    pub static ref XYZ_TO_PROPHOTO: Matrix3<f64> = inv(&PROPHOTO_TO_XYZ);

    pub static ref REC2020_TO_XYZ: Matrix3<f64> = Matrix3::new(
        0.6369580483012914, 0.14461690358620832, 0.1688809751641721,
        0.2627002120112671, 0.6779980715188708, 0.05930171646986196,
        0.0, 0.028072693049087428, 1.060985057710791,
    );
    pub static ref XYZ_TO_REC2020: Matrix3<f64> = inv(&REC2020_TO_XYZ);

    /// Bradford chromatic adaptation.
    pub static ref D65_TO_D50: Matrix3<f64> = Matrix3::new(
        1.0479298208405488, 0.022946793341019088, -0.05019222954313557,
        0.029627815688159344, 0.990434484573249, -0.01707382502938514,
        -0.009243058152591178, 0.015055144896577895, 0.7518742899580008,
    );
    pub static ref D50_TO_D65: Matrix3<f64> = inv(&D65_TO_D50);

    /// OKLab, via the LMS cone space. XYZ here is D65.
    pub static ref XYZ_TO_LMS: Matrix3<f64> = Matrix3::new(
        0.8190224379967030, 0.3619062600528904, -0.1288737815209879,
        0.0329836539323885, 0.9292868615863434, 0.0361446663506424,
        0.0481771893596242, 0.2642395317527308, 0.6335478284694309,
    );
    pub static ref LMS_TO_XYZ: Matrix3<f64> = inv(&XYZ_TO_LMS);

    pub static ref LMS_TO_OKLAB: Matrix3<f64> = Matrix3::new(
        0.2104542683093140, 0.7936177747023054, -0.0040720430116193,
        1.9779985324311684, -2.4285922420485799, 0.4505937096174110,
        0.0259040424655478, 0.7827717124575296, -0.8086757549230774,
    );
    pub static ref OKLAB_TO_LMS: Matrix3<f64> = inv(&LMS_TO_OKLAB);
}
