//! Small numeric helpers shared by the detectors and the serializer: moving a value between two
//! ranges, rounding to a number of decimal places, printing numbers without trailing zeros, and
//! keeping hues on the circle.

/// Linearly maps `value` from the range `from` onto the range `to`. A degenerate source range maps
/// everything to the start of the target.
pub fn map_range(value: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let span = from.1 - from.0;
    if span == 0.0 {
        return to.0;
    }
    to.0 + (value - from.0) / span * (to.1 - to.0)
}

/// Rounds to the given number of decimal places, with ties going away from zero.
pub fn to_precision(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    // avoid ever printing "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Rounds `value` to `decimals` places and prints it as short as possible: `0.500` becomes `0.5`,
/// `12.0` becomes `12`.
pub fn format_number(value: f64, decimals: u32) -> String {
    let rounded = to_precision(value, decimals);
    let mut s = format!("{:.*}", decimals as usize, rounded);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Wraps a hue into its range. The maximum itself is left alone, so a hue of 360 stays 360 instead
/// of jumping to 0.
pub fn loop_hue(value: f64, range: (f64, f64)) -> f64 {
    let (min, max) = range;
    if value == max {
        return max;
    }
    let span = max - min;
    min + (value - min).rem_euclid(span)
}

/// Clamps `value` into `range`.
pub fn constrain(value: f64, range: (f64, f64)) -> f64 {
    if value < range.0 {
        range.0
    } else if value > range.1 {
        range.1
    } else {
        value
    }
}

/// Clamps an alpha value into `[0, 1]`. NaN is treated as fully opaque.
pub fn clamp_alpha(alpha: f64) -> f64 {
    if alpha.is_nan() {
        1.0
    } else {
        constrain(alpha, (0.0, 1.0))
    }
}
