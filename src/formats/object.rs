//! Keyed records like `{h: 336, s: 100, l: 50}`. The keys decide the color space: they're matched,
//! ignoring case, against alias tables for HSL, HSV, HWB, Lab, LCH, and sRGB, tried in that order.
//! A table matches when every channel has one of its aliases among the keys and every key is an
//! alias of something in the table. Whatever spelling the caller used is remembered, so the record
//! is written back out with the same keys.

use crate::color::Color;
use crate::error::ColorParseError;
use crate::external::ColorRecord;
use crate::format::{AlphaMode, FormatDescriptor, NumericMode, ObjectFormat, Precision};
use crate::formats::{scale_in, scale_out};
use crate::scale::format_number;
use crate::space::ColorSpaceId;

/// The accepted spellings of each channel of one color space, in order of preference.
struct AliasTable {
    space: ColorSpaceId,
    channels: [&'static [&'static str]; 3],
    alpha: &'static [&'static str],
}

static ALIAS_TABLES: [AliasTable; 6] = [
    AliasTable {
        space: ColorSpaceId::Hsl,
        channels: [
            &["h", "hue"],
            &["s", "sat", "saturation"],
            &["l", "light", "lightness"],
        ],
        alpha: &["a", "alpha", "opacity"],
    },
    // also HSB, as Photoshop calls it
    AliasTable {
        space: ColorSpaceId::Hsv,
        channels: [
            &["h", "hue"],
            &["s", "sat", "saturation"],
            &["b", "bright", "brightness", "v", "val", "value"],
        ],
        alpha: &["a", "alpha", "opacity"],
    },
    AliasTable {
        space: ColorSpaceId::Hwb,
        channels: [
            &["h", "hue"],
            &["w", "white", "whiteness"],
            &["b", "black", "blackness"],
        ],
        alpha: &["a", "alpha", "opacity"],
    },
    // `a` is a channel here, so it can't also be alpha
    AliasTable {
        space: ColorSpaceId::Lab,
        channels: [
            &["l", "light", "lightness"],
            &["a", "green-red", "greenred", "gr"],
            &["b", "blue-yellow", "blueyellow", "by"],
        ],
        alpha: &["alpha", "opacity"],
    },
    AliasTable {
        space: ColorSpaceId::Lch,
        channels: [&["l", "light", "lightness"], &["c", "chroma"], &["h", "hue"]],
        alpha: &["a", "alpha", "opacity"],
    },
    AliasTable {
        space: ColorSpaceId::Srgb,
        channels: [&["r", "red"], &["g", "green"], &["b", "blue"]],
        alpha: &["a", "alpha", "opacity"],
    },
];

impl AliasTable {
    fn knows(&self, key: &str) -> bool {
        self.channels.iter().any(|aliases| aliases.contains(&key)) || self.alpha.contains(&key)
    }

    /// Finds the caller's entry for the first alias in `aliases` that the record uses.
    fn find<'r>(
        aliases: &[&str],
        record: &'r ColorRecord,
    ) -> Option<&'r (String, Option<f64>)> {
        aliases.iter().find_map(|alias| {
            record
                .0
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(alias))
        })
    }
}

fn table_for(space: ColorSpaceId) -> Option<&'static AliasTable> {
    ALIAS_TABLES.iter().find(|t| t.space == space)
}

/// Recognizes a keyed record. `mode` says whether the values are integers (0-255 for sRGB, native
/// ranges otherwise) or 0-1 floats.
pub fn parse_object(
    record: &ColorRecord,
    mode: NumericMode,
) -> Result<(Color, FormatDescriptor), ColorParseError> {
    for (key, value) in &record.0 {
        if let Some(v) = value {
            if !v.is_finite() {
                return Err(ColorParseError::InvalidObjectValue(key.clone()));
            }
        }
    }
    let keys: Vec<String> = record.keys().map(|k| k.to_ascii_lowercase()).collect();

    for table in ALIAS_TABLES.iter() {
        let has_required = table
            .channels
            .iter()
            .all(|aliases| aliases.iter().any(|a| keys.iter().any(|k| k == a)));
        let all_known = keys.iter().all(|k| table.knows(k));
        if !(has_required && all_known) {
            continue;
        }

        let mut coords = [None; 3];
        let mut coord_keys = [String::new(), String::new(), String::new()];
        for i in 0..3 {
            if let Some((key, value)) = AliasTable::find(table.channels[i], record) {
                coord_keys[i] = key.clone();
                coords[i] = value.map(|v| scale_in(v, table.space, i, mode));
            }
        }
        let (alpha, alpha_key) = match AliasTable::find(table.alpha, record) {
            Some((key, value)) => (value.unwrap_or(1.0), Some(key.clone())),
            None => (1.0, None),
        };
        debug!("record keys {:?} matched {}", keys, table.space);
        return Ok((
            Color::new(table.space, coords, alpha),
            FormatDescriptor::Object(ObjectFormat {
                coord_keys,
                alpha_key,
                numeric_mode: mode,
                space: table.space,
            }),
        ));
    }

    Err(ColorParseError::UnrecognizedKeys(
        record.keys().map(String::from).collect(),
    ))
}

/// Writes a color as a record with the format's keys, converting to the format's space and
/// scaling like [`parse_object`] in reverse. A `none` channel becomes `null`.
pub fn render_object(color: &Color, format: &ObjectFormat, alpha: AlphaMode) -> ColorRecord {
    let converted = color.convert(format.space);
    let mut record = ColorRecord::new();
    for (i, coord) in converted.coords().iter().enumerate() {
        record.push(
            format.coord_keys[i].clone(),
            coord.map(|v| scale_out(v, format.space, i, format.numeric_mode)),
        );
    }
    if alpha.emit(format.alpha_key.is_some()) {
        let key = match &format.alpha_key {
            Some(key) => key.clone(),
            None => table_for(format.space)
                .and_then(|t| t.alpha.first())
                .map_or_else(|| "alpha".to_string(), |k| (*k).to_string()),
        };
        record.push(key, Some(converted.alpha()));
    }
    record
}

/// Writes a color as record text, e.g. `{r: 255, g: 0, b: 102, a: 0.5}`. Integer records use
/// `precision.number` decimals and float records `precision.unit`.
pub fn render_object_string(
    color: &Color,
    format: &ObjectFormat,
    alpha: AlphaMode,
    precision: &Precision,
) -> String {
    let decimals = match format.numeric_mode {
        NumericMode::Int => precision.number,
        NumericMode::Float => precision.unit,
    };
    let record = render_object(color, format, alpha);
    let parts: Vec<String> = record
        .0
        .iter()
        .enumerate()
        .map(|(i, (key, value))| {
            let places = if i == 3 { precision.alpha } else { decimals };
            match value {
                Some(v) => format!("{}: {}", key, format_number(*v, places)),
                None => format!("{}: null", key),
            }
        })
        .collect();
    format!("{{{}}}", parts.join(", "))
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;

    fn record(pairs: &[(&str, f64)]) -> ColorRecord {
        ColorRecord::from(pairs.to_vec())
    }

    fn object_format(f: FormatDescriptor) -> ObjectFormat {
        match f {
            FormatDescriptor::Object(o) => o,
            other => panic!("expected an object format, got {:?}", other),
        }
    }

    #[test]
    fn test_aliases_are_equivalent() {
        let (long, _) = parse_object(
            &record(&[("red", 255.0), ("green", 0.0), ("blue", 102.0)]),
            NumericMode::Int,
        )
        .unwrap();
        let (short, _) = parse_object(
            &record(&[("r", 255.0), ("g", 0.0), ("b", 102.0)]),
            NumericMode::Int,
        )
        .unwrap();
        assert_eq!(long, short);
        assert_eq!(short.values(), [1.0, 0.0, 0.4]);
    }

    #[test]
    fn test_space_detection() {
        let (c, f) = parse_object(
            &record(&[("h", 336.0), ("s", 100.0), ("l", 50.0)]),
            NumericMode::Int,
        )
        .unwrap();
        assert_eq!(c.space(), ColorSpaceId::Hsl);
        assert_eq!(c.values(), [336.0, 100.0, 50.0]);
        assert!(!f.has_alpha());

        let (c, _) = parse_object(
            &record(&[("hue", 10.0), ("sat", 20.0), ("brightness", 30.0)]),
            NumericMode::Int,
        )
        .unwrap();
        assert_eq!(c.space(), ColorSpaceId::Hsv);

        let (c, _) = parse_object(
            &record(&[("h", 10.0), ("w", 20.0), ("b", 30.0)]),
            NumericMode::Int,
        )
        .unwrap();
        assert_eq!(c.space(), ColorSpaceId::Hwb);

        // l, a, b is Lab, where `a` is a channel
        let (c, f) = parse_object(
            &record(&[("l", 50.0), ("a", 20.0), ("b", -30.0)]),
            NumericMode::Int,
        )
        .unwrap();
        assert_eq!(c.space(), ColorSpaceId::Lab);
        assert!(!f.has_alpha());

        let (c, _) = parse_object(
            &record(&[("L", 50.0), ("C", 20.0), ("H", 30.0), ("Opacity", 0.5)]),
            NumericMode::Int,
        )
        .unwrap();
        assert_eq!(c.space(), ColorSpaceId::Lch);
        assert_eq!(c.alpha(), 0.5);
    }

    #[test]
    fn test_unrecognized_keys() {
        assert_eq!(
            parse_object(
                &record(&[("r", 1.0), ("g", 1.0), ("b", 1.0), ("x", 1.0)]),
                NumericMode::Int
            ),
            Err(ColorParseError::UnrecognizedKeys(vec![
                "r".to_string(),
                "g".to_string(),
                "b".to_string(),
                "x".to_string()
            ]))
        );
        assert!(parse_object(&record(&[("r", 1.0), ("g", 1.0)]), NumericMode::Int).is_err());
        assert!(parse_object(
            &record(&[("r", std::f64::NAN), ("g", 1.0), ("b", 1.0)]),
            NumericMode::Int
        )
        .is_err());
    }

    #[test]
    fn test_float_mode() {
        let (c, _) = parse_object(
            &record(&[("l", 0.5), ("a", 0.5), ("b", 1.0)]),
            NumericMode::Float,
        )
        .unwrap();
        assert_eq!(c.values(), [50.0, 0.0, 125.0]);
        let (c, _) = parse_object(
            &record(&[("r", 1.0), ("g", 0.0), ("b", 0.4)]),
            NumericMode::Float,
        )
        .unwrap();
        assert_eq!(c.values(), [1.0, 0.0, 0.4]);
    }

    #[test]
    fn test_null_is_none() {
        let mut r = ColorRecord::new();
        r.push("h", None);
        r.push("s", Some(0.0));
        r.push("l", Some(50.0));
        let (c, f) = parse_object(&r, NumericMode::Int).unwrap();
        assert_eq!(c.coords(), [None, Some(0.0), Some(50.0)]);
        assert_eq!(
            render_object_string(&c, &object_format(f), AlphaMode::MatchOriginal, &Precision::default()),
            "{h: null, s: 0, l: 50}"
        );
    }

    #[test]
    fn test_render_keeps_spelling() {
        let (c, f) = parse_object(
            &record(&[("Red", 255.0), ("g", 0.0), ("BLUE", 102.0), ("alpha", 0.5)]),
            NumericMode::Int,
        )
        .unwrap();
        let f = object_format(f);
        assert_eq!(f.coord_keys, ["Red".to_string(), "g".to_string(), "BLUE".to_string()]);
        assert_eq!(
            render_object_string(&c, &f, AlphaMode::MatchOriginal, &Precision::default()),
            "{Red: 255, g: 0, BLUE: 102, alpha: 0.5}"
        );
        assert_eq!(
            render_object_string(&c, &f, AlphaMode::Never, &Precision::default()),
            "{Red: 255, g: 0, BLUE: 102}"
        );
    }

    #[test]
    fn test_render_default_alpha_key() {
        let (c, f) = parse_object(
            &record(&[("r", 1.0), ("g", 0.0), ("b", 0.4)]),
            NumericMode::Float,
        )
        .unwrap();
        let f = object_format(f);
        assert_eq!(
            render_object_string(&c, &f, AlphaMode::Always, &Precision::default()),
            "{r: 1, g: 0, b: 0.4, a: 1}"
        );
        let lab = ObjectFormat {
            coord_keys: ["l".to_string(), "a".to_string(), "b".to_string()],
            alpha_key: None,
            numeric_mode: NumericMode::Int,
            space: ColorSpaceId::Lab,
        };
        let record = render_object(&c, &lab, AlphaMode::Always);
        assert_eq!(record.keys().last(), Some("alpha"));
    }
}
