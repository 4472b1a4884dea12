//! Color types and conversion functions for huepick.
//!
//! A sampled pixel is an [`Rgb`] triple; [`Hsv`], [`Hsl`] and [`ColorHex`] are
//! derived from it. All conversions are pure free functions, safe to call from
//! anywhere.
//!
//! Percentages and degrees are rounded half-up on the scaled value, so an
//! RGB -> HSL -> RGB round trip drifts by a few units per channel. That drift
//! is part of the contract; hex round trips are exact.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PickerError;

/// 8-bit sRGB color, the source of truth for a sampled pixel.
///
/// Serializes as a lowercase hex string `"#rrggbb"`. Deserialization also
/// accepts the functional `rgb(r, g, b)` form produced by page scripts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue in whole degrees [0, 360), saturation and value in whole percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u16,
    pub s: u8,
    pub v: u8,
}

/// Hue in whole degrees [0, 360), saturation and lightness in whole percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

/// A normalized `"#rrggbb"` string: leading `#`, six lowercase digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorHex(String);

impl ColorHex {
    /// The normalized string, including the leading `#`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes the channels. Infallible since the string is always normalized.
    pub fn to_rgb(&self) -> Rgb {
        let value = u32::from_str_radix(&self.0[1..], 16).unwrap_or_default();
        rgb_from_u24(value)
    }
}

impl fmt::Display for ColorHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ColorHex {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_rgb(s).map(Rgb::to_hex)
    }
}

impl Serialize for ColorHex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ColorHex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> ColorHex {
        rgb_to_hex(self.r, self.g, self.b)
    }

    pub fn to_hsv(self) -> Hsv {
        rgb_to_hsv(self.r, self.g, self.b)
    }

    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self.r, self.g, self.b)
    }

    /// Formats as the CSS functional notation `rgb(r, g, b)`.
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// Parses either a hex color (`#rrggbb` / `rrggbb`) or `rgb(r, g, b)`.
    ///
    /// Returns `PickerError::InvalidFormat` for anything else, including
    /// channel values above 255.
    pub fn parse(input: &str) -> Result<Rgb, PickerError> {
        let input = input.trim();
        match input
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Some(args) => parse_css_channels(args),
            None => hex_to_rgb(input),
        }
    }
}

impl FromStr for Rgb {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::parse(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_hex().as_str())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn parse_css_channels(args: &str) -> Result<Rgb, PickerError> {
    let channels: Vec<&str> = args.split(',').map(str::trim).collect();
    let &[r, g, b] = channels.as_slice() else {
        return Err(PickerError::InvalidFormat(format!(
            "expected 3 channels in rgb(), got {}",
            channels.len()
        )));
    };
    let channel = |name: &str, value: &str| {
        value
            .parse::<u8>()
            .map_err(|e| PickerError::InvalidFormat(format!("invalid {name} channel '{value}': {e}")))
    };
    Ok(Rgb {
        r: channel("red", r)?,
        g: channel("green", g)?,
        b: channel("blue", b)?,
    })
}

fn rgb_from_u24(value: u32) -> Rgb {
    Rgb {
        r: ((value >> 16) & 0xff) as u8,
        g: ((value >> 8) & 0xff) as u8,
        b: (value & 0xff) as u8,
    }
}

/// Rounds half-up: `round_half_up(-0.5) == 0.0`, `round_half_up(2.5) == 3.0`.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Channels normalized to [0, 1] with their extrema.
struct Normalized {
    r: f64,
    g: f64,
    b: f64,
    max: f64,
    min: f64,
    delta: f64,
}

impl Normalized {
    fn new(r: u8, g: u8, b: u8) -> Self {
        let r = f64::from(r) / 255.0;
        let g = f64::from(g) / 255.0;
        let b = f64::from(b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        Self {
            r,
            g,
            b,
            max,
            min,
            delta: max - min,
        }
    }

    /// Six-piece hue in whole degrees, wrapped into [0, 360).
    fn hue(&self) -> u16 {
        // `%` truncates, so the red sector can go negative; the wrap below
        // handles it after rounding.
        let sector = if self.delta == 0.0 {
            0.0
        } else if self.max == self.r {
            ((self.g - self.b) / self.delta) % 6.0
        } else if self.max == self.g {
            (self.b - self.r) / self.delta + 2.0
        } else {
            (self.r - self.g) / self.delta + 4.0
        };
        let mut hue = round_half_up(sector * 60.0);
        if hue < 0.0 {
            hue += 360.0;
        }
        hue as u16
    }
}

fn percent(fraction: f64) -> u8 {
    round_half_up(fraction * 100.0) as u8
}

/// Converts 8-bit RGB to HSV.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let n = Normalized::new(r, g, b);
    let s = if n.max == 0.0 { 0 } else { percent(n.delta / n.max) };
    Hsv {
        h: n.hue(),
        s,
        v: percent(n.max),
    }
}

/// Converts 8-bit RGB to HSL.
///
/// Saturation is derived from the unrounded lightness fraction.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let n = Normalized::new(r, g, b);
    let lightness = (n.max + n.min) / 2.0;
    let saturation = if n.delta == 0.0 {
        0.0
    } else {
        n.delta / (1.0 - (2.0 * lightness - 1.0).abs())
    };
    Hsl {
        h: n.hue(),
        s: percent(saturation),
        l: percent(lightness),
    }
}

/// Parses a 6-digit hex color like `"#ff00aa"` or `"FF00AA"`.
///
/// Returns `PickerError::InvalidFormat` unless the input is exactly six hex
/// digits after an optional `#`.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, PickerError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return Err(PickerError::InvalidFormat(format!(
            "expected 6 hex digits, got {} in '{hex}'",
            digits.len()
        )));
    }
    if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Err(PickerError::InvalidFormat(format!(
            "non-hex digit in '{hex}'"
        )));
    }
    let value = u32::from_str_radix(digits, 16)
        .map_err(|e| PickerError::InvalidFormat(format!("'{hex}': {e}")))?;
    Ok(rgb_from_u24(value))
}

/// Formats channels as `"#rrggbb"`, lowercase and zero-padded.
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> ColorHex {
    ColorHex(format!("#{r:02x}{g:02x}{b:02x}"))
}

/// Converts HSL back to 8-bit RGB with the standard chroma formula.
///
/// Hue wraps modulo 360; saturation and lightness above 100 are clamped.
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    hsl_components_to_rgb(
        f64::from(hsl.h),
        f64::from(hsl.s) / 100.0,
        f64::from(hsl.l) / 100.0,
    )
}

/// Like [`hsl_to_rgb`] for fractional inputs: hue in degrees, saturation and
/// lightness in [0, 1].
pub fn hsl_components_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let (r, g, b) = hsl_fractions_to_rgb(h, s, l);
    let quantize = |c: f64| round_half_up(c.clamp(0.0, 1.0) * 255.0) as u8;
    Rgb {
        r: quantize(r),
        g: quantize(g),
        b: quantize(b),
    }
}

/// HSL with hue in degrees and s, l in [0, 1] -> RGB in [0, 1].
fn hsl_fractions_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let sector = h.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u8 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    (r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Known values --

    #[test]
    fn pure_red_in_every_representation() {
        assert_eq!(rgb_to_hsv(255, 0, 0), Hsv { h: 0, s: 100, v: 100 });
        assert_eq!(rgb_to_hsl(255, 0, 0), Hsl { h: 0, s: 100, l: 50 });
        assert_eq!(rgb_to_hex(255, 0, 0).as_str(), "#ff0000");
    }

    #[test]
    fn black_and_white_are_achromatic() {
        assert_eq!(rgb_to_hsl(0, 0, 0), Hsl { h: 0, s: 0, l: 0 });
        assert_eq!(rgb_to_hsl(255, 255, 255), Hsl { h: 0, s: 0, l: 100 });
        assert_eq!(rgb_to_hsv(0, 0, 0), Hsv { h: 0, s: 0, v: 0 });
        assert_eq!(rgb_to_hsv(255, 255, 255), Hsv { h: 0, s: 0, v: 100 });
    }

    #[test]
    fn azure_uses_blue_sector() {
        assert_eq!(rgb_to_hsv(0, 128, 255), Hsv { h: 210, s: 100, v: 100 });
        assert_eq!(rgb_to_hsl(0, 128, 255), Hsl { h: 210, s: 100, l: 50 });
    }

    #[test]
    fn green_sector() {
        assert_eq!(rgb_to_hsl(0, 255, 0).h, 120);
        assert_eq!(rgb_to_hsv(128, 255, 0).h, 90);
    }

    #[test]
    fn negative_red_sector_hue_wraps_instead_of_clamping() {
        // (g - b) / delta is negative: -10/255 * 60 = -2.35 -> -2 -> 358
        assert_eq!(rgb_to_hsl(255, 0, 10).h, 358);
        assert_eq!(rgb_to_hsv(255, 0, 10).h, 358);
    }

    #[test]
    fn mid_gray_lightness_rounds_to_fifty() {
        assert_eq!(rgb_to_hsl(128, 128, 128), Hsl { h: 0, s: 0, l: 50 });
        assert_eq!(rgb_to_hsv(128, 128, 128), Hsv { h: 0, s: 0, v: 50 });
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(-2.35), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }

    // -- Hex --

    #[test]
    fn hex_to_rgb_with_and_without_hash() {
        assert_eq!(hex_to_rgb("#804020").unwrap(), Rgb::new(0x80, 0x40, 0x20));
        assert_eq!(hex_to_rgb("804020").unwrap(), Rgb::new(0x80, 0x40, 0x20));
    }

    #[test]
    fn hex_to_rgb_is_case_insensitive() {
        assert_eq!(hex_to_rgb("#C0FFEE").unwrap(), hex_to_rgb("#c0ffee").unwrap());
    }

    #[test]
    fn hex_to_rgb_rejects_malformed_input() {
        for bad in ["#zzzzzz", "12345", "", "#", "#ff00ff00", "+12345", "##12345", "12 345"] {
            assert!(
                matches!(hex_to_rgb(bad), Err(PickerError::InvalidFormat(_))),
                "expected InvalidFormat for {bad:?}"
            );
        }
    }

    #[test]
    fn rgb_to_hex_zero_pads() {
        assert_eq!(rgb_to_hex(0, 10, 255).as_str(), "#000aff");
        assert_eq!(Rgb::new(1, 2, 3).to_hex().to_string(), "#010203");
    }

    #[test]
    fn color_hex_normalizes_on_parse() {
        let hex: ColorHex = "C0FFEE".parse().unwrap();
        assert_eq!(hex.as_str(), "#c0ffee");
        assert_eq!(hex.to_rgb(), Rgb::new(0xc0, 0xff, 0xee));
        assert!("c0ffe".parse::<ColorHex>().is_err());
    }

    // -- HSL -> RGB reference --

    #[test]
    fn hsl_to_rgb_primaries() {
        assert_eq!(hsl_to_rgb(Hsl { h: 0, s: 100, l: 50 }), Rgb::new(255, 0, 0));
        assert_eq!(hsl_to_rgb(Hsl { h: 120, s: 100, l: 50 }), Rgb::new(0, 255, 0));
        assert_eq!(hsl_to_rgb(Hsl { h: 240, s: 100, l: 50 }), Rgb::new(0, 0, 255));
        assert_eq!(hsl_to_rgb(Hsl { h: 0, s: 0, l: 100 }), Rgb::new(255, 255, 255));
    }

    #[test]
    fn hsl_to_rgb_wraps_hue() {
        assert_eq!(
            hsl_to_rgb(Hsl { h: 480, s: 100, l: 50 }),
            hsl_to_rgb(Hsl { h: 120, s: 100, l: 50 })
        );
    }

    // -- Parsing and serde --

    #[test]
    fn parse_accepts_css_rgb() {
        assert_eq!(Rgb::parse("rgb(12, 34, 56)").unwrap(), Rgb::new(12, 34, 56));
        assert_eq!(Rgb::parse(" rgb(0,0,0) ").unwrap(), Rgb::new(0, 0, 0));
        assert_eq!(Rgb::new(12, 34, 56).to_css(), "rgb(12, 34, 56)");
    }

    #[test]
    fn parse_rejects_bad_css_rgb() {
        assert!(Rgb::parse("rgb(256, 0, 0)").is_err());
        assert!(Rgb::parse("rgb(1, 2)").is_err());
        assert!(Rgb::parse("rgb(a, b, c)").is_err());
        assert!(Rgb::parse("rgba(1, 2, 3, 4)").is_err());
    }

    #[test]
    fn rgb_serializes_as_hex_string() {
        let json = serde_json::to_string(&Rgb::new(255, 0, 0)).unwrap();
        assert_eq!(json, "\"#ff0000\"");
    }

    #[test]
    fn rgb_deserializes_from_hex_or_css() {
        let a: Rgb = serde_json::from_str("\"#00ff00\"").unwrap();
        let b: Rgb = serde_json::from_str("\"rgb(0, 255, 0)\"").unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<Rgb>("\"not-a-color\"").is_err());
    }

    #[test]
    fn hsl_serializes_as_struct() {
        let v = serde_json::to_value(Hsl { h: 210, s: 100, l: 50 }).unwrap();
        assert_eq!(v, serde_json::json!({"h": 210, "s": 100, "l": 50}));
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Largest per-channel drift of RGB -> HSL -> RGB, measured over all
        /// 2^24 inputs. Integer percent lightness alone is worth 1.275 units.
        const HSL_ROUND_TRIP_TOLERANCE: i16 = 5;

        proptest! {
            #[test]
            fn hsv_components_stay_in_range(r: u8, g: u8, b: u8) {
                let hsv = rgb_to_hsv(r, g, b);
                prop_assert!(hsv.h < 360, "h = {}", hsv.h);
                prop_assert!(hsv.s <= 100, "s = {}", hsv.s);
                prop_assert!(hsv.v <= 100, "v = {}", hsv.v);
            }

            #[test]
            fn hsl_components_stay_in_range(r: u8, g: u8, b: u8) {
                let hsl = rgb_to_hsl(r, g, b);
                prop_assert!(hsl.h < 360, "h = {}", hsl.h);
                prop_assert!(hsl.s <= 100, "s = {}", hsl.s);
                prop_assert!(hsl.l <= 100, "l = {}", hsl.l);
            }

            #[test]
            fn grays_have_zero_hue_and_saturation(k: u8) {
                let hsv = rgb_to_hsv(k, k, k);
                let hsl = rgb_to_hsl(k, k, k);
                prop_assert_eq!((hsv.h, hsv.s), (0, 0));
                prop_assert_eq!((hsl.h, hsl.s), (0, 0));
            }

            #[test]
            fn hsl_round_trip_within_rounding_drift(r: u8, g: u8, b: u8) {
                let back = hsl_to_rgb(rgb_to_hsl(r, g, b));
                for (orig, got) in [(r, back.r), (g, back.g), (b, back.b)] {
                    prop_assert!(
                        (i16::from(orig) - i16::from(got)).abs() <= HSL_ROUND_TRIP_TOLERANCE,
                        "({r}, {g}, {b}) came back as {back:?}"
                    );
                }
            }

            #[test]
            fn hex_round_trip_is_exact(r: u8, g: u8, b: u8) {
                let hex = rgb_to_hex(r, g, b);
                prop_assert_eq!(hex.as_str().len(), 7);
                prop_assert_eq!(hex_to_rgb(hex.as_str()).unwrap(), Rgb::new(r, g, b));
                prop_assert_eq!(hex_to_rgb(&hex.as_str().to_uppercase()).unwrap(), Rgb::new(r, g, b));
            }
        }
    }
}
