//! 12-bit (4-4-4) LED colors and conversion to and from 8-bit RGB.

use crate::{GlowstickError, Result};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every channel above this value snaps the whole color to [`LedColor::WHITE`].
const NEAR_WHITE: u8 = 240;

/// Pixels with alpha below this are treated as transparent.
pub const ALPHA_THRESHOLD: u8 = 128;

/// A packed `0xRGB` color, 4 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct LedColor(u16);

impl LedColor {
    /// Off/background sentinel, also used for unset, transparent and out-of-bounds cells.
    pub const WHITE: LedColor = LedColor(0xFFF);

    /// Build from raw nibbles. Each channel is masked to 4 bits.
    pub const fn from_nibbles(r4: u8, g4: u8, b4: u8) -> Self {
        LedColor((((r4 & 0xF) as u16) << 8) | (((g4 & 0xF) as u16) << 4) | (b4 & 0xF) as u16)
    }

    /// Quantize an 8-bit color, snapping near-white to the sentinel.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        if r > NEAR_WHITE && g > NEAR_WHITE && b > NEAR_WHITE {
            return LedColor::WHITE;
        }
        LedColor::from_nibbles(quantize(r), quantize(g), quantize(b))
    }

    /// Quantize a pixel, resolving transparency to the sentinel.
    pub fn from_rgba(pixel: &Rgba<u8>) -> Self {
        let [r, g, b, a] = pixel.0;
        if a < ALPHA_THRESHOLD {
            LedColor::WHITE
        } else {
            LedColor::from_rgb(r, g, b)
        }
    }

    /// Expand back to 8 bits per channel (`n * 17`).
    pub fn to_rgb(self) -> [u8; 3] {
        let [r4, g4, b4] = self.nibbles();
        [r4 * 17, g4 * 17, b4 * 17]
    }

    pub fn nibbles(self) -> [u8; 3] {
        [
            ((self.0 >> 8) & 0xF) as u8,
            ((self.0 >> 4) & 0xF) as u8,
            (self.0 & 0xF) as u8,
        ]
    }

    pub fn is_white(self) -> bool {
        self == LedColor::WHITE
    }
}

impl Default for LedColor {
    fn default() -> Self {
        LedColor::WHITE
    }
}

fn quantize(c: u8) -> u8 {
    (c as f32 / 255.0 * 15.0).round().clamp(0.0, 15.0) as u8
}

/// Renders the firmware literal, e.g. `0xF00`.
impl fmt::Display for LedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:03X}", self.0)
    }
}

/// Accepts `#RRGGBB` (quantized) or `0xRGB` (verbatim).
impl FromStr for LedColor {
    type Err = GlowstickError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || GlowstickError::Validation(format!("invalid color: {s}"));
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 {
                return Err(bad());
            }
            let rgb = u32::from_str_radix(hex, 16).map_err(|_| bad())?;
            return Ok(LedColor::from_rgb(
                (rgb >> 16) as u8,
                (rgb >> 8) as u8,
                rgb as u8,
            ));
        }
        let hex = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(bad)?;
        if hex.is_empty() || hex.len() > 3 {
            return Err(bad());
        }
        u16::from_str_radix(hex, 16).map(LedColor).map_err(|_| bad())
    }
}

impl From<LedColor> for String {
    fn from(color: LedColor) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for LedColor {
    type Error = GlowstickError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_round_trip_within_quantization_step() {
        for x in 0..=255u8 {
            let back = LedColor::from_rgb(x, x, x).to_rgb();
            if x > NEAR_WHITE {
                assert_eq!(back, [255, 255, 255]);
            } else {
                for c in back {
                    assert!((c as i16 - x as i16).abs() <= 8, "x={x} back={c}");
                }
            }
        }
    }

    #[test]
    fn white_snap_is_idempotent() {
        let snapped = LedColor::from_rgb(250, 245, 241);
        assert_eq!(snapped, LedColor::WHITE);
        let [r, g, b] = snapped.to_rgb();
        assert_eq!(LedColor::from_rgb(r, g, b), LedColor::WHITE);
    }

    #[test]
    fn snap_needs_all_three_channels() {
        assert_ne!(LedColor::from_rgb(255, 255, 240), LedColor::WHITE);
        assert_eq!(LedColor::from_rgb(255, 255, 240).to_string(), "0xFFE");
    }

    #[test]
    fn packs_channels_high_to_low() {
        assert_eq!(LedColor::from_rgb(255, 0, 0).to_string(), "0xF00");
        assert_eq!(LedColor::from_rgb(0, 255, 0).to_string(), "0x0F0");
        assert_eq!(LedColor::from_rgb(0, 0, 0).to_string(), "0x000");
        assert_eq!(LedColor::from_rgb(17, 34, 51).nibbles(), [1, 2, 3]);
    }

    #[test]
    fn endpoints_expand_exactly() {
        assert_eq!(LedColor::from_nibbles(0, 15, 0).to_rgb(), [0, 255, 0]);
    }

    #[test]
    fn transparent_pixels_are_white() {
        assert_eq!(LedColor::from_rgba(&Rgba([0, 0, 0, 0])), LedColor::WHITE);
        assert_eq!(LedColor::from_rgba(&Rgba([0, 0, 0, 255])).to_string(), "0x000");
    }

    #[test]
    fn parses_both_notations() {
        assert_eq!("#FF0000".parse::<LedColor>().unwrap().to_string(), "0xF00");
        assert_eq!("#ffffff".parse::<LedColor>().unwrap(), LedColor::WHITE);
        assert_eq!("0x0a3".parse::<LedColor>().unwrap().to_string(), "0x0A3");
        assert!("red".parse::<LedColor>().is_err());
        assert!("0x1234".parse::<LedColor>().is_err());
        assert!("#12345".parse::<LedColor>().is_err());
    }
}
