//! Reading LED colors off the canvas, one cell at a time.

use crate::color::{LedColor, ALPHA_THRESHOLD};
use crate::geometry::{Layout, PanelId, Panels};
use crate::pattern::{Pattern, PatternStore};
use image::{Rgba, RgbaImage};
use log::debug;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SamplePolicy {
    /// The single pixel at the cell's top-left corner.
    Point,
    /// Mean of the `pitch x pitch` block under the cell.
    #[default]
    Area,
}

impl FromStr for SamplePolicy {
    type Err = crate::GlowstickError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "point" => Ok(SamplePolicy::Point),
            "area" => Ok(SamplePolicy::Area),
            _ => Err(crate::GlowstickError::Validation(format!("unknown sampling policy: {s}"))),
        }
    }
}

/// Which panels take part in image sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Selection {
    pub left_wing: bool,
    pub right_wing: bool,
    pub left_tail: bool,
    pub right_tail: bool,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            left_wing: true,
            right_wing: true,
            left_tail: true,
            right_tail: true,
        }
    }
}

impl Selection {
    pub fn is_selected(&self, id: PanelId) -> bool {
        match id {
            PanelId::LeftWing => self.left_wing,
            PanelId::RightWing => self.right_wing,
            PanelId::LeftTail => self.left_tail,
            PanelId::RightTail => self.right_tail,
        }
    }

    pub fn set(&mut self, id: PanelId, selected: bool) {
        let slot = match id {
            PanelId::LeftWing => &mut self.left_wing,
            PanelId::RightWing => &mut self.right_wing,
            PanelId::LeftTail => &mut self.left_tail,
            PanelId::RightTail => &mut self.right_tail,
        };
        *slot = selected;
    }
}

/// Anything that can answer "what color is canvas pixel `(x, y)`".
pub trait PixelSource {
    /// `None` when nothing covers the pixel.
    fn pixel(&self, x: i64, y: i64) -> Option<Rgba<u8>>;
}

/// A pre-rendered canvas, addressed directly.
impl PixelSource for RgbaImage {
    fn pixel(&self, x: i64, y: i64) -> Option<Rgba<u8>> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        self.get_pixel_checked(x, y).copied()
    }
}

fn is_opaque(pixel: &Rgba<u8>) -> bool {
    pixel.0[3] >= ALPHA_THRESHOLD
}

/// Sample one cell whose block starts at canvas pixel `(x, y)`.
///
/// The primary (top-left) pixel decides transparency: if it is transparent
/// or off the canvas the cell is white. Otherwise area sampling averages
/// only the opaque on-canvas pixels of the block.
pub fn sample_cell<S: PixelSource + ?Sized>(
    canvas: &S,
    x: i64,
    y: i64,
    pitch: u32,
    policy: SamplePolicy,
) -> LedColor {
    let primary = match canvas.pixel(x, y) {
        Some(p) if is_opaque(&p) => p,
        _ => return LedColor::WHITE,
    };
    if policy == SamplePolicy::Point || pitch <= 1 {
        return LedColor::from_rgba(&primary);
    }

    let mut sum = [0u32; 3];
    let mut count = 0u32;
    for dy in 0..pitch as i64 {
        for dx in 0..pitch as i64 {
            if let Some(p) = canvas.pixel(x + dx, y + dy).filter(is_opaque) {
                for (acc, c) in sum.iter_mut().zip(p.0) {
                    *acc += c as u32;
                }
                count += 1;
            }
        }
    }
    let [r, g, b] = sum.map(|s| ((s + count / 2) / count) as u8);
    LedColor::from_rgb(r, g, b)
}

/// Fresh pattern for one panel read from `canvas`.
pub fn sample_panel<S: PixelSource + ?Sized>(
    canvas: &S,
    layout: &Layout,
    id: PanelId,
    width: u32,
    height: u32,
    policy: SamplePolicy,
) -> Pattern {
    let rect = layout.rect(id);
    let pitch = layout.pitch;
    let mut pattern = Pattern::new(width, height);
    for row in 0..height {
        for col in 0..width {
            let x = rect.x + col as i64 * pitch as i64;
            let y = rect.y + row as i64 * pitch as i64;
            pattern.set(row, col, sample_cell(canvas, x, y, pitch, policy));
        }
    }
    pattern
}

/// Overwrite every selected panel's pattern from `canvas`; unselected panels are untouched.
pub fn sample<S: PixelSource + ?Sized>(
    canvas: &S,
    layout: &Layout,
    panels: &Panels,
    selection: &Selection,
    policy: SamplePolicy,
    store: &mut PatternStore,
) {
    for (id, panel) in panels.iter() {
        if !selection.is_selected(id) {
            continue;
        }
        debug!("sampling {id} ({}x{}, {policy:?})", panel.width, panel.height);
        let pattern = sample_panel(canvas, layout, id, panel.width, panel.height, policy);
        store.replace(id, pattern);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn checker() -> RgbaImage {
        RgbaImage::from_fn(4, 4, |x, y| if (x + y) % 2 == 0 { RED } else { BLUE })
    }

    #[test]
    fn point_reads_top_left() {
        assert_eq!(sample_cell(&checker(), 0, 0, 2, SamplePolicy::Point).to_string(), "0xF00");
        assert_eq!(sample_cell(&checker(), 1, 0, 2, SamplePolicy::Point).to_string(), "0x00F");
    }

    #[test]
    fn area_averages_channels() {
        // (255+0)/2 rounds to 128 -> nibble 8.
        assert_eq!(sample_cell(&checker(), 0, 0, 2, SamplePolicy::Area).to_string(), "0x808");
    }

    #[test]
    fn transparent_primary_whitens_cell() {
        let mut canvas = RgbaImage::from_pixel(2, 2, RED);
        canvas.put_pixel(0, 0, CLEAR);
        assert_eq!(sample_cell(&canvas, 0, 0, 2, SamplePolicy::Area), LedColor::WHITE);
    }

    #[test]
    fn area_skips_transparent_and_off_canvas_pixels() {
        let mut canvas = RgbaImage::from_pixel(3, 3, RED);
        canvas.put_pixel(2, 1, CLEAR);
        // Block at (1,1) with pitch 3 mostly hangs off the canvas.
        assert_eq!(sample_cell(&canvas, 1, 1, 3, SamplePolicy::Area).to_string(), "0xF00");
        assert_eq!(sample_cell(&canvas, -1, 0, 3, SamplePolicy::Area), LedColor::WHITE);
        assert_eq!(sample_cell(&canvas, 3, 0, 1, SamplePolicy::Point), LedColor::WHITE);
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!("Point".parse::<SamplePolicy>().unwrap(), SamplePolicy::Point);
        assert!("bilinear".parse::<SamplePolicy>().is_err());
    }
}
