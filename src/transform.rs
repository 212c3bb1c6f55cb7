//! Placing an uploaded image on the layout canvas.
//!
//! The image is scaled relative to the wing span, rotated about its own
//! centre, and translated so that centre lands at a percentage position
//! of the canvas. Each canvas pixel a cell asks for is mapped back
//! through the inverse transform, so the canvas is never rasterized.

use crate::geometry::Layout;
use crate::sample::PixelSource;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f64 = 0.01;

/// User-controlled position (percent of canvas), scale and rotation (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePlacement {
    pub x: f64,
    pub y: f64,
    /// `1.0` fits the image's width to the wing span.
    pub scale: f64,
    pub rotation: f64,
}

impl Default for ImagePlacement {
    fn default() -> Self {
        Self {
            x: 50.0,
            y: 50.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl ImagePlacement {
    /// Pull every field into its valid range. NaN falls back to the default.
    pub fn clamped(self) -> Self {
        let d = ImagePlacement::default();
        let pick = |v: f64, fallback: f64| if v.is_nan() { fallback } else { v };
        Self {
            x: pick(self.x, d.x).clamp(0.0, 100.0),
            y: pick(self.y, d.y).clamp(0.0, 100.0),
            scale: pick(self.scale, d.scale).max(MIN_SCALE),
            rotation: pick(self.rotation, d.rotation).clamp(-180.0, 180.0),
        }
    }
}

/// Image-to-canvas similarity transform and its inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMap {
    scale: f64,
    cos: f64,
    sin: f64,
    centre: (f64, f64),
    target: (f64, f64),
}

impl AffineMap {
    /// Effective pixels-per-source-pixel after fitting to the wing span.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn to_canvas(&self, sx: f64, sy: f64) -> (f64, f64) {
        let (dx, dy) = ((sx - self.centre.0) * self.scale, (sy - self.centre.1) * self.scale);
        (
            self.target.0 + self.cos * dx - self.sin * dy,
            self.target.1 + self.sin * dx + self.cos * dy,
        )
    }

    pub fn to_source(&self, cx: f64, cy: f64) -> (f64, f64) {
        let (ex, ey) = (cx - self.target.0, cy - self.target.1);
        let dx = self.cos * ex + self.sin * ey;
        let dy = -self.sin * ex + self.cos * ey;
        (self.centre.0 + dx / self.scale, self.centre.1 + dy / self.scale)
    }
}

pub fn place(
    image_width: u32,
    image_height: u32,
    placement: &ImagePlacement,
    layout: &Layout,
) -> AffineMap {
    let placement = placement.clamped();
    let natural = image_width.max(1) as f64;
    let (sin, cos) = placement.rotation.to_radians().sin_cos();
    AffineMap {
        scale: placement.scale * layout.wing_span_px as f64 / natural,
        cos,
        sin,
        centre: (image_width as f64 / 2.0, image_height as f64 / 2.0),
        target: (
            placement.x / 100.0 * layout.canvas_width as f64,
            placement.y / 100.0 * layout.canvas_height as f64,
        ),
    }
}

/// An image positioned on the canvas by an [`AffineMap`].
pub struct PlacedImage<'a> {
    image: &'a RgbaImage,
    map: AffineMap,
}

impl<'a> PlacedImage<'a> {
    pub fn new(image: &'a RgbaImage, map: AffineMap) -> Self {
        Self { image, map }
    }

    pub fn map(&self) -> &AffineMap {
        &self.map
    }
}

/// Nearest source pixel under the canvas pixel's centre; `None` where the image does not reach.
impl PixelSource for PlacedImage<'_> {
    fn pixel(&self, x: i64, y: i64) -> Option<Rgba<u8>> {
        let (sx, sy) = self.map.to_source(x as f64 + 0.5, y as f64 + 0.5);
        let (sx, sy) = (sx.floor(), sy.floor());
        let (iw, ih) = self.image.dimensions();
        if sx < 0.0 || sy < 0.0 || sx >= iw as f64 || sy >= ih as f64 {
            return None;
        }
        Some(*self.image.get_pixel(sx as u32, sy as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{layout, LayoutMode, Panels, Spacing};

    fn unit_layout() -> Layout {
        let spacing = Spacing { pixel_size: 1, ..Spacing::default() };
        layout(&Panels::default(), &spacing, LayoutMode::Physical).unwrap()
    }

    fn gradient(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn fit_scale_matches_wing_span() {
        let layout = unit_layout();
        let map = place(120, 26, &ImagePlacement::default(), &layout);
        assert!((map.scale() - 0.5).abs() < 1e-12);
        let doubled = place(120, 26, &ImagePlacement { scale: 2.0, ..Default::default() }, &layout);
        assert!((doubled.scale() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn inverse_undoes_forward() {
        let layout = unit_layout();
        let placement = ImagePlacement { x: 30.0, y: 70.0, scale: 1.7, rotation: 33.0 };
        let map = place(40, 25, &placement, &layout);
        let (cx, cy) = map.to_canvas(7.25, 19.5);
        let (sx, sy) = map.to_source(cx, cy);
        assert!((sx - 7.25).abs() < 1e-9 && (sy - 19.5).abs() < 1e-9);
    }

    #[test]
    fn centred_image_is_copied_pixel_for_pixel() {
        let layout = unit_layout();
        let image = gradient(60, 13);
        let placed = PlacedImage::new(&image, place(60, 13, &ImagePlacement::default(), &layout));
        for (x, y, p) in image.enumerate_pixels() {
            assert_eq!(placed.pixel(x as i64, y as i64), Some(*p), "({x}, {y})");
        }
    }

    #[test]
    fn half_turn_flips_both_axes() {
        let layout = unit_layout();
        let image = gradient(60, 13);
        let placement = ImagePlacement { rotation: 180.0, ..Default::default() };
        let placed = PlacedImage::new(&image, place(60, 13, &placement, &layout));
        assert_eq!(placed.pixel(0, 0), Some(*image.get_pixel(59, 12)));
        assert_eq!(placed.pixel(59, 12), Some(*image.get_pixel(0, 0)));
    }

    #[test]
    fn uncovered_canvas_has_no_pixel() {
        let layout = unit_layout();
        let image = gradient(60, 13);
        let placement = ImagePlacement { scale: 0.5, ..Default::default() };
        let placed = PlacedImage::new(&image, place(60, 13, &placement, &layout));
        assert_eq!(placed.pixel(0, 0), None);
        assert_eq!(placed.pixel(-4, 6), None);
        assert_eq!(placed.pixel(30, 6).map(|p| p.0[3]), Some(255));
    }

    #[test]
    fn clamped_placement() {
        let p = ImagePlacement { x: -3.0, y: 140.0, scale: 0.0, rotation: 270.0 }.clamped();
        assert_eq!(p, ImagePlacement { x: 0.0, y: 100.0, scale: MIN_SCALE, rotation: 180.0 });
    }
}
