//! Panel identities, LED-grid sizes and their pixel rectangles on the shared canvas.

use crate::{GlowstickError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_DIMENSION: u32 = 1;
pub const MAX_DIMENSION: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PanelId {
    LeftWing,
    RightWing,
    LeftTail,
    RightTail,
}

impl PanelId {
    /// Fixed order used for storage and export.
    pub const ALL: [PanelId; 4] = [
        PanelId::LeftWing,
        PanelId::RightWing,
        PanelId::LeftTail,
        PanelId::RightTail,
    ];

    pub const fn index(self) -> usize {
        match self {
            PanelId::LeftWing => 0,
            PanelId::RightWing => 1,
            PanelId::LeftTail => 2,
            PanelId::RightTail => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PanelId::LeftWing => "leftWing",
            PanelId::RightWing => "rightWing",
            PanelId::LeftTail => "leftTail",
            PanelId::RightTail => "rightTail",
        }
    }

    /// Lowercase C identifier stem used in the exported header.
    pub const fn symbol(self) -> &'static str {
        match self {
            PanelId::LeftWing => "leftwing",
            PanelId::RightWing => "rightwing",
            PanelId::LeftTail => "lefttail",
            PanelId::RightTail => "righttail",
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts `leftWing`, `left-wing`, `left_wing` and `leftwing`.
impl FromStr for PanelId {
    type Err = GlowstickError;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        PanelId::ALL
            .into_iter()
            .find(|id| id.symbol() == key)
            .ok_or_else(|| GlowstickError::Validation(format!("unknown panel: {s}")))
    }
}

/// One LED grid: its size in LEDs and its origin in LED units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

impl Panel {
    pub const fn new(width: u32, height: u32, x: i32, y: i32) -> Self {
        Self { width, height, x, y }
    }

    pub fn validate(&self) -> Result<()> {
        check_dimension(self.width as i64)?;
        check_dimension(self.height as i64)?;
        Ok(())
    }
}

pub fn check_dimension(value: i64) -> Result<u32> {
    if (MIN_DIMENSION as i64..=MAX_DIMENSION as i64).contains(&value) {
        Ok(value as u32)
    } else {
        Err(GlowstickError::Validation(format!(
            "Dimensions must be between {MIN_DIMENSION} and {MAX_DIMENSION}"
        )))
    }
}

/// The four panels, indexed by [`PanelId::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panels([Panel; 4]);

impl Panels {
    pub fn new(panels: [Panel; 4]) -> Self {
        Self(panels)
    }

    pub fn get(&self, id: PanelId) -> &Panel {
        &self.0[id.index()]
    }

    pub fn get_mut(&mut self, id: PanelId) -> &mut Panel {
        &mut self.0[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PanelId, &Panel)> {
        PanelId::ALL.into_iter().map(move |id| (id, self.get(id)))
    }

    /// LED columns from the left edge of the left wing to the right edge of the right wing.
    pub fn wing_span(&self, spacing: &Spacing) -> u64 {
        self.get(PanelId::LeftWing).width as u64
            + spacing.wing_gap as u64
            + self.get(PanelId::RightWing).width as u64
    }
}

impl Default for Panels {
    fn default() -> Self {
        Self([
            Panel::new(29, 8, 0, 0),
            Panel::new(29, 8, 60, 0),
            Panel::new(9, 4, 20, 10),
            Panel::new(9, 4, 40, 10),
        ])
    }
}

/// Largest accepted canvas pixels per LED.
pub const MAX_PIXEL_SIZE: u32 = 32;

/// Physical pitch and gaps. Gaps are in LED units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Spacing {
    /// Canvas pixels per LED along each axis.
    pub pixel_size: u32,
    pub wing_gap: u32,
    pub tail_gap: u32,
    pub wing_tail_gap: u32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            pixel_size: 10,
            wing_gap: 2,
            tail_gap: 2,
            wing_tail_gap: 1,
        }
    }
}

impl Spacing {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_PIXEL_SIZE).contains(&self.pixel_size) {
            return Err(GlowstickError::Validation(format!(
                "Pixel size must be between 1 and {MAX_PIXEL_SIZE}"
            )));
        }
        if [self.wing_gap, self.tail_gap, self.wing_tail_gap]
            .iter()
            .any(|gap| *gap > MAX_DIMENSION)
        {
            return Err(GlowstickError::Validation(format!(
                "Gaps must be between 0 and {MAX_DIMENSION}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    /// Wings side by side, tails below, positioned from [`Spacing`].
    #[default]
    Physical,
    /// Each panel placed at its own `(x, y)` origin.
    Origins,
}

impl FromStr for LayoutMode {
    type Err = GlowstickError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "physical" => Ok(LayoutMode::Physical),
            "origins" => Ok(LayoutMode::Origins),
            _ => Err(GlowstickError::Validation(format!("unknown layout mode: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: u64,
    pub height: u64,
}

impl Rect {
    pub fn right(&self) -> i64 {
        self.x + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.height as i64
    }
}

/// Pixel rectangles for every panel, normalized so the union bound starts at `(0, 0)`.
///
/// The canvas is only a coordinate space; nothing allocates it, so far-apart
/// origins cost nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    rects: [Rect; 4],
    pub canvas_width: u64,
    pub canvas_height: u64,
    pub pitch: u32,
    /// Wing span in canvas pixels, the scale-1 image width.
    pub wing_span_px: u64,
}

impl Layout {
    pub fn rect(&self, id: PanelId) -> Rect {
        self.rects[id.index()]
    }
}

/// Fails with [`GlowstickError::Validation`] on out-of-range sizes or spacing.
///
/// With validated inputs every product below stays far inside `i64`, and
/// `i32` origins times [`MAX_PIXEL_SIZE`] cannot overflow either.
pub fn layout(panels: &Panels, spacing: &Spacing, mode: LayoutMode) -> Result<Layout> {
    spacing.validate()?;
    for (_, panel) in panels.iter() {
        panel.validate()?;
    }

    let pitch = spacing.pixel_size;
    let p = pitch as i64;
    let rect = |panel: &Panel, x: i64, y: i64| Rect {
        x,
        y,
        width: panel.width as u64 * pitch as u64,
        height: panel.height as u64 * pitch as u64,
    };

    let mut rects = match mode {
        LayoutMode::Origins => PanelId::ALL.map(|id| {
            let panel = panels.get(id);
            rect(panel, panel.x as i64 * p, panel.y as i64 * p)
        }),
        LayoutMode::Physical => physical_rects(panels, spacing, p, rect),
    };

    let min_x = rects.iter().map(|r| r.x).min().unwrap_or(0);
    let min_y = rects.iter().map(|r| r.y).min().unwrap_or(0);
    for r in &mut rects {
        r.x -= min_x;
        r.y -= min_y;
    }
    let canvas_width = rects.iter().map(Rect::right).max().unwrap_or(0) as u64;
    let canvas_height = rects.iter().map(Rect::bottom).max().unwrap_or(0) as u64;

    Ok(Layout {
        rects,
        canvas_width,
        canvas_height,
        pitch,
        wing_span_px: panels.wing_span(spacing) * pitch as u64,
    })
}

// Tails sit as one block (left tail, gap, right tail) centred on the gap between the wings.
fn physical_rects(
    panels: &Panels,
    spacing: &Spacing,
    p: i64,
    rect: impl Fn(&Panel, i64, i64) -> Rect,
) -> [Rect; 4] {
    let left_wing = panels.get(PanelId::LeftWing);
    let right_wing = panels.get(PanelId::RightWing);
    let left_tail = panels.get(PanelId::LeftTail);
    let right_tail = panels.get(PanelId::RightTail);

    let right_wing_x = (left_wing.width + spacing.wing_gap) as i64 * p;
    let tail_y = (left_wing.height.max(right_wing.height) + spacing.wing_tail_gap) as i64 * p;

    // Doubled to keep the centre exact on odd spans.
    let wing_gap_centre2 = (2 * left_wing.width as i64 + spacing.wing_gap as i64) * p;
    let tail_block = (left_tail.width + spacing.tail_gap + right_tail.width) as i64 * p;
    let left_tail_x = (wing_gap_centre2 - tail_block).div_euclid(2);
    let right_tail_x = left_tail_x + (left_tail.width + spacing.tail_gap) as i64 * p;

    [
        rect(left_wing, 0, 0),
        rect(right_wing, right_wing_x, 0),
        rect(left_tail, left_tail_x, tail_y),
        rect(right_tail, right_tail_x, tail_y),
    ]
}
