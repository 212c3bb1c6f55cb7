//! LED pattern designer for a four-panel wing/tail light display.
//!
//! A [`Designer`] owns the whole session: panel geometry, the per-panel
//! color grids, and an optional uploaded image that is placed on the
//! layout canvas and sampled into the selected panels. [`Designer::render`]
//! produces the `patterns.h` text consumed by the firmware.

pub mod color;
pub mod config;
pub mod export;
pub mod geometry;
pub mod pattern;
pub mod sample;
pub mod transform;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use color::LedColor;
pub use config::DesignerConfig;
pub use geometry::{Layout, LayoutMode, PanelId, Panels, Spacing};
pub use pattern::{Pattern, PatternStore};
pub use sample::{SamplePolicy, Selection};
pub use transform::{ImagePlacement, PlacedImage};

use image::RgbaImage;
use log::{debug, info, warn};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlowstickError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("{0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, GlowstickError>;

/// Decode any format the `image` crate understands into RGBA.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Editable panel property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
    X,
    Y,
}

impl FromStr for Dimension {
    type Err = GlowstickError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "width" => Ok(Dimension::Width),
            "height" => Ok(Dimension::Height),
            "x" => Ok(Dimension::X),
            "y" => Ok(Dimension::Y),
            _ => Err(GlowstickError::Validation(format!("unknown dimension: {s}"))),
        }
    }
}

/// Identifies one upload; only the most recently issued token may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UploadToken(u64);

impl UploadToken {
    pub fn value(self) -> u64 {
        self.0
    }

    pub fn from_value(value: u64) -> Self {
        Self(value)
    }
}

/// Session state and the operations a user can perform on it.
pub struct Designer {
    panels: Panels,
    spacing: Spacing,
    layout_mode: LayoutMode,
    policy: SamplePolicy,
    selection: Selection,
    placement: ImagePlacement,
    patterns: PatternStore,
    image: Option<RgbaImage>,
    latest_upload: u64,
    error: Option<String>,
}

impl Default for Designer {
    fn default() -> Self {
        Self::from_valid(DesignerConfig::default())
    }
}

impl Designer {
    pub fn new(config: DesignerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: DesignerConfig) -> Self {
        let panels = Panels::from(config.panels);
        Self {
            patterns: PatternStore::new(&panels),
            panels,
            spacing: config.spacing,
            layout_mode: config.layout,
            policy: config.policy,
            selection: config.selection,
            placement: config.placement.clamped(),
            image: None,
            latest_upload: 0,
            error: None,
        }
    }

    pub fn panels(&self) -> &Panels {
        &self.panels
    }

    pub fn patterns(&self) -> &PatternStore {
        &self.patterns
    }

    pub fn pattern(&self, id: PanelId) -> &Pattern {
        self.patterns.pattern(id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn placement(&self) -> &ImagePlacement {
        &self.placement
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// User-visible message from the last handled failure.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn spacing(&self) -> &Spacing {
        &self.spacing
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode
    }

    pub fn layout(&self) -> Result<Layout> {
        geometry::layout(&self.panels, &self.spacing, self.layout_mode)
    }

    /// Apply a raw text edit to a panel property.
    ///
    /// Non-numeric input is treated as an edit in progress and ignored.
    /// Width/height outside `1..=100` leave state untouched and set the error message.
    pub fn edit_dimension(&mut self, id: PanelId, dimension: Dimension, input: &str) -> Result<()> {
        let Ok(value) = input.trim().parse::<i64>() else {
            return Ok(());
        };

        match dimension {
            Dimension::Width | Dimension::Height => {
                let value = match geometry::check_dimension(value) {
                    Ok(v) => v,
                    Err(e) => return Err(self.surface(e)),
                };
                let panel = self.panels.get_mut(id);
                if dimension == Dimension::Width {
                    panel.width = value;
                } else {
                    panel.height = value;
                }
                let (width, height) = (panel.width, panel.height);
                self.patterns.resize(id, width, height);
            }
            Dimension::X | Dimension::Y => {
                let Ok(value) = i32::try_from(value) else {
                    return Ok(());
                };
                let panel = self.panels.get_mut(id);
                if dimension == Dimension::X {
                    panel.x = value;
                } else {
                    panel.y = value;
                }
            }
        }
        self.error = None;
        Ok(())
    }

    /// Replace pitch and gaps. Out-of-range spacing is rejected and surfaced.
    ///
    /// Like other geometry edits this does not resample; call [`Self::resample`].
    pub fn set_spacing(&mut self, spacing: Spacing) -> Result<()> {
        spacing.validate().map_err(|e| self.surface(e))?;
        self.spacing = spacing;
        self.error = None;
        Ok(())
    }

    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.layout_mode = mode;
    }

    pub fn set_selected(&mut self, id: PanelId, selected: bool) {
        self.selection.set(id, selected);
    }

    pub fn set_policy(&mut self, policy: SamplePolicy) -> Result<()> {
        self.policy = policy;
        self.resample()
    }

    pub fn set_placement(&mut self, placement: ImagePlacement) -> Result<()> {
        self.placement = placement.clamped();
        self.resample()
    }

    /// Paint one cell. Coordinates outside the panel are ignored.
    pub fn paint_cell(&mut self, id: PanelId, row: u32, col: u32, color: LedColor) {
        self.patterns.paint_cell(id, row, col, color);
    }

    /// Start an upload. Any earlier token still in flight becomes stale.
    pub fn begin_upload(&mut self) -> UploadToken {
        self.latest_upload += 1;
        UploadToken(self.latest_upload)
    }

    /// Deliver a decode result for `token`.
    ///
    /// Returns `Ok(false)` when a newer upload has been started since.
    pub fn finish_upload(&mut self, token: UploadToken, decoded: Result<RgbaImage>) -> Result<bool> {
        if token.0 != self.latest_upload {
            warn!(
                "discarding stale upload {} (latest is {})",
                token.0, self.latest_upload
            );
            return Ok(false);
        }
        let image = decoded.map_err(|e| self.surface(e))?;
        info!("upload {}: {}x{} image", token.0, image.width(), image.height());
        self.image = Some(image);
        self.resample()?;
        Ok(true)
    }

    /// Decode `bytes` and sample them into the selected panels.
    pub fn upload(&mut self, bytes: &[u8]) -> Result<bool> {
        let token = self.begin_upload();
        self.finish_upload(token, decode_image(bytes))
    }

    /// Sample the current image into every selected panel. No-op without an image.
    pub fn resample(&mut self) -> Result<()> {
        let layout = match self.layout() {
            Ok(layout) => layout,
            Err(e) => return Err(self.surface(e)),
        };
        let Some(image) = &self.image else {
            return Ok(());
        };
        let map = transform::place(image.width(), image.height(), &self.placement, &layout);
        debug!(
            "sampling onto {}x{} canvas at scale {:.3}",
            layout.canvas_width,
            layout.canvas_height,
            map.scale()
        );
        let placed = PlacedImage::new(image, map);
        sample::sample(&placed, &layout, &self.panels, &self.selection, self.policy, &mut self.patterns);
        Ok(())
    }

    /// The `patterns.h` text; used for both preview and file export.
    pub fn render(&self) -> String {
        export::render(&self.patterns)
    }

    pub fn export_to(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Err(e) = std::fs::write(path, self.render()) {
            let message = format!("Failed to write {}: {e}", path.display());
            warn!("{message}");
            self.error = Some(message);
            return Err(e.into());
        }
        info!("wrote {}", path.display());
        Ok(())
    }

    fn surface(&mut self, error: GlowstickError) -> GlowstickError {
        warn!("{error}");
        self.error = Some(error.to_string());
        error
    }
}
