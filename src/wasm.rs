//! WebAssembly bindings for glowstick

use crate::{
    Designer, Dimension, GlowstickError, ImagePlacement, LayoutMode, LedColor, PanelId, Spacing,
    UploadToken,
};
use wasm_bindgen::prelude::*;

fn to_js(error: GlowstickError) -> JsValue {
    let message = error.to_string();
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

#[wasm_bindgen]
pub struct WasmDesigner {
    designer: Designer,
}

#[wasm_bindgen]
impl WasmDesigner {
    /// Create a designer with the default four-panel geometry
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmDesigner {
        WasmDesigner { designer: Designer::default() }
    }

    /// Apply a raw input-field edit
    ///
    /// # Arguments
    /// * `panel` - e.g. `leftWing`
    /// * `dimension` - `width`, `height`, `x` or `y`
    /// * `value` - field text; non-numeric text is ignored
    #[wasm_bindgen]
    pub fn edit_dimension(&mut self, panel: &str, dimension: &str, value: &str) -> Result<(), JsValue> {
        let id: PanelId = panel.parse().map_err(to_js)?;
        let dimension: Dimension = dimension.parse().map_err(to_js)?;
        self.designer.edit_dimension(id, dimension, value).map_err(to_js)
    }

    /// Paint one cell with `#RRGGBB` or `0xRGB`
    #[wasm_bindgen]
    pub fn paint_cell(&mut self, panel: &str, row: u32, col: u32, color: &str) -> Result<(), JsValue> {
        let id: PanelId = panel.parse().map_err(to_js)?;
        let color: LedColor = color.parse().map_err(to_js)?;
        self.designer.paint_cell(id, row, col, color);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_selected(&mut self, panel: &str, selected: bool) -> Result<(), JsValue> {
        let id: PanelId = panel.parse().map_err(to_js)?;
        self.designer.set_selected(id, selected);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_placement(&mut self, x: f64, y: f64, scale: f64, rotation: f64) -> Result<(), JsValue> {
        self.designer
            .set_placement(ImagePlacement { x, y, scale, rotation })
            .map_err(to_js)
    }

    /// Pitch and gaps in pixels; resamples the current image
    #[wasm_bindgen]
    pub fn set_spacing(
        &mut self,
        pixel_size: u32,
        wing_gap: u32,
        tail_gap: u32,
        wing_tail_gap: u32,
    ) -> Result<(), JsValue> {
        let spacing = Spacing { pixel_size, wing_gap, tail_gap, wing_tail_gap };
        self.designer.set_spacing(spacing).map_err(to_js)?;
        self.designer.resample().map_err(to_js)
    }

    /// "physical" or "origins"; resamples the current image
    #[wasm_bindgen]
    pub fn set_layout_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode: LayoutMode = mode.parse().map_err(to_js)?;
        self.designer.set_layout_mode(mode);
        self.designer.resample().map_err(to_js)
    }

    /// Reserve a token before reading the file
    #[wasm_bindgen]
    pub fn begin_upload(&mut self) -> f64 {
        self.designer.begin_upload().value() as f64
    }

    /// Decode encoded image bytes for `token`; returns false if a newer upload superseded it
    #[wasm_bindgen]
    pub fn finish_upload(&mut self, token: f64, bytes: &[u8]) -> Result<bool, JsValue> {
        let token = UploadToken::from_value(token as u64);
        self.designer
            .finish_upload(token, crate::decode_image(bytes))
            .map_err(to_js)
    }

    /// Cell literals for one panel, row-major
    #[wasm_bindgen]
    pub fn cells(&self, panel: &str) -> Result<js_sys::Array, JsValue> {
        let id: PanelId = panel.parse().map_err(to_js)?;
        let cells = js_sys::Array::new();
        for cell in self.designer.pattern(id).cells() {
            cells.push(&JsValue::from_str(&cell.to_string()));
        }
        Ok(cells)
    }

    /// patterns.h text, for both the preview and the download
    #[wasm_bindgen]
    pub fn render(&self) -> String {
        self.designer.render()
    }

    #[wasm_bindgen]
    pub fn error(&self) -> Option<String> {
        self.designer.error().map(str::to_owned)
    }
}

impl Default for WasmDesigner {
    fn default() -> Self {
        Self::new()
    }
}
