//! Per-panel color grids: the persisted state of a design.

use crate::color::LedColor;
use crate::geometry::{PanelId, Panels};
use log::debug;

/// `height` rows by `width` columns of colors, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    width: u32,
    height: u32,
    cells: Vec<LedColor>,
}

impl Pattern {
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, LedColor::WHITE)
    }

    pub fn filled(width: u32, height: u32, color: LedColor) -> Self {
        Self {
            width,
            height,
            cells: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, row: u32, col: u32) -> Option<LedColor> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Overwrite one cell. Out-of-bounds coordinates are ignored.
    pub fn set(&mut self, row: u32, col: u32, color: LedColor) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = color;
        }
    }

    pub fn cells(&self) -> &[LedColor] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[LedColor]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// New grid keeping the overlapping top-left region; exposed cells are white.
    pub fn resized(&self, width: u32, height: u32) -> Self {
        let mut next = Pattern::new(width, height);
        for row in 0..self.height.min(height) {
            for col in 0..self.width.min(width) {
                next.set(row, col, self.cells[self.flat(row, col)]);
            }
        }
        next
    }

    fn index(&self, row: u32, col: u32) -> Option<usize> {
        (row < self.height && col < self.width).then(|| self.flat(row, col))
    }

    fn flat(&self, row: u32, col: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }
}

/// One [`Pattern`] per panel, indexed by [`PanelId::index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternStore {
    patterns: [Pattern; 4],
}

impl PatternStore {
    /// All-white grids sized to the panels.
    pub fn new(panels: &Panels) -> Self {
        Self {
            patterns: PanelId::ALL.map(|id| {
                let panel = panels.get(id);
                Pattern::new(panel.width, panel.height)
            }),
        }
    }

    pub fn pattern(&self, id: PanelId) -> &Pattern {
        &self.patterns[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PanelId, &Pattern)> {
        PanelId::ALL.into_iter().map(move |id| (id, self.pattern(id)))
    }

    /// Set exactly one cell; a no-op when `row`/`col` fall outside the grid.
    pub fn paint_cell(&mut self, id: PanelId, row: u32, col: u32, color: LedColor) {
        self.patterns[id.index()].set(row, col, color);
    }

    pub fn resize(&mut self, id: PanelId, width: u32, height: u32) {
        let slot = &mut self.patterns[id.index()];
        debug!(
            "resizing {id} pattern {}x{} -> {width}x{height}",
            slot.width, slot.height
        );
        *slot = slot.resized(width, height);
    }

    pub fn replace(&mut self, id: PanelId, pattern: Pattern) {
        self.patterns[id.index()] = pattern;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: LedColor = LedColor::from_nibbles(15, 0, 0);

    #[test]
    fn paint_out_of_bounds_is_noop() {
        let mut store = PatternStore::new(&Panels::default());
        store.paint_cell(PanelId::LeftTail, 1, 2, RED);
        let before = store.clone();
        store.paint_cell(PanelId::LeftTail, 4, 0, RED);
        store.paint_cell(PanelId::LeftTail, 0, 9, RED);
        store.paint_cell(PanelId::LeftTail, u32::MAX, u32::MAX, RED);
        assert_eq!(store, before);
    }

    #[test]
    fn grow_in_one_dimension_keeps_content() {
        let mut pattern = Pattern::new(3, 2);
        pattern.set(1, 2, RED);
        let grown = pattern.resized(5, 2);
        assert_eq!((grown.width(), grown.height()), (5, 2));
        assert_eq!(grown.get(1, 2), Some(RED));
        assert_eq!(grown.get(1, 4), Some(LedColor::WHITE));
    }

    #[test]
    fn shrink_then_regrow_loses_cells_outside_overlap() {
        let mut store = PatternStore::new(&Panels::default());
        store.paint_cell(PanelId::LeftWing, 0, 0, RED);
        store.paint_cell(PanelId::LeftWing, 7, 28, RED);
        store.resize(PanelId::LeftWing, 10, 4);
        store.resize(PanelId::LeftWing, 29, 8);

        let pattern = store.pattern(PanelId::LeftWing);
        assert_eq!((pattern.width(), pattern.height()), (29, 8));
        assert_eq!(pattern.get(0, 0), Some(RED));
        assert_eq!(pattern.get(7, 28), Some(LedColor::WHITE));
        assert_eq!(pattern.cells().iter().filter(|c| **c == RED).count(), 1);
    }

    #[test]
    fn rows_are_row_major() {
        let mut pattern = Pattern::new(2, 3);
        pattern.set(2, 1, RED);
        let rows: Vec<_> = pattern.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], &[LedColor::WHITE, RED]);
    }
}
