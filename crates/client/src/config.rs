//! Viewport configuration shared by every worm.

use serde::{Deserialize, Serialize};

/// Board geometry in cells plus the pixel size of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ViewportConfig {
    /// Pixel width of one board cell.
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
    #[serde(default = "default_cols")]
    pub cols: u32,
    #[serde(default = "default_rows")]
    pub rows: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            cols: default_cols(),
            rows: default_rows(),
        }
    }
}

impl ViewportConfig {
    /// Smallest cell size a resize may produce.
    pub const MIN_CELL_SIZE: u32 = 5;

    /// Fit the board into a window: `max(5, floor(min(w, h) / 50))`.
    pub fn for_window(self, width: f64, height: f64) -> Self {
        let shortest = width.min(height).max(0.0);
        let cell_size = ((shortest / 50.0).floor() as u32).max(Self::MIN_CELL_SIZE);
        Self { cell_size, ..self }
    }

    /// Stage dimensions in pixels.
    pub fn stage_size(&self) -> (f32, f32) {
        let cell = self.cell_size as f32;
        (self.cols as f32 * cell, self.rows as f32 * cell)
    }
}

fn default_cell_size() -> u32 {
    10
}
fn default_cols() -> u32 {
    50
}
fn default_rows() -> u32 {
    50
}
