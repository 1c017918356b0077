//! Font metrics capability.
//!
//! The engine never measures glyphs. A renderer injects a `FontMetrics`
//! and asks the buffer to fill a line's advance cache with it.

use unicode_width::UnicodeWidthChar;

/// Supplies the horizontal advance of a rune.
pub trait FontMetrics {
    /// Width of `c` in pixels (or cells).
    fn advance_of(&self, c: char) -> f32;
}

/// Fixed-pitch metrics: every cell is `cell_width` wide, wide CJK runes
/// take two cells and tabs take `tab_width` cells.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMetrics {
    pub cell_width: f32,
    pub tab_width: usize,
}

impl MonospaceMetrics {
    pub fn new(cell_width: f32, tab_width: usize) -> Self {
        Self {
            cell_width,
            tab_width,
        }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(1.0, 4)
    }
}

impl FontMetrics for MonospaceMetrics {
    fn advance_of(&self, c: char) -> f32 {
        let cells = if c == '\t' {
            self.tab_width
        } else {
            c.width().unwrap_or(0)
        };
        cells as f32 * self.cell_width
    }
}
