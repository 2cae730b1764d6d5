//! Text rendering of a lit view: tile glyphs under a darkness shade ramp.

use umbra_level::Level;
use umbra_lighting::{ShadowMap, overlay_alpha};

/// Top-left tile of the visible window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct View {
    pub col: i64,
    pub row: i64,
}

impl View {
    /// Window of `cols x rows` tiles centred on `(col, row)`.
    pub fn centred(col: usize, row: usize, cols: usize, rows: usize) -> Self {
        Self { col: col as i64 - (cols / 2) as i64, row: row as i64 - (rows / 2) as i64 }
    }

    fn tile_at(&self, col: usize, row: usize) -> Option<(usize, usize)> {
        let c = self.col + col as i64;
        let r = self.row + row as i64;
        (c >= 0 && r >= 0).then_some((c as usize, r as usize))
    }
}

/// Shade for an overlay alpha; `None` means the glyph shows through.
pub fn shade(alpha: Option<u8>) -> Option<char> {
    match alpha? {
        0..=63 => None,
        64..=127 => Some('░'),
        128..=191 => Some('▒'),
        192..=254 => Some('▓'),
        255 => Some('█'),
    }
}

/// Renders `window` (already cropped to `view`) one character per cell.
pub fn render_text(level: &Level, view: View, window: &ShadowMap) -> String {
    let cells = window.cells();
    let scale = window.scale();
    let mut out = String::with_capacity((cells.width() + 1) * cells.height());
    for (r, line) in cells.rows().enumerate() {
        for (c, v) in line.iter().enumerate() {
            let tile = view.tile_at(c / scale, r / scale);
            let glyph = match tile {
                Some((tc, tr)) if (tc, tr) == (level.player.col, level.player.row) => '@',
                Some((tc, tr)) if level.lights.iter().any(|l| (l.col, l.row) == (tc, tr)) => '*',
                Some((tc, tr)) => level.tiles.get(tc, tr).map(|t| t.glyph()).unwrap_or(' '),
                None => ' ',
            };
            out.push(shade(overlay_alpha(*v)).unwrap_or(glyph));
        }
        out.push('\n');
    }
    out
}
