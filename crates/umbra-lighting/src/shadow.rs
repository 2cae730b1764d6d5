//! Renderer-facing view of a lit frame.

use umbra_grid::{Grid, GridError};

use crate::{Brightness, FULL_BRIGHTNESS, upscale::UPSCALE};

/// Darkness overlay alpha for one cell: `None` when nothing should be drawn.
#[inline]
pub fn overlay_alpha(value: Option<Brightness>) -> Option<u8> {
    let v = value?;
    if v >= FULL_BRIGHTNESS {
        return None;
    }
    Some((FULL_BRIGHTNESS - v.clamp(0, FULL_BRIGHTNESS)) as u8)
}

/// Brightness cells at `scale` cells per tile. `None` marks an unlit
/// (unresolved) cell, distinct from a resolved zero.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowMap {
    cells: Grid<Option<Brightness>>,
    scale: usize,
}

impl ShadowMap {
    pub fn from_frame(frame: &Grid<Brightness>) -> Self {
        Self { cells: frame.map(|v| Some(*v)), scale: 1 }
    }

    pub fn from_upscaled(cells: Grid<Option<Brightness>>) -> Self {
        Self { cells, scale: UPSCALE }
    }

    #[inline]
    pub fn scale(&self) -> usize {
        self.scale
    }

    #[inline]
    pub fn cells(&self) -> &Grid<Option<Brightness>> {
        &self.cells
    }

    pub fn into_cells(self) -> Grid<Option<Brightness>> {
        self.cells
    }

    /// Brightness at a tile, reading the tile's centre cell when upscaled.
    pub fn tile(&self, col: usize, row: usize) -> Option<Brightness> {
        let mid = self.scale / 2;
        self.cells.get(col * self.scale + mid, row * self.scale + mid).copied().flatten()
    }

    /// Crops a `cols x rows` tile window whose top-left tile is at
    /// `(offset_col, offset_row)`. Cells outside the map read as fully dark.
    pub fn window(&self, offset_col: i64, offset_row: i64, cols: usize, rows: usize) -> Result<Self, GridError> {
        let s = self.scale;
        let (w, h) = (cols * s, rows * s);
        let (oc, or) = (offset_col * s as i64, offset_row * s as i64);
        let mut cells = Vec::with_capacity(w * h);
        for r in 0..h {
            for c in 0..w {
                let (sc, sr) = (oc + c as i64, or + r as i64);
                let v = if sc < 0 || sr < 0 {
                    Some(0)
                } else {
                    self.cells.get(sc as usize, sr as usize).copied().unwrap_or(Some(0))
                };
                cells.push(v);
            }
        }
        Ok(Self { cells: Grid::from_vec(w, h, cells)?, scale: s })
    }

    /// Per-cell overlay alphas.
    pub fn overlay(&self) -> Grid<Option<u8>> {
        self.cells.map(|v| overlay_alpha(*v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_inverts_brightness() {
        assert_eq!(overlay_alpha(Some(0)), Some(255));
        assert_eq!(overlay_alpha(Some(100)), Some(155));
        assert_eq!(overlay_alpha(Some(254)), Some(1));
        assert_eq!(overlay_alpha(Some(-20)), Some(255));
    }

    #[test]
    fn full_brightness_and_unlit_draw_nothing() {
        assert_eq!(overlay_alpha(Some(255)), None);
        assert_eq!(overlay_alpha(Some(400)), None);
        assert_eq!(overlay_alpha(None), None);
    }

    #[test]
    fn window_pads_outside_with_darkness() {
        let frame = Grid::from_rows(&[[10, 20], [30, 40]]).unwrap();
        let map = ShadowMap::from_frame(&frame);
        let win = map.window(-1, 0, 3, 3).unwrap();
        assert_eq!(
            win.cells().to_rows(),
            vec![
                vec![Some(0), Some(10), Some(20)],
                vec![Some(0), Some(30), Some(40)],
                vec![Some(0), Some(0), Some(0)],
            ]
        );
    }

    #[test]
    fn upscaled_window_scales_offsets() {
        let frame = Grid::from_rows(&[[10, 20]]).unwrap();
        let map = ShadowMap::from_upscaled(crate::upscale(&frame));
        let win = map.window(1, 0, 1, 1).unwrap();
        assert_eq!(win.cells().dims(), (3, 3));
        assert_eq!(win.tile(0, 0), Some(20));
        assert_eq!(map.tile(0, 0), Some(10));
    }
}
