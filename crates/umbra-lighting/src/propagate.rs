//! Light falloff flood fill over a transparency map.
//!
//! A cell keeps the strongest light that reaches it. Opaque cells are lit by
//! arriving light but never pass it on. The worklist pops the brightest
//! pending cell first, so every cell is settled by the first value it relays.

use std::collections::BinaryHeap;

use umbra_grid::{DIAGONAL, Grid, ORTHOGONAL};

use crate::{Brightness, LightSource, LightingError};

/// Pending relay, ordered by intensity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    intensity: Brightness,
    col: usize,
    row: usize,
}

/// Brightest-first flood fill. Holds its heap between calls so repeated floods
/// reuse the allocation.
#[derive(Debug)]
pub struct Propagator {
    dropoff: Brightness,
    diagonal_dropoff: Brightness,
    heap: BinaryHeap<Pending>,
}

impl Propagator {
    pub fn new(dropoff: Brightness, diagonal_dropoff: Brightness) -> Self {
        Self { dropoff, diagonal_dropoff, heap: BinaryHeap::with_capacity(256) }
    }

    #[inline]
    pub fn dropoff(&self) -> Brightness {
        self.dropoff
    }

    #[inline]
    pub fn diagonal_dropoff(&self) -> Brightness {
        self.diagonal_dropoff
    }

    /// Floods `source` into `light`. Both grids must share dimensions.
    pub fn flood(
        &mut self,
        light: &mut Grid<Brightness>,
        transparency: &Grid<bool>,
        source: LightSource,
    ) -> Result<(), LightingError> {
        debug_assert!(light.same_dims(transparency));
        if !light.in_bounds(source.col, source.row) {
            return Err(LightingError::SourceOutOfBounds {
                col: source.col,
                row: source.row,
                width: light.width(),
                height: light.height(),
            });
        }
        self.heap.clear();
        self.raise(light, source.intensity, source.col, source.row);
        while let Some(Pending { intensity, col, row }) = self.heap.pop() {
            // superseded by a brighter write after this entry was queued
            if light[(col, row)] != intensity {
                continue;
            }
            if !transparency[(col, row)] {
                continue;
            }
            let orth = intensity.saturating_sub(self.dropoff);
            if orth > 0 {
                for (dc, dr) in ORTHOGONAL {
                    if let Some((c, r)) = light.offset(col, row, dc, dr) {
                        self.raise(light, orth, c, r);
                    }
                }
            }
            let diag = intensity.saturating_sub(self.diagonal_dropoff);
            if diag > 0 {
                for (dc, dr) in DIAGONAL {
                    if let Some((c, r)) = light.offset(col, row, dc, dr) {
                        self.raise(light, diag, c, r);
                    }
                }
            }
        }
        Ok(())
    }

    /// Writes `intensity` when it is positive and brighter than the stored
    /// value, and queues the cell to relay it.
    #[inline]
    fn raise(&mut self, light: &mut Grid<Brightness>, intensity: Brightness, col: usize, row: usize) {
        let cell = &mut light[(col, row)];
        if intensity <= 0 || *cell >= intensity {
            return;
        }
        *cell = intensity;
        self.heap.push(Pending { intensity, col, row });
    }

    /// Floods every source in order.
    pub fn flood_all<'a>(
        &mut self,
        light: &mut Grid<Brightness>,
        transparency: &Grid<bool>,
        sources: impl IntoIterator<Item = &'a LightSource>,
    ) -> Result<(), LightingError> {
        for s in sources {
            self.flood(light, transparency, *s)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(w: usize, h: usize) -> Grid<bool> {
        Grid::filled(w, h, true).unwrap()
    }

    #[test]
    fn zero_intensity_leaves_grid_untouched() {
        let t = open(3, 3);
        let mut g = Grid::filled(3, 3, 0).unwrap();
        let mut p = Propagator::new(10, 14);
        p.flood(&mut g, &t, LightSource::new(0, 1, 1)).unwrap();
        p.flood(&mut g, &t, LightSource::new(-5, 1, 1)).unwrap();
        assert!(g.cells().iter().all(|&v| v == 0));
    }

    #[test]
    fn brighter_cell_is_not_overwritten() {
        let t = open(3, 1);
        let mut g = Grid::from_rows(&[[0, 90, 0]]).unwrap();
        let mut p = Propagator::new(10, 14);
        p.flood(&mut g, &t, LightSource::new(50, 0, 0)).unwrap();
        assert_eq!(g.to_rows(), vec![vec![50, 90, 0]]);
    }

    #[test]
    fn opaque_source_lights_only_itself() {
        let t = Grid::from_rows(&[[true, false, true]]).unwrap();
        let mut g = Grid::filled(3, 1, 0).unwrap();
        let mut p = Propagator::new(10, 14);
        p.flood(&mut g, &t, LightSource::new(100, 1, 0)).unwrap();
        assert_eq!(g.to_rows(), vec![vec![0, 100, 0]]);
    }

    #[test]
    fn out_of_bounds_source_is_an_error() {
        let t = open(2, 2);
        let mut g = Grid::filled(2, 2, 0).unwrap();
        let mut p = Propagator::new(10, 14);
        let err = p.flood(&mut g, &t, LightSource::new(50, 2, 0)).unwrap_err();
        assert!(matches!(err, LightingError::SourceOutOfBounds { col: 2, row: 0, width: 2, height: 2 }));
    }

    #[test]
    fn light_is_never_dimmed() {
        let t = open(4, 4);
        let mut g = Grid::filled(4, 4, 0).unwrap();
        let mut p = Propagator::new(10, 14);
        p.flood(&mut g, &t, LightSource::new(80, 0, 0)).unwrap();
        let before = g.clone();
        p.flood(&mut g, &t, LightSource::new(30, 3, 3)).unwrap();
        for (pos, v) in g.iter() {
            assert!(*v >= before[pos]);
        }
    }

    #[test]
    fn large_open_grid_matches_closed_form() {
        let n = 401;
        let mid = n / 2;
        let t = open(n, n);
        let mut g = Grid::filled(n, n, 0).unwrap();
        let mut p = Propagator::new(1, 2);
        p.flood(&mut g, &t, LightSource::new(1000, mid, mid)).unwrap();
        // with diagonal = 2 * dropoff every cell is lit by its manhattan distance
        for ((c, r), v) in g.iter() {
            let dist = c.abs_diff(mid) + r.abs_diff(mid);
            assert_eq!(*v, (1000 - dist as i32).max(0), "at ({c}, {r})");
        }
    }

    #[test]
    fn huge_intensity_does_not_overflow() {
        let t = open(3, 1);
        let mut g = Grid::filled(3, 1, 0).unwrap();
        let mut p = Propagator::new(35, 49);
        p.flood(&mut g, &t, LightSource::new(i32::MAX, 0, 0)).unwrap();
        assert_eq!(g.to_rows(), vec![vec![i32::MAX, i32::MAX - 35, i32::MAX - 70]]);
    }
}
