//! Experimental 3x smoothing of a brightness map.
//!
//! Each source cell `(col, row)` lands unchanged on `(3*col+1, 3*row+1)`.
//! Every other output row copies the interpolation of its nearest anchor row,
//! and within a row the cells between two anchors are weighted 2/3 toward the
//! closer one. This is a row-wise approximation, not true bilinear filtering.

use umbra_grid::Grid;

use crate::Brightness;

pub const UPSCALE: usize = 3;

/// Owns the scaled buffer; it is only reallocated when the source size changes.
#[derive(Debug, Clone)]
pub struct Upscaler {
    buf: Grid<Option<Brightness>>,
    src_width: usize,
    src_height: usize,
}

impl Upscaler {
    /// Buffer for a `width x height` source map. Both must be non-zero.
    pub fn new(width: usize, height: usize) -> Result<Self, umbra_grid::GridError> {
        Ok(Self {
            buf: Grid::filled(width * UPSCALE, height * UPSCALE, None)?,
            src_width: width,
            src_height: height,
        })
    }

    pub fn source_dims(&self) -> (usize, usize) {
        (self.src_width, self.src_height)
    }

    pub fn upscale(&mut self, src: &Grid<Brightness>) -> &Grid<Option<Brightness>> {
        if src.dims() != self.source_dims() {
            log::debug!(
                "upscale buffer resized {}x{} -> {}x{}",
                self.src_width,
                self.src_height,
                src.width(),
                src.height()
            );
            // src is non-empty so the resize cannot fail
            if let Ok(fresh) = Self::new(src.width(), src.height()) {
                *self = fresh;
            }
        }
        self.buf.fill(None);
        for ((col, row), v) in src.iter() {
            self.buf[(col * UPSCALE + 1, row * UPSCALE + 1)] = Some(*v);
        }
        let (w, h) = self.buf.dims();
        for r in 0..h {
            let anchor_row = (r / UPSCALE) * UPSCALE + 1;
            for c in 0..w {
                if self.buf[(c, r)].is_some() {
                    continue;
                }
                self.buf[(c, r)] = self.interpolate(c, anchor_row);
            }
        }
        &self.buf
    }

    fn anchor(&self, j: usize, anchor_row: usize) -> Option<Brightness> {
        if j >= self.src_width {
            return None;
        }
        self.buf[(j * UPSCALE + 1, anchor_row)]
    }

    fn interpolate(&self, c: usize, anchor_row: usize) -> Option<Brightness> {
        let j = c / UPSCALE;
        let near = self.anchor(j, anchor_row)?;
        let far = match c % UPSCALE {
            0 if j > 0 => self.anchor(j - 1, anchor_row),
            2 => self.anchor(j + 1, anchor_row),
            _ => None,
        };
        Some(match far {
            // lies between near and far, so narrowing back cannot truncate
            Some(far) => ((i64::from(near) * 2 + i64::from(far)) / 3) as Brightness,
            None => near,
        })
    }
}

/// One-off upscale without a retained buffer.
pub fn upscale(src: &Grid<Brightness>) -> Grid<Option<Brightness>> {
    match Upscaler::new(src.width(), src.height()) {
        Ok(mut up) => {
            up.upscale(src);
            up.buf
        }
        Err(_) => unreachable!("grids are never empty"),
    }
}
