//! Rectangular row-major grids for tile maps.
#![forbid(unsafe_code)]

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must have at least one column and one row (got {width}x{height})")]
    Empty { width: usize, height: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("expected {expected} cells for {width}x{height}, got {found}")]
    CellCount { width: usize, height: usize, expected: usize, found: usize },
}

/// Step offsets as `(dcol, drow)`.
pub const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub const DIAGONAL: [(isize, isize); 4] = [(-1, -1), (1, 1), (-1, 1), (1, -1)];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self, GridError> {
        check_dims(width, height)?;
        Ok(Self { width, height, cells: vec![value; width * height] })
    }

    /// Builds a grid from nested rows; every row must have the same length.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        check_dims(width, height)?;
        let mut cells = Vec::with_capacity(width * height);
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != width {
                return Err(GridError::Ragged { row, expected: width, found: r.len() });
            }
            cells.extend_from_slice(r);
        }
        Ok(Self { width, height, cells })
    }

    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.rows().map(|r| r.to_vec()).collect()
    }
}

impl<T> Grid<T> {
    /// Wraps an already linearized buffer (`row * width + col`).
    pub fn from_vec(width: usize, height: usize, cells: Vec<T>) -> Result<Self, GridError> {
        check_dims(width, height)?;
        let expected = width * height;
        if cells.len() != expected {
            return Err(GridError::CellCount { width, height, expected, found: cells.len() });
        }
        Ok(Self { width, height, cells })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn idx(&self, col: usize, row: usize) -> usize {
        row * self.width + col
    }

    #[inline]
    pub fn in_bounds(&self, col: usize, row: usize) -> bool {
        col < self.width && row < self.height
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> Option<&T> {
        if self.in_bounds(col, row) { self.cells.get(self.idx(col, row)) } else { None }
    }

    #[inline]
    pub fn get_mut(&mut self, col: usize, row: usize) -> Option<&mut T> {
        if self.in_bounds(col, row) {
            let i = self.idx(col, row);
            self.cells.get_mut(i)
        } else {
            None
        }
    }

    /// Neighbour of `(col, row)` at `(dcol, drow)` if it stays inside the grid.
    #[inline]
    pub fn offset(&self, col: usize, row: usize, dcol: isize, drow: isize) -> Option<(usize, usize)> {
        let c = col.checked_add_signed(dcol)?;
        let r = row.checked_add_signed(drow)?;
        self.in_bounds(c, r).then_some((c, r))
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.width)
    }

    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row < self.height {
            let start = row * self.width;
            Some(&self.cells[start..start + self.width])
        } else {
            None
        }
    }

    /// `((col, row), &value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        let w = self.width;
        self.cells.iter().enumerate().map(move |(i, v)| ((i % w, i / w), v))
    }

    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Grid<U> {
        Grid { width: self.width, height: self.height, cells: self.cells.iter().map(f).collect() }
    }

    pub fn same_dims<U>(&self, other: &Grid<U>) -> bool {
        self.dims() == other.dims()
    }
}

impl<T> std::ops::Index<(usize, usize)> for Grid<T> {
    type Output = T;
    #[inline]
    fn index(&self, (col, row): (usize, usize)) -> &T {
        assert!(self.in_bounds(col, row), "({col}, {row}) outside {}x{}", self.width, self.height);
        &self.cells[self.idx(col, row)]
    }
}

impl<T> std::ops::IndexMut<(usize, usize)> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, (col, row): (usize, usize)) -> &mut T {
        assert!(self.in_bounds(col, row), "({col}, {row}) outside {}x{}", self.width, self.height);
        let i = self.idx(col, row);
        &mut self.cells[i]
    }
}

fn check_dims(width: usize, height: usize) -> Result<(), GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::Empty { width, height });
    }
    Ok(())
}
