use serde::Serialize;

use crate::piece::{Piece, Shape};
use crate::types::{idx_to_rc, rc_to_idx, Color, GRID_SIZE};

/// Rows and columns that are completely filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Lines {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
}

impl Lines {
    #[inline]
    pub fn count(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }

    /// Cells covered by these lines, each listed once, row-major.
    pub fn cells(&self) -> Vec<(usize, usize)> {
        (0..GRID_SIZE * GRID_SIZE)
            .map(idx_to_rc)
            .filter(|(r, c)| self.rows.contains(r) || self.cols.contains(c))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    // Cells laid out row-major (r*8 + c); None is empty
    cells: [Option<Color>; GRID_SIZE * GRID_SIZE],
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            cells: [None; GRID_SIZE * GRID_SIZE],
        }
    }
}

impl Grid {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> Option<Color> {
        rc_to_idx(r, c).and_then(|i| self.cells[i])
    }

    /// Out-of-range coordinates are ignored.
    #[inline]
    pub fn set(&mut self, r: usize, c: usize, cell: Option<Color>) {
        if let Some(i) = rc_to_idx(r, c) {
            self.cells[i] = cell;
        }
    }

    #[inline]
    pub fn is_empty(&self, r: usize, c: usize) -> bool {
        self.get(r, c).is_none()
    }

    #[inline]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.cells = [None; GRID_SIZE * GRID_SIZE];
    }

    /// True when every offset cell lies inside the grid and is empty.
    pub fn can_place(&self, shape: Shape, row: usize, col: usize) -> bool {
        shape.offsets().iter().all(|&(dr, dc)| {
            let (r, c) = (row + dr, col + dc);
            r < GRID_SIZE && c < GRID_SIZE && self.is_empty(r, c)
        })
    }

    /// Fill the piece's cells. Callers check `can_place` first.
    pub fn place(&mut self, piece: &Piece, row: usize, col: usize) {
        debug_assert!(self.can_place(piece.shape, row, col));
        for &(dr, dc) in piece.shape.offsets() {
            self.set(row + dr, col + dc, Some(piece.color));
        }
    }

    /// First anchor (row-major) where the shape fits.
    pub fn find_fit(&self, shape: Shape) -> Option<(usize, usize)> {
        (0..GRID_SIZE * GRID_SIZE)
            .map(idx_to_rc)
            .find(|&(r, c)| self.can_place(shape, r, c))
    }

    #[inline]
    pub fn fits_anywhere(&self, shape: Shape) -> bool {
        self.find_fit(shape).is_some()
    }

    pub fn any_piece_fits(&self, pieces: &[Piece]) -> bool {
        pieces.iter().any(|p| self.fits_anywhere(p.shape))
    }

    pub fn completed_lines(&self) -> Lines {
        let rows = (0..GRID_SIZE)
            .filter(|&r| (0..GRID_SIZE).all(|c| !self.is_empty(r, c)))
            .collect();
        let cols = (0..GRID_SIZE)
            .filter(|&c| (0..GRID_SIZE).all(|r| !self.is_empty(r, c)))
            .collect();
        Lines { rows, cols }
    }

    /// Empty every listed row and column; shared cells are cleared once.
    pub fn clear_lines(&mut self, lines: &Lines) {
        for (r, c) in lines.cells() {
            self.set(r, c, None);
        }
    }
}
