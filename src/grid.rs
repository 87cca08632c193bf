//! The cell matrix.
//!
//! A [`Grid`] is a value: once built, its dimensions and cells never change.
//! Edits produce a fresh grid, so a snapshot held by the history log can
//! never be mutated through the simulation's current grid.

use std::fmt;

use rand::Rng;

use crate::error::{LifeError, Result};

/// A fixed-size rectangle of alive/dead cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates a grid with every cell dead.
    ///
    /// # Errors
    ///
    /// Returns [`LifeError::InvalidConfiguration`] if either dimension is zero.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(LifeError::invalid_config(format!(
                "grid dimensions must be non-zero, got {rows}x{cols}"
            )));
        }
        Ok(Grid {
            rows,
            cols,
            cells: vec![false; rows * cols],
        })
    }

    /// Builds a grid from nested rows. Short rows are padded with dead cells
    /// up to the widest row.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self> {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid = Grid::new(rows.len(), cols)?;
        for (r, row) in rows.into_iter().enumerate() {
            let start = r * cols;
            grid.cells[start..start + row.len()].copy_from_slice(&row);
        }
        Ok(grid)
    }

    /// Builds a grid where the given coordinates are alive. Coordinates
    /// outside the grid are ignored.
    pub fn with_alive<I>(rows: usize, cols: usize, alive: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut grid = Grid::new(rows, cols)?;
        for (row, col) in alive {
            if let Some(idx) = grid.index(row, col) {
                grid.cells[idx] = true;
            }
        }
        Ok(grid)
    }

    /// Creates a grid where each cell is alive with probability `density`.
    pub fn random<R: Rng>(
        rows: usize,
        cols: usize,
        density: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&density) {
            return Err(LifeError::invalid_config(format!(
                "density must be within 0.0..=1.0, got {density}"
            )));
        }
        let mut grid = Grid::new(rows, cols)?;
        grid.cells.iter_mut().for_each(|cell| *cell = rng.gen_bool(density));
        Ok(grid)
    }

    /// Places `inner` in the middle of a dead border `margin` cells wide.
    pub fn with_margin(inner: &Grid, margin: usize) -> Grid {
        let rows = inner.rows + 2 * margin;
        let cols = inner.cols + 2 * margin;
        let mut cells = vec![false; rows * cols];
        for (r, row) in inner.iter_rows().enumerate() {
            let start = (r + margin) * cols + margin;
            cells[start..start + inner.cols].copy_from_slice(row);
        }
        Grid { rows, cols, cells }
    }

    /// Assembles a grid from an already computed cell buffer.
    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<bool>) -> Grid {
        debug_assert_eq!(cells.len(), rows * cols);
        Grid { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        self.contains(row, col).then(|| row * self.cols + col)
    }

    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Cell state, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Cell state, treating anything outside the grid as dead.
    #[inline]
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.get(row, col).unwrap_or(false)
    }

    /// Returns a copy of this grid with one cell inverted, or `None` when the
    /// coordinates fall outside the grid.
    pub fn toggled(&self, row: usize, col: usize) -> Option<Grid> {
        let idx = self.index(row, col)?;
        let mut next = self.clone();
        next.cells[idx] = !next.cells[idx];
        Some(next)
    }

    /// One row as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    pub fn row(&self, row: usize) -> &[bool] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells.chunks(self.cols)
    }

    /// Number of living cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            let line: String = row.iter().map(|&c| if c { 'o' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Cells created and destroyed between two grids of the same size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationDiff {
    pub births: usize,
    pub deaths: usize,
}

impl GenerationDiff {
    /// Compares `before` and `after` cell by cell. Grids of different sizes
    /// yield an empty diff.
    pub fn between(before: &Grid, after: &Grid) -> Self {
        if before.dimensions() != after.dimensions() {
            return GenerationDiff::default();
        }
        before
            .cells
            .iter()
            .zip(&after.cells)
            .fold(GenerationDiff::default(), |mut diff, (&was, &is)| {
                match (was, is) {
                    (false, true) => diff.births += 1,
                    (true, false) => diff.deaths += 1,
                    _ => {}
                }
                diff
            })
    }
}
