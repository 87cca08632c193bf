//! Generation stepping under the B3/S23 rule.

use rayon::prelude::*;

use crate::boundary::{neighbor_count, BoundaryPolicy};
use crate::grid::Grid;

/// The rule string the engine implements.
pub const CONWAY_RULE: &str = "B3/S23";

/// Applies Conway's rule to one cell:
///
/// * Any live cell with fewer than two live neighbors dies (underpopulation)
/// * Any live cell with two or three live neighbors survives
/// * Any live cell with more than three live neighbors dies (overpopulation)
/// * Any dead cell with exactly three live neighbors becomes alive (reproduction)
#[inline]
pub fn next_state(alive: bool, live_neighbors: u8) -> bool {
    matches!((alive, live_neighbors), (true, 2) | (_, 3))
}

/// Computes the generation after `grid`.
///
/// Every cell reads only `grid`, and results land in a fresh buffer, so no
/// cell observes another cell's next state. The input is never modified.
pub fn next_generation(grid: &Grid, policy: BoundaryPolicy) -> Grid {
    let (rows, cols) = grid.dimensions();
    let mut next = vec![false; rows * cols];

    next.par_chunks_mut(cols)
        .enumerate()
        .for_each(|(row, out)| {
            let current = grid.row(row);
            for (col, cell) in out.iter_mut().enumerate() {
                *cell = next_state(current[col], neighbor_count(grid, row, col, policy));
            }
        });

    Grid::from_cells(rows, cols, next)
}
