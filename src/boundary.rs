//! Edge policies for neighbor lookups.

use std::fmt;
use std::str::FromStr;

use crate::error::LifeError;
use crate::grid::Grid;

/// How neighbor lookups beyond the grid edge are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundaryPolicy {
    /// Cells outside the grid count as dead.
    Finite,
    /// The grid wraps onto itself in both directions, corners included.
    #[default]
    Toroidal,
}

impl BoundaryPolicy {
    /// The other policy.
    pub fn toggled(self) -> Self {
        match self {
            BoundaryPolicy::Finite => BoundaryPolicy::Toroidal,
            BoundaryPolicy::Toroidal => BoundaryPolicy::Finite,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BoundaryPolicy::Finite => "finite",
            BoundaryPolicy::Toroidal => "toroidal",
        }
    }
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryPolicy {
    type Err = LifeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "finite" => Ok(BoundaryPolicy::Finite),
            "toroidal" | "infinite" | "wrap" => Ok(BoundaryPolicy::Toroidal),
            other => Err(LifeError::invalid_config(format!(
                "unknown boundary policy `{other}`, expected `finite` or `toroidal`"
            ))),
        }
    }
}

/// Counts the living cells among the eight neighbors of `(row, col)`.
///
/// Under [`BoundaryPolicy::Toroidal`] both coordinates wrap independently,
/// so the diagonal neighbor of a corner is the opposite corner. On grids
/// narrower than three cells a wrapped offset can land on the same cell more
/// than once; each landing is counted, exactly as modular indexing gives.
pub fn neighbor_count(grid: &Grid, row: usize, col: usize, policy: BoundaryPolicy) -> u8 {
    let rows = grid.rows() as isize;
    let cols = grid.cols() as isize;
    let mut count = 0;

    for dr in -1..=1isize {
        for dc in -1..=1isize {
            if dr == 0 && dc == 0 {
                continue;
            }

            let nr = row as isize + dr;
            let nc = col as isize + dc;

            let alive = match policy {
                BoundaryPolicy::Finite => {
                    nr >= 0 && nc >= 0 && grid.is_alive(nr as usize, nc as usize)
                }
                BoundaryPolicy::Toroidal => grid.is_alive(
                    nr.rem_euclid(rows) as usize,
                    nc.rem_euclid(cols) as usize,
                ),
            };

            if alive {
                count += 1;
            }
        }
    }

    count
}
