//! The current grid, its boundary policy and its history.

use tracing::debug;

use crate::boundary::BoundaryPolicy;
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::history::HistoryLog;
use crate::step::next_generation;

/// Owns the one current [`Grid`] and the undo/redo log for it.
///
/// Not thread-safe by contract: callers that share a state across threads
/// must serialize access themselves.
#[derive(Debug, Clone)]
pub struct SimulationState {
    current: Grid,
    policy: BoundaryPolicy,
    history: HistoryLog,
}

impl SimulationState {
    /// Starts a simulation at `grid` with empty history.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::LifeError::InvalidConfiguration`] if the history
    /// capacity is zero.
    pub fn new(grid: Grid, config: SimulationConfig) -> Result<Self> {
        let capacity = config.validate()?;
        Ok(SimulationState {
            current: grid,
            policy: config.policy,
            history: HistoryLog::new(capacity),
        })
    }

    pub fn current(&self) -> &Grid {
        &self.current
    }

    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: BoundaryPolicy) {
        self.policy = policy;
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Checkpoints the current grid into `past`.
    pub fn record(&mut self) {
        self.history.record(&self.current);
    }

    /// Advances one generation. Any redo entries become unreachable and are
    /// dropped.
    pub fn step(&mut self) {
        self.record();
        self.history.clear_future();
        self.current = next_generation(&self.current, self.policy);
    }

    /// Returns to the most recent checkpoint, if there is one.
    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.current)
    }

    /// Reapplies the most recently undone state. With nothing to redo this
    /// advances one generation instead, so redo always moves forward.
    pub fn redo(&mut self) {
        if !self.history.redo(&mut self.current) {
            debug!("redo log empty, stepping instead");
            self.step();
        }
    }

    /// Inverts one cell without checkpointing. Out-of-bounds coordinates are
    /// ignored and `false` is returned.
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> bool {
        match self.current.toggled(row, col) {
            Some(next) => {
                self.current = next;
                true
            }
            None => false,
        }
    }

    /// Swaps in a new current grid without touching history.
    pub(crate) fn replace_current(&mut self, grid: Grid) {
        self.current = grid;
    }
}
