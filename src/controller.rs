//! One API over stepping, history and manual edits.

use tracing::debug;

use crate::boundary::BoundaryPolicy;
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::history::HistoryLog;
use crate::state::SimulationState;

/// Front door for drivers such as a terminal UI or a test harness.
///
/// Holds the simulation state plus the grid the simulation started from, so
/// [`SimulationController::reset`] can return to it.
#[derive(Debug, Clone)]
pub struct SimulationController {
    state: SimulationState,
    original: Grid,
}

impl SimulationController {
    /// # Errors
    ///
    /// Rejects a zero history capacity.
    pub fn new(grid: Grid, config: SimulationConfig) -> Result<Self> {
        let original = grid.clone();
        let state = SimulationState::new(grid, config)?;
        debug!(
            rows = original.rows(),
            cols = original.cols(),
            policy = %config.policy,
            history_capacity = config.history_capacity,
            "simulation created"
        );
        Ok(SimulationController { state, original })
    }

    /// Advances one generation and invalidates redo.
    pub fn step(&mut self) {
        self.state.step();
    }

    /// Advances `count` generations.
    pub fn step_many(&mut self, count: usize) {
        for _ in 0..count {
            self.state.step();
        }
    }

    /// Returns to the previous snapshot. Returns `false` when there is none.
    pub fn undo(&mut self) -> bool {
        let undone = self.state.undo();
        debug!(undone, past = self.history().past_len(), "undo");
        undone
    }

    /// Reapplies an undone snapshot, or steps when nothing is left to redo.
    pub fn redo(&mut self) {
        self.state.redo();
        debug!(future = self.history().future_len(), "redo");
    }

    /// A discrete edit: checkpoints the grid, then inverts one cell.
    /// Out-of-bounds coordinates change nothing and record nothing.
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> bool {
        if !self.state.current().contains(row, col) {
            return false;
        }
        self.state.record();
        self.state.toggle_cell(row, col)
    }

    /// Continues an edit started by [`toggle_cell`](Self::toggle_cell),
    /// e.g. while dragging: inverts a cell without a new checkpoint, so a
    /// whole stroke undoes in one go.
    pub fn continue_edit(&mut self, row: usize, col: usize) -> bool {
        self.state.toggle_cell(row, col)
    }

    /// Restores the grid the controller was built with. History is neither
    /// written nor cleared.
    pub fn reset(&mut self) {
        self.state.replace_current(self.original.clone());
        debug!("reset to original grid");
    }

    pub fn set_boundary_policy(&mut self, policy: BoundaryPolicy) {
        if policy != self.state.policy() {
            debug!(%policy, "boundary policy changed");
        }
        self.state.set_policy(policy);
    }

    pub fn toggle_boundary_policy(&mut self) -> BoundaryPolicy {
        let policy = self.state.policy().toggled();
        self.set_boundary_policy(policy);
        policy
    }

    pub fn boundary_policy(&self) -> BoundaryPolicy {
        self.state.policy()
    }

    /// Read-only view of the grid being simulated.
    pub fn current_grid(&self) -> &Grid {
        self.state.current()
    }

    pub fn original_grid(&self) -> &Grid {
        &self.original
    }

    pub fn history(&self) -> &HistoryLog {
        self.state.history()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> SimulationController {
        let grid = Grid::with_alive(6, 6, [(2, 1), (2, 2), (2, 3)]).unwrap();
        SimulationController::new(grid, SimulationConfig::default()).unwrap()
    }

    #[test]
    fn test_toggle_records_once() {
        let mut sim = controller();
        assert!(sim.toggle_cell(0, 0));
        assert_eq!(sim.history().past_len(), 1);
        assert!(sim.current_grid().is_alive(0, 0));
    }

    #[test]
    fn test_toggle_out_of_bounds_records_nothing() {
        let mut sim = controller();
        let before = sim.current_grid().clone();
        assert!(!sim.toggle_cell(6, 0));
        assert!(!sim.toggle_cell(0, 6));
        assert_eq!(sim.history().past_len(), 0);
        assert_eq!(sim.current_grid(), &before);
    }

    #[test]
    fn test_stroke_undoes_in_one_step() {
        let mut sim = controller();
        let before = sim.current_grid().clone();
        sim.toggle_cell(0, 0);
        sim.continue_edit(0, 1);
        sim.continue_edit(0, 2);
        assert_eq!(sim.history().past_len(), 1);
        assert_eq!(sim.current_grid().population(), 6);
        assert!(sim.undo());
        assert_eq!(sim.current_grid(), &before);
    }

    #[test]
    fn test_undo_restores_edit() {
        let mut sim = controller();
        let before = sim.current_grid().clone();
        sim.toggle_cell(4, 4);
        sim.undo();
        assert_eq!(sim.current_grid(), &before);
        sim.redo();
        assert!(sim.current_grid().is_alive(4, 4));
    }

    #[test]
    fn test_reset_keeps_history() {
        let mut sim = controller();
        sim.step();
        sim.step();
        sim.undo();
        let (past, future) = (sim.history().past_len(), sim.history().future_len());
        sim.reset();
        assert_eq!(sim.current_grid(), sim.original_grid());
        assert_eq!(sim.history().past_len(), past);
        assert_eq!(sim.history().future_len(), future);
    }

    #[test]
    fn test_policy_toggle() {
        let mut sim = controller();
        assert_eq!(sim.boundary_policy(), BoundaryPolicy::Toroidal);
        assert_eq!(sim.toggle_boundary_policy(), BoundaryPolicy::Finite);
        sim.set_boundary_policy(BoundaryPolicy::Toroidal);
        assert_eq!(sim.boundary_policy(), BoundaryPolicy::Toroidal);
    }

    #[test]
    fn test_step_many() {
        let mut sim = controller();
        let start = sim.current_grid().clone();
        sim.step_many(4);
        assert_eq!(sim.current_grid(), &start);
        assert_eq!(sim.history().past_len(), 4);
    }
}
