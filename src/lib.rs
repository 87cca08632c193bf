//! # Life History
//!
//! Conway's Game of Life on a fixed-size grid with a bounded undo/redo log.
//!
//! ## Features
//!
//! * Finite (hard edge) and toroidal (wraparound) boundaries, switchable
//!   between steps
//! * Full-grid simultaneous updates computed into a fresh buffer
//! * Undo/redo across generations and manual edits, capped per log
//! * RLE pattern loading
//!
//! ```
//! use life_history::{Grid, SimulationConfig, SimulationController};
//!
//! let blinker = Grid::with_alive(5, 5, [(2, 1), (2, 2), (2, 3)]).unwrap();
//! let mut sim = SimulationController::new(blinker.clone(), SimulationConfig::default()).unwrap();
//! sim.step();
//! sim.step();
//! assert_eq!(sim.current_grid(), &blinker);
//! sim.undo();
//! assert_ne!(sim.current_grid(), &blinker);
//! ```

pub mod boundary;
pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod history;
pub mod pattern;
pub mod state;
pub mod step;

pub use boundary::{neighbor_count, BoundaryPolicy};
pub use config::{SimulationConfig, DEFAULT_HISTORY_CAPACITY};
pub use controller::SimulationController;
pub use error::{LifeError, Result};
pub use grid::{GenerationDiff, Grid};
pub use history::HistoryLog;
pub use pattern::{
    load_pattern, parse_pattern, Pattern, DEFAULT_PATTERN_MARGIN, MAX_PATTERN_CELLS,
};
pub use state::SimulationState;
pub use step::{next_generation, next_state, CONWAY_RULE};
