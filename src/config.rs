//! Runtime-settable simulation parameters.

use std::num::NonZeroUsize;

use crate::boundary::BoundaryPolicy;
use crate::error::{LifeError, Result};

/// Default number of snapshots kept in each history sequence.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Parameters a simulation is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    pub policy: BoundaryPolicy,
    pub history_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            policy: BoundaryPolicy::Toroidal,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl SimulationConfig {
    pub fn with_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Checks the history capacity and returns it as a non-zero count.
    ///
    /// # Errors
    ///
    /// A capacity of zero would make undo impossible and is rejected with
    /// [`LifeError::InvalidConfiguration`].
    pub fn validate(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.history_capacity).ok_or_else(|| {
            LifeError::invalid_config("history capacity must be a positive integer")
        })
    }
}
