//! Bounded undo/redo log of grid snapshots.
//!
//! Two sequences, `past` and `future`, each hold at most `capacity` grids
//! with the most recent entry at the back. Pushing past capacity drops the
//! oldest entry from the front. Every entry is an owned [`Grid`] value, so a
//! snapshot is never shared with the simulation's current grid.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use crate::grid::Grid;

#[derive(Debug, Clone)]
pub struct HistoryLog {
    past: VecDeque<Grid>,
    future: VecDeque<Grid>,
    capacity: NonZeroUsize,
}

fn push_bounded(log: &mut VecDeque<Grid>, grid: Grid, capacity: NonZeroUsize) {
    log.push_back(grid);
    while log.len() > capacity.get() {
        log.pop_front();
    }
}

impl HistoryLog {
    pub fn new(capacity: NonZeroUsize) -> Self {
        HistoryLog {
            past: VecDeque::new(),
            future: VecDeque::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Appends a copy of `current` to `past`. `future` is left alone.
    pub fn record(&mut self, current: &Grid) {
        push_bounded(&mut self.past, current.clone(), self.capacity);
    }

    /// Drops every redo entry.
    pub fn clear_future(&mut self) {
        self.future.clear();
    }

    /// Moves back one entry. `current` is pushed onto `future` and replaced
    /// with the most recent `past` entry. Returns `false` without touching
    /// anything when `past` is empty.
    pub fn undo(&mut self, current: &mut Grid) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let undone = std::mem::replace(current, previous);
        push_bounded(&mut self.future, undone, self.capacity);
        true
    }

    /// Moves forward one entry. `current` is recorded in `past` and replaced
    /// with the most recent `future` entry. Returns `false` without touching
    /// anything when `future` is empty.
    pub fn redo(&mut self, current: &mut Grid) -> bool {
        let Some(next) = self.future.pop_back() else {
            return false;
        };
        let redone = std::mem::replace(current, next);
        push_bounded(&mut self.past, redone, self.capacity);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Snapshots in `past`, oldest first.
    pub fn past(&self) -> impl ExactSizeIterator<Item = &Grid> + '_ {
        self.past.iter()
    }

    /// Snapshots in `future`, oldest first.
    pub fn future(&self) -> impl ExactSizeIterator<Item = &Grid> + '_ {
        self.future.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    /// A 1xN grid whose only live cell sits at column `i`, so each marker is
    /// distinguishable.
    fn marker(i: usize) -> Grid {
        Grid::with_alive(1, 16, [(0, i)]).unwrap()
    }

    #[test]
    fn test_new_history_is_empty() {
        let history = HistoryLog::new(cap(10));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.capacity().get(), 10);
    }

    #[test]
    fn test_record_enables_undo() {
        let mut history = HistoryLog::new(cap(10));
        history.record(&marker(0));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_swaps_current_into_future() {
        let mut history = HistoryLog::new(cap(10));
        history.record(&marker(1));
        history.record(&marker(2));

        let mut current = marker(3);
        assert!(history.undo(&mut current));
        assert_eq!(current, marker(2));
        assert_eq!(history.past_len(), 1);
        assert_eq!(history.future().next(), Some(&marker(3)));
    }

    #[test]
    fn test_redo_restores_undone_state() {
        let mut history = HistoryLog::new(cap(10));
        history.record(&marker(10));
        history.record(&marker(11));

        let mut current = marker(12);
        history.undo(&mut current);
        assert_eq!(current, marker(11));

        assert!(history.redo(&mut current));
        assert_eq!(current, marker(12));
        assert_eq!(history.past_len(), 2);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_empty_undo_and_redo_are_noops() {
        let mut history = HistoryLog::new(cap(4));
        let mut current = marker(5);
        assert!(!history.undo(&mut current));
        assert!(!history.redo(&mut current));
        assert_eq!(current, marker(5));
        assert_eq!(history.past_len(), 0);
        assert_eq!(history.future_len(), 0);
    }

    #[test]
    fn test_record_evicts_oldest() {
        let mut history = HistoryLog::new(cap(3));
        for i in 0..5 {
            history.record(&marker(i));
        }
        let kept: Vec<_> = history.past().cloned().collect();
        assert_eq!(kept, vec![marker(2), marker(3), marker(4)]);
    }

    #[test]
    fn test_future_is_bounded() {
        let mut history = HistoryLog::new(cap(2));
        for i in 0..4 {
            history.record(&marker(i));
        }
        // Capacity 2 keeps markers 2 and 3 in past.
        let mut current = marker(9);
        while history.undo(&mut current) {}
        assert_eq!(current, marker(2));
        let future: Vec<_> = history.future().cloned().collect();
        assert_eq!(future, vec![marker(9), marker(3)]);

        history.record(&marker(7));
        history.record(&marker(8));
        history.undo(&mut current);
        history.undo(&mut current);
        assert_eq!(history.future_len(), 2);
    }

    #[test]
    fn test_record_keeps_future() {
        let mut history = HistoryLog::new(cap(5));
        history.record(&marker(0));
        let mut current = marker(1);
        history.undo(&mut current);
        history.record(&marker(4));
        assert!(history.can_redo());
        history.clear_future();
        assert!(!history.can_redo());
    }

    #[test]
    fn test_snapshot_not_aliased() {
        let mut history = HistoryLog::new(cap(5));
        let mut current = marker(0);
        history.record(&current);
        current = current.toggled(0, 1).unwrap();
        assert_eq!(history.past().next(), Some(&marker(0)));
        assert_ne!(history.past().next(), Some(&current));
    }
}
