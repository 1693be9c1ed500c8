// File: crates/series-core/src/state.rs
// Summary: Per-series interaction state: segment selection and animation progress.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    Single,
    Multiple,
}

/// Selected data indices of one series.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    mode: SelectionMode,
    selected: BTreeSet<usize>,
}

impl SelectionState {
    pub fn new(mode: SelectionMode) -> Self { Self { mode, selected: BTreeSet::new() } }

    pub fn mode(&self) -> SelectionMode { self.mode }

    /// Flip `index`. Single mode drops any other selection first. Returns the new state of `index`.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.selected.remove(&index) {
            return false;
        }
        if self.mode == SelectionMode::Single {
            self.selected.clear();
        }
        self.selected.insert(index);
        true
    }

    pub fn is_selected(&self, index: usize) -> bool { self.selected.contains(&index) }

    pub fn selected(&self) -> impl Iterator<Item = usize> + '_ { self.selected.iter().copied() }

    pub fn clear(&mut self) { self.selected.clear(); }

    /// Keep indices aligned after `count` rows were inserted at `at`.
    pub fn shift_inserted(&mut self, at: usize, count: usize) {
        self.selected = self.selected.iter().map(|&i| if i >= at { i + count } else { i }).collect();
    }

    /// Keep indices aligned after `count` rows were removed at `at`.
    pub fn shift_removed(&mut self, at: usize, count: usize) {
        self.selected = self
            .selected
            .iter()
            .filter(|&&i| i < at || i >= at + count)
            .map(|&i| if i >= at + count { i - count } else { i })
            .collect();
    }
}

/// Draw-time animation progress in [0, 1]; 1 draws final geometry.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct AnimationProgress(f64);

impl AnimationProgress {
    pub const DONE: AnimationProgress = AnimationProgress(1.0);

    pub fn new(value: f64) -> Self {
        Self(if value.is_nan() { 1.0 } else { value.clamp(0.0, 1.0) })
    }

    pub fn value(self) -> f64 { self.0 }

    /// Interpolate from `baseline` toward `target`.
    #[inline]
    pub fn scale(self, baseline: f64, target: f64) -> f64 { baseline + (target - baseline) * self.0 }
}

impl Default for AnimationProgress {
    fn default() -> Self { Self::DONE }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_mode_keeps_one() {
        let mut s = SelectionState::new(SelectionMode::Single);
        assert!(s.toggle(1));
        assert!(s.toggle(3));
        assert_eq!(s.selected().collect::<Vec<_>>(), vec![3]);
        assert!(!s.toggle(3));
        assert_eq!(s.selected().count(), 0);
    }

    #[test]
    fn multiple_mode_accumulates_and_shifts() {
        let mut s = SelectionState::new(SelectionMode::Multiple);
        s.toggle(1);
        s.toggle(4);
        s.shift_inserted(2, 2);
        assert_eq!(s.selected().collect::<Vec<_>>(), vec![1, 6]);
        s.shift_removed(0, 2);
        assert_eq!(s.selected().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn progress_clamps() {
        assert_eq!(AnimationProgress::new(2.0).value(), 1.0);
        assert_eq!(AnimationProgress::new(-1.0).value(), 0.0);
        assert_eq!(AnimationProgress::new(0.5).scale(10.0, 20.0), 15.0);
    }
}
