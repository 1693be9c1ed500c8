// File: crates/series-core/src/types.rs
// Summary: Shared types and constants (plot sizes, paddings, value ranges).

use serde::{Deserialize, Serialize};

/// Default plot surface width in pixels.
pub const WIDTH: f64 = 1024.0;
/// Default plot surface height in pixels.
pub const HEIGHT: f64 = 640.0;

/// Screen margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    /// Create new insets (non-negative by type).
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right).
    pub const fn hsum(&self) -> u32 { self.left + self.right }
    /// Total vertical inset (top + bottom).
    pub const fn vsum(&self) -> u32 { self.top + self.bottom }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(72, 24, 24, 56)
    }
}

/// Closed numeric interval. An empty range has `start > end` (both NaN-free).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DoubleRange {
    pub start: f64,
    pub end: f64,
}

impl DoubleRange {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub const fn empty() -> Self {
        Self { start: f64::INFINITY, end: f64::NEG_INFINITY }
    }

    pub fn is_empty(&self) -> bool { !(self.start <= self.end) }

    pub fn delta(&self) -> f64 { self.end - self.start }

    pub fn median(&self) -> f64 { (self.start + self.end) / 2.0 }

    /// Grow the range to include `v`; NaN is ignored.
    pub fn include(&mut self, v: f64) {
        if v.is_nan() { return; }
        self.start = self.start.min(v);
        self.end = self.end.max(v);
    }

    pub fn union(self, other: DoubleRange) -> DoubleRange {
        if other.is_empty() { return self; }
        if self.is_empty() { return other; }
        DoubleRange::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn contains(&self, v: f64) -> bool { v >= self.start && v <= self.end }
}

impl Default for DoubleRange {
    fn default() -> Self { Self::empty() }
}
