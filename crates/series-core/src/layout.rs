// File: crates/series-core/src/layout.rs
// Summary: Categorical layout math: side-by-side slot offsets and waterfall running sums.

use serde::{Deserialize, Serialize};

use crate::types::DoubleRange;

/// One series' request for room inside a shared category slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotRequest {
    /// Fraction of the slot the group of series may occupy, in [0, 1].
    pub width: f64,
    /// Fraction of each series' share left empty, in [0, 1].
    pub spacing: f64,
    /// Visible and side-by-side capable.
    pub participates: bool,
}

/// Offset (in X units, relative to the category center) of a lone series.
pub fn centered_range(slot_width: f64, width: f64) -> DoubleRange {
    let w = slot_width * width.clamp(0.0, 1.0);
    DoubleRange::new(-w / 2.0, w / 2.0)
}

/// Offset of the series at `position` among `count` series sharing a slot.
pub fn side_by_side_range(slot_width: f64, position: usize, count: usize, width: f64, spacing: f64) -> DoubleRange {
    if count == 0 {
        return centered_range(slot_width, width);
    }
    let total = slot_width * width.clamp(0.0, 1.0);
    let div = total / count as f64;
    let start = -total / 2.0 + div * position as f64;
    let gap = div * spacing.clamp(0.0, 1.0) / 2.0;
    DoubleRange::new(start + gap, start + div - gap)
}

/// Offsets for every request, in order. Non-participating entries get a centered range
/// and do not consume a position.
pub fn side_by_side_ranges(slot_width: f64, requests: &[SlotRequest], enabled: bool) -> Vec<DoubleRange> {
    let count = requests.iter().filter(|r| r.participates).count();
    let mut position = 0;
    requests
        .iter()
        .map(|r| {
            if !r.participates || !enabled {
                return side_by_side_range(slot_width, 0, 1, r.width, r.spacing);
            }
            let range = side_by_side_range(slot_width, position, count, r.width, r.spacing);
            position += 1;
            range
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterfallKind {
    Positive,
    Negative,
    Sum,
}

/// Vertical extent of one waterfall bar. `y1` is where the bar ends, `y2` where it starts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaterfallBounds {
    pub y1: f64,
    pub y2: f64,
    pub kind: WaterfallKind,
    /// Running value after this row; the next bar starts here.
    pub sum: f64,
}

/// Derive bar bounds left to right; each row depends on the one before it.
pub fn waterfall_bounds(values: &[f64], summary: &[bool], bottom: f64, allow_auto_sum: bool) -> Vec<WaterfallBounds> {
    let mut out: Vec<WaterfallBounds> = Vec::with_capacity(values.len());
    let mut running = 0.0;
    for (i, &v) in values.iter().enumerate() {
        let is_summary = summary.get(i).copied().unwrap_or(false);
        let bounds = if is_summary {
            let shown = if allow_auto_sum {
                running
            } else if v.is_nan() {
                running
            } else {
                v
            };
            running = shown;
            WaterfallBounds { y1: shown, y2: bottom, kind: WaterfallKind::Sum, sum: running }
        } else if out.is_empty() {
            if v.is_nan() {
                WaterfallBounds { y1: bottom, y2: bottom, kind: WaterfallKind::Positive, sum: running }
            } else {
                running = v;
                WaterfallBounds { y1: v, y2: bottom, kind: kind_of(v), sum: running }
            }
        } else if v.is_nan() {
            WaterfallBounds { y1: running, y2: running, kind: WaterfallKind::Positive, sum: running }
        } else {
            let start = running;
            running += v;
            WaterfallBounds { y1: running, y2: start, kind: kind_of(v), sum: running }
        };
        out.push(bounds);
    }
    out
}

fn kind_of(v: f64) -> WaterfallKind {
    if v < 0.0 { WaterfallKind::Negative } else { WaterfallKind::Positive }
}
