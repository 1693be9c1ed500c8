// File: crates/series-core/src/segment.rs
// Summary: Segment descriptors, the per-series segment arena, and dirty index range tracking.
// Notes:
// - Cartesian segments are in value space and are mapped through a PlotFrame when drawn.
// - Wedge and polar segments are already in pixel space (they depend on the plot rectangle).

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::axis::PlotFrame;
use crate::geometry::{normalize_degrees, Point, Rect};
use crate::layout::WaterfallBounds;
use crate::spline::BezierSegment;
use crate::stats::BoxStatistics;
use crate::types::DoubleRange;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Column { index: usize, left: f64, right: f64, top: f64, bottom: f64 },
    Scatter { index: usize, x: f64, y: f64 },
    /// One NaN-free run of a line series.
    Line { start_index: usize, points: Vec<Point> },
    Area { start_index: usize, points: Vec<Point>, baseline: f64 },
    Spline { start_index: usize, curves: Vec<BezierSegment> },
    Box { index: usize, left: f64, right: f64, stats: BoxStatistics, show_mean: bool },
    Waterfall { index: usize, left: f64, right: f64, bounds: WaterfallBounds },
    ErrorBar { index: usize, x: f64, y: f64, horizontal: Option<DoubleRange>, vertical: Option<DoubleRange> },
    Wedge { index: usize, center: Point, inner_radius: f64, outer_radius: f64, start_angle: f64, sweep: f64 },
    Polar { start_index: usize, center: Point, points: Vec<Point>, closed: bool, filled: bool },
}

impl Segment {
    /// Data rows this segment was derived from.
    pub fn data_indices(&self) -> Range<usize> {
        match self {
            Segment::Column { index, .. }
            | Segment::Scatter { index, .. }
            | Segment::Box { index, .. }
            | Segment::Waterfall { index, .. }
            | Segment::ErrorBar { index, .. }
            | Segment::Wedge { index, .. } => *index..*index + 1,
            Segment::Line { start_index, points } | Segment::Area { start_index, points, .. } => {
                *start_index..*start_index + points.len()
            }
            Segment::Polar { start_index, points, .. } => *start_index..*start_index + points.len(),
            Segment::Spline { start_index, curves } => *start_index..*start_index + curves.len() + 1,
        }
    }

    pub fn first_index(&self) -> usize { self.data_indices().start }

    /// Pixel rectangle for rect-like segments.
    pub fn pixel_rect(&self, frame: &PlotFrame) -> Option<Rect> {
        match self {
            Segment::Column { left, right, top, bottom, .. } => Some(frame.to_rect(*left, *top, *right, *bottom)),
            Segment::Box { left, right, stats, .. } => {
                Some(frame.to_rect(*left, stats.minimum, *right, stats.maximum))
            }
            Segment::Waterfall { left, right, bounds, .. } => Some(frame.to_rect(*left, bounds.y1, *right, bounds.y2)),
            _ => None,
        }
    }

    /// Pixel positions of the data points this segment passes through.
    pub fn pixel_points(&self, frame: &PlotFrame) -> Vec<(usize, Point)> {
        match self {
            Segment::Scatter { index, x, y } | Segment::ErrorBar { index, x, y, .. } => {
                vec![(*index, frame.to_point(*x, *y))]
            }
            Segment::Line { start_index, points } | Segment::Area { start_index, points, .. } => points
                .iter()
                .enumerate()
                .map(|(i, p)| (start_index + i, frame.to_point(p.x, p.y)))
                .collect(),
            Segment::Spline { curves, .. } => {
                let mut out: Vec<(usize, Point)> =
                    curves.iter().map(|c| (c.index, frame.to_point(c.start.x, c.start.y))).collect();
                if let Some(last) = curves.last() {
                    out.push((last.index + 1, frame.to_point(last.end.x, last.end.y)));
                }
                out
            }
            Segment::Polar { start_index, points, .. } => {
                points.iter().enumerate().map(|(i, p)| (start_index + i, *p)).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Data index under `p`, with its distance (0 when inside a shape).
    pub fn hit(&self, frame: &PlotFrame, p: Point, tolerance: f64) -> Option<(usize, f64)> {
        if let Some(rect) = self.pixel_rect(frame) {
            return rect.contains(p).then(|| (self.first_index(), 0.0));
        }
        if let Segment::Wedge { index, center, inner_radius, outer_radius, start_angle, sweep } = self {
            let d = center.distance_to(p);
            if d < *inner_radius || d > *outer_radius || *sweep == 0.0 {
                return None;
            }
            let angle = (p.y - center.y).atan2(p.x - center.x).to_degrees();
            let (lo, sw) = if *sweep >= 0.0 { (*start_angle, *sweep) } else { (start_angle + sweep, -sweep) };
            let rel = normalize_degrees(angle - lo);
            return (rel <= sw).then_some((*index, 0.0));
        }
        self.pixel_points(frame)
            .into_iter()
            .map(|(i, q)| (i, q.distance_to(p)))
            .filter(|(_, d)| *d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Segments of one series, addressed by stable index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentArena {
    segments: Vec<Segment>,
}

impl SegmentArena {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.segments.len() }

    pub fn is_empty(&self) -> bool { self.segments.is_empty() }

    pub fn get(&self, index: usize) -> Option<&Segment> { self.segments.get(index) }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> { self.segments.iter() }

    pub fn as_slice(&self) -> &[Segment] { &self.segments }

    /// Update in place, or append when `index == len()`.
    pub fn set(&mut self, index: usize, segment: Segment) {
        debug_assert!(index <= self.segments.len(), "segment index {index} skips past the arena end");
        match self.segments.get_mut(index) {
            Some(slot) => *slot = segment,
            None => self.segments.push(segment),
        }
    }

    pub fn truncate(&mut self, len: usize) { self.segments.truncate(len); }

    pub fn replace_all(&mut self, segments: Vec<Segment>) { self.segments = segments; }

    pub fn clear(&mut self) { self.segments.clear(); }
}

/// Sorted, non-overlapping dirty index ranges (end exclusive). Adjacent ranges merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtyRanges {
    ranges: Vec<Range<usize>>,
}

impl DirtyRanges {
    pub fn new() -> Self { Self { ranges: Vec::new() } }

    pub fn mark_dirty(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let new_range = start..end;
        let mut insert_idx = self.ranges.len();
        let mut merge: Option<(usize, usize)> = None;

        for (i, range) in self.ranges.iter().enumerate() {
            if overlap_or_adjacent(&new_range, range) {
                merge = Some(match merge {
                    Some((first, _)) => (first, i),
                    None => (i, i),
                });
            } else if range.start > end {
                if merge.is_none() {
                    insert_idx = i;
                }
                break;
            }
        }

        match merge {
            Some((first, last)) => {
                let merged_start = self.ranges[first].start.min(start);
                let merged_end = self.ranges[last].end.max(end);
                self.ranges.drain(first..=last);
                self.ranges.insert(first, merged_start..merged_end);
            }
            None => self.ranges.insert(insert_idx, new_range),
        }
    }

    pub fn clear(&mut self) { self.ranges.clear(); }

    pub fn is_empty(&self) -> bool { self.ranges.is_empty() }

    pub fn len(&self) -> usize { self.ranges.len() }

    pub fn iter(&self) -> impl Iterator<Item = &Range<usize>> { self.ranges.iter() }

    pub fn total_dirty_count(&self) -> usize { self.ranges.iter().map(|r| r.end - r.start).sum() }
}

fn overlap_or_adjacent(a: &Range<usize>, b: &Range<usize>) -> bool {
    (a.start < b.end && b.start < a.end) || a.end == b.start || b.end == a.start
}
