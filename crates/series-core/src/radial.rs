// File: crates/series-core/src/radial.rs
// Summary: Center/radius resolution for circular and polar layouts; angle-to-point projection.
// Angles are degrees, clockwise from +x in screen space (y grows downward).

use crate::geometry::{degree_to_radian, normalize_degrees, Point, Rect};

/// Nudge applied to full-circle sweeps so arcs never start and end on the same point.
pub const FULL_SWEEP_NUDGE: f64 = 0.0001;

/// 90-degree boundaries a sweep may cross.
const BOUNDARIES: [f64; 12] = [-270.0, -180.0, -90.0, 0.0, 90.0, 180.0, 270.0, 360.0, 450.0, 540.0, 630.0, 720.0];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialLayout {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl RadialLayout {
    pub fn sweep(&self) -> f64 { self.end_angle - self.start_angle }

    pub fn point_at(&self, angle: f64, radius: f64) -> Point { angle_to_point(self.center, radius, angle) }
}

#[inline]
pub fn angle_to_point(center: Point, radius: f64, angle_deg: f64) -> Point {
    let rad = degree_to_radian(angle_deg);
    Point::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
}

/// Clamp a sweep to one turn and nudge an exact full turn.
pub fn normalize_sweep(start: f64, end: f64) -> (f64, f64) {
    let mut sweep = end - start;
    if sweep.abs() > 360.0 {
        sweep = 360.0 * sweep.signum();
    }
    if sweep.abs() == 360.0 {
        sweep -= FULL_SWEEP_NUDGE * sweep.signum();
    }
    (start, start + sweep)
}

/// Boundary angles strictly inside the sweep, reduced to [0, 360).
pub fn crossed_boundaries(start: f64, end: f64) -> Vec<f64> {
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    // whole turns keep the crossings; move `lo` into [0, 360) so the table covers the sweep
    let turns = (lo / 360.0).floor() * 360.0;
    let (lo, hi) = (lo - turns, hi - turns);
    BOUNDARIES
        .iter()
        .copied()
        .filter(|b| *b > lo && *b < hi)
        .map(normalize_degrees)
        .collect()
}

/// Center that balances a partial sweep inside the plot area.
///
/// The wedge's extreme points are the center itself, the start and end points, and the
/// point at every crossed 90-degree boundary. The center moves by the offset between the
/// plot center and the middle of those points' bounding box. Sweeps crossing more than two
/// boundaries already span most of the circle and keep the plot center.
pub fn actual_center(center: Point, radius: f64, start: f64, end: f64) -> Point {
    if (end - start).abs() >= 360.0 - FULL_SWEEP_NUDGE * 2.0 {
        return center;
    }
    let crossed = crossed_boundaries(start, end);
    let extremes: Vec<Point> = match crossed.len() {
        0 => Vec::new(),
        1 => vec![angle_to_point(center, radius, crossed[0])],
        2 => crossed.iter().map(|b| angle_to_point(center, radius, *b)).collect(),
        _ => return center,
    };
    let start_point = angle_to_point(center, radius, start);
    let end_point = angle_to_point(center, radius, end);
    let mut bounds = Rect::from_points(center, start_point);
    for p in extremes.iter().chain(std::iter::once(&end_point)) {
        bounds = Rect::from_ltrb(bounds.left.min(p.x), bounds.top.min(p.y), bounds.right.max(p.x), bounds.bottom.max(p.y));
    }
    let mid = bounds.center();
    let dx = center.x - mid.x;
    let dy = center.y - mid.y;
    Point::new(
        center.x + if dx.abs() >= radius { 0.0 } else { dx },
        center.y + if dy.abs() >= radius { 0.0 } else { dy },
    )
}

/// Resolve center and radius for a circular series inside `plot`.
pub fn resolve(plot: &Rect, radius_factor: f64, start_angle: f64, end_angle: f64) -> RadialLayout {
    let (start_angle, end_angle) = normalize_sweep(start_angle, end_angle);
    let radius = plot.width().min(plot.height()).max(0.0) / 2.0 * radius_factor.clamp(0.0, 1.0);
    let center = actual_center(plot.center(), radius, start_angle, end_angle);
    RadialLayout { center, radius, start_angle, end_angle }
}
