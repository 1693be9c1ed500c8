// File: crates/series-core/src/spline.rs
// Summary: Spline coefficient computation (natural, clamped, cardinal, monotonic) and Bezier conversion.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplineType {
    #[default]
    Natural,
    Monotonic,
    Cardinal,
    Clamped,
}

/// One cubic Bezier piece between two consecutive data points (value space).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BezierSegment {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
    /// Data index of `start`.
    pub index: usize,
}

impl BezierSegment {
    /// Evaluate the curve at `t` in [0, 1].
    pub fn point_at(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Point::new(
            a * self.start.x + b * self.control1.x + c * self.control2.x + d * self.end.x,
            a * self.start.y + b * self.control1.y + c * self.control2.y + d * self.end.y,
        )
    }
}

fn finite_or_zero(v: f64) -> f64 { if v.is_finite() { v } else { 0.0 } }

/// Second-derivative coefficients by the tridiagonal sweep.
/// `clamped` pins the end derivatives to the first/last secant slopes.
pub fn natural_coefficients(xs: &[f64], ys: &[f64], clamped: bool) -> Vec<f64> {
    let n = xs.len().min(ys.len());
    let mut y2 = vec![0.0; n];
    if n < 2 {
        return y2;
    }
    let mut u = vec![0.0; n];
    if clamped {
        let dx = xs[1] - xs[0];
        let yp1 = finite_or_zero((ys[1] - ys[0]) / dx);
        y2[0] = -0.5;
        u[0] = finite_or_zero((3.0 / dx) * ((ys[1] - ys[0]) / dx - yp1));
    }
    for i in 1..n - 1 {
        let d1 = xs[i] - xs[i - 1];
        let d2 = xs[i + 1] - xs[i - 1];
        let d3 = xs[i + 1] - xs[i];
        if d1 == 0.0 || d3 == 0.0 || d2 == 0.0 {
            y2[i] = 0.0;
            u[i] = 0.0;
            continue;
        }
        let sig = d1 / d2;
        let p = sig * y2[i - 1] + 2.0;
        y2[i] = (sig - 1.0) / p;
        let slope_diff = (ys[i + 1] - ys[i]) / d3 - (ys[i] - ys[i - 1]) / d1;
        u[i] = (6.0 * slope_diff / d2 - sig * u[i - 1]) / p;
    }
    if clamped {
        let dx = xs[n - 1] - xs[n - 2];
        let ypn = finite_or_zero((ys[n - 1] - ys[n - 2]) / dx);
        let qn = 0.5;
        let un = finite_or_zero((3.0 / dx) * (ypn - (ys[n - 1] - ys[n - 2]) / dx));
        y2[n - 1] = finite_or_zero((un - qn * u[n - 2]) / (qn * y2[n - 2] + 1.0));
    } else {
        y2[n - 1] = 0.0;
    }
    for k in (0..n - 1).rev() {
        y2[k] = finite_or_zero(y2[k] * y2[k + 1] + u[k]);
    }
    y2
}

/// Horizontal tangents for the cardinal spline.
pub fn cardinal_coefficients(xs: &[f64]) -> Vec<f64> {
    let n = xs.len();
    (0..n)
        .map(|i| {
            let t = if i == 0 && n > 2 {
                0.5 * (xs[i + 2] - xs[i])
            } else if i == n - 1 && n >= 3 {
                0.5 * (xs[n - 1] - xs[n - 3])
            } else if i >= 1 && i + 1 < n {
                0.5 * (xs[i + 1] - xs[i - 1])
            } else {
                f64::NAN
            };
            if t.is_nan() { 0.0 } else { t }
        })
        .collect()
}

/// Per-point derivatives that never overshoot between monotone neighbours.
pub fn monotonic_coefficients(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return vec![0.0; n];
    }
    let dx: Vec<f64> = (0..n - 1).map(|i| xs[i + 1] - xs[i]).collect();
    let slope: Vec<f64> = (0..n - 1)
        .map(|i| {
            let s = (ys[i + 1] - ys[i]) / dx[i];
            if s.is_infinite() { 0.0 } else { s }
        })
        .collect();
    let mut out = Vec::with_capacity(n);
    out.push(if slope[0].is_nan() { 0.0 } else { slope[0] });
    for i in 0..dx.len() - 1 {
        let m = slope[i];
        let next = slope[i + 1];
        if !(m * next > 0.0) || dx[i] == 0.0 {
            out.push(0.0);
            continue;
        }
        let first = dx[i];
        let second = dx[i + 1];
        let inter = first + second;
        out.push(3.0 * inter / ((inter + second) / m + (inter + first) / next));
    }
    let last = slope[slope.len() - 1];
    out.push(if last.is_nan() { 0.0 } else { last });
    out
}

/// Coefficients for the requested mode.
pub fn coefficients(xs: &[f64], ys: &[f64], spline_type: SplineType) -> Vec<f64> {
    match spline_type {
        SplineType::Natural => natural_coefficients(xs, ys, false),
        SplineType::Clamped => natural_coefficients(xs, ys, true),
        SplineType::Cardinal => cardinal_coefficients(xs),
        SplineType::Monotonic => monotonic_coefficients(xs, ys),
    }
}

/// Control points from second derivatives by the one-third-interval rule.
pub fn bezier_controls(p1: Point, p2: Point, ys1: f64, ys2: f64) -> (Point, Point) {
    const ONE_THIRD: f64 = 1.0 / 3.0;
    let dx = p2.x - p1.x;
    let dx2 = dx * dx;
    let dx1 = 2.0 * p1.x + p2.x;
    let dxb = p1.x + 2.0 * p2.x;
    let dy1 = 2.0 * p1.y + p2.y;
    let dy2 = p1.y + 2.0 * p2.y;
    let y1 = ONE_THIRD * (dy1 - ONE_THIRD * dx2 * (ys1 + 0.5 * ys2));
    let y2 = ONE_THIRD * (dy2 - ONE_THIRD * dx2 * (0.5 * ys1 + ys2));
    (Point::new(dx1 * ONE_THIRD, y1), Point::new(dxb * ONE_THIRD, y2))
}

/// Cardinal control points: horizontal tangents, one third each way.
pub fn cardinal_controls(p1: Point, p2: Point, t1: f64, t2: f64) -> (Point, Point) {
    (Point::new(p1.x + t1 / 3.0, p1.y), Point::new(p2.x - t2 / 3.0, p2.y))
}

/// Monotonic control points from end derivatives over the interval width `dx`.
pub fn monotonic_controls(p1: Point, p2: Point, dx: f64, d1: f64, d2: f64) -> (Point, Point) {
    let value = dx / 3.0;
    (Point::new(p1.x + value, p1.y + d1 * value), Point::new(p2.x - value, p2.y - d2 * value))
}

/// Bezier pieces for one NaN-free run of points. `offset` is added to each piece's index.
pub fn bezier_run(xs: &[f64], ys: &[f64], spline_type: SplineType, offset: usize) -> Vec<BezierSegment> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return Vec::new();
    }
    let coef = coefficients(&xs[..n], &ys[..n], spline_type);
    (0..n - 1)
        .map(|i| {
            let p1 = Point::new(xs[i], ys[i]);
            let p2 = Point::new(xs[i + 1], ys[i + 1]);
            let (control1, control2) = match spline_type {
                SplineType::Natural | SplineType::Clamped => bezier_controls(p1, p2, coef[i], coef[i + 1]),
                SplineType::Cardinal => cardinal_controls(p1, p2, coef[i], coef[i + 1]),
                SplineType::Monotonic => monotonic_controls(p1, p2, xs[i + 1] - xs[i], coef[i], coef[i + 1]),
            };
            BezierSegment { start: p1, control1, control2, end: p2, index: offset + i }
        })
        .collect()
}

/// Index ranges of consecutive rows where both x and y are numbers.
pub fn finite_runs(xs: &[f64], ys: &[f64]) -> Vec<Range<usize>> {
    let n = xs.len().min(ys.len());
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;
    for i in 0..n {
        let ok = !xs[i].is_nan() && !ys[i].is_nan();
        match (ok, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(s..n);
    }
    runs
}

/// Bezier pieces for a whole column, split at NaN rows.
pub fn bezier_segments(xs: &[f64], ys: &[f64], spline_type: SplineType) -> Vec<BezierSegment> {
    finite_runs(xs, ys)
        .into_iter()
        .flat_map(|r| bezier_run(&xs[r.clone()], &ys[r.clone()], spline_type, r.start))
        .collect()
}
