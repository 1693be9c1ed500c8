// File: crates/series-core/src/axis.rs
// Summary: Axis settings and value<->pixel transforms (linear and log10) plus the 2D plot frame.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::types::DoubleRange;

/// Maps values along one axis to pixel positions and back.
pub trait CoordinateTransform {
    fn value_to_point(&self, value: f64) -> f64;
    fn point_to_value(&self, px: f64) -> f64;
    /// Value range currently mapped onto the pixel span.
    fn visible_range(&self) -> DoubleRange;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleKind {
    #[default]
    Linear,
    Log10,
}

/// Linear mapping of `range` onto `[start_px, end_px]`. For a vertical axis `start_px` is the bottom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearAxis {
    pub range: DoubleRange,
    pub start_px: f64,
    pub end_px: f64,
}

impl LinearAxis {
    pub fn new(range: DoubleRange, start_px: f64, end_px: f64) -> Self {
        let mut range = range;
        if (range.end - range.start).abs() < 1e-12 { range.end = range.start + 1.0; }
        Self { range, start_px, end_px }
    }
}

impl CoordinateTransform for LinearAxis {
    #[inline]
    fn value_to_point(&self, value: f64) -> f64 {
        let span = self.range.delta();
        self.start_px + (value - self.range.start) / span * (self.end_px - self.start_px)
    }
    #[inline]
    fn point_to_value(&self, px: f64) -> f64 {
        let span_px = self.end_px - self.start_px;
        if span_px == 0.0 { return self.range.start; }
        self.range.start + (px - self.start_px) / span_px * self.range.delta()
    }
    fn visible_range(&self) -> DoubleRange { self.range }
}

/// Base-10 logarithmic mapping; non-positive values clamp to a tiny epsilon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogAxis {
    pub range: DoubleRange,
    pub start_px: f64,
    pub end_px: f64,
    log_min: f64,
    log_max: f64,
}

const LOG_EPS: f64 = 1e-12;

impl LogAxis {
    pub fn new(range: DoubleRange, start_px: f64, end_px: f64) -> Self {
        // Ensure strictly positive range for log scale
        let vmin = if range.start <= LOG_EPS { LOG_EPS } else { range.start };
        let vmax = if range.end <= vmin { vmin * 10.0 } else { range.end };
        Self { range: DoubleRange::new(vmin, vmax), start_px, end_px, log_min: vmin.log10(), log_max: vmax.log10() }
    }
}

impl CoordinateTransform for LogAxis {
    #[inline]
    fn value_to_point(&self, value: f64) -> f64 {
        let v = value.max(LOG_EPS).log10();
        let span = (self.log_max - self.log_min).max(LOG_EPS);
        self.start_px + (v - self.log_min) / span * (self.end_px - self.start_px)
    }
    #[inline]
    fn point_to_value(&self, px: f64) -> f64 {
        let span_px = self.end_px - self.start_px;
        if span_px == 0.0 { return self.range.start; }
        let span = (self.log_max - self.log_min).max(LOG_EPS);
        10f64.powf(self.log_min + (px - self.start_px) / span_px * span)
    }
    fn visible_range(&self) -> DoubleRange { self.range }
}

/// Either axis kind, chosen from settings at layout time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisTransform {
    Linear(LinearAxis),
    Log(LogAxis),
}

impl CoordinateTransform for AxisTransform {
    fn value_to_point(&self, value: f64) -> f64 {
        match self {
            AxisTransform::Linear(a) => a.value_to_point(value),
            AxisTransform::Log(a) => a.value_to_point(value),
        }
    }
    fn point_to_value(&self, px: f64) -> f64 {
        match self {
            AxisTransform::Linear(a) => a.point_to_value(px),
            AxisTransform::Log(a) => a.point_to_value(px),
        }
    }
    fn visible_range(&self) -> DoubleRange {
        match self {
            AxisTransform::Linear(a) => a.visible_range(),
            AxisTransform::Log(a) => a.visible_range(),
        }
    }
}

/// Axis configuration. Missing bounds come from the data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSettings {
    pub title: String,
    pub kind: ScaleKind,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    /// Fraction of the data span added on both sides of an auto range.
    pub padding: f64,
}

impl AxisSettings {
    pub fn new(title: impl Into<String>) -> Self { Self { title: title.into(), ..Self::default() } }

    pub fn with_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn log10(mut self) -> Self {
        self.kind = ScaleKind::Log10;
        self
    }

    /// Effective range: explicit bounds win over the padded data range.
    pub fn resolve_range(&self, data: DoubleRange) -> DoubleRange {
        let mut auto = if data.is_empty() { DoubleRange::new(0.0, 1.0) } else { data };
        if auto.delta() == 0.0 {
            auto = DoubleRange::new(auto.start - 1.0, auto.end + 1.0);
        }
        let pad = auto.delta() * self.padding.max(0.0);
        let start = self.minimum.unwrap_or(auto.start - pad);
        let end = self.maximum.unwrap_or(auto.end + pad);
        DoubleRange::new(start, end)
    }

    pub fn build(&self, data: DoubleRange, start_px: f64, end_px: f64) -> AxisTransform {
        let range = self.resolve_range(data);
        match self.kind {
            ScaleKind::Linear => AxisTransform::Linear(LinearAxis::new(range, start_px, end_px)),
            ScaleKind::Log10 => AxisTransform::Log(LogAxis::new(range, start_px, end_px)),
        }
    }
}

/// Plot rectangle plus one transform per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotFrame {
    pub plot: Rect,
    pub x: AxisTransform,
    pub y: AxisTransform,
}

impl PlotFrame {
    /// Frame mapping `x_range`/`y_range` onto `plot` (y grows upward in value space).
    pub fn linear(plot: Rect, x_range: DoubleRange, y_range: DoubleRange) -> Self {
        Self {
            plot,
            x: AxisTransform::Linear(LinearAxis::new(x_range, plot.left, plot.right)),
            y: AxisTransform::Linear(LinearAxis::new(y_range, plot.bottom, plot.top)),
        }
    }

    #[inline]
    pub fn to_point(&self, x: f64, y: f64) -> Point { Point::new(self.x.value_to_point(x), self.y.value_to_point(y)) }

    pub fn to_value(&self, p: Point) -> (f64, f64) { (self.x.point_to_value(p.x), self.y.point_to_value(p.y)) }

    /// Pixel rectangle of a value-space box.
    pub fn to_rect(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> Rect {
        Rect::from_points(self.to_point(x1, y1), self.to_point(x2, y2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_round_trips_pixels() {
        let a = LinearAxis::new(DoubleRange::new(0.0, 10.0), 100.0, 0.0);
        assert_eq!(a.value_to_point(0.0), 100.0);
        assert_eq!(a.value_to_point(10.0), 0.0);
        assert!((a.point_to_value(25.0) - 7.5).abs() < 1e-12);
    }

    #[test]
    fn degenerate_linear_range_is_widened() {
        let a = LinearAxis::new(DoubleRange::new(3.0, 3.0), 0.0, 10.0);
        assert_eq!(a.visible_range(), DoubleRange::new(3.0, 4.0));
    }

    #[test]
    fn log_axis_spaces_decades_evenly() {
        let a = LogAxis::new(DoubleRange::new(1.0, 1000.0), 0.0, 300.0);
        assert!((a.value_to_point(10.0) - 100.0).abs() < 1e-9);
        assert!((a.value_to_point(100.0) - 200.0).abs() < 1e-9);
        assert!((a.point_to_value(200.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn log_axis_clamps_non_positive_minimum() {
        let a = LogAxis::new(DoubleRange::new(-5.0, 100.0), 0.0, 1.0);
        assert!(a.visible_range().start > 0.0);
    }

    #[test]
    fn explicit_bounds_override_auto_range() {
        let s = AxisSettings { minimum: Some(0.0), padding: 0.1, ..AxisSettings::default() };
        let r = s.resolve_range(DoubleRange::new(10.0, 20.0));
        assert_eq!(r.start, 0.0);
        assert!((r.end - 21.0).abs() < 1e-12);
        assert_eq!(AxisSettings::default().resolve_range(DoubleRange::empty()), DoubleRange::new(0.0, 1.0));
    }
}
