// File: crates/series-core/src/draw.rs
// Summary: Segment -> canvas primitive emission, with animation progress applied at draw time.

use crate::axis::PlotFrame;
use crate::canvas::{Canvas, DrawRole, DrawStyle, PathData, CHART_LAYER};
use crate::geometry::{Point, Rect};
use crate::labels::LabelPlacement;
use crate::radial::angle_to_point;
use crate::segment::Segment;
use crate::state::AnimationProgress;

const MARKER_RADIUS: f64 = 4.0;
const CAP_HALF_WIDTH: f64 = 4.0;

fn marker(center: Point, radius: f64) -> PathData {
    let mut path = PathData::new();
    path.move_to(Point::new(center.x + radius, center.y)).arc_to(center, radius, 0.0, 360.0).close();
    path
}

pub fn draw_segment(canvas: &mut dyn Canvas, segment: &Segment, frame: &PlotFrame, style: DrawStyle, progress: AnimationProgress) {
    match segment {
        Segment::Column { left, right, top, bottom, .. } => {
            if !top.is_finite() || !left.is_finite() {
                return;
            }
            let top = progress.scale(*bottom, *top);
            canvas.fill_rect(frame.to_rect(*left, top, *right, *bottom), style);
        }
        Segment::Scatter { x, y, .. } => {
            let p = frame.to_point(*x, *y);
            if p.is_finite() {
                canvas.fill_path(&marker(p, MARKER_RADIUS), style);
            }
        }
        Segment::Line { points, .. } => {
            let px: Vec<Point> = points.iter().map(|p| frame.to_point(p.x, p.y)).collect();
            if px.len() > 1 {
                canvas.stroke_path(&PathData::polyline(&px), style);
            }
        }
        Segment::Area { points, baseline, .. } => {
            let (Some(first), Some(last)) = (points.first(), points.last()) else { return };
            let mut path = PathData::new();
            path.move_to(frame.to_point(first.x, *baseline));
            for p in points {
                path.line_to(frame.to_point(p.x, progress.scale(*baseline, p.y)));
            }
            path.line_to(frame.to_point(last.x, *baseline)).close();
            canvas.fill_path(&path, style);
        }
        Segment::Spline { curves, .. } => {
            let Some(first) = curves.first() else { return };
            let mut path = PathData::new();
            path.move_to(frame.to_point(first.start.x, first.start.y));
            for c in curves {
                path.cubic_to(
                    frame.to_point(c.control1.x, c.control1.y),
                    frame.to_point(c.control2.x, c.control2.y),
                    frame.to_point(c.end.x, c.end.y),
                );
            }
            canvas.stroke_path(&path, style);
        }
        Segment::Box { left, right, stats, show_mean, .. } => {
            let s = |v: f64| progress.scale(stats.median, v);
            let center = (left + right) / 2.0;
            let body = frame.to_rect(*left, s(stats.lower_quartile), *right, s(stats.upper_quartile));
            canvas.fill_rect(body, style);
            let whisker = style.role(DrawRole::Whisker);
            let cap = |canvas: &mut dyn Canvas, v: f64| {
                let p = frame.to_point(center, v);
                canvas.draw_line(Point::new(p.x - CAP_HALF_WIDTH, p.y), Point::new(p.x + CAP_HALF_WIDTH, p.y), whisker);
            };
            canvas.draw_line(frame.to_point(center, s(stats.upper_quartile)), frame.to_point(center, s(stats.maximum)), whisker);
            canvas.draw_line(frame.to_point(center, s(stats.lower_quartile)), frame.to_point(center, s(stats.minimum)), whisker);
            cap(&mut *canvas, s(stats.maximum));
            cap(&mut *canvas, s(stats.minimum));
            canvas.draw_line(frame.to_point(*left, stats.median), frame.to_point(*right, stats.median), style.role(DrawRole::Median));
            if *show_mean && stats.mean.is_finite() {
                let m = frame.to_point(center, s(stats.mean));
                let d = CAP_HALF_WIDTH / 2.0;
                let mean = style.role(DrawRole::Mean);
                canvas.draw_line(Point::new(m.x - d, m.y - d), Point::new(m.x + d, m.y + d), mean);
                canvas.draw_line(Point::new(m.x - d, m.y + d), Point::new(m.x + d, m.y - d), mean);
            }
            for o in &stats.outliers {
                canvas.fill_path(&marker(frame.to_point(center, s(*o)), MARKER_RADIUS / 2.0), style.role(DrawRole::Outlier));
            }
        }
        Segment::Waterfall { left, right, bounds, .. } => {
            if !left.is_finite() {
                return;
            }
            let y1 = progress.scale(bounds.y2, bounds.y1);
            canvas.fill_rect(frame.to_rect(*left, y1, *right, bounds.y2), style);
        }
        Segment::ErrorBar { x, y, horizontal, vertical, .. } => {
            let bar = style.role(DrawRole::ErrorBar);
            if let Some(v) = vertical {
                let a = frame.to_point(*x, progress.scale(*y, v.start));
                let b = frame.to_point(*x, progress.scale(*y, v.end));
                canvas.draw_line(a, b, bar);
                for p in [a, b] {
                    canvas.draw_line(Point::new(p.x - CAP_HALF_WIDTH, p.y), Point::new(p.x + CAP_HALF_WIDTH, p.y), bar);
                }
            }
            if let Some(h) = horizontal {
                let a = frame.to_point(progress.scale(*x, h.start), *y);
                let b = frame.to_point(progress.scale(*x, h.end), *y);
                canvas.draw_line(a, b, bar);
                for p in [a, b] {
                    canvas.draw_line(Point::new(p.x, p.y - CAP_HALF_WIDTH), Point::new(p.x, p.y + CAP_HALF_WIDTH), bar);
                }
            }
        }
        Segment::Wedge { center, inner_radius, outer_radius, start_angle, sweep, .. } => {
            let sweep = sweep * progress.value();
            if sweep == 0.0 {
                return;
            }
            let mut path = PathData::new();
            if *inner_radius > 0.0 {
                path.move_to(angle_to_point(*center, *outer_radius, *start_angle))
                    .arc_to(*center, *outer_radius, *start_angle, sweep)
                    .line_to(angle_to_point(*center, *inner_radius, start_angle + sweep))
                    .arc_to(*center, *inner_radius, start_angle + sweep, -sweep)
                    .close();
            } else {
                path.move_to(*center).arc_to(*center, *outer_radius, *start_angle, sweep).close();
            }
            canvas.fill_path(&path, style);
        }
        Segment::Polar { center, points, closed, filled, .. } => {
            let scaled: Vec<Point> = points
                .iter()
                .map(|p| Point::new(progress.scale(center.x, p.x), progress.scale(center.y, p.y)))
                .collect();
            let mut path = PathData::polyline(&scaled);
            if path.is_empty() {
                return;
            }
            if *closed {
                path.close();
            }
            if *filled {
                canvas.fill_path(&path, style);
            } else {
                canvas.stroke_path(&path, style);
            }
        }
    }
}

/// Connectors and text of resolved circular labels. Labels appear once the animation finishes.
pub fn draw_circular_labels(canvas: &mut dyn Canvas, labels: &[LabelPlacement], style: DrawStyle, progress: AnimationProgress) {
    if progress.value() < 1.0 {
        return;
    }
    for label in labels.iter().filter(|l| l.visible) {
        let [p0, p1, p2] = label.connector;
        if p0 != p2 {
            canvas.stroke_path(&PathData::polyline(&[p0, p1, p2]), style.at(label.index).role(DrawRole::Connector));
        }
        canvas.draw_text(&label.text, label.rect, style.at(label.index).role(DrawRole::Label));
    }
}

/// Grid lines across `plot` at the given pixel positions.
pub fn draw_grid(canvas: &mut dyn Canvas, plot: Rect, xs: &[f64], ys: &[f64]) {
    let grid = DrawStyle::body(CHART_LAYER).role(DrawRole::Grid);
    for &x in xs {
        canvas.draw_line(Point::new(x, plot.top), Point::new(x, plot.bottom), grid);
    }
    for &y in ys {
        canvas.draw_line(Point::new(plot.left, y), Point::new(plot.right, y), grid);
    }
}

/// X and Y axis lines along the bottom and left plot edges.
pub fn draw_axes(canvas: &mut dyn Canvas, plot: Rect) {
    let axis = DrawStyle::body(CHART_LAYER).role(DrawRole::Axis);
    canvas.draw_line(Point::new(plot.left, plot.bottom), Point::new(plot.right, plot.bottom), axis);
    canvas.draw_line(Point::new(plot.left, plot.top), Point::new(plot.left, plot.bottom), axis);
}
