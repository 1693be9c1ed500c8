// File: crates/series-core/src/polar.rs
// Summary: Polar layout: X maps to angle around the plot center, Y to distance from it.

use crate::axis::PlotFrame;
use crate::config::{PolarDrawType, PolarSettings};
use crate::geometry::Point;
use crate::radial::angle_to_point;
use crate::segment::Segment;
use crate::series::{LayoutContext, SeriesLayout};
use crate::spline::finite_runs;
use crate::store::SeriesDataStore;
use crate::types::DoubleRange;

#[derive(Clone, Debug, Default)]
pub struct PolarLayout {
    pub settings: PolarSettings,
}

impl PolarLayout {
    /// Angle span covered by X. One extra step keeps the last point off the first.
    fn x_span(store: &SeriesDataStore) -> (f64, f64) {
        let r = store.x_range();
        if r.is_empty() {
            return (0.0, 1.0);
        }
        let step = store.min_x_delta().unwrap_or(1.0);
        (r.start, r.delta() + step)
    }

    /// Radius domain: always includes zero so values read as distances.
    fn y_domain(store: &SeriesDataStore) -> DoubleRange {
        let mut r = store.y_range(0);
        if r.is_empty() {
            return DoubleRange::new(0.0, 1.0);
        }
        r.include(0.0);
        if r.delta() == 0.0 {
            r.end = r.start + 1.0;
        }
        r
    }
}

impl SeriesLayout for PolarLayout {
    fn generate_segments(&self, store: &SeriesDataStore, ctx: &LayoutContext<'_>) -> Vec<Segment> {
        let center = ctx.plot.center();
        let radius = ctx.plot.width().min(ctx.plot.height()).max(0.0) / 2.0 * self.settings.radius_factor.clamp(0.0, 1.0);
        let (x_start, x_span) = Self::x_span(store);
        let y = Self::y_domain(store);
        let xs = store.x_values();
        let ys = store.y_values(0);
        let runs = finite_runs(xs, ys);
        let whole = runs.len() == 1 && runs[0] == (0..store.len());
        let filled = self.settings.draw_type == PolarDrawType::Area;
        runs.into_iter()
            .map(|run| {
                let points = run
                    .clone()
                    .map(|i| {
                        let angle = self.settings.start_angle + (xs[i] - x_start) / x_span * 360.0;
                        let r = (ys[i] - y.start) / y.delta() * radius;
                        angle_to_point(center, r, angle)
                    })
                    .collect();
                Segment::Polar { start_index: run.start, center, points, closed: whole && self.settings.closed, filled }
            })
            .collect()
    }

    fn x_range(&self, _store: &SeriesDataStore) -> DoubleRange { DoubleRange::empty() }

    fn y_range(&self, _store: &SeriesDataStore, _origin: f64) -> DoubleRange { DoubleRange::empty() }

    fn tooltip_anchor(&self, segment: &Segment, index: usize, frame: &PlotFrame) -> Option<Point> {
        segment.pixel_points(frame).into_iter().find(|(i, _)| *i == index).map(|(_, p)| p)
    }
}
