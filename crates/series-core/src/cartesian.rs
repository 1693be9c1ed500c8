// File: crates/series-core/src/cartesian.rs
// Summary: Layout strategies for cartesian families (line, scatter, column, area, spline, box, waterfall, error bar).

use tracing::trace;

use crate::config::{BoxPlotSettings, ErrorBarDirection, ErrorBarMode, ErrorBarSettings, ErrorBarType, WaterfallSettings};
use crate::geometry::Point;
use crate::layout::waterfall_bounds;
use crate::segment::Segment;
use crate::series::{LayoutContext, SeriesLayout};
use crate::spline::{bezier_run, finite_runs, SplineType};
use crate::stats::box_statistics;
use crate::store::SeriesDataStore;
use crate::types::DoubleRange;

fn slot(x: f64, ctx: &LayoutContext<'_>) -> (f64, f64) { (x + ctx.side_by_side.start, x + ctx.side_by_side.end) }

fn with_origin(mut r: DoubleRange, origin: f64) -> DoubleRange {
    if !r.is_empty() {
        r.include(origin);
    }
    r
}

fn polyline_runs(store: &SeriesDataStore) -> Vec<(usize, Vec<Point>)> {
    let xs = store.x_values();
    let ys = store.y_values(0);
    finite_runs(xs, ys)
        .into_iter()
        .map(|r| (r.start, r.map(|i| Point::new(xs[i], ys[i])).collect()))
        .collect()
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LineLayout;

impl SeriesLayout for LineLayout {
    fn generate_segments(&self, store: &SeriesDataStore, _ctx: &LayoutContext<'_>) -> Vec<Segment> {
        polyline_runs(store).into_iter().map(|(start_index, points)| Segment::Line { start_index, points }).collect()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AreaLayout;

impl SeriesLayout for AreaLayout {
    fn generate_segments(&self, store: &SeriesDataStore, ctx: &LayoutContext<'_>) -> Vec<Segment> {
        polyline_runs(store)
            .into_iter()
            .map(|(start_index, points)| Segment::Area { start_index, points, baseline: ctx.origin })
            .collect()
    }

    fn y_range(&self, store: &SeriesDataStore, origin: f64) -> DoubleRange { with_origin(store.y_range(0), origin) }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SplineLayout {
    pub spline_type: SplineType,
}

impl SeriesLayout for SplineLayout {
    fn generate_segments(&self, store: &SeriesDataStore, _ctx: &LayoutContext<'_>) -> Vec<Segment> {
        let xs = store.x_values();
        let ys = store.y_values(0);
        finite_runs(xs, ys)
            .into_iter()
            .map(|r| Segment::Spline {
                start_index: r.start,
                curves: bezier_run(&xs[r.clone()], &ys[r.clone()], self.spline_type, r.start),
            })
            .collect()
    }

    /// Control points can overshoot the data; include them so curves stay inside the plot.
    fn y_range(&self, store: &SeriesDataStore, _origin: f64) -> DoubleRange {
        let mut r = store.y_range(0);
        let xs = store.x_values();
        let ys = store.y_values(0);
        for run in finite_runs(xs, ys) {
            for c in bezier_run(&xs[run.clone()], &ys[run.clone()], self.spline_type, run.start) {
                r.include(c.control1.y);
                r.include(c.control2.y);
            }
        }
        r
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ScatterLayout;

impl SeriesLayout for ScatterLayout {
    fn generate_segments(&self, store: &SeriesDataStore, ctx: &LayoutContext<'_>) -> Vec<Segment> {
        (0..store.len()).filter_map(|i| self.generate_segment(store, ctx, i)).collect()
    }

    fn generate_segment(&self, store: &SeriesDataStore, _ctx: &LayoutContext<'_>, index: usize) -> Option<Segment> {
        let x = *store.x_values().get(index)?;
        let y = store.y_values(0).get(index).copied().unwrap_or(f64::NAN);
        Some(Segment::Scatter { index, x, y })
    }

    fn supports_partial(&self) -> bool { true }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ColumnLayout;

impl SeriesLayout for ColumnLayout {
    fn generate_segments(&self, store: &SeriesDataStore, ctx: &LayoutContext<'_>) -> Vec<Segment> {
        (0..store.len()).filter_map(|i| self.generate_segment(store, ctx, i)).collect()
    }

    fn generate_segment(&self, store: &SeriesDataStore, ctx: &LayoutContext<'_>, index: usize) -> Option<Segment> {
        let x = *store.x_values().get(index)?;
        let top = store.y_values(0).get(index).copied().unwrap_or(f64::NAN);
        let (left, right) = slot(x, ctx);
        Some(Segment::Column { index, left, right, top, bottom: ctx.origin })
    }

    fn supports_partial(&self) -> bool { true }

    fn y_range(&self, store: &SeriesDataStore, origin: f64) -> DoubleRange { with_origin(store.y_range(0), origin) }
}

#[derive(Clone, Debug, Default)]
pub struct BoxLayout {
    pub settings: BoxPlotSettings,
}

impl SeriesLayout for BoxLayout {
    fn generate_segments(&self, store: &SeriesDataStore, ctx: &LayoutContext<'_>) -> Vec<Segment> {
        (0..store.len()).filter_map(|i| self.generate_segment(store, ctx, i)).collect()
    }

    fn generate_segment(&self, store: &SeriesDataStore, ctx: &LayoutContext<'_>, index: usize) -> Option<Segment> {
        let x = *store.x_values().get(index)?;
        let samples = store.samples(0).get(index).map(Vec::as_slice).unwrap_or(&[]);
        if !x.is_finite() || samples.iter().all(|v| v.is_nan()) {
            return None;
        }
        let stats = box_statistics(samples, self.settings.mode, self.settings.show_outliers);
        let (left, right) = slot(x, ctx);
        Some(Segment::Box { index, left, right, stats, show_mean: self.settings.show_mean })
    }

    fn supports_partial(&self) -> bool { true }

    fn y_range(&self, store: &SeriesDataStore, _origin: f64) -> DoubleRange {
        let mut r = DoubleRange::empty();
        for samples in store.samples(0) {
            if samples.iter().all(|v| v.is_nan()) {
                continue;
            }
            let (lo, hi) = box_statistics(samples, self.settings.mode, self.settings.show_outliers).extent();
            r.include(lo);
            r.include(hi);
        }
        r
    }
}

#[derive(Clone, Debug, Default)]
pub struct WaterfallLayout {
    pub settings: WaterfallSettings,
}

impl WaterfallLayout {
    fn summary_flags(&self, store: &SeriesDataStore) -> Vec<bool> {
        if self.settings.summary_path.is_none() {
            return Vec::new();
        }
        store.y_values(1).iter().map(|v| !v.is_nan() && *v != 0.0).collect()
    }
}

impl SeriesLayout for WaterfallLayout {
    fn generate_segments(&self, store: &SeriesDataStore, ctx: &LayoutContext<'_>) -> Vec<Segment> {
        let flags = self.summary_flags(store);
        let bounds = waterfall_bounds(store.y_values(0), &flags, ctx.origin, self.settings.allow_auto_sum);
        trace!(rows = bounds.len(), "waterfall bounds computed");
        store
            .x_values()
            .iter()
            .zip(bounds)
            .enumerate()
            .map(|(index, (&x, bounds))| {
                let (left, right) = slot(x, ctx);
                Segment::Waterfall { index, left, right, bounds }
            })
            .collect()
    }

    fn y_range(&self, store: &SeriesDataStore, origin: f64) -> DoubleRange {
        let flags = self.summary_flags(store);
        let mut r = DoubleRange::empty();
        for b in waterfall_bounds(store.y_values(0), &flags, origin, self.settings.allow_auto_sum) {
            r.include(b.y1);
            r.include(b.y2);
        }
        r
    }
}

#[derive(Clone, Debug, Default)]
pub struct ErrorBarLayout {
    pub settings: ErrorBarSettings,
}

/// Population standard deviation of the finite values.
pub fn standard_deviation(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return 0.0;
    }
    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    (finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

fn finite_count(values: &[f64]) -> usize { values.iter().filter(|v| v.is_finite()).count() }

fn finite_mean(values: &[f64]) -> f64 {
    let n = finite_count(values);
    if n == 0 {
        return f64::NAN;
    }
    values.iter().filter(|v| v.is_finite()).sum::<f64>() / n as f64
}

fn standard_error(values: &[f64]) -> f64 {
    let n = finite_count(values);
    if n == 0 { 0.0 } else { standard_deviation(values) / (n as f64).sqrt() }
}

/// Column-wide centers and amounts shared by every bar of a deviation-based series.
#[derive(Clone, Copy, Debug)]
struct ColumnSpread {
    mean_x: f64,
    mean_y: f64,
    horizontal: f64,
    vertical: f64,
}

type Bars = (f64, f64, Option<DoubleRange>, Option<DoubleRange>);

impl ErrorBarLayout {
    fn column_spread(&self, store: &SeriesDataStore) -> Option<ColumnSpread> {
        let s = &self.settings;
        let xs = store.x_values();
        let ys = store.y_values(0);
        let (dx, dy) = match s.kind {
            ErrorBarType::StandardDeviation => (standard_deviation(xs), standard_deviation(ys)),
            ErrorBarType::StandardError => (standard_error(xs), standard_error(ys)),
            ErrorBarType::Fixed | ErrorBarType::Percentage | ErrorBarType::Custom => return None,
        };
        Some(ColumnSpread {
            mean_x: finite_mean(xs),
            mean_y: finite_mean(ys),
            horizontal: dx * s.horizontal_error,
            vertical: dy * s.vertical_error,
        })
    }

    /// Per-row error amount (horizontal, vertical); NaN means none.
    fn amounts(&self, store: &SeriesDataStore, index: usize, x: f64, y: f64) -> (f64, f64) {
        let s = &self.settings;
        match s.kind {
            ErrorBarType::Fixed => (s.horizontal_error, s.vertical_error),
            ErrorBarType::Percentage => (x.abs() * s.horizontal_error / 100.0, y.abs() * s.vertical_error / 100.0),
            ErrorBarType::Custom => (
                store.y_values(1).get(index).copied().unwrap_or(f64::NAN),
                store.y_values(2).get(index).copied().unwrap_or(f64::NAN),
            ),
            // column-wide, see `column_spread`
            ErrorBarType::StandardDeviation | ErrorBarType::StandardError => (f64::NAN, f64::NAN),
        }
    }

    fn extent(&self, center: f64, amount: f64) -> Option<DoubleRange> {
        if !center.is_finite() || !amount.is_finite() {
            return None;
        }
        let e = amount.abs();
        Some(match self.settings.direction {
            ErrorBarDirection::Both => DoubleRange::new(center - e, center + e),
            ErrorBarDirection::Plus => DoubleRange::new(center, center + e),
            ErrorBarDirection::Minus => DoubleRange::new(center - e, center),
        })
    }

    /// Bars for row `index`. Deviation-based bars are centered on the column means,
    /// the others on the row's own point.
    fn bars(&self, store: &SeriesDataStore, index: usize, spread: Option<ColumnSpread>) -> Option<Bars> {
        let x = *store.x_values().get(index)?;
        let y = store.y_values(0).get(index).copied().unwrap_or(f64::NAN);
        if !(x.is_finite() && y.is_finite()) {
            return Some((x, y, None, None));
        }
        let (cx, cy, h, v) = match spread {
            Some(c) => (c.mean_x, c.mean_y, c.horizontal, c.vertical),
            None => {
                let (h, v) = self.amounts(store, index, x, y);
                (x, y, h, v)
            }
        };
        let horizontal = match self.settings.mode {
            ErrorBarMode::Both | ErrorBarMode::Horizontal => self.extent(cx, h),
            ErrorBarMode::Vertical => None,
        };
        let vertical = match self.settings.mode {
            ErrorBarMode::Both | ErrorBarMode::Vertical => self.extent(cy, v),
            ErrorBarMode::Horizontal => None,
        };
        Some((x, y, horizontal, vertical))
    }
}

impl SeriesLayout for ErrorBarLayout {
    fn generate_segments(&self, store: &SeriesDataStore, _ctx: &LayoutContext<'_>) -> Vec<Segment> {
        let spread = self.column_spread(store);
        (0..store.len())
            .filter_map(|index| {
                let (x, y, horizontal, vertical) = self.bars(store, index, spread)?;
                Some(Segment::ErrorBar { index, x, y, horizontal, vertical })
            })
            .collect()
    }

    fn generate_segment(&self, store: &SeriesDataStore, _ctx: &LayoutContext<'_>, index: usize) -> Option<Segment> {
        let (x, y, horizontal, vertical) = self.bars(store, index, self.column_spread(store))?;
        Some(Segment::ErrorBar { index, x, y, horizontal, vertical })
    }

    /// Deviation-based amounts depend on every row.
    fn supports_partial(&self) -> bool {
        matches!(self.settings.kind, ErrorBarType::Fixed | ErrorBarType::Percentage | ErrorBarType::Custom)
    }

    fn x_range(&self, store: &SeriesDataStore) -> DoubleRange {
        let mut r = store.x_range();
        let spread = self.column_spread(store);
        for i in 0..store.len() {
            if let Some((_, _, Some(h), _)) = self.bars(store, i, spread) {
                r = r.union(h);
            }
        }
        r
    }

    fn y_range(&self, store: &SeriesDataStore, _origin: f64) -> DoubleRange {
        let mut r = store.y_range(0);
        let spread = self.column_spread(store);
        for i in 0..store.len() {
            if let Some((_, _, _, Some(v))) = self.bars(store, i, spread) {
                r = r.union(v);
            }
        }
        r
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::binding::AccessorCache;
    use crate::geometry::Rect;
    use crate::store::SeriesBinding;
    use crate::value::Value;

    fn store(binding: SeriesBinding, rows: Vec<serde_json::Value>) -> SeriesDataStore {
        let mut cache = AccessorCache::new();
        let mut s = SeriesDataStore::with_binding(&binding, &mut cache);
        s.rebuild(rows.into_iter().map(|r| Arc::new(Value::from(r))));
        s
    }

    fn ctx(hidden: &BTreeSet<usize>) -> LayoutContext<'_> {
        LayoutContext {
            plot: Rect::from_ltwh(0.0, 0.0, 100.0, 100.0),
            side_by_side: DoubleRange::new(-0.25, 0.25),
            origin: 0.0,
            hidden_points: hidden,
        }
    }

    #[test]
    fn line_splits_at_nan() {
        let s = store(
            SeriesBinding::new("x").value("y"),
            vec![json!({"x": 0, "y": 1}), json!({"x": 1, "y": null}), json!({"x": 2, "y": 3}), json!({"x": 3, "y": 4})],
        );
        let hidden = BTreeSet::new();
        let segs = LineLayout.generate_segments(&s, &ctx(&hidden));
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1].data_indices(), 2..4);
    }

    #[test]
    fn columns_use_side_by_side_offsets() {
        let s = store(SeriesBinding::new("x").value("y"), vec![json!({"x": 1, "y": 5}), json!({"x": 2, "y": -2})]);
        let hidden = BTreeSet::new();
        let segs = ColumnLayout.generate_segments(&s, &ctx(&hidden));
        assert_eq!(segs[0], Segment::Column { index: 0, left: 0.75, right: 1.25, top: 5.0, bottom: 0.0 });
        assert_eq!(ColumnLayout.y_range(&s, 0.0), DoubleRange::new(-2.0, 5.0));
    }

    #[test]
    fn box_segments_carry_statistics() {
        let s = store(
            SeriesBinding::new("x").samples("v"),
            vec![json!({"x": "a", "v": [1, 2, 3, 4, 5, 6, 7, 8, 9, 100]})],
        );
        let layout = BoxLayout { settings: BoxPlotSettings { mode: crate::stats::QuartileMethod::Normal, ..BoxPlotSettings::default() } };
        let hidden = BTreeSet::new();
        let segs = layout.generate_segments(&s, &ctx(&hidden));
        match &segs[0] {
            Segment::Box { stats, .. } => {
                assert_eq!(stats.outliers, vec![100.0]);
                assert_eq!(stats.maximum, 9.0);
            }
            other => panic!("unexpected segment {other:?}"),
        }
        assert_eq!(layout.y_range(&s, 0.0), DoubleRange::new(1.0, 100.0));
    }

    #[test]
    fn box_without_samples_has_no_segment() {
        let s = store(
            SeriesBinding::new("x").samples("v"),
            vec![json!({"x": "a", "v": [1, 2, 3]}), json!({"x": "b", "v": []}), json!({"x": "c", "v": [null, null]})],
        );
        let layout = BoxLayout::default();
        let hidden = BTreeSet::new();
        assert!(layout.generate_segment(&s, &ctx(&hidden), 1).is_none());
        assert!(layout.generate_segment(&s, &ctx(&hidden), 2).is_none());
        let segs = layout.generate_segments(&s, &ctx(&hidden));
        assert_eq!(segs.iter().map(|s| s.first_index()).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn waterfall_summary_column_resets_running_total() {
        let s = store(
            SeriesBinding::new("x").value("y").value("total"),
            vec![
                json!({"x": "a", "y": 10, "total": false}),
                json!({"x": "b", "y": 5, "total": false}),
                json!({"x": "c", "y": 0, "total": true}),
            ],
        );
        let layout = WaterfallLayout { settings: WaterfallSettings { summary_path: Some("total".into()), ..WaterfallSettings::default() } };
        let hidden = BTreeSet::new();
        let segs = layout.generate_segments(&s, &ctx(&hidden));
        match &segs[2] {
            Segment::Waterfall { bounds, .. } => assert_eq!((bounds.y1, bounds.y2), (15.0, 0.0)),
            other => panic!("unexpected segment {other:?}"),
        }
    }

    #[test]
    fn error_bar_types() {
        let rows = vec![json!({"x": 1, "y": 2}), json!({"x": 2, "y": 4})];
        let s = store(SeriesBinding::new("x").value("y"), rows);
        let hidden = BTreeSet::new();
        let fixed = ErrorBarLayout::default();
        match fixed.generate_segment(&s, &ctx(&hidden), 0) {
            Some(Segment::ErrorBar { horizontal, vertical, .. }) => {
                assert_eq!(horizontal, Some(DoubleRange::new(0.0, 2.0)));
                assert_eq!(vertical, Some(DoubleRange::new(1.0, 3.0)));
            }
            other => panic!("unexpected segment {other:?}"),
        }
        let sd = ErrorBarLayout {
            settings: ErrorBarSettings {
                kind: ErrorBarType::StandardDeviation,
                mode: ErrorBarMode::Vertical,
                ..ErrorBarSettings::default()
            },
        };
        assert!(!sd.supports_partial());
        // population sd of [2, 4] is 1, every bar spans the mean 3 +/- 1
        for segment in sd.generate_segments(&s, &ctx(&hidden)) {
            match segment {
                Segment::ErrorBar { horizontal, vertical, .. } => {
                    assert_eq!(horizontal, None);
                    assert_eq!(vertical, Some(DoubleRange::new(2.0, 4.0)));
                }
                other => panic!("unexpected segment {other:?}"),
            }
        }
    }

    #[test]
    fn deviation_bars_center_on_column_means() {
        let rows = vec![json!({"x": 1, "y": 2}), json!({"x": 2, "y": 4}), json!({"x": 3, "y": null})];
        let s = store(SeriesBinding::new("x").value("y"), rows);
        let hidden = BTreeSet::new();
        let se = ErrorBarLayout {
            settings: ErrorBarSettings {
                kind: ErrorBarType::StandardError,
                direction: ErrorBarDirection::Plus,
                ..ErrorBarSettings::default()
            },
        };
        let segs = se.generate_segments(&s, &ctx(&hidden));
        assert_eq!(segs.len(), 3);
        let half = 1.0 / 2f64.sqrt();
        match &segs[0] {
            Segment::ErrorBar { horizontal: Some(h), vertical: Some(v), .. } => {
                // x mean 2 over all three rows, y mean 3 over the two finite ones
                assert!((h.start - 2.0).abs() < 1e-12);
                assert!((h.end - (2.0 + (2.0f64 / 3.0).sqrt() / 3f64.sqrt())).abs() < 1e-12);
                assert_eq!(v.start, 3.0);
                assert!((v.end - (3.0 + half)).abs() < 1e-12);
            }
            other => panic!("unexpected segment {other:?}"),
        }
        match &segs[2] {
            Segment::ErrorBar { horizontal, vertical, .. } => assert_eq!((horizontal, vertical), (&None, &None)),
            other => panic!("unexpected segment {other:?}"),
        }
    }

    #[test]
    fn standard_deviation_skips_nan() {
        assert_eq!(standard_deviation(&[2.0, f64::NAN, 4.0]), 1.0);
        assert_eq!(standard_deviation(&[]), 0.0);
    }
}
