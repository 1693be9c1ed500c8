// File: crates/series-core/src/chart.rs
// Summary: Chart struct: owns the series, resolves axes and side-by-side slots, runs the
// batched update pass and hands primitives to a canvas.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::axis::{AxisSettings, CoordinateTransform, PlotFrame};
use crate::binding::AccessorCache;
use crate::canvas::{Canvas, DrawRole, DrawStyle, CHART_LAYER};
use crate::config::{ChartDescription, SeriesDescription};
use crate::draw::{draw_axes, draw_grid};
use crate::error::ConfigError;
use crate::geometry::{Point, Rect};
use crate::grid::linspace;
use crate::labels::{ApproxTextMeasurer, TextMeasurer};
use crate::layout::{side_by_side_ranges, SlotRequest};
use crate::series::{Series, SourceChange, TooltipInfo};
use crate::state::AnimationProgress;
use crate::store::Item;
use crate::types::{DoubleRange, Insets, HEIGHT, WIDTH};

const GRID_COLUMNS: usize = 10;
const GRID_ROWS: usize = 6;

/// One legend entry: a whole series, or a single point of a circular series.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LegendItem {
    pub series: usize,
    pub point: Option<usize>,
    pub label: String,
    pub visible: bool,
}

pub struct Chart {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub insets: Insets,
    pub side_by_side: bool,
    pub x_axis: AxisSettings,
    pub y_axis: AxisSettings,
    series: Vec<Series>,
    cache: AccessorCache,
    frame: Option<PlotFrame>,
    measurer: Box<dyn TextMeasurer + Send + Sync>,
}

impl fmt::Debug for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chart")
            .field("title", &self.title)
            .field("series", &self.series)
            .field("frame", &self.frame)
            .finish()
    }
}

impl Default for Chart {
    fn default() -> Self { Self::new() }
}

impl Chart {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            width: WIDTH,
            height: HEIGHT,
            insets: Insets::default(),
            side_by_side: true,
            x_axis: AxisSettings::new("X"),
            y_axis: AxisSettings::new("Y"),
            series: Vec::new(),
            cache: AccessorCache::new(),
            frame: None,
            measurer: Box::new(ApproxTextMeasurer::default()),
        }
    }

    /// Chart with every series of `desc`, still without data.
    pub fn from_description(desc: &ChartDescription) -> Result<Self, ConfigError> {
        desc.validate()?;
        let mut chart = Self {
            title: desc.title.clone(),
            width: desc.width,
            height: desc.height,
            insets: desc.insets,
            side_by_side: desc.side_by_side,
            x_axis: desc.x_axis.clone(),
            y_axis: desc.y_axis.clone(),
            ..Self::new()
        };
        for s in &desc.series {
            chart.add_series(s.clone());
        }
        Ok(chart)
    }

    pub fn set_measurer(&mut self, measurer: Box<dyn TextMeasurer + Send + Sync>) {
        self.measurer = measurer;
        self.invalidate_all();
    }

    /// Add a series; returns its position.
    pub fn add_series(&mut self, desc: SeriesDescription) -> usize {
        self.series.push(Series::new(desc, &mut self.cache));
        self.series.len() - 1
    }

    pub fn remove_series(&mut self, index: usize) -> Option<Series> {
        (index < self.series.len()).then(|| self.series.remove(index))
    }

    pub fn series(&self, index: usize) -> Option<&Series> { self.series.get(index) }

    pub fn series_mut(&mut self, index: usize) -> Option<&mut Series> { self.series.get_mut(index) }

    pub fn series_count(&self) -> usize { self.series.len() }

    pub fn iter_series(&self) -> impl Iterator<Item = &Series> { self.series.iter() }

    /// Rebind series `index` under the chart's shared accessor cache.
    pub fn set_series_description(&mut self, index: usize, desc: SeriesDescription) -> bool {
        match self.series.get_mut(index) {
            Some(s) => {
                s.set_description(desc, &mut self.cache);
                true
            }
            None => false,
        }
    }

    /// Replace the item source of series `index`.
    pub fn set_items<I>(&mut self, index: usize, items: I) -> bool
    where
        I: IntoIterator<Item = Item>,
    {
        match self.series.get_mut(index) {
            Some(s) => {
                s.set_items(items);
                true
            }
            None => false,
        }
    }

    pub fn apply_change(&mut self, index: usize, change: SourceChange) -> bool {
        match self.series.get_mut(index) {
            Some(s) => {
                s.apply_change(change);
                true
            }
            None => false,
        }
    }

    pub fn invalidate_all(&mut self) {
        for s in &mut self.series {
            s.invalidate();
        }
    }

    /// Plot area inside the insets.
    pub fn plot_rect(&self) -> Rect {
        Rect::from_ltrb(
            f64::from(self.insets.left),
            f64::from(self.insets.top),
            self.width - f64::from(self.insets.right),
            self.height - f64::from(self.insets.bottom),
        )
    }

    /// Frame of the last update pass.
    pub fn frame(&self) -> Option<&PlotFrame> { self.frame.as_ref() }

    fn participates(s: &Series) -> bool { s.is_visible() && s.kind().is_side_by_side() }

    /// Category slot width: smallest X step across side-by-side series.
    fn slot_width(&self) -> f64 {
        let slot = self
            .series
            .iter()
            .filter(|s| Self::participates(s))
            .filter_map(|s| s.store().min_x_delta())
            .fold(f64::INFINITY, f64::min);
        if slot.is_finite() && slot > 0.0 { slot } else { 1.0 }
    }

    fn update_side_by_side(&mut self) {
        let slot = self.slot_width();
        let requests: Vec<SlotRequest> = self
            .series
            .iter()
            .map(|s| SlotRequest { width: s.description().width, spacing: s.description().spacing, participates: Self::participates(s) })
            .collect();
        let ranges = side_by_side_ranges(slot, &requests, self.side_by_side);
        for (s, range) in self.series.iter_mut().zip(ranges) {
            s.set_side_by_side(range);
        }
    }

    /// Union of the visible cartesian series' extents.
    fn data_ranges(&self) -> (DoubleRange, DoubleRange) {
        self.series
            .iter()
            .filter(|s| s.is_visible() && s.kind().is_cartesian())
            .fold((DoubleRange::empty(), DoubleRange::empty()), |(x, y), s| (x.union(s.x_range()), y.union(s.y_range(0.0))))
    }

    /// Recompute slots and axes, then regenerate dirty series. Returns the number of
    /// series whose segments were recomputed.
    pub fn update(&mut self) -> usize {
        self.update_side_by_side();
        let plot = self.plot_rect();
        let (x_data, y_data) = self.data_ranges();
        let frame = PlotFrame {
            plot,
            x: self.x_axis.build(x_data, plot.left, plot.right),
            y: self.y_axis.build(y_data, plot.bottom, plot.top),
        };
        let y = frame.y.visible_range();
        let origin = 0.0f64.clamp(y.start.min(y.end), y.start.max(y.end));
        let measurer = self.measurer.as_ref();
        let updated = self.series.iter_mut().map(|s| s.update(plot, origin, measurer)).filter(|u| *u).count();
        self.frame = Some(frame);
        debug!(updated, series = self.series.len(), "chart update");
        updated
    }

    /// Emit grid, axes and every visible series. Call after `update`.
    pub fn draw(&self, canvas: &mut dyn Canvas, progress: AnimationProgress) {
        let Some(frame) = self.frame.as_ref() else {
            debug!("draw before first update skipped");
            return;
        };
        let plot = frame.plot;
        draw_grid(
            canvas,
            plot,
            &linspace(plot.left, plot.right, GRID_COLUMNS),
            &linspace(plot.top, plot.bottom, GRID_ROWS),
        );
        draw_axes(canvas, plot);
        self.draw_titles(canvas, plot);
        for (i, s) in self.series.iter().enumerate() {
            s.draw(canvas, frame, i, progress, self.measurer.as_ref());
        }
    }

    fn draw_titles(&self, canvas: &mut dyn Canvas, plot: Rect) {
        let style = DrawStyle::body(CHART_LAYER).role(DrawRole::Axis);
        let mut text_at = |text: &str, anchor: Point| {
            if text.is_empty() {
                return;
            }
            let size = self.measurer.measure(text);
            canvas.draw_text(text, Rect::from_ltwh(anchor.x - size.width / 2.0, anchor.y, size.width, size.height), style);
        };
        text_at(&self.title, Point::new(plot.center().x, 0.0));
        text_at(&self.x_axis.title, Point::new(plot.center().x, plot.bottom + 24.0));
        text_at(&self.y_axis.title, Point::new(plot.left / 2.0, plot.top));
    }

    pub fn legend_items(&self) -> Vec<LegendItem> {
        let mut items = Vec::new();
        for (i, s) in self.series.iter().enumerate() {
            if !s.description().show_in_legend {
                continue;
            }
            if s.kind().is_circular() {
                for point in 0..s.store().len() {
                    items.push(LegendItem {
                        series: i,
                        point: Some(point),
                        label: s.x_text(point).unwrap_or_default(),
                        visible: s.is_visible() && !s.hidden_points().contains(&point),
                    });
                }
            } else {
                items.push(LegendItem { series: i, point: None, label: s.name().to_string(), visible: s.is_visible() });
            }
        }
        items
    }

    /// Flip a legend entry. Returns the new visibility, `None` for an unknown series.
    pub fn toggle_legend_item(&mut self, series: usize, point: Option<usize>) -> Option<bool> {
        let s = self.series.get_mut(series)?;
        let visible = match point {
            Some(p) => s.toggle_point(p),
            None => {
                let v = !s.is_visible();
                s.set_visible(v);
                v
            }
        };
        debug!(series, ?point, visible, "legend toggle");
        Some(visible)
    }

    pub fn tooltip_info(&self, series: usize, index: usize) -> Option<TooltipInfo> {
        let frame = self.frame.as_ref()?;
        self.series.get(series)?.tooltip_info(index, frame)
    }

    /// Topmost `(series, data index)` under `p`.
    pub fn hit_test(&self, p: Point) -> Option<(usize, usize)> {
        let frame = self.frame.as_ref()?;
        self.series
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, s)| s.is_visible())
            .find_map(|(i, s)| s.hit_test(p, frame).map(|index| (i, index)))
    }

    /// Toggle selection of a data row. Returns the new state.
    pub fn toggle_selection(&mut self, series: usize, index: usize) -> Option<bool> {
        Some(self.series.get_mut(series)?.toggle_selection(index))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::canvas::{DrawCommand, RecordingCanvas};
    use crate::config::{CircularSettings, SeriesKind};
    use crate::segment::Segment;
    use crate::value::Value;

    fn rows(values: &[(f64, f64)]) -> Vec<Item> {
        values.iter().map(|(x, y)| Arc::new(Value::from(json!({"x": x, "y": y})))).collect()
    }

    fn column_chart() -> Chart {
        let mut chart = Chart { width: 400.0, height: 300.0, ..Chart::new() };
        for name in ["a", "b"] {
            let i = chart.add_series(SeriesDescription::new(name, SeriesKind::Column, "x", "y"));
            chart.set_items(i, rows(&[(1.0, 10.0), (2.0, 20.0), (3.0, 30.0)]));
        }
        chart
    }

    #[test]
    fn siblings_split_the_category_slot() {
        let mut chart = column_chart();
        assert_eq!(chart.update(), 2);
        assert_eq!(chart.series(0).map(Series::side_by_side_range), Some(DoubleRange::new(-0.4, 0.0)));
        assert_eq!(chart.series(1).map(Series::side_by_side_range), Some(DoubleRange::new(0.0, 0.4)));
        // nothing dirty, nothing recomputed
        assert_eq!(chart.update(), 0);
    }

    #[test]
    fn hiding_a_sibling_recenters_the_other() {
        let mut chart = column_chart();
        chart.update();
        assert_eq!(chart.toggle_legend_item(1, None), Some(false));
        chart.update();
        assert_eq!(chart.series(0).map(Series::side_by_side_range), Some(DoubleRange::new(-0.4, 0.4)));
    }

    #[test]
    fn draw_emits_chart_layer_before_series() {
        let mut chart = column_chart();
        let mut canvas = RecordingCanvas::new();
        chart.draw(&mut canvas, AnimationProgress::DONE);
        assert!(canvas.is_empty());
        chart.update();
        chart.draw(&mut canvas, AnimationProgress::DONE);
        assert_eq!(canvas.commands[0].style().role, DrawRole::Grid);
        assert_eq!(canvas.for_series(0).count(), 3);
        assert_eq!(canvas.for_series(1).count(), 3);
        let first_series = canvas.commands.iter().position(|c| c.style().series == 0);
        let last_chart = canvas.commands.iter().rposition(|c| c.style().series == CHART_LAYER);
        assert!(last_chart < first_series);
    }

    #[test]
    fn hit_test_finds_the_column_under_the_pointer() {
        let mut chart = column_chart();
        chart.update();
        let frame = *chart.frame().expect("frame after update");
        let inside = frame.to_point(1.2, 5.0);
        assert_eq!(chart.hit_test(inside), Some((1, 0)));
        let tip = chart.tooltip_info(1, 0).expect("tooltip");
        assert_eq!(tip.y_text, "10");
        assert_eq!(tip.x_text, "1");
    }

    #[test]
    fn circular_legend_lists_points() {
        let mut chart = Chart::new();
        let i = chart.add_series(SeriesDescription::new("share", SeriesKind::Pie(CircularSettings::default()), "name", "v"));
        chart.set_items(
            i,
            ["a", "b", "c"].iter().map(|n| Arc::new(Value::from(json!({"name": n, "v": 1})))).collect::<Vec<_>>(),
        );
        chart.update();
        let legend = chart.legend_items();
        assert_eq!(legend.iter().map(|l| l.label.as_str()).collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(chart.toggle_legend_item(i, Some(1)), Some(false));
        chart.update();
        assert!(!chart.legend_items()[1].visible);
        match &chart.series(i).expect("series").segments()[1] {
            Segment::Wedge { sweep, .. } => assert_eq!(*sweep, 0.0),
            other => panic!("unexpected segment {other:?}"),
        }
    }

    #[test]
    fn partial_change_only_touches_dirty_series() {
        let mut chart = column_chart();
        chart.update();
        chart.apply_change(0, SourceChange::Replace { index: 1, item: rows(&[(2.0, 25.0)]).remove(0) });
        assert_eq!(chart.update(), 1);
        let mut canvas = RecordingCanvas::new();
        chart.draw(&mut canvas, AnimationProgress::DONE);
        let rects: Vec<&DrawCommand> = canvas.for_series(0).collect();
        assert_eq!(rects.len(), 3);
    }

    #[test]
    fn from_description_rejects_bad_width() {
        let mut desc = ChartDescription::default();
        desc.series.push(SeriesDescription { width: 2.0, ..SeriesDescription::default() });
        assert!(Chart::from_description(&desc).is_err());
    }
}
