// File: crates/series-core/src/series.rs
// Summary: Series model: bound data store, layout strategy, segment arena, dirty tracking and interaction state.
// Notes:
// - A series exclusively owns its store and segments; the chart addresses series by position.
// - Mutations only mark state dirty. Segments are regenerated by `Series::update`, once per cycle.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::axis::PlotFrame;
use crate::binding::AccessorCache;
use crate::canvas::{Canvas, DrawRole, DrawStyle};
use crate::cartesian::{AreaLayout, BoxLayout, ColumnLayout, ErrorBarLayout, LineLayout, ScatterLayout, SplineLayout, WaterfallLayout};
use crate::circular::CircularLayout;
use crate::config::{SeriesDescription, SeriesKind};
use crate::draw;
use crate::geometry::{Point, Rect};
use crate::labels::{LabelPlacement, TextMeasurer};
use crate::polar::PolarLayout;
use crate::segment::{DirtyRanges, Segment, SegmentArena};
use crate::state::{AnimationProgress, SelectionState};
use crate::store::{Item, SeriesDataStore, ValueType};
use crate::types::DoubleRange;
use crate::value::{format_number, from_serial_date, Value};

/// Inputs shared by every segment of one layout pass.
#[derive(Clone, Copy, Debug)]
pub struct LayoutContext<'a> {
    pub plot: Rect,
    /// Offset of this series inside a category slot, relative to the category center.
    pub side_by_side: DoubleRange,
    /// Value columns and areas grow from.
    pub origin: f64,
    /// Data points toggled off through the legend.
    pub hidden_points: &'a BTreeSet<usize>,
}

/// Strategy for one chart family: turns store rows into segments.
pub trait SeriesLayout: fmt::Debug + Send + Sync {
    fn generate_segments(&self, store: &SeriesDataStore, ctx: &LayoutContext<'_>) -> Vec<Segment>;

    /// Segment for one row when rows map to segments one-to-one and independently.
    fn generate_segment(&self, _store: &SeriesDataStore, _ctx: &LayoutContext<'_>, _index: usize) -> Option<Segment> {
        None
    }

    fn supports_partial(&self) -> bool { false }

    /// X extent in value space.
    fn x_range(&self, store: &SeriesDataStore) -> DoubleRange { store.x_range() }

    /// Y extent in value space, given the baseline columns grow from.
    fn y_range(&self, store: &SeriesDataStore, _origin: f64) -> DoubleRange { store.y_range(0) }

    /// Pixel point a tooltip for data row `index` points at.
    fn tooltip_anchor(&self, segment: &Segment, index: usize, frame: &PlotFrame) -> Option<Point> {
        if let Some(rect) = segment.pixel_rect(frame) {
            return Some(Point::new(rect.center().x, rect.top));
        }
        segment.pixel_points(frame).into_iter().find(|(i, _)| *i == index).map(|(_, p)| p).filter(Point::is_finite)
    }

    /// Pixel point a cartesian data label for row `index` is centered on.
    fn label_anchor(&self, segment: &Segment, index: usize, frame: &PlotFrame) -> Option<Point> {
        self.tooltip_anchor(segment, index, frame)
    }

    /// Resolved circular data labels; empty for other families.
    fn circular_labels(
        &self,
        _store: &SeriesDataStore,
        _segments: &[Segment],
        _ctx: &LayoutContext<'_>,
        _measurer: &dyn TextMeasurer,
    ) -> Vec<LabelPlacement> {
        Vec::new()
    }
}

/// Change notification from an observable item source.
#[derive(Clone, Debug)]
pub enum SourceChange {
    Add { index: usize, items: Vec<Item> },
    Remove { index: usize, count: usize },
    Replace { index: usize, item: Item },
    Move { from: usize, to: usize },
    Reset { items: Vec<Item> },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TooltipInfo {
    pub series: String,
    pub index: usize,
    pub anchor: Point,
    pub x_text: String,
    pub y_text: String,
}

#[derive(Clone, Debug, Default)]
struct DirtyState {
    full: bool,
    ranges: DirtyRanges,
}

impl DirtyState {
    fn is_dirty(&self) -> bool { self.full || !self.ranges.is_empty() }

    fn clear(&mut self) {
        self.full = false;
        self.ranges.clear();
    }
}

/// Layout inputs of the last pass; a change forces a full regeneration.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PassKey {
    plot: Rect,
    side_by_side: DoubleRange,
    origin: f64,
}

pub struct Series {
    description: SeriesDescription,
    store: SeriesDataStore,
    layout: Box<dyn SeriesLayout>,
    arena: SegmentArena,
    labels: Vec<LabelPlacement>,
    dirty: DirtyState,
    selection: SelectionState,
    hidden_points: BTreeSet<usize>,
    side_by_side: DoubleRange,
    last_pass: Option<PassKey>,
    /// Segment `i` belongs to row `i`; required for per-row updates.
    row_aligned: bool,
}

impl fmt::Debug for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Series")
            .field("name", &self.description.name)
            .field("kind", &self.description.kind)
            .field("len", &self.store.len())
            .field("segments", &self.arena.len())
            .finish()
    }
}

/// Strategy for a series kind.
pub fn layout_for(kind: &SeriesKind) -> Box<dyn SeriesLayout> {
    match kind {
        SeriesKind::Line => Box::new(LineLayout),
        SeriesKind::Scatter => Box::new(ScatterLayout),
        SeriesKind::Column => Box::new(ColumnLayout),
        SeriesKind::Area => Box::new(AreaLayout),
        SeriesKind::Spline { spline_type } => Box::new(SplineLayout { spline_type: *spline_type }),
        SeriesKind::BoxAndWhisker(s) => Box::new(BoxLayout { settings: s.clone() }),
        SeriesKind::Waterfall(s) => Box::new(WaterfallLayout { settings: s.clone() }),
        SeriesKind::ErrorBar(s) => Box::new(ErrorBarLayout { settings: s.clone() }),
        SeriesKind::Pie(s) => Box::new(CircularLayout { settings: s.clone(), doughnut: false }),
        SeriesKind::Doughnut(s) => Box::new(CircularLayout { settings: s.clone(), doughnut: true }),
        SeriesKind::Polar(s) => Box::new(PolarLayout { settings: s.clone() }),
    }
}

impl Series {
    pub fn new(description: SeriesDescription, cache: &mut AccessorCache) -> Self {
        let store = SeriesDataStore::with_binding(&description.binding(), cache);
        let layout = layout_for(&description.kind);
        let selection = SelectionState::new(description.selection);
        Self {
            description,
            store,
            layout,
            arena: SegmentArena::new(),
            labels: Vec::new(),
            dirty: DirtyState { full: true, ranges: DirtyRanges::new() },
            selection,
            hidden_points: BTreeSet::new(),
            side_by_side: DoubleRange::new(-0.4, 0.4),
            last_pass: None,
            row_aligned: false,
        }
    }

    pub fn name(&self) -> &str { &self.description.name }

    pub fn kind(&self) -> &SeriesKind { &self.description.kind }

    pub fn description(&self) -> &SeriesDescription { &self.description }

    pub fn store(&self) -> &SeriesDataStore { &self.store }

    pub fn segments(&self) -> &[Segment] { self.arena.as_slice() }

    pub fn labels(&self) -> &[LabelPlacement] { &self.labels }

    pub fn selection(&self) -> &SelectionState { &self.selection }

    pub fn is_visible(&self) -> bool { self.description.visible }

    pub fn is_dirty(&self) -> bool { self.dirty.is_dirty() }

    pub fn side_by_side_range(&self) -> DoubleRange { self.side_by_side }

    pub fn hidden_points(&self) -> &BTreeSet<usize> { &self.hidden_points }

    pub fn set_visible(&mut self, visible: bool) {
        if self.description.visible != visible {
            self.description.visible = visible;
            self.invalidate();
        }
    }

    /// Change width/spacing ratios; siblings must be re-laid out too.
    pub fn set_width_spacing(&mut self, width: f64, spacing: f64) {
        self.description.width = width.clamp(0.0, 1.0);
        self.description.spacing = spacing.clamp(0.0, 1.0);
        self.invalidate();
    }

    /// Rebind with new settings of the same or another kind. Clears the data.
    pub fn set_description(&mut self, description: SeriesDescription, cache: &mut AccessorCache) {
        let items: Vec<Item> = self.store.items().to_vec();
        self.store.set_binding(&description.binding(), cache);
        self.layout = layout_for(&description.kind);
        self.selection = SelectionState::new(description.selection);
        self.description = description;
        self.store.rebuild(items);
        self.invalidate();
    }

    /// Replace the whole item source.
    pub fn set_items<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = Item>,
    {
        self.store.rebuild(items);
        self.selection.clear();
        self.hidden_points.clear();
        self.invalidate();
    }

    /// Drop all data (source detached).
    pub fn clear(&mut self) {
        self.store.clear();
        self.selection.clear();
        self.hidden_points.clear();
        self.invalidate();
    }

    pub fn invalidate(&mut self) { self.dirty.full = true; }

    fn mark_rows(&mut self, start: usize, end: usize) {
        if self.layout.supports_partial() {
            self.dirty.ranges.mark_dirty(start, end);
        } else {
            self.dirty.full = true;
        }
    }

    /// Patch the store from a source notification and mark the affected rows.
    pub fn apply_change(&mut self, change: SourceChange) {
        match change {
            SourceChange::Add { index, items } => {
                let start = index.min(self.store.len());
                let mut inserted = 0;
                for item in items {
                    if self.store.insert(start + inserted, item).is_some() {
                        inserted += 1;
                    }
                }
                if inserted > 0 {
                    self.selection.shift_inserted(start, inserted);
                    self.shift_hidden(start, inserted as isize);
                    self.mark_rows(start, self.store.len());
                }
            }
            SourceChange::Remove { index, count } => {
                let mut removed = 0;
                while removed < count && self.store.remove_at(index) {
                    removed += 1;
                }
                if removed > 0 {
                    self.selection.shift_removed(index, removed);
                    self.shift_hidden(index, -(removed as isize));
                    self.arena.truncate(self.store.len().min(self.arena.len()));
                    self.mark_rows(index, self.store.len().max(index + 1));
                }
            }
            SourceChange::Replace { index, item } => match self.store.replace(index, item) {
                Some(outcome) if outcome.repeat => trace!(index, "repeat value; redraw skipped"),
                Some(outcome) => self.mark_rows(outcome.index, outcome.index + 1),
                None => {}
            },
            SourceChange::Move { from, to } => {
                if from != to && self.store.move_row(from, to) {
                    self.mark_rows(from.min(to), from.max(to) + 1);
                }
            }
            SourceChange::Reset { items } => self.set_items(items),
        }
    }

    /// An item at `index` changed one of its properties in place.
    pub fn item_property_changed(&mut self, index: usize, path: &str) {
        let binding = self.description.binding();
        let bound = path == binding.x_path
            || binding.columns.iter().any(|c| c.path == path || c.path.starts_with(&format!("{path}.")) || c.path.starts_with(&format!("{path}[")));
        if !bound {
            debug!(index, path, "property change on unbound path ignored");
            return;
        }
        match self.store.refresh_row(index) {
            Some(outcome) if !outcome.repeat => self.mark_rows(outcome.index, outcome.index + 1),
            _ => {}
        }
    }

    /// Overwrite top-level field `name` of the item at `index` and re-extract its row.
    /// Returns `false` when the row or the field does not exist.
    pub fn set_item_field(&mut self, index: usize, name: &str, value: Value) -> bool {
        let Some(slot) = self.store.item_mut(index).and_then(|item| item.field_mut(name)) else {
            return false;
        };
        *slot = value;
        self.item_property_changed(index, name);
        true
    }

    fn shift_hidden(&mut self, at: usize, delta: isize) {
        if self.hidden_points.is_empty() {
            return;
        }
        let removed_end = if delta < 0 { at + delta.unsigned_abs() } else { at };
        self.hidden_points = self
            .hidden_points
            .iter()
            .filter(|&&i| delta >= 0 || i < at || i >= removed_end)
            .map(|&i| if i >= at { i.saturating_add_signed(delta) } else { i })
            .collect();
    }

    /// Toggle selection of a data row. Returns the new state.
    pub fn toggle_selection(&mut self, index: usize) -> bool { self.selection.toggle(index) }

    /// Hide or show one data point (circular legend entries).
    pub fn toggle_point(&mut self, index: usize) -> bool {
        let visible = if self.hidden_points.remove(&index) {
            true
        } else {
            self.hidden_points.insert(index);
            false
        };
        self.invalidate();
        visible
    }

    pub(crate) fn set_side_by_side(&mut self, range: DoubleRange) { self.side_by_side = range; }

    pub fn x_range(&self) -> DoubleRange {
        let r = self.layout.x_range(&self.store);
        if r.is_empty() || !self.description.kind.is_side_by_side() {
            return r;
        }
        DoubleRange::new(r.start + self.side_by_side.start, r.end + self.side_by_side.end)
    }

    pub fn y_range(&self, origin: f64) -> DoubleRange { self.layout.y_range(&self.store, origin) }

    /// Regenerate dirty segments. Returns `true` when anything was recomputed.
    pub fn update(&mut self, plot: Rect, origin: f64, measurer: &dyn TextMeasurer) -> bool {
        let key = PassKey { plot, side_by_side: self.side_by_side, origin };
        if self.last_pass != Some(key) {
            self.dirty.full = true;
        }
        if !self.dirty.is_dirty() {
            return false;
        }
        let ctx = LayoutContext { plot, side_by_side: self.side_by_side, origin, hidden_points: &self.hidden_points };
        let mut rows_updated = false;
        if !self.dirty.full && self.row_aligned && self.layout.supports_partial() {
            let len = self.store.len();
            self.arena.truncate(len.min(self.arena.len()));
            rows_updated = true;
            'rows: for range in self.dirty.ranges.iter() {
                for i in range.start.min(len)..range.end.min(len) {
                    match self.layout.generate_segment(&self.store, &ctx, i) {
                        Some(segment) => self.arena.set(i, segment),
                        None => {
                            rows_updated = false;
                            break 'rows;
                        }
                    }
                }
            }
            if rows_updated {
                trace!(series = %self.description.name, dirty = self.dirty.ranges.total_dirty_count(), "partial segment update");
            }
        }
        if !rows_updated {
            self.arena.replace_all(self.layout.generate_segments(&self.store, &ctx));
            self.row_aligned = self.arena.len() == self.store.len()
                && self.arena.iter().enumerate().all(|(i, s)| s.data_indices() == (i..i + 1));
            trace!(series = %self.description.name, segments = self.arena.len(), "full segment rebuild");
        }
        self.labels = if self.description.show_labels {
            self.layout.circular_labels(&self.store, self.arena.as_slice(), &ctx, measurer)
        } else {
            Vec::new()
        };
        self.dirty.clear();
        self.last_pass = Some(key);
        true
    }

    /// Segment holding data row `index`.
    pub fn segment_for(&self, index: usize) -> Option<&Segment> {
        self.arena.iter().find(|s| s.data_indices().contains(&index))
    }

    /// Nearest data row under `p`.
    pub fn hit_test(&self, p: Point, frame: &PlotFrame) -> Option<usize> {
        const TOLERANCE: f64 = 8.0;
        self.arena
            .iter()
            .filter_map(|s| s.hit(frame, p, TOLERANCE))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    pub fn tooltip_info(&self, index: usize, frame: &PlotFrame) -> Option<TooltipInfo> {
        let segment = self.segment_for(index)?;
        let anchor = self.layout.tooltip_anchor(segment, index, frame)?;
        Some(TooltipInfo {
            series: self.description.name.clone(),
            index,
            anchor,
            x_text: self.x_text(index)?,
            y_text: self.y_text(segment, index),
        })
    }

    /// Display text of row `index`'s X value.
    pub fn x_text(&self, index: usize) -> Option<String> {
        let x = *self.store.x_values().get(index)?;
        Some(match self.store.value_type() {
            Some(ValueType::String) => self.store.categories().get(index).cloned().unwrap_or_default(),
            Some(ValueType::DateTime) => from_serial_date(x).map(|d| d.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_default(),
            _ => format_number(x),
        })
    }

    fn y_text(&self, segment: &Segment, index: usize) -> String {
        match segment {
            Segment::Box { stats, .. } => format!(
                "min {} q1 {} median {} q3 {} max {}",
                format_number(stats.minimum),
                format_number(stats.lower_quartile),
                format_number(stats.median),
                format_number(stats.upper_quartile),
                format_number(stats.maximum)
            ),
            Segment::Waterfall { bounds, .. } => format_number(bounds.y1 - bounds.y2),
            _ => self.store.y_values(0).get(index).map(|v| format_number(*v)).unwrap_or_default(),
        }
    }

    /// Emit this series' primitives. `series_index` tags every style.
    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        frame: &PlotFrame,
        series_index: usize,
        progress: AnimationProgress,
        measurer: &dyn TextMeasurer,
    ) {
        if !self.description.visible {
            return;
        }
        for segment in self.arena.iter() {
            let index = segment.first_index();
            let style = DrawStyle::body(series_index).at(index).selected(self.selection.is_selected(index));
            draw::draw_segment(canvas, segment, frame, style, progress);
        }
        if !self.description.show_labels {
            return;
        }
        if self.description.kind.is_circular() {
            draw::draw_circular_labels(canvas, &self.labels, DrawStyle::body(series_index), progress);
            return;
        }
        for segment in self.arena.iter() {
            for index in segment.data_indices() {
                let Some(anchor) = self.layout.label_anchor(segment, index, frame) else { continue };
                let text = self.y_text(segment, index);
                if text.is_empty() {
                    continue;
                }
                let size = measurer.measure(&text);
                let rect = Rect::from_ltwh(anchor.x - size.width / 2.0, anchor.y - size.height - 2.0, size.width, size.height);
                canvas.draw_text(&text, rect, DrawStyle::body(series_index).at(index).role(DrawRole::Label));
            }
        }
    }
}
