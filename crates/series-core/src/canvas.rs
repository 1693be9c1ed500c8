// File: crates/series-core/src/canvas.rs
// Summary: Drawing handoff: the Canvas trait the library emits calls into, and a recording implementation.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Series id carried by chart-level primitives (grid, axes).
pub const CHART_LAYER: usize = usize::MAX;

/// What a primitive belongs to; the host maps this to colors and strokes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawStyle {
    pub series: usize,
    /// Data index for per-point primitives.
    pub point: Option<usize>,
    pub selected: bool,
    pub role: DrawRole,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawRole {
    #[default]
    Body,
    Whisker,
    Median,
    Mean,
    Outlier,
    ErrorBar,
    Connector,
    Label,
    Grid,
    Axis,
}

impl DrawStyle {
    pub fn body(series: usize) -> Self { Self { series, ..Self::default() } }

    pub fn at(mut self, point: usize) -> Self {
        self.point = Some(point);
        self
    }

    pub fn role(mut self, role: DrawRole) -> Self {
        self.role = role;
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { to: Point },
    LineTo { to: Point },
    CubicTo { c1: Point, c2: Point, to: Point },
    /// Circular arc around `center`, angles in degrees.
    ArcTo { center: Point, radius: f64, start_angle: f64, sweep: f64 },
    Close,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    pub commands: Vec<PathCommand>,
}

impl PathData {
    pub fn new() -> Self { Self::default() }

    pub fn move_to(&mut self, to: Point) -> &mut Self {
        self.commands.push(PathCommand::MoveTo { to });
        self
    }
    pub fn line_to(&mut self, to: Point) -> &mut Self {
        self.commands.push(PathCommand::LineTo { to });
        self
    }
    pub fn cubic_to(&mut self, c1: Point, c2: Point, to: Point) -> &mut Self {
        self.commands.push(PathCommand::CubicTo { c1, c2, to });
        self
    }
    pub fn arc_to(&mut self, center: Point, radius: f64, start_angle: f64, sweep: f64) -> &mut Self {
        self.commands.push(PathCommand::ArcTo { center, radius, start_angle, sweep });
        self
    }
    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Polyline through `points`.
    pub fn polyline(points: &[Point]) -> Self {
        let mut path = PathData::new();
        let mut it = points.iter();
        if let Some(first) = it.next() {
            path.move_to(*first);
            for p in it {
                path.line_to(*p);
            }
        }
        path
    }

    pub fn is_empty(&self) -> bool { self.commands.is_empty() }
}

/// Rendering collaborator. The library emits primitives; it owns no pixels.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, style: DrawStyle);
    fn stroke_path(&mut self, path: &PathData, style: DrawStyle);
    fn fill_path(&mut self, path: &PathData, style: DrawStyle);
    fn draw_line(&mut self, from: Point, to: Point, style: DrawStyle);
    fn draw_text(&mut self, text: &str, rect: Rect, style: DrawStyle);
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    FillRect { rect: Rect, style: DrawStyle },
    StrokePath { path: PathData, style: DrawStyle },
    FillPath { path: PathData, style: DrawStyle },
    Line { from: Point, to: Point, style: DrawStyle },
    Text { text: String, rect: Rect, style: DrawStyle },
}

impl DrawCommand {
    pub fn style(&self) -> &DrawStyle {
        match self {
            DrawCommand::FillRect { style, .. }
            | DrawCommand::StrokePath { style, .. }
            | DrawCommand::FillPath { style, .. }
            | DrawCommand::Line { style, .. }
            | DrawCommand::Text { style, .. } => style,
        }
    }
}

/// Canvas that keeps every call, in order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.commands.len() }

    pub fn is_empty(&self) -> bool { self.commands.is_empty() }

    /// Commands emitted for `series`.
    pub fn for_series(&self, series: usize) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |c| c.style().series == series)
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, style: DrawStyle) { self.commands.push(DrawCommand::FillRect { rect, style }); }
    fn stroke_path(&mut self, path: &PathData, style: DrawStyle) {
        self.commands.push(DrawCommand::StrokePath { path: path.clone(), style });
    }
    fn fill_path(&mut self, path: &PathData, style: DrawStyle) {
        self.commands.push(DrawCommand::FillPath { path: path.clone(), style });
    }
    fn draw_line(&mut self, from: Point, to: Point, style: DrawStyle) {
        self.commands.push(DrawCommand::Line { from, to, style });
    }
    fn draw_text(&mut self, text: &str, rect: Rect, style: DrawStyle) {
        self.commands.push(DrawCommand::Text { text: text.to_string(), rect, style });
    }
}
