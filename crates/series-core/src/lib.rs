// File: crates/series-core/src/lib.rs
// Summary: Core library entry point; exports the public API for binding item sources to chart
// series and turning them into drawable segment geometry.

pub mod types;
pub mod geometry;
pub mod error;
pub mod value;
pub mod binding;
pub mod store;
pub mod stats;
pub mod spline;
pub mod layout;
pub mod radial;
pub mod labels;
pub mod axis;
pub mod canvas;
pub mod segment;
pub mod state;
pub mod config;
pub mod series;
pub mod cartesian;
pub mod circular;
pub mod polar;
pub mod draw;
pub mod grid;
pub mod chart;

pub use axis::{AxisSettings, AxisTransform, CoordinateTransform, LinearAxis, LogAxis, PlotFrame, ScaleKind};
pub use binding::{Accessor, AccessorCache, PropertyPath};
pub use canvas::{Canvas, DrawCommand, DrawRole, DrawStyle, PathCommand, PathData, RecordingCanvas};
pub use chart::{Chart, LegendItem};
pub use config::{
    BoxPlotSettings, ChartDescription, CircularSettings, ErrorBarDirection, ErrorBarMode, ErrorBarSettings, ErrorBarType,
    PolarDrawType, PolarSettings, SeriesDescription, SeriesKind, WaterfallSettings,
};
pub use error::{BindingError, ConfigError};
pub use geometry::{Point, Rect, Size};
pub use labels::{ApproxTextMeasurer, LabelPlacement, LabelPosition, LabelStrategy, TextMeasurer};
pub use layout::{side_by_side_range, waterfall_bounds, WaterfallBounds, WaterfallKind};
pub use radial::RadialLayout;
pub use segment::{DirtyRanges, Segment, SegmentArena};
pub use series::{Series, SeriesLayout, SourceChange, TooltipInfo};
pub use spline::{BezierSegment, SplineType};
pub use state::{AnimationProgress, SelectionMode, SelectionState};
pub use stats::{box_statistics, BoxStatistics, QuartileMethod};
pub use store::{Item, SeriesBinding, SeriesDataStore, ValueType};
pub use types::{DoubleRange, Insets};
pub use value::Value;
