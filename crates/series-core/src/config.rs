// File: crates/series-core/src/config.rs
// Summary: Serde settings for series and charts; JSON chart descriptions with validation.

use serde::{Deserialize, Serialize};

use crate::axis::AxisSettings;
use crate::error::ConfigError;
use crate::labels::{LabelPosition, LabelStrategy};
use crate::spline::SplineType;
use crate::state::SelectionMode;
use crate::stats::QuartileMethod;
use crate::store::SeriesBinding;
use crate::types::{Insets, HEIGHT, WIDTH};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxPlotSettings {
    pub mode: QuartileMethod,
    pub show_outliers: bool,
    pub show_mean: bool,
}

impl Default for BoxPlotSettings {
    fn default() -> Self { Self { mode: QuartileMethod::Exclusive, show_outliers: true, show_mean: true } }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterfallSettings {
    pub allow_auto_sum: bool,
    /// Boolean path marking summary rows.
    pub summary_path: Option<String>,
}

impl Default for WaterfallSettings {
    fn default() -> Self { Self { allow_auto_sum: true, summary_path: None } }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorBarType {
    #[default]
    Fixed,
    Percentage,
    StandardDeviation,
    StandardError,
    Custom,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorBarMode {
    #[default]
    Both,
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorBarDirection {
    #[default]
    Both,
    Plus,
    Minus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorBarSettings {
    #[serde(rename = "type")]
    pub kind: ErrorBarType,
    pub mode: ErrorBarMode,
    pub direction: ErrorBarDirection,
    /// Fixed amount, percentage, or deviation multiplier depending on `kind`.
    pub horizontal_error: f64,
    pub vertical_error: f64,
    /// Per-row error columns for `Custom`.
    pub horizontal_error_path: Option<String>,
    pub vertical_error_path: Option<String>,
}

impl Default for ErrorBarSettings {
    fn default() -> Self {
        Self {
            kind: ErrorBarType::Fixed,
            mode: ErrorBarMode::Both,
            direction: ErrorBarDirection::Both,
            horizontal_error: 1.0,
            vertical_error: 1.0,
            horizontal_error_path: None,
            vertical_error_path: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircularSettings {
    pub start_angle: f64,
    pub end_angle: f64,
    /// Share of half the plot's smaller side used as the outer radius.
    pub radius_factor: f64,
    /// Doughnut hole as a share of the outer radius; pies ignore it.
    pub inner_radius_factor: f64,
    pub label_strategy: LabelStrategy,
    pub label_position: LabelPosition,
    pub connector_length: f64,
}

impl Default for CircularSettings {
    fn default() -> Self {
        Self {
            start_angle: 0.0,
            end_angle: 360.0,
            radius_factor: 0.8,
            inner_radius_factor: 0.4,
            label_strategy: LabelStrategy::Shift,
            label_position: LabelPosition::Outside,
            connector_length: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolarDrawType {
    #[default]
    Line,
    Area,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarSettings {
    pub draw_type: PolarDrawType,
    pub closed: bool,
    /// Angle of the first category; -90 points up.
    pub start_angle: f64,
    pub radius_factor: f64,
}

impl Default for PolarSettings {
    fn default() -> Self { Self { draw_type: PolarDrawType::Line, closed: true, start_angle: -90.0, radius_factor: 0.8 } }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeriesKind {
    #[default]
    Line,
    Scatter,
    Column,
    Area,
    Spline {
        #[serde(default)]
        spline_type: SplineType,
    },
    BoxAndWhisker(BoxPlotSettings),
    Waterfall(WaterfallSettings),
    ErrorBar(ErrorBarSettings),
    Pie(CircularSettings),
    Doughnut(CircularSettings),
    Polar(PolarSettings),
}

impl SeriesKind {
    pub fn is_circular(&self) -> bool { matches!(self, SeriesKind::Pie(_) | SeriesKind::Doughnut(_)) }

    pub fn is_cartesian(&self) -> bool { !self.is_circular() && !matches!(self, SeriesKind::Polar(_)) }

    /// Takes a position in the side-by-side slot.
    pub fn is_side_by_side(&self) -> bool {
        matches!(self, SeriesKind::Column | SeriesKind::BoxAndWhisker(_) | SeriesKind::Waterfall(_))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesDescription {
    pub name: String,
    pub kind: SeriesKind,
    pub x_path: String,
    /// Value path; for box-and-whisker a list of samples.
    pub y_path: String,
    pub log_x: bool,
    /// Share of the category slot, in [0, 1].
    pub width: f64,
    /// Empty share of the series' slot, in [0, 1].
    pub spacing: f64,
    pub visible: bool,
    pub show_in_legend: bool,
    pub show_labels: bool,
    pub selection: SelectionMode,
}

impl Default for SeriesDescription {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: SeriesKind::Line,
            x_path: String::new(),
            y_path: String::new(),
            log_x: false,
            width: 0.8,
            spacing: 0.0,
            visible: true,
            show_in_legend: true,
            show_labels: false,
            selection: SelectionMode::Single,
        }
    }
}

impl SeriesDescription {
    pub fn new(name: impl Into<String>, kind: SeriesKind, x_path: impl Into<String>, y_path: impl Into<String>) -> Self {
        Self { name: name.into(), kind, x_path: x_path.into(), y_path: y_path.into(), ..Self::default() }
    }

    /// Store columns for this kind. Column 0 is always the value (or samples) column.
    pub fn binding(&self) -> SeriesBinding {
        let mut binding = SeriesBinding::new(self.x_path.clone());
        binding.log_x = self.log_x;
        match &self.kind {
            SeriesKind::BoxAndWhisker(_) => binding.samples(self.y_path.clone()),
            SeriesKind::Waterfall(w) => {
                let b = binding.value(self.y_path.clone());
                match &w.summary_path {
                    Some(p) => b.value(p.clone()),
                    None => b,
                }
            }
            SeriesKind::ErrorBar(e) if e.kind == ErrorBarType::Custom => binding
                .value(self.y_path.clone())
                .value(e.horizontal_error_path.clone().unwrap_or_default())
                .value(e.vertical_error_path.clone().unwrap_or_default()),
            _ => binding.value(self.y_path.clone()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_interval("width", self.width)?;
        unit_interval("spacing", self.spacing)?;
        match &self.kind {
            SeriesKind::Pie(c) | SeriesKind::Doughnut(c) => {
                unit_interval("radius_factor", c.radius_factor)?;
                unit_interval("inner_radius_factor", c.inner_radius_factor)?;
                if !(c.connector_length >= 0.0) {
                    return Err(invalid("connector_length", format!("{} is negative", c.connector_length)));
                }
                if !c.start_angle.is_finite() || !c.end_angle.is_finite() {
                    return Err(invalid("start_angle", "angles must be finite".into()));
                }
            }
            SeriesKind::Polar(p) => unit_interval("radius_factor", p.radius_factor)?,
            SeriesKind::ErrorBar(e) if e.kind == ErrorBarType::Custom => {
                if e.horizontal_error_path.is_none() && e.vertical_error_path.is_none() {
                    return Err(invalid("error_bar", "custom error bars need an error path".into()));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartDescription {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub insets: Insets,
    /// Place side-by-side capable series next to each other within a category.
    pub side_by_side: bool,
    pub x_axis: AxisSettings,
    pub y_axis: AxisSettings,
    pub series: Vec<SeriesDescription>,
}

impl Default for ChartDescription {
    fn default() -> Self {
        Self {
            title: String::new(),
            width: WIDTH,
            height: HEIGHT,
            insets: Insets::default(),
            side_by_side: true,
            x_axis: AxisSettings::new("X"),
            y_axis: AxisSettings::new("Y"),
            series: Vec::new(),
        }
    }
}

impl ChartDescription {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let desc: ChartDescription = serde_json::from_str(s)?;
        desc.validate()?;
        Ok(desc)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > f64::from(self.insets.hsum())) {
            return Err(invalid("width", format!("{} leaves no room for insets", self.width)));
        }
        if !(self.height > f64::from(self.insets.vsum())) {
            return Err(invalid("height", format!("{} leaves no room for insets", self.height)));
        }
        self.series.iter().try_for_each(SeriesDescription::validate)
    }
}

fn invalid(name: &'static str, reason: String) -> ConfigError { ConfigError::InvalidValue { name, reason } }

fn unit_interval(name: &'static str, v: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(invalid(name, format!("{v} is outside [0, 1]")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ColumnKind;

    #[test]
    fn defaults_match_documented_values() {
        let s = SeriesDescription::default();
        assert_eq!((s.width, s.spacing), (0.8, 0.0));
        let c = CircularSettings::default();
        assert_eq!((c.start_angle, c.end_angle, c.radius_factor), (0.0, 360.0, 0.8));
        assert_eq!(c.label_strategy, LabelStrategy::Shift);
        assert!(WaterfallSettings::default().allow_auto_sum);
        let b = BoxPlotSettings::default();
        assert_eq!(b.mode, QuartileMethod::Exclusive);
        assert!(b.show_outliers);
        let e = ErrorBarSettings::default();
        assert_eq!((e.kind, e.mode, e.direction), (ErrorBarType::Fixed, ErrorBarMode::Both, ErrorBarDirection::Both));
    }

    #[test]
    fn parses_tagged_series_kinds() {
        let json = r#"{
            "title": "t",
            "series": [
                {"name": "a", "kind": {"type": "column"}, "x_path": "x", "y_path": "y"},
                {"name": "b", "kind": {"type": "spline", "spline_type": "monotonic"}, "x_path": "x", "y_path": "y"},
                {"name": "c", "kind": {"type": "box_and_whisker", "mode": "normal"}, "x_path": "x", "y_path": "samples"},
                {"name": "d", "kind": {"type": "pie", "end_angle": 180}, "x_path": "x", "y_path": "y"}
            ]
        }"#;
        let desc = ChartDescription::from_json_str(json).unwrap();
        assert_eq!(desc.series.len(), 4);
        assert_eq!(desc.series[1].kind, SeriesKind::Spline { spline_type: SplineType::Monotonic });
        match &desc.series[2].kind {
            SeriesKind::BoxAndWhisker(b) => {
                assert_eq!(b.mode, QuartileMethod::Normal);
                assert!(b.show_outliers);
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert_eq!(desc.series[2].binding().columns[0].kind, ColumnKind::Samples);
        match &desc.series[3].kind {
            SeriesKind::Pie(c) => assert_eq!((c.start_angle, c.end_angle), (0.0, 180.0)),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_width() {
        let json = r#"{"series": [{"kind": {"type": "column"}, "width": 1.5}]}"#;
        let err = ChartDescription::from_json_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "width", .. }));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(ChartDescription::from_json_str("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn waterfall_binding_adds_summary_column() {
        let mut d = SeriesDescription::new("w", SeriesKind::Waterfall(WaterfallSettings::default()), "x", "y");
        assert_eq!(d.binding().columns.len(), 1);
        d.kind = SeriesKind::Waterfall(WaterfallSettings { summary_path: Some("total".into()), ..WaterfallSettings::default() });
        assert_eq!(d.binding().columns[1].path, "total");
    }
}
