// File: crates/series-core/src/circular.rs
// Summary: Pie and doughnut layout: wedge angles from value shares, resolved data labels.

use crate::axis::PlotFrame;
use crate::config::CircularSettings;
use crate::geometry::Point;
use crate::labels::{resolve_labels, LabelGeometry, LabelPlacement, LabelRequest, TextMeasurer};
use crate::radial::{angle_to_point, resolve, RadialLayout};
use crate::segment::Segment;
use crate::series::{LayoutContext, SeriesLayout};
use crate::store::SeriesDataStore;
use crate::types::DoubleRange;
use crate::value::format_number;

#[derive(Clone, Debug, Default)]
pub struct CircularLayout {
    pub settings: CircularSettings,
    pub doughnut: bool,
}

impl CircularLayout {
    fn radial(&self, ctx: &LayoutContext<'_>) -> RadialLayout {
        resolve(&ctx.plot, self.settings.radius_factor, self.settings.start_angle, self.settings.end_angle)
    }

    fn inner_radius(&self, radius: f64) -> f64 {
        if self.doughnut { radius * self.settings.inner_radius_factor.clamp(0.0, 1.0) } else { 0.0 }
    }
}

/// Magnitude of a wedge value; NaN and hidden points take no room.
fn share(value: f64, hidden: bool) -> f64 {
    if hidden || !value.is_finite() { 0.0 } else { value.abs() }
}

impl SeriesLayout for CircularLayout {
    fn generate_segments(&self, store: &SeriesDataStore, ctx: &LayoutContext<'_>) -> Vec<Segment> {
        let layout = self.radial(ctx);
        let values = store.y_values(0);
        let shares: Vec<f64> = values.iter().enumerate().map(|(i, v)| share(*v, ctx.hidden_points.contains(&i))).collect();
        let total: f64 = shares.iter().sum();
        let inner_radius = self.inner_radius(layout.radius);
        let mut angle = layout.start_angle;
        shares
            .iter()
            .enumerate()
            .map(|(index, s)| {
                let sweep = if total > 0.0 { s / total * layout.sweep() } else { 0.0 };
                let segment = Segment::Wedge {
                    index,
                    center: layout.center,
                    inner_radius,
                    outer_radius: layout.radius,
                    start_angle: angle,
                    sweep,
                };
                angle += sweep;
                segment
            })
            .collect()
    }

    fn x_range(&self, _store: &SeriesDataStore) -> DoubleRange { DoubleRange::empty() }

    fn y_range(&self, _store: &SeriesDataStore, _origin: f64) -> DoubleRange { DoubleRange::empty() }

    fn tooltip_anchor(&self, segment: &Segment, _index: usize, _frame: &PlotFrame) -> Option<Point> {
        match segment {
            Segment::Wedge { center, inner_radius, outer_radius, start_angle, sweep, .. } if *sweep != 0.0 => {
                Some(angle_to_point(*center, (inner_radius + outer_radius) / 2.0, start_angle + sweep / 2.0))
            }
            _ => None,
        }
    }

    fn circular_labels(
        &self,
        store: &SeriesDataStore,
        segments: &[Segment],
        ctx: &LayoutContext<'_>,
        measurer: &dyn TextMeasurer,
    ) -> Vec<LabelPlacement> {
        let values = store.y_values(0);
        let mut geometry: Option<LabelGeometry> = None;
        let mut requests = Vec::new();
        for segment in segments {
            let Segment::Wedge { index, center, inner_radius, outer_radius, start_angle, sweep } = segment else { continue };
            if *sweep == 0.0 {
                continue;
            }
            geometry.get_or_insert(LabelGeometry {
                center: *center,
                radius: *outer_radius,
                inner_radius: *inner_radius,
                connector_length: self.settings.connector_length,
                plot: ctx.plot,
                position: self.settings.label_position,
            });
            let text = values.get(*index).map(|v| format_number(*v)).unwrap_or_default();
            requests.push(LabelRequest { index: *index, text, angle: start_angle + sweep / 2.0 });
        }
        match geometry {
            Some(geom) => resolve_labels(&requests, &geom, self.settings.label_strategy, measurer),
            None => Vec::new(),
        }
    }
}
