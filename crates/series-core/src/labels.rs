// File: crates/series-core/src/labels.rs
// Summary: Circular data label placement; overlap resolution by angle shifting or hiding, edge trimming.
// Notes:
// - Angles are degrees in screen space. Labels with angles in [-90, 90) sit on the right side,
//   [90, 270) on the left. Shifting never moves a label across the 90/270 seams.
// - After resolution no two visible label rectangles intersect.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::geometry::{normalize_degrees, Point, Rect, Size};
use crate::radial::angle_to_point;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStrategy {
    None,
    #[default]
    Shift,
    Hide,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPosition {
    Inside,
    #[default]
    Outside,
}

/// Text measurement collaborator.
pub trait TextMeasurer {
    fn measure(&self, text: &str) -> Size;
}

/// Fixed advance per character; good enough for layout without a font stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApproxTextMeasurer {
    pub font_size: f64,
    /// Average glyph advance as a fraction of the font size.
    pub advance: f64,
}

impl Default for ApproxTextMeasurer {
    fn default() -> Self { Self { font_size: 12.0, advance: 0.6 } }
}

impl TextMeasurer for ApproxTextMeasurer {
    fn measure(&self, text: &str) -> Size {
        Size::new(text.chars().count() as f64 * self.font_size * self.advance, self.font_size * 1.2)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelPlacement {
    /// Segment index the label belongs to.
    pub index: usize,
    pub text: String,
    pub angle: f64,
    pub radius: f64,
    pub rect: Rect,
    pub visible: bool,
    /// Wedge edge, elbow, and label end of the connector line.
    pub connector: [Point; 3],
}

/// Geometry shared by all labels of one circular series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelGeometry {
    pub center: Point,
    /// Outer radius of the wedges.
    pub radius: f64,
    /// Inner radius (doughnut hole), 0 for pies.
    pub inner_radius: f64,
    pub connector_length: f64,
    pub plot: Rect,
    pub position: LabelPosition,
}

/// Label request for one segment.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelRequest {
    pub index: usize,
    pub text: String,
    /// Mid angle of the wedge.
    pub angle: f64,
}

const ELLIPSIS: &str = "...";
const ELBOW: f64 = 10.0;
const PADDING: f64 = 2.0;

/// Side-relative angle in [-90, 270).
fn side_angle(angle: f64) -> f64 {
    let a = normalize_degrees(angle);
    if a >= 270.0 { a - 360.0 } else { a }
}

fn is_right(angle: f64) -> bool { side_angle(angle) < 90.0 }

fn place(label: &mut LabelPlacement, geom: &LabelGeometry, size: Size) {
    match geom.position {
        LabelPosition::Inside => {
            let r = (geom.radius + geom.inner_radius) / 2.0;
            let p = angle_to_point(geom.center, r, label.angle);
            label.radius = r;
            label.rect = Rect::from_ltwh(p.x - size.width / 2.0, p.y - size.height / 2.0, size.width, size.height);
            label.connector = [p, p, p];
        }
        LabelPosition::Outside => {
            let p0 = angle_to_point(geom.center, geom.radius, label.angle);
            let r = geom.radius + geom.connector_length;
            let p1 = angle_to_point(geom.center, r, label.angle);
            let right = is_right(label.angle);
            let p2 = Point::new(if right { p1.x + ELBOW } else { p1.x - ELBOW }, p1.y);
            let left = if right { p2.x + PADDING } else { p2.x - PADDING - size.width };
            label.radius = r;
            label.rect = Rect::from_ltwh(left, p2.y - size.height / 2.0, size.width, size.height);
            label.connector = [p0, p1, p2];
        }
    }
}

/// Lay out and resolve labels for one circular series.
pub fn resolve_labels(
    requests: &[LabelRequest],
    geom: &LabelGeometry,
    strategy: LabelStrategy,
    measurer: &dyn TextMeasurer,
) -> Vec<LabelPlacement> {
    let mut labels: Vec<LabelPlacement> = requests
        .iter()
        .map(|r| {
            let mut l = LabelPlacement {
                index: r.index,
                text: r.text.clone(),
                angle: r.angle,
                radius: geom.radius,
                rect: Rect::default(),
                visible: !r.text.is_empty() && r.angle.is_finite(),
                connector: [Point::default(); 3],
            };
            let size = measurer.measure(&l.text);
            place(&mut l, geom, size);
            l
        })
        .collect();

    match (strategy, geom.position) {
        (LabelStrategy::None, _) => {}
        (LabelStrategy::Hide, _) | (LabelStrategy::Shift, LabelPosition::Inside) => hide_overlaps(&mut labels),
        (LabelStrategy::Shift, LabelPosition::Outside) => {
            shift_overlaps(&mut labels, geom, measurer);
            hide_overlaps(&mut labels);
        }
    }
    trim_to_plot(&mut labels, geom, measurer);
    if strategy != LabelStrategy::None {
        hide_overlaps(&mut labels);
    }
    labels
}

/// Hide every label that intersects an earlier visible one.
pub fn hide_overlaps(labels: &mut [LabelPlacement]) {
    for i in 0..labels.len() {
        if !labels[i].visible {
            continue;
        }
        let rect = labels[i].rect;
        if labels[..i].iter().any(|l| l.visible && l.rect.intersects(&rect)) {
            labels[i].visible = false;
        }
    }
}

fn shift_overlaps(labels: &mut [LabelPlacement], geom: &LabelGeometry, measurer: &dyn TextMeasurer) {
    let sizes: Vec<Size> = labels.iter().map(|l| measurer.measure(&l.text)).collect();
    let mut right: Vec<usize> = (0..labels.len()).filter(|&i| labels[i].visible && is_right(labels[i].angle)).collect();
    let mut left: Vec<usize> = (0..labels.len()).filter(|&i| labels[i].visible && !is_right(labels[i].angle)).collect();
    for i in right.iter().chain(left.iter()) {
        labels[*i].angle = side_angle(labels[*i].angle);
    }
    // Right side ordered top to bottom, left side bottom to top: both ascending angle.
    right.sort_by(|a, b| labels[*a].rect.top.total_cmp(&labels[*b].rect.top).then(labels[*a].angle.total_cmp(&labels[*b].angle)));
    left.sort_by(|a, b| labels[*a].angle.total_cmp(&labels[*b].angle));
    let mut shifter = Shifter { labels, sizes: &sizes, geom, steps: 0 };
    shifter.resolve_group(&right, -90.0, 90.0);
    shifter.resolve_group(&left, 90.0, 270.0);
    trace!(steps = shifter.steps, "label shift finished");
}

struct Shifter<'a> {
    labels: &'a mut [LabelPlacement],
    sizes: &'a [Size],
    geom: &'a LabelGeometry,
    steps: usize,
}

impl Shifter<'_> {
    fn set_angle(&mut self, ix: usize, angle: f64) {
        self.labels[ix].angle = angle;
        place(&mut self.labels[ix], self.geom, self.sizes[ix]);
        self.steps += 1;
    }

    fn overlaps(&self, a: usize, b: usize) -> bool { self.labels[a].rect.intersects(&self.labels[b].rect) }

    /// Visible predecessor of `order[pos]` in the group.
    fn prev_visible(&self, order: &[usize], pos: usize) -> Option<usize> {
        (0..pos).rev().find(|&p| self.labels[order[p]].visible)
    }

    fn resolve_group(&mut self, order: &[usize], lo: f64, hi: f64) {
        for pos in 1..order.len() {
            let ix = order[pos];
            if !self.labels[ix].visible {
                continue;
            }
            loop {
                let Some(prev_pos) = self.prev_visible(order, pos) else { break };
                if !self.overlaps(order[prev_pos], ix) {
                    break;
                }
                let next = self.labels[ix].angle + 1.0;
                if next < hi {
                    self.set_angle(ix, next);
                    continue;
                }
                if self.push_back(order, prev_pos, lo) {
                    continue;
                }
                self.labels[ix].visible = false;
                break;
            }
        }
    }

    /// Move `order[pos]` one degree backward, cascading to earlier labels it would hit.
    /// Restores the original angles and returns false when the seam blocks the move.
    fn push_back(&mut self, order: &[usize], pos: usize, lo: f64) -> bool {
        let ix = order[pos];
        let old = self.labels[ix].angle;
        let next = old - 1.0;
        if next <= lo {
            return false;
        }
        self.set_angle(ix, next);
        while let Some(prev_pos) = self.prev_visible(order, pos) {
            if !self.overlaps(order[prev_pos], ix) {
                return true;
            }
            if !self.push_back(order, prev_pos, lo) {
                self.set_angle(ix, old);
                return false;
            }
        }
        true
    }
}

fn trim_to_plot(labels: &mut [LabelPlacement], geom: &LabelGeometry, measurer: &dyn TextMeasurer) {
    let plot = geom.plot;
    for label in labels.iter_mut().filter(|l| l.visible) {
        if label.rect.left >= plot.left && label.rect.right <= plot.right {
            continue;
        }
        let right_side = geom.position == LabelPosition::Outside && is_right(label.angle);
        let available = if right_side {
            plot.right - label.rect.left
        } else if geom.position == LabelPosition::Outside {
            label.rect.right - plot.left
        } else {
            (plot.right.min(label.rect.right) - plot.left.max(label.rect.left)).max(0.0)
        };
        match trim_text(&label.text, available, measurer) {
            Some(text) => {
                let size = measurer.measure(&text);
                label.text = text;
                place(label, geom, size);
                if geom.position == LabelPosition::Inside {
                    // Centered labels may still poke out on one side; clamp into the plot.
                    let dx = if label.rect.left < plot.left {
                        plot.left - label.rect.left
                    } else if label.rect.right > plot.right {
                        plot.right - label.rect.right
                    } else {
                        0.0
                    };
                    label.rect = label.rect.translate(dx, 0.0);
                }
            }
            None => label.visible = false,
        }
    }
}

/// Shorten `text` with a trailing ellipsis until it fits `available` width.
pub fn trim_text(text: &str, available: f64, measurer: &dyn TextMeasurer) -> Option<String> {
    if measurer.measure(text).width <= available {
        return Some(text.to_string());
    }
    let chars: Vec<char> = text.chars().collect();
    for keep in (0..chars.len()).rev() {
        let candidate: String = chars[..keep].iter().collect::<String>() + ELLIPSIS;
        if measurer.measure(&candidate).width <= available {
            return Some(candidate);
        }
    }
    None
}
