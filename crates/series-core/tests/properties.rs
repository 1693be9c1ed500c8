// File: crates/series-core/tests/properties.rs
// Purpose: Fixed-input checks of the quartile, spline, waterfall, label and store contracts.

use std::sync::Arc;

use serde_json::json;
use series_core::labels::{resolve_labels, LabelGeometry, LabelRequest};
use series_core::spline::{bezier_segments, coefficients, monotonic_coefficients};
use series_core::stats::{median, quartiles};
use series_core::{
    box_statistics, waterfall_bounds, AccessorCache, ApproxTextMeasurer, Item, LabelPosition, LabelStrategy, Point,
    QuartileMethod, Rect, SeriesBinding, SeriesDataStore, SplineType, Value,
};

const METHODS: [QuartileMethod; 3] = [QuartileMethod::Exclusive, QuartileMethod::Inclusive, QuartileMethod::Normal];

fn item(v: serde_json::Value) -> Item { Arc::new(Value::from(v)) }

#[test]
fn quartiles_of_empty_and_single_samples() {
    for method in METHODS {
        assert_eq!(quartiles(&[], method), (0.0, 0.0));
        assert_eq!(quartiles(&[7.5], method), (7.5, 7.5));
        let stats = box_statistics(&[7.5], method, true);
        assert_eq!((stats.minimum, stats.median, stats.maximum), (7.5, 7.5, 7.5));
    }
    assert_eq!(median(&[]), 0.0);
}

#[test]
fn quartiles_bracket_the_median() {
    let sorted = [1.0, 2.0, 4.0, 7.0, 11.0, 16.0, 22.0];
    for method in METHODS {
        let (q1, q3) = quartiles(&sorted, method);
        let m = median(&sorted);
        assert!(q1 <= m && m <= q3, "{method:?}: {q1} {m} {q3}");
    }
}

#[test]
fn normal_method_flags_the_far_value() {
    let samples: Vec<f64> = (1..=9).map(f64::from).chain([100.0]).collect();
    let stats = box_statistics(&samples, QuartileMethod::Normal, true);
    assert_eq!((stats.lower_quartile, stats.upper_quartile), (3.0, 8.0));
    assert_eq!(stats.outliers, vec![100.0]);
    assert_eq!(stats.maximum, 9.0);
    assert_eq!(stats.minimum, 1.0);
}

#[test]
fn natural_spline_through_a_line_stays_on_it() {
    let curves = bezier_segments(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0], SplineType::Natural);
    assert_eq!(curves.len(), 2);
    for c in &curves {
        for p in [c.control1, c.control2] {
            assert!((p.x - p.y).abs() < 1e-12, "{p:?} off the line");
        }
    }
}

#[test]
fn clamped_spline_follows_the_end_secants() {
    let xs = [0.0, 1.0, 2.0];
    let ys = [0.0, 1.0, 0.0];
    let coef = coefficients(&xs, &ys, SplineType::Clamped);
    for (got, want) in coef.iter().zip([2.0, -4.0, 2.0]) {
        assert!((got - want).abs() < 1e-9, "{coef:?}");
    }
    let curves = bezier_segments(&xs, &ys, SplineType::Clamped);
    // first secant slope is 1, last is -1
    assert!(curves[0].control1.distance_to(Point::new(1.0 / 3.0, 1.0 / 3.0)) < 1e-9, "{:?}", curves[0]);
    assert!(curves[1].control2.distance_to(Point::new(5.0 / 3.0, 1.0 / 3.0)) < 1e-9, "{:?}", curves[1]);
    let natural = bezier_segments(&xs, &ys, SplineType::Natural);
    assert!((natural[0].control1.y - 0.5).abs() < 1e-9);
}

#[test]
fn monotonic_spline_never_turns_against_the_data() {
    let xs = [0.0, 1.0, 2.5, 3.0, 5.0, 6.0];
    let ys = [0.0, 0.1, 3.0, 3.0, 8.0, 8.5];
    assert!(monotonic_coefficients(&xs, &ys).iter().all(|d| *d >= 0.0));
    for c in bezier_segments(&xs, &ys, SplineType::Monotonic) {
        assert!(c.control1.y >= c.start.y && c.control2.y <= c.end.y, "{c:?}");
    }
}

#[test]
fn waterfall_running_total() {
    let bounds = waterfall_bounds(&[46.0, -14.0, -9.0, 15.0], &[], 0.0, true);
    let pairs: Vec<(f64, f64)> = bounds.iter().map(|b| (b.y1, b.y2)).collect();
    assert_eq!(pairs, vec![(46.0, 0.0), (32.0, 46.0), (23.0, 32.0), (38.0, 23.0)]);
}

#[test]
fn crowded_labels_resolve_without_overlap() {
    let geom = LabelGeometry {
        center: Point::new(200.0, 200.0),
        radius: 120.0,
        inner_radius: 0.0,
        connector_length: 10.0,
        plot: Rect::from_ltwh(0.0, 0.0, 400.0, 400.0),
        position: LabelPosition::Outside,
    };
    let requests: Vec<LabelRequest> =
        (0..24).map(|i| LabelRequest { index: i, text: format!("item {i}"), angle: -20.0 + i as f64 * 1.5 }).collect();
    let labels = resolve_labels(&requests, &geom, LabelStrategy::Shift, &ApproxTextMeasurer::default());
    assert_eq!(labels.len(), requests.len());
    let visible: Vec<_> = labels.iter().filter(|l| l.visible).collect();
    assert!(!visible.is_empty());
    for (i, a) in visible.iter().enumerate() {
        for b in &visible[i + 1..] {
            assert!(!a.rect.intersects(&b.rect), "labels {} and {} overlap", a.index, b.index);
        }
    }
}

#[test]
fn linear_flag_drops_on_repeated_x() {
    let mut cache = AccessorCache::new();
    let mut store = SeriesDataStore::with_binding(&SeriesBinding::new("x").value("y"), &mut cache);
    let flags: Vec<bool> = [1.0, 2.0, 2.0, 3.0]
        .iter()
        .map(|x| {
            assert!(store.append(item(json!({"x": x, "y": 1.0}))));
            store.is_linear_data()
        })
        .collect();
    assert_eq!(flags, vec![true, true, false, false]);
}

#[test]
fn store_columns_follow_mutations() {
    let mut cache = AccessorCache::new();
    let mut store = SeriesDataStore::with_binding(&SeriesBinding::new("x").value("y"), &mut cache);
    store.rebuild((0..5).map(|i| item(json!({"x": i, "y": i * 10}))));
    store.insert(2, item(json!({"x": 1.5, "y": 15})));
    store.remove_at(0);
    store.replace(3, item(json!({"x": 3, "y": 99})));
    store.move_row(0, 4);
    assert_eq!(store.len(), 5);
    assert_eq!(store.x_values().len(), 5);
    assert_eq!(store.y_values(0).len(), 5);
    assert_eq!(store.y_values(0)[0], 15.0);
    assert_eq!(store.y_values(0)[4], 10.0);
}

#[test]
fn unresolved_path_leaves_the_series_empty() {
    let mut cache = AccessorCache::new();
    let mut store = SeriesDataStore::with_binding(&SeriesBinding::new("x").value("missing.deep"), &mut cache);
    store.rebuild([item(json!({"x": 1, "y": 2}))]);
    assert!(store.is_empty());
    let mut store = SeriesDataStore::with_binding(&SeriesBinding::new("x[").value("y"), &mut cache);
    store.rebuild([item(json!({"x": 1, "y": 2}))]);
    assert!(store.is_empty());
}
