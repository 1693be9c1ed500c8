// File: crates/series-core/tests/pipeline.rs
// Purpose: End-to-end chart runs: JSON description, item sources, change notifications,
// update passes and recorded canvas output.

use std::sync::Arc;

use anyhow::Context;
use serde_json::json;
use series_core::{
    AnimationProgress, Chart, ChartDescription, DrawCommand, DrawRole, Item, RecordingCanvas, Segment, SourceChange,
    Value,
};

const DESCRIPTION: &str = r#"{
    "title": "Quarterly",
    "width": 640,
    "height": 400,
    "series": [
        {"name": "sales", "kind": {"type": "column"}, "x_path": "quarter", "y_path": "sales"},
        {"name": "delta", "kind": {"type": "waterfall", "summary_path": "total"}, "x_path": "quarter", "y_path": "delta"},
        {"name": "spread", "kind": {"type": "box_and_whisker"}, "x_path": "quarter", "y_path": "samples"}
    ]
}"#;

fn item(v: serde_json::Value) -> Item { Arc::new(Value::from(v)) }

fn quarters() -> Vec<Item> {
    [("Q1", 10.0, 46.0), ("Q2", 14.0, -14.0), ("Q3", 9.0, -9.0), ("Q4", 20.0, 15.0)]
        .iter()
        .map(|(q, sales, delta)| {
            item(json!({
                "quarter": q,
                "sales": sales,
                "delta": delta,
                "total": false,
                "samples": [sales - 2.0, *sales, sales + 1.0, sales + 3.0, sales + 4.0]
            }))
        })
        .collect()
}

fn quarterly_chart() -> Chart {
    let desc = ChartDescription::from_json_str(DESCRIPTION).expect("valid description");
    let mut chart = Chart::from_description(&desc).expect("chart");
    for i in 0..chart.series_count() {
        assert!(chart.set_items(i, quarters()));
    }
    chart
}

fn waterfall_pairs(chart: &Chart) -> Vec<(f64, f64)> {
    chart
        .series(1)
        .expect("waterfall series")
        .segments()
        .iter()
        .filter_map(|s| match s {
            Segment::Waterfall { bounds, .. } => Some((bounds.y1, bounds.y2)),
            _ => None,
        })
        .collect()
}

#[test]
fn sibling_series_share_each_category() {
    let mut chart = quarterly_chart();
    assert_eq!(chart.update(), 3);
    let ranges: Vec<_> = (0..3).map(|i| chart.series(i).expect("series").side_by_side_range()).collect();
    assert!((ranges[0].start + 0.4).abs() < 1e-9);
    assert!((ranges[0].end - ranges[1].start).abs() < 1e-9);
    assert!((ranges[1].end - ranges[2].start).abs() < 1e-9);
    assert!((ranges[2].end - 0.4).abs() < 1e-9);
    assert_eq!(waterfall_pairs(&chart), vec![(46.0, 0.0), (32.0, 46.0), (23.0, 32.0), (38.0, 23.0)]);
}

#[test]
fn appended_category_updates_only_its_series() {
    let mut chart = quarterly_chart();
    chart.update();
    let extra = item(json!({"quarter": "Q5", "sales": 30.0, "delta": 1.0, "total": false, "samples": [1.0]}));
    assert!(chart.apply_change(0, SourceChange::Add { index: 4, items: vec![extra] }));
    assert_eq!(chart.update(), 1);
    let columns = chart.series(0).expect("column series").segments();
    assert_eq!(columns.len(), 5);
    match &columns[4] {
        Segment::Column { top, .. } => assert_eq!(*top, 30.0),
        other => panic!("unexpected segment {other:?}"),
    }
}

#[test]
fn removing_a_row_recomputes_the_running_total() {
    let mut chart = quarterly_chart();
    chart.update();
    chart.apply_change(1, SourceChange::Remove { index: 1, count: 1 });
    chart.update();
    assert_eq!(waterfall_pairs(&chart), vec![(46.0, 0.0), (37.0, 46.0), (52.0, 37.0)]);
}

fn column_tops(chart: &Chart) -> Vec<f64> {
    chart
        .series(0)
        .expect("column series")
        .segments()
        .iter()
        .filter_map(|s| match s {
            Segment::Column { top, .. } => Some(*top),
            _ => None,
        })
        .collect()
}

#[test]
fn moved_row_redraws_in_its_new_slot() {
    let mut chart = quarterly_chart();
    chart.update();
    assert!(chart.apply_change(0, SourceChange::Move { from: 0, to: 3 }));
    assert_eq!(chart.update(), 1);
    assert_eq!(chart.series(0).expect("column series").store().categories(), &["Q2", "Q3", "Q4", "Q1"]);
    assert_eq!(column_tops(&chart), vec![14.0, 9.0, 20.0, 10.0]);
}

#[test]
fn edited_item_field_updates_one_column() {
    let mut chart = quarterly_chart();
    chart.update();
    let series = chart.series_mut(0).expect("column series");
    series.item_property_changed(1, "delta");
    assert!(!series.is_dirty(), "delta is not bound by the column series");
    series.item_property_changed(1, "sales");
    assert!(!series.is_dirty(), "re-reading an unchanged item is a repeat");
    assert!(!series.set_item_field(2, "missing", Value::from(1.0)));
    assert!(series.set_item_field(2, "sales", Value::from(99.0)));
    assert!(series.is_dirty());

    assert_eq!(chart.update(), 1);
    assert_eq!(column_tops(&chart), vec![10.0, 14.0, 99.0, 20.0]);
    assert_eq!(waterfall_pairs(&chart), vec![(46.0, 0.0), (32.0, 46.0), (23.0, 32.0), (38.0, 23.0)]);
}

#[test]
fn unreadable_row_keeps_source_indexes() -> anyhow::Result<()> {
    let mut chart = Chart::new();
    let desc = serde_json::from_value(json!({"name": "s", "kind": {"type": "line"}, "x_path": "x", "y_path": "y"}))?;
    let i = chart.add_series(desc);
    chart.set_items(i, [json!({"x": 1, "y": 10}), json!({"x": "oops", "y": 20}), json!({"x": 3, "y": 30})].into_iter().map(item));
    chart.update();
    assert_eq!(chart.series(i).context("line series")?.store().len(), 3);

    chart.apply_change(i, SourceChange::Replace { index: 2, item: item(json!({"x": 3, "y": 99})) });
    chart.apply_change(i, SourceChange::Remove { index: 1, count: 1 });
    chart.update();
    let store = chart.series(i).context("line series")?.store();
    assert_eq!(store.x_values(), &[1.0, 3.0]);
    assert_eq!(store.y_values(0), &[10.0, 99.0]);
    Ok(())
}

#[test]
fn empty_sample_rows_draw_nothing() -> anyhow::Result<()> {
    let mut chart = Chart::new();
    let desc = serde_json::from_value(json!({
        "name": "spread",
        "kind": {"type": "box_and_whisker"},
        "x_path": "cat",
        "y_path": "v"
    }))?;
    let i = chart.add_series(desc);
    chart.set_items(
        i,
        [json!({"cat": "a", "v": [1, 2, 3]}), json!({"cat": "b", "v": []}), json!({"cat": "c", "v": [4, 5, 6]})]
            .into_iter()
            .map(item),
    );
    chart.update();
    let rows: Vec<usize> = chart.series(i).context("box series")?.segments().iter().map(Segment::first_index).collect();
    assert_eq!(rows, vec![0, 2]);
    assert!(chart.tooltip_info(i, 1).is_none());

    let mut canvas = RecordingCanvas::new();
    chart.draw(&mut canvas, AnimationProgress::DONE);
    assert!(canvas.for_series(i).any(|c| c.style().point == Some(0)));
    assert_eq!(canvas.for_series(i).filter(|c| c.style().point == Some(1)).count(), 0);

    // once the row has samples every row gets its box again
    chart.apply_change(i, SourceChange::Replace { index: 1, item: item(json!({"cat": "b", "v": [2, 3, 4]})) });
    chart.update();
    let rows: Vec<usize> = chart.series(i).context("box series")?.segments().iter().map(Segment::first_index).collect();
    assert_eq!(rows, vec![0, 1, 2]);
    Ok(())
}

#[test]
fn reset_replaces_every_row() {
    let mut chart = quarterly_chart();
    chart.update();
    let rows: Vec<Item> = quarters().into_iter().take(2).collect();
    chart.apply_change(0, SourceChange::Reset { items: rows });
    chart.update();
    assert_eq!(chart.series(0).expect("series").segments().len(), 2);
}

#[test]
fn zero_progress_draws_flat_columns() {
    let mut chart = quarterly_chart();
    chart.update();
    let mut canvas = RecordingCanvas::new();
    chart.draw(&mut canvas, AnimationProgress::new(0.0));
    let rects: Vec<_> = canvas
        .for_series(0)
        .filter_map(|c| match c {
            DrawCommand::FillRect { rect, .. } => Some(*rect),
            _ => None,
        })
        .collect();
    assert_eq!(rects.len(), 4);
    assert!(rects.iter().all(|r| r.height().abs() < 1e-9));
}

#[test]
fn selected_point_is_flagged_for_the_canvas() {
    let mut chart = quarterly_chart();
    chart.update();
    assert_eq!(chart.toggle_selection(0, 1), Some(true));
    let mut canvas = RecordingCanvas::new();
    chart.draw(&mut canvas, AnimationProgress::DONE);
    let selected: Vec<_> = canvas.for_series(0).filter(|c| c.style().selected).map(|c| c.style().point).collect();
    assert_eq!(selected, vec![Some(1)]);
}

#[test]
fn box_outliers_widen_the_value_axis() {
    let mut chart = quarterly_chart();
    let rows: Vec<Item> = quarters()
        .into_iter()
        .chain([item(json!({"quarter": "Q5", "sales": 1.0, "delta": 0.0, "total": false, "samples": [1.0, 2.0, 2.0, 3.0, 3.0, 90.0]}))])
        .collect();
    chart.set_items(2, rows);
    chart.update();
    let frame = *chart.frame().expect("frame");
    let top = frame.to_value(series_core::Point::new(frame.plot.left, frame.plot.top)).1;
    assert!(top >= 90.0 - 1e-9, "axis top {top}");
}

#[test]
fn pie_labels_appear_when_animation_completes() {
    let mut chart = Chart::new();
    let desc = serde_json::from_value(json!({
        "name": "share",
        "kind": {"type": "pie"},
        "x_path": "name",
        "y_path": "value",
        "show_labels": true
    }))
    .expect("series description");
    let i = chart.add_series(desc);
    chart.set_items(i, ["a", "b", "c", "d"].iter().enumerate().map(|(n, name)| item(json!({"name": name, "value": n + 1}))));
    chart.update();
    let visible = chart.series(i).expect("pie").labels().iter().filter(|l| l.visible).count();
    assert!(visible > 0);

    let mut canvas = RecordingCanvas::new();
    chart.draw(&mut canvas, AnimationProgress::new(0.5));
    assert_eq!(canvas.for_series(i).filter(|c| c.style().role == DrawRole::Label).count(), 0);

    let mut canvas = RecordingCanvas::new();
    chart.draw(&mut canvas, AnimationProgress::DONE);
    assert_eq!(canvas.for_series(i).filter(|c| c.style().role == DrawRole::Label).count(), visible);
}

#[test]
fn date_axis_formats_tooltips() -> anyhow::Result<()> {
    let mut chart = Chart::new();
    let desc = serde_json::from_value(json!({"name": "temp", "kind": {"type": "line"}, "x_path": "at", "y_path": "v"}))?;
    let i = chart.add_series(desc);
    chart.set_items(
        i,
        [("2024-01-02T00:00:00", 3.5), ("2024-01-03T00:00:00", 4.0)].iter().map(|(at, v)| item(json!({"at": at, "v": v}))),
    );
    chart.update();
    let tip = chart.tooltip_info(i, 1).context("tooltip for the second row")?;
    assert_eq!(tip.x_text, "2024-01-03 00:00");
    assert_eq!(tip.y_text, "4");
    Ok(())
}

#[test]
fn segments_serialize_for_dumps() -> anyhow::Result<()> {
    let mut chart = quarterly_chart();
    chart.update();
    let dump = serde_json::to_value(chart.series(2).context("box series")?.segments())?;
    assert_eq!(dump.as_array().map(Vec::len), Some(4));
    Ok(())
}
